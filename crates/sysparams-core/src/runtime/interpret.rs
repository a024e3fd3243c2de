// crates/sysparams-core/src/runtime/interpret.rs
// ============================================================================
// Module: Well-Known Key Interpreters
// Description: Static dispatch table from key name to typed interpreter.
// Purpose: Validate well-known parameters before their raw value is stored.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! An interpreter turns a raw value (or its absence) into a [`Derived`]
//! update without touching the store. The store applies the update together
//! with the raw value, so a rejected value leaves both untouched.

use crate::core::Charset;
use crate::core::Decoder;
use crate::core::Flag;
use crate::core::keys;
use crate::interfaces::EncodingRegistry;
use crate::runtime::params::ParamError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Inputs available to an interpreter.
pub(crate) struct InterpretContext<'a> {
    /// Normalized key being set.
    pub(crate) key: &'a str,
    /// Charset lookup for encoding parameters.
    pub(crate) registry: &'a dyn EncodingRegistry,
}

/// Typed fields parsed from a SQL mode string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SqlMode {
    /// `NO_AUTO_VALUE_ON_ZERO` state.
    pub(crate) no_auto_value_on_zero: Flag,
    /// `STRICT_TRANS_TABLES` / `STRICT_ALL_TABLES` state.
    pub(crate) strict: bool,
}

/// Typed field update produced by an interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Derived {
    /// New auto-commit state.
    AutoCommit(Flag),
    /// New request decoder.
    RequestDecoder(Option<Decoder>),
    /// New result charset.
    ResultEncoding(Option<Charset>),
    /// New lock timeout in milliseconds.
    LockTimeout(Option<u64>),
    /// New SQL mode flags.
    SqlMode(SqlMode),
}

/// Interpreter signature; `None` means the key is being unset.
pub(crate) type Interpreter =
    fn(&InterpretContext<'_>, Option<&str>) -> Result<Derived, ParamError>;

// ============================================================================
// SECTION: Dispatch Table
// ============================================================================

/// Well-known keys and their interpreters.
const INTERPRETERS: &[(&str, Interpreter)] = &[
    (keys::AUTOCOMMIT, interpret_autocommit),
    (keys::CHARACTER_SET_CLIENT, interpret_character_set_client),
    (keys::CHARACTER_SET_RESULTS, interpret_character_set_results),
    (keys::DDL_LOCK_TIMEOUT, interpret_lock_timeout),
    (keys::INNODB_LOCK_WAIT_TIMEOUT, interpret_lock_timeout),
    (keys::SQL_MODE, interpret_sql_mode),
];

/// Returns the interpreter for a normalized key, if it is well-known.
pub(crate) fn interpreter_for(key: &str) -> Option<Interpreter> {
    INTERPRETERS.iter().find(|(name, _)| *name == key).map(|(_, interpreter)| *interpreter)
}

// ============================================================================
// SECTION: Interpreters
// ============================================================================

/// Builds an invalid-value error for the current key.
fn invalid(ctx: &InterpretContext<'_>, value: &str, reason: &str) -> ParamError {
    ParamError::InvalidValue {
        key: ctx.key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// `autocommit`: `"1"` or `"0"`.
fn interpret_autocommit(
    ctx: &InterpretContext<'_>,
    value: Option<&str>,
) -> Result<Derived, ParamError> {
    let flag = match value {
        None => Flag::Unset,
        Some("1") => Flag::True,
        Some("0") => Flag::False,
        Some(other) => return Err(invalid(ctx, other, "expected 1 or 0")),
    };
    Ok(Derived::AutoCommit(flag))
}

/// `character_set_client`: decoder looked up by upper-cased name.
fn interpret_character_set_client(
    ctx: &InterpretContext<'_>,
    value: Option<&str>,
) -> Result<Derived, ParamError> {
    let Some(name) = value else {
        return Ok(Derived::RequestDecoder(None));
    };
    let decoder = ctx
        .registry
        .lookup_decoder(&name.to_uppercase())
        .ok_or_else(|| invalid(ctx, name, "unknown character set name"))?;
    Ok(Derived::RequestDecoder(Some(decoder)))
}

/// `character_set_results`: charset lookup; `utf8mb4` and `binary` map to UTF-8.
fn interpret_character_set_results(
    ctx: &InterpretContext<'_>,
    value: Option<&str>,
) -> Result<Derived, ParamError> {
    let Some(name) = value else {
        return Ok(Derived::ResultEncoding(None));
    };
    // strings are held as utf8 internally, so binary results are sent as utf8
    let lookup = if name.eq_ignore_ascii_case("utf8mb4") || name.eq_ignore_ascii_case("binary") {
        "utf8"
    } else {
        name
    };
    let charset = ctx
        .registry
        .lookup_encoding(lookup)
        .ok_or_else(|| invalid(ctx, name, "unknown character set name"))?;
    Ok(Derived::ResultEncoding(Some(charset)))
}

/// Lock timeouts: integer seconds converted to milliseconds.
///
/// Only unsigned values are accepted; `-1` and other negative numbers are a
/// [`ParamError::Parse`] just like non-numeric text, as is a value whose
/// millisecond form overflows `u64`.
fn interpret_lock_timeout(
    ctx: &InterpretContext<'_>,
    value: Option<&str>,
) -> Result<Derived, ParamError> {
    let Some(raw) = value else {
        return Ok(Derived::LockTimeout(None));
    };
    let parse_error = || ParamError::Parse {
        key: ctx.key.to_string(),
        value: raw.to_string(),
    };
    let seconds: u64 = raw.parse().map_err(|_| parse_error())?;
    let millis = seconds.checked_mul(1_000).ok_or_else(parse_error)?;
    Ok(Derived::LockTimeout(Some(millis)))
}

/// `sql_mode`: comma-separated mode flags.
///
/// Unsetting resets `NO_AUTO_VALUE_ON_ZERO` to unset and also clears strict
/// mode, so `is_strict` never outlives the `sql_mode` value that enabled it.
/// An empty string sets both flags to false.
fn interpret_sql_mode(
    ctx: &InterpretContext<'_>,
    value: Option<&str>,
) -> Result<Derived, ParamError> {
    let Some(raw) = value else {
        return Ok(Derived::SqlMode(SqlMode {
            no_auto_value_on_zero: Flag::Unset,
            strict: false,
        }));
    };
    let mut mode = SqlMode {
        no_auto_value_on_zero: Flag::False,
        strict: false,
    };
    for token in raw.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        match token {
            "NO_AUTO_VALUE_ON_ZERO" => mode.no_auto_value_on_zero = Flag::True,
            "STRICT_TRANS_TABLES" | "STRICT_ALL_TABLES" => mode.strict = true,
            other => return Err(invalid(ctx, other, "unknown sql mode")),
        }
    }
    Ok(Derived::SqlMode(mode))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
