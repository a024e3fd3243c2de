// crates/sysparams-core/src/runtime/accessors.rs
// ============================================================================
// Module: Typed Accessors
// Description: Typed parameter getters with defaults.
// Purpose: Resolve effective settings when a parameter is absent or unset.
// Dependencies: crate::core, crate::runtime::params
// ============================================================================

//! ## Overview
//! Accessors never fail for well-known keys: their values were validated when
//! set. Plain keys are parsed on read, so numeric accessors return
//! [`ParamError::Parse`] for garbage.

use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::str::FromStr;

use crate::core::Charset;
use crate::core::Decoder;
use crate::core::keys;
use crate::runtime::params::ParamError;
use crate::runtime::params::ParameterStore;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Lock timeout used when none is configured.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 50_000;
/// SQL dialect used when none is configured.
pub const DEFAULT_DATABASE_TYPE: &str = "MYSQL";
/// Upper bound for the default async import thread count.
pub const MAX_ASYNC_IMPORT_THREADS: usize = 8;
/// Replication master port used when none is configured.
pub const DEFAULT_REPLICATION_MASTER_PORT: u16 = 3306;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a boolean parameter: `"1"` is true, anything else false.
#[must_use]
pub fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    raw.map_or(default, |value| value == "1")
}

/// Parses an optional integer parameter.
fn parse_integer<T: FromStr>(key: &str, raw: Option<&str>) -> Result<Option<T>, ParamError> {
    raw.map(|value| {
        value.parse().map_err(|_| ParamError::Parse {
            key: key.to_string(),
            value: value.to_string(),
        })
    })
    .transpose()
}

// ============================================================================
// SECTION: Accessors
// ============================================================================

impl ParameterStore {
    /// Returns the auto-commit flag (default true).
    #[must_use]
    pub const fn auto_commit(&self) -> bool {
        self.auto_commit.resolve(true)
    }

    /// Returns the lock timeout in milliseconds.
    #[must_use]
    pub fn lock_timeout_ms(&self) -> u64 {
        self.lock_timeout_ms.unwrap_or(DEFAULT_LOCK_TIMEOUT_MS)
    }

    /// Decoder for client statements, equivalent to `character_set_client`.
    #[must_use]
    pub fn request_decoder(&self) -> Decoder {
        self.request_decoder.unwrap_or_default()
    }

    /// Charset for results sent to the client, equivalent to
    /// `character_set_results`.
    #[must_use]
    pub fn result_encoding(&self) -> Charset {
        self.result_encoding.unwrap_or_default()
    }

    /// Returns true if `NO_AUTO_VALUE_ON_ZERO` is active.
    ///
    /// See <https://dev.mysql.com/doc/refman/8.0/en/sql-mode.html#sqlmode_no_auto_value_on_zero>.
    #[must_use]
    pub const fn is_no_auto_value_on_zero(&self) -> bool {
        self.no_auto_value_on_zero.resolve(false)
    }

    /// Returns true if a strict SQL mode is active.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Returns the SQL dialect name.
    #[must_use]
    pub fn database_type(&self) -> &str {
        self.get(keys::DATABASE_TYPE).unwrap_or(DEFAULT_DATABASE_TYPE)
    }

    /// Returns true if bulk imports run asynchronously (default true).
    #[must_use]
    pub fn is_async_import_enabled(&self) -> bool {
        parse_bool(self.get(keys::ASYNC_IMPORT), true)
    }

    /// Returns the async import worker count.
    ///
    /// Defaults to the available parallelism, capped at
    /// [`MAX_ASYNC_IMPORT_THREADS`].
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Parse`] when the configured value is not an integer.
    pub fn async_import_threads(&self) -> Result<usize, ParamError> {
        let Some(raw) = self.get(keys::ASYNC_IMPORT_THREADS) else {
            let available = std::thread::available_parallelism().map_or(1, NonZeroUsize::get);
            return Ok(available.min(MAX_ASYNC_IMPORT_THREADS));
        };
        raw.parse().map_err(|_| ParamError::Parse {
            key: keys::ASYNC_IMPORT_THREADS.to_string(),
            value: raw.to_string(),
        })
    }

    /// Returns true if foreign key constraints are checked (default true).
    #[must_use]
    pub fn foreign_key_checks(&self) -> bool {
        parse_bool(self.get(keys::FOREIGN_KEY_CHECKS), true)
    }

    /// Returns the databases excluded from replication.
    #[must_use]
    pub fn replication_ignore_list(&self) -> BTreeSet<String> {
        self.get(keys::REPLICATION_IGNORE_DB)
            .map(|raw| {
                raw.split(',').filter(|name| !name.is_empty()).map(str::to_string).collect()
            })
            .unwrap_or_default()
    }

    /// Returns the server id announced to the replication master.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Parse`] when the configured value is not an integer.
    pub fn replication_server_id(&self) -> Result<Option<u32>, ParamError> {
        parse_integer(keys::REPLICATION_SERVER_ID, self.get(keys::REPLICATION_SERVER_ID))
    }

    /// Returns the replication master host.
    #[must_use]
    pub fn replication_master_host(&self) -> Option<&str> {
        self.get(keys::REPLICATION_MASTER_HOST)
    }

    /// Returns the replication master port (default 3306).
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Parse`] when the configured value is not a port.
    pub fn replication_master_port(&self) -> Result<u16, ParamError> {
        Ok(parse_integer(keys::REPLICATION_MASTER_PORT, self.get(keys::REPLICATION_MASTER_PORT))?
            .unwrap_or(DEFAULT_REPLICATION_MASTER_PORT))
    }

    /// Returns the replication master user.
    #[must_use]
    pub fn replication_master_user(&self) -> Option<&str> {
        self.get(keys::REPLICATION_MASTER_USER)
    }

    /// Returns the replication master password.
    #[must_use]
    pub fn replication_master_password(&self) -> Option<&str> {
        self.get(keys::REPLICATION_MASTER_PASSWORD)
    }

    /// Returns the authentication plugin name.
    #[must_use]
    pub fn auth_plugin(&self) -> Option<&str> {
        self.get(keys::AUTH_PLUGIN)
    }

    /// Returns the authentication seed bytes.
    #[must_use]
    pub fn auth_seed(&self) -> Option<&[u8]> {
        self.get(keys::AUTH_SEED).map(str::as_bytes)
    }
}
