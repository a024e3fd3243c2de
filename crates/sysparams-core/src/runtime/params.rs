// crates/sysparams-core/src/runtime/params.rs
// ============================================================================
// Module: Parameter Store
// Description: Hierarchical, typed store of session and global parameters.
// Purpose: Keep raw values and their typed interpretation in lockstep.
// Dependencies: crate::{core, interfaces}, thiserror, tracing
// ============================================================================

//! ## Overview
//! A [`ParameterStore`] maps lower-cased parameter names to raw strings and
//! keeps typed fields for the well-known keys. The root store is hydrated from
//! a [`ConfigBackend`] and is the only scope allowed to persist. Sessions run
//! on derived stores: independent snapshots that never see later changes to
//! their parent.
//!
//! Invariants:
//! - Keys are normalized before every lookup and mutation.
//! - A rejected value leaves both the raw map and the typed fields untouched.
//! - Persistent writes commit in memory only after the backend accepted them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::core::Charset;
use crate::core::Decoder;
use crate::core::Flag;
use crate::core::SessionContext;
use crate::core::normalize_key;
use crate::interfaces::BackendError;
use crate::interfaces::ConfigBackend;
use crate::runtime::interpret::Derived;
use crate::runtime::interpret::InterpretContext;
use crate::runtime::interpret::interpreter_for;
use crate::runtime::registry::SharedEncodingRegistry;
use crate::runtime::store::SharedConfigBackend;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Parameter store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ParamError {
    /// A well-known key received a value outside its accepted set.
    #[error("invalid value '{value}' for parameter {key}: {reason}")]
    InvalidValue {
        /// Normalized parameter name.
        key: String,
        /// Rejected value (or the rejected token within it).
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// A numeric parameter failed integer parsing.
    #[error("parameter {key} expects an integer, got '{value}'")]
    Parse {
        /// Normalized parameter name.
        key: String,
        /// Unparseable value.
        value: String,
    },
    /// Persistence attempted from a derived scope.
    #[error("parameter {key} can only be persisted from the root scope")]
    PermissionDenied {
        /// Normalized parameter name.
        key: String,
    },
    /// The durable backend failed.
    #[error(transparent)]
    BackendUnavailable(#[from] BackendError),
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Raw parameters plus their typed interpretation for one scope.
pub struct ParameterStore {
    /// Raw values keyed by normalized name.
    values: BTreeMap<String, String>,
    /// `autocommit` state.
    pub(crate) auto_commit: Flag,
    /// Lock timeout in milliseconds.
    pub(crate) lock_timeout_ms: Option<u64>,
    /// `NO_AUTO_VALUE_ON_ZERO` state from `sql_mode`.
    pub(crate) no_auto_value_on_zero: Flag,
    /// Strict mode from `sql_mode`.
    pub(crate) strict: bool,
    /// Decoder from `character_set_client`.
    pub(crate) request_decoder: Option<Decoder>,
    /// Charset from `character_set_results`.
    pub(crate) result_encoding: Option<Charset>,
    /// Charset lookup shared with derived scopes.
    registry: SharedEncodingRegistry,
    /// Durable backend; present only on the root scope.
    backend: Option<SharedConfigBackend>,
}

impl ParameterStore {
    /// Creates an empty, non-persistent store.
    #[must_use]
    pub fn new(registry: SharedEncodingRegistry) -> Self {
        Self {
            values: BTreeMap::new(),
            auto_commit: Flag::Unset,
            lock_timeout_ms: None,
            no_auto_value_on_zero: Flag::Unset,
            strict: false,
            request_decoder: None,
            result_encoding: None,
            registry,
            backend: None,
        }
    }

    /// Creates the root store and hydrates it from the backend.
    ///
    /// Every persisted pair goes through [`Self::set`], so typed fields are
    /// populated up front.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::BackendUnavailable`] when the backend cannot be
    /// read, or the interpreter error for a persisted value that is rejected.
    pub fn create_root(
        backend: SharedConfigBackend,
        registry: SharedEncodingRegistry,
    ) -> Result<Self, ParamError> {
        let persisted = backend.load_all()?;
        let mut store = Self::new(registry);
        for (key, value) in persisted {
            store.set(&key, value)?;
        }
        info!(parameters = store.values.len(), "root parameter store hydrated");
        store.backend = Some(backend);
        Ok(store)
    }

    /// Derives an independent session scope from this store.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] if a value held by this store is rejected when
    /// replayed, which only happens with a different encoding registry.
    pub fn derive(&self) -> Result<Self, ParamError> {
        let mut child = Self::new(self.registry.clone());
        for (key, value) in &self.values {
            child.set(key, value.clone())?;
        }
        debug!(parameters = child.values.len(), "derived parameter scope");
        Ok(child)
    }

    /// Returns true if this scope can persist parameters.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.backend.is_some()
    }

    /// Returns the raw value for a parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    /// Returns a read-only view of every raw parameter.
    #[must_use]
    pub const fn get_all(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Sets a parameter for this scope.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::InvalidValue`] or [`ParamError::Parse`] when a
    /// well-known key rejects the value; the store is left unchanged.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), ParamError> {
        let key = normalize_key(key);
        let value = value.into();
        let derived = self.interpret(&key, Some(&value))?;
        debug!(key = %key, "parameter set");
        self.commit(key, Some(value), derived);
        Ok(())
    }

    /// Removes a parameter, resetting its typed field.
    ///
    /// Returns the previous raw value.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] if the key's interpreter rejects the reset.
    pub fn unset(&mut self, key: &str) -> Result<Option<String>, ParamError> {
        let key = normalize_key(key);
        let derived = self.interpret(&key, None)?;
        let previous = self.values.get(&key).cloned();
        debug!(key = %key, "parameter unset");
        self.commit(key, None, derived);
        Ok(previous)
    }

    /// Sets a parameter and writes it through the durable backend.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::PermissionDenied`] on a derived scope, an
    /// interpreter error for a rejected value, or
    /// [`ParamError::BackendUnavailable`] when the write fails. The store is
    /// unchanged on every error.
    pub fn set_persistent(
        &mut self,
        ctx: &SessionContext,
        key: &str,
        value: impl Into<String>,
    ) -> Result<(), ParamError> {
        let key = normalize_key(key);
        let Some(backend) = self.backend.as_ref() else {
            return Err(ParamError::PermissionDenied {
                key,
            });
        };
        let value = value.into();
        let derived = self.interpret(&key, Some(&value))?;
        if let Err(err) = backend.write(ctx, &key, &value) {
            warn!(key = %key, session = %ctx.session_id(), error = %err, "persistent write failed");
            return Err(err.into());
        }
        info!(key = %key, session = %ctx.session_id(), "parameter persisted");
        self.commit(key, Some(value), derived);
        Ok(())
    }

    /// Runs the key's interpreter, if any, without mutating the store.
    fn interpret(&self, key: &str, value: Option<&str>) -> Result<Option<Derived>, ParamError> {
        let Some(interpreter) = interpreter_for(key) else {
            return Ok(None);
        };
        let ctx = InterpretContext {
            key,
            registry: &self.registry,
        };
        interpreter(&ctx, value).map(Some)
    }

    /// Applies a raw value and its typed update together.
    fn commit(&mut self, key: String, value: Option<String>, derived: Option<Derived>) {
        if let Some(derived) = derived {
            self.apply(derived);
        }
        match value {
            Some(value) => {
                self.values.insert(key, value);
            }
            None => {
                self.values.remove(&key);
            }
        }
    }

    /// Stores a typed field update.
    const fn apply(&mut self, derived: Derived) {
        match derived {
            Derived::AutoCommit(flag) => self.auto_commit = flag,
            Derived::RequestDecoder(decoder) => self.request_decoder = decoder,
            Derived::ResultEncoding(charset) => self.result_encoding = charset,
            Derived::LockTimeout(millis) => self.lock_timeout_ms = millis,
            Derived::SqlMode(mode) => {
                self.no_auto_value_on_zero = mode.no_auto_value_on_zero;
                self.strict = mode.strict;
            }
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(SharedEncodingRegistry::default())
    }
}

impl fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterStore")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .field("auto_commit", &self.auto_commit)
            .field("lock_timeout_ms", &self.lock_timeout_ms)
            .field("no_auto_value_on_zero", &self.no_auto_value_on_zero)
            .field("strict", &self.strict)
            .field("request_decoder", &self.request_decoder)
            .field("result_encoding", &self.result_encoding)
            .field("root", &self.is_root())
            .finish_non_exhaustive()
    }
}
