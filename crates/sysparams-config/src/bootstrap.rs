// crates/sysparams-config/src/bootstrap.rs
// ============================================================================
// Module: Root Store Bootstrap
// Description: Opens the configured backend and hydrates the root store.
// Purpose: Turn a validated config into a ready root ParameterStore.
// Dependencies: sysparams-core, sysparams-store-sqlite, tracing
// ============================================================================

//! ## Overview
//! [`open_root_store`] builds the configured [`ConfigBackend`], hydrates the
//! root [`ParameterStore`] from it, and then applies bootstrap parameters for
//! keys the backend has no value for. Bootstrap values are session-local to
//! the root scope: they are never written back to the backend.
//!
//! [`ConfigBackend`]: sysparams_core::ConfigBackend

// ============================================================================
// SECTION: Imports
// ============================================================================

use sysparams_core::InMemoryConfigBackend;
use sysparams_core::ParameterStore;
use sysparams_core::SharedConfigBackend;
use sysparams_core::SharedEncodingRegistry;
use sysparams_store_sqlite::SqliteConfigBackend;
use tracing::debug;

use crate::config::ConfigError;
use crate::config::StoreType;
use crate::config::SysParamsConfig;

// ============================================================================
// SECTION: Bootstrap
// ============================================================================

/// Opens the configured backend and returns the hydrated root store.
///
/// # Errors
///
/// Returns [`ConfigError`] when the configuration is invalid, the backend
/// cannot be opened, or a persisted or bootstrap value is rejected.
pub fn open_root_store(config: &SysParamsConfig) -> Result<ParameterStore, ConfigError> {
    config.validate()?;
    let backend = open_backend(config)?;
    let mut root = ParameterStore::create_root(backend, SharedEncodingRegistry::default())
        .map_err(|err| ConfigError::Store(err.to_string()))?;
    for (key, value) in &config.bootstrap.params {
        if root.get(key).is_some() {
            debug!(key = %key, "bootstrap parameter shadowed by persisted value");
            continue;
        }
        root.set(key, value.as_str()).map_err(|err| ConfigError::Store(err.to_string()))?;
    }
    Ok(root)
}

/// Builds the configured durable backend.
fn open_backend(config: &SysParamsConfig) -> Result<SharedConfigBackend, ConfigError> {
    match config.store.store_type {
        StoreType::Memory => Ok(SharedConfigBackend::from_backend(InMemoryConfigBackend::new())),
        StoreType::Sqlite => {
            let sqlite = config.store.sqlite_config().ok_or_else(|| {
                ConfigError::Invalid("sqlite store requires path".to_string())
            })?;
            let backend =
                SqliteConfigBackend::new(sqlite).map_err(|err| ConfigError::Store(err.to_string()))?;
            Ok(SharedConfigBackend::from_backend(backend))
        }
    }
}
