// crates/sysparams-core/src/interfaces/mod.rs
// ============================================================================
// Module: SysParams Interfaces
// Description: Collaborator contracts for durable config and charset lookup.
// Purpose: Keep the parameter store independent of storage and codec tables.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The parameter store consumes two collaborators: a durable configuration
//! backend that holds the root scope's persisted parameters, and an encoding
//! registry that resolves charset names. Implementations own their own
//! synchronization; the store performs no locking around them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::Charset;
use crate::core::Decoder;
use crate::core::SessionContext;

// ============================================================================
// SECTION: Config Backend
// ============================================================================

/// Durable config backend errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend I/O error.
    #[error("config backend io error: {0}")]
    Io(String),
    /// Backend data is corrupted or fails integrity checks.
    #[error("config backend corruption: {0}")]
    Corrupt(String),
    /// Backend data version is incompatible.
    #[error("config backend version mismatch: {0}")]
    VersionMismatch(String),
    /// Backend rejected the data.
    #[error("config backend invalid data: {0}")]
    Invalid(String),
    /// Backend cannot be reached.
    #[error("config backend unreachable: {0}")]
    Unreachable(String),
    /// Backend reported an error.
    #[error("config backend error: {0}")]
    Store(String),
}

/// Durable storage for root-scope parameters.
pub trait ConfigBackend {
    /// Loads every persisted key/value pair.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the backend cannot be read.
    fn load_all(&self) -> Result<BTreeMap<String, String>, BackendError>;

    /// Persists a single key/value pair on behalf of a session.
    ///
    /// The key is already normalized. The write must be atomic: either the
    /// new value is durable or the previous value is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the write is not durable.
    fn write(&self, ctx: &SessionContext, key: &str, value: &str) -> Result<(), BackendError>;

    /// Reports backend readiness for liveness/readiness probes.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the backend is unavailable.
    fn readiness(&self) -> Result<(), BackendError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Encoding Registry
// ============================================================================

/// Charset lookup by name.
pub trait EncodingRegistry {
    /// Returns a decoder for client input. Names arrive upper-cased.
    fn lookup_decoder(&self, name: &str) -> Option<Decoder>;

    /// Returns the charset for result encoding.
    fn lookup_encoding(&self, name: &str) -> Option<Charset>;
}
