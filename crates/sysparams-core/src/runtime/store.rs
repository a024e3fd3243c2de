// crates/sysparams-core/src/runtime/store.rs
// ============================================================================
// Module: SysParams In-Memory Backend
// Description: Simple in-memory config backend for tests and embedding.
// Purpose: Provide a deterministic backend implementation without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of [`ConfigBackend`] and a
//! shared wrapper used by [`crate::ParameterStore`] to hold any backend. The
//! in-memory backend records every write and can be taken offline to exercise
//! failure paths. It is not durable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use crate::core::SessionContext;
use crate::core::SessionId;
use crate::interfaces::BackendError;
use crate::interfaces::ConfigBackend;

// ============================================================================
// SECTION: In-Memory Backend
// ============================================================================

/// Write observed by the in-memory backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    /// Session that issued the write.
    pub session_id: SessionId,
    /// Normalized parameter name.
    pub key: String,
    /// Persisted value.
    pub value: String,
}

/// In-memory config backend for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryConfigBackend {
    /// Persisted entries protected by a mutex.
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    /// Write log in call order.
    writes: Arc<Mutex<Vec<RecordedWrite>>>,
    /// When set, every call fails as unreachable.
    offline: Arc<AtomicBool>,
}

impl InMemoryConfigBackend {
    /// Creates an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with entries.
    #[must_use]
    pub fn with_entries(entries: BTreeMap<String, String>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries)),
            ..Self::default()
        }
    }

    /// Takes the backend offline (or back online).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Returns the writes observed so far.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the write log mutex is poisoned.
    pub fn writes(&self) -> Result<Vec<RecordedWrite>, BackendError> {
        let guard = self
            .writes
            .lock()
            .map_err(|_| BackendError::Store("config backend mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    /// Fails when the backend is offline.
    fn ensure_online(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Unreachable("in-memory backend is offline".to_string()));
        }
        Ok(())
    }
}

impl ConfigBackend for InMemoryConfigBackend {
    fn load_all(&self) -> Result<BTreeMap<String, String>, BackendError> {
        self.ensure_online()?;
        let guard = self
            .entries
            .lock()
            .map_err(|_| BackendError::Store("config backend mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn write(&self, ctx: &SessionContext, key: &str, value: &str) -> Result<(), BackendError> {
        self.ensure_online()?;
        self.entries
            .lock()
            .map_err(|_| BackendError::Store("config backend mutex poisoned".to_string()))?
            .insert(key.to_string(), value.to_string());
        self.writes
            .lock()
            .map_err(|_| BackendError::Store("config backend mutex poisoned".to_string()))?
            .push(RecordedWrite {
                session_id: ctx.session_id(),
                key: key.to_string(),
                value: value.to_string(),
            });
        Ok(())
    }

    fn readiness(&self) -> Result<(), BackendError> {
        self.ensure_online()
    }
}

// ============================================================================
// SECTION: Shared Backend Wrapper
// ============================================================================

/// Shared config backend backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedConfigBackend {
    /// Inner backend implementation.
    inner: Arc<dyn ConfigBackend + Send + Sync>,
}

impl SharedConfigBackend {
    /// Wraps a config backend in a shared, clonable wrapper.
    #[must_use]
    pub fn from_backend(backend: impl ConfigBackend + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(backend),
        }
    }
}

impl ConfigBackend for SharedConfigBackend {
    fn load_all(&self) -> Result<BTreeMap<String, String>, BackendError> {
        self.inner.load_all()
    }

    fn write(&self, ctx: &SessionContext, key: &str, value: &str) -> Result<(), BackendError> {
        self.inner.write(ctx, key, value)
    }

    fn readiness(&self) -> Result<(), BackendError> {
        self.inner.readiness()
    }
}
