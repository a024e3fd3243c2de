// crates/sysparams-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Config Backend
// Description: Durable ConfigBackend using SQLite WAL.
// Purpose: Persist root-scope parameters across server restarts.
// Dependencies: sysparams-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`ConfigBackend`] that keeps the latest
//! value of every persisted parameter plus an append-only change history
//! attributed to the writing session.
//!
//! [`ConfigBackend`]: sysparams_core::ConfigBackend

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::ConfigHistoryEntry;
pub use store::MAX_KEY_BYTES;
pub use store::MAX_VALUE_BYTES;
pub use store::SqliteConfigBackend;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
