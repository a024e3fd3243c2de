// crates/sysparams-core/src/lib.rs
// ============================================================================
// Module: SysParams Core Library
// Description: Public API surface for the hierarchical parameter store.
// Purpose: Expose parameter types, collaborator interfaces, and the store.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! `sysparams-core` resolves effective runtime settings for a session-oriented
//! server. Raw string parameters are normalized, interpreted into typed values
//! for a fixed set of well-known keys, inherited by per-session scopes, and
//! persisted through an injected durable backend from the root scope only.
//! Storage, encoding tables, and session plumbing are reached through the
//! traits in [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::BackendError;
pub use interfaces::ConfigBackend;
pub use interfaces::EncodingRegistry;
pub use runtime::BuiltinEncodingRegistry;
pub use runtime::InMemoryConfigBackend;
pub use runtime::ParamError;
pub use runtime::ParameterStore;
pub use runtime::RecordedWrite;
pub use runtime::SharedConfigBackend;
pub use runtime::SharedEncodingRegistry;
pub use runtime::parse_bool;
