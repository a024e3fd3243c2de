// crates/sysparams-core/src/runtime/mod.rs
// ============================================================================
// Module: SysParams Runtime
// Description: Parameter store, key interpreters, and reference collaborators.
// Purpose: Resolve raw parameters into typed session settings.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime hosts [`ParameterStore`] together with the in-memory backend
//! and built-in charset registry used by tests and embedded deployments.

pub mod accessors;
mod interpret;
pub mod params;
pub mod registry;
pub mod store;

pub use accessors::DEFAULT_DATABASE_TYPE;
pub use accessors::DEFAULT_LOCK_TIMEOUT_MS;
pub use accessors::DEFAULT_REPLICATION_MASTER_PORT;
pub use accessors::MAX_ASYNC_IMPORT_THREADS;
pub use accessors::parse_bool;
pub use params::ParamError;
pub use params::ParameterStore;
pub use registry::BuiltinEncodingRegistry;
pub use registry::SharedEncodingRegistry;
pub use store::InMemoryConfigBackend;
pub use store::RecordedWrite;
pub use store::SharedConfigBackend;
