// crates/sysparams-core/src/core/mod.rs
// ============================================================================
// Module: SysParams Core Types
// Description: Value types shared by the parameter store and its collaborators.
// Purpose: Group charset handles, tri-state flags, key names, and session tokens.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Plain data types with no behavior beyond construction and conversion.

pub mod charset;
pub mod flag;
pub mod keys;
pub mod session;

pub use charset::Charset;
pub use charset::Decoder;
pub use flag::Flag;
pub use keys::normalize_key;
pub use session::SessionContext;
pub use session::SessionId;
