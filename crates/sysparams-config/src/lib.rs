// crates/sysparams-config/src/lib.rs
// ============================================================================
// Module: SysParams Config Library
// Description: Configuration model, validation, and root store bootstrap.
// Purpose: Single source of truth for sysparams.toml semantics.
// Dependencies: sysparams-core, sysparams-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `sysparams-config` defines the TOML configuration for the parameter store:
//! which durable backend to open and which parameters to seed into the root
//! scope. Validation fails closed, including a dry run of every bootstrap
//! value through the well-known key interpreters.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod bootstrap;
pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use bootstrap::open_root_store;
pub use config::*;
