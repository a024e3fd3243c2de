// crates/sysparams-core/src/core/keys.rs
// ============================================================================
// Module: Parameter Keys
// Description: Canonical parameter names and key normalization.
// Purpose: Keep every lookup and mutation case-insensitive.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Parameter names are stored lower-cased. Constants here are already in
//! normalized form and can be compared directly against normalized keys.

// ============================================================================
// SECTION: Well-Known Keys
// ============================================================================

/// Transaction auto-commit flag (`"1"` / `"0"`).
pub const AUTOCOMMIT: &str = "autocommit";
/// Charset of statements sent by the client.
pub const CHARACTER_SET_CLIENT: &str = "character_set_client";
/// Charset used to encode results sent to the client.
pub const CHARACTER_SET_RESULTS: &str = "character_set_results";
/// DDL lock timeout in seconds.
pub const DDL_LOCK_TIMEOUT: &str = "ddl_lock_timeout";
/// Row lock wait timeout in seconds.
pub const INNODB_LOCK_WAIT_TIMEOUT: &str = "innodb_lock_wait_timeout";
/// Comma-separated SQL mode flags.
pub const SQL_MODE: &str = "sql_mode";

// ============================================================================
// SECTION: Plain Keys
// ============================================================================

/// SQL dialect of the server.
pub const DATABASE_TYPE: &str = "databasetype";
/// Whether bulk imports run asynchronously.
pub const ASYNC_IMPORT: &str = "antsdb_asynchronous_import";
/// Worker thread count for asynchronous imports.
pub const ASYNC_IMPORT_THREADS: &str = "antsdb_asynchronous_import_threads";
/// Whether foreign key constraints are checked.
pub const FOREIGN_KEY_CHECKS: &str = "foreign_key_checks";
/// Server id announced by the replication slave.
pub const REPLICATION_SERVER_ID: &str = "antsdb_mysqlslave_slave_server_id";
/// Replication master host.
pub const REPLICATION_MASTER_HOST: &str = "antsdb_mysqlslave_master_host";
/// Replication master port.
pub const REPLICATION_MASTER_PORT: &str = "antsdb_mysqlslave_master_port";
/// Replication master user.
pub const REPLICATION_MASTER_USER: &str = "antsdb_mysqlslave_master_user";
/// Replication master password.
pub const REPLICATION_MASTER_PASSWORD: &str = "antsdb_mysqlslave_master_password";
/// Comma-separated databases excluded from replication.
pub const REPLICATION_IGNORE_DB: &str = "antsdb_mysqlslave_slave_ignore_db";
/// Authentication plugin name.
pub const AUTH_PLUGIN: &str = "antsdb_auth_plugin";
/// Authentication seed.
pub const AUTH_SEED: &str = "antsdb_auth_seed";

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Normalizes a parameter name for storage and lookup.
#[must_use]
pub fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}
