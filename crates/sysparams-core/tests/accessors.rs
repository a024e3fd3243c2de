// crates/sysparams-core/tests/accessors.rs
// ============================================================================
// Module: Typed Accessor Tests
// Description: Defaults and parsing for typed parameter getters.
// Purpose: Validate replication, import, and dialect settings resolution.
// ============================================================================

//! Typed accessor defaults and parsing.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeSet;

use sysparams_core::Charset;
use sysparams_core::ParamError;
use sysparams_core::ParameterStore;
use sysparams_core::runtime::MAX_ASYNC_IMPORT_THREADS;

#[test]
fn empty_store_reports_defaults() -> Result<(), ParamError> {
    let store = ParameterStore::default();
    assert!(store.auto_commit());
    assert_eq!(store.lock_timeout_ms(), 50_000);
    assert_eq!(store.request_decoder().charset(), Charset::Utf8);
    assert_eq!(store.result_encoding(), Charset::Utf8);
    assert!(!store.is_no_auto_value_on_zero());
    assert!(!store.is_strict());
    assert_eq!(store.database_type(), "MYSQL");
    assert!(store.is_async_import_enabled());
    assert!(store.foreign_key_checks());
    assert!(store.replication_ignore_list().is_empty());
    assert_eq!(store.replication_server_id()?, None);
    assert_eq!(store.replication_master_port()?, 3306);
    assert_eq!(store.replication_master_user(), None);
    assert_eq!(store.replication_master_password(), None);
    assert_eq!(store.auth_plugin(), None);
    assert_eq!(store.auth_seed(), None);
    Ok(())
}

#[test]
fn database_type_reads_case_insensitive_key() {
    let mut store = ParameterStore::default();
    store.set("databaseType", "POSTGRESQL").expect("set");
    assert_eq!(store.database_type(), "POSTGRESQL");
}

#[test]
fn async_import_threads_defaults_to_capped_parallelism() -> Result<(), ParamError> {
    let store = ParameterStore::default();
    let available = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    assert_eq!(store.async_import_threads()?, available.min(MAX_ASYNC_IMPORT_THREADS));
    Ok(())
}

#[test]
fn async_import_threads_uses_configured_value() -> Result<(), ParamError> {
    let mut store = ParameterStore::default();
    store.set("antsdb_asynchronous_import_threads", "3")?;
    assert_eq!(store.async_import_threads()?, 3);
    store.set("antsdb_asynchronous_import_threads", "32")?;
    assert_eq!(store.async_import_threads()?, 32);
    Ok(())
}

#[test]
fn async_import_threads_rejects_garbage() {
    let mut store = ParameterStore::default();
    store.set("antsdb_asynchronous_import_threads", "many").expect("plain key");
    assert!(matches!(store.async_import_threads(), Err(ParamError::Parse { .. })));
}

#[test]
fn ignore_list_collapses_duplicates_and_empty_tokens() {
    let mut store = ParameterStore::default();
    store.set("antsdb_mysqlslave_slave_ignore_db", "db1,db2").expect("set");
    let expected: BTreeSet<String> = ["db1", "db2"].into_iter().map(str::to_string).collect();
    assert_eq!(store.replication_ignore_list(), expected);

    store.set("antsdb_mysqlslave_slave_ignore_db", "db1,,db2,db1").expect("set");
    assert_eq!(store.replication_ignore_list(), expected);
}

#[test]
fn boolean_flags_use_one_as_true() {
    let mut store = ParameterStore::default();
    store.set("foreign_key_checks", "0").expect("set");
    store.set("antsdb_asynchronous_import", "off").expect("set");
    assert!(!store.foreign_key_checks());
    assert!(!store.is_async_import_enabled());
    store.set("FOREIGN_KEY_CHECKS", "1").expect("set");
    assert!(store.foreign_key_checks());
}

#[test]
fn replication_settings_resolve() -> Result<(), ParamError> {
    let mut store = ParameterStore::default();
    store.set("antsdb_mysqlslave_slave_server_id", "42")?;
    store.set("antsdb_mysqlslave_master_port", "3307")?;
    store.set("antsdb_mysqlslave_master_user", "repl")?;
    store.set("antsdb_mysqlslave_master_password", "secret")?;
    assert_eq!(store.replication_server_id()?, Some(42));
    assert_eq!(store.replication_master_port()?, 3307);
    assert_eq!(store.replication_master_user(), Some("repl"));
    assert_eq!(store.replication_master_password(), Some("secret"));
    Ok(())
}

#[test]
fn replication_port_out_of_range_is_a_parse_error() {
    let mut store = ParameterStore::default();
    store.set("antsdb_mysqlslave_master_port", "70000").expect("set");
    assert!(matches!(store.replication_master_port(), Err(ParamError::Parse { .. })));
}

#[test]
fn auth_settings_resolve() {
    let mut store = ParameterStore::default();
    store.set("antsdb_auth_plugin", "mysql_native_password").expect("set");
    store.set("antsdb_auth_seed", "abc").expect("set");
    assert_eq!(store.auth_plugin(), Some("mysql_native_password"));
    assert_eq!(store.auth_seed(), Some(b"abc".as_slice()));
}
