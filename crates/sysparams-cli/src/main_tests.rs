// crates/sysparams-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for argument parsing and output rendering.
// Purpose: Ensure commands parse and render root parameters deterministically.
// Dependencies: sysparams-cli main helpers
// ============================================================================

//! ## Overview
//! Validates clap parsing, the list, effective, and history renderers, and
//! that `set` only runs against a store that outlives the process.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use clap::Parser;
use sysparams_config::SysParamsConfig;
use sysparams_core::ParameterStore;
use sysparams_store_sqlite::ConfigHistoryEntry;
use tempfile::TempDir;

use super::Cli;
use super::Commands;
use super::ConfigCommand;
use super::SetCommand;
use super::command_set;
use super::open_root;
use super::render_effective;
use super::render_history;
use super::render_list;

// ============================================================================
// SECTION: Parsing
// ============================================================================

#[test]
fn parses_set_with_default_session() {
    let cli = Cli::try_parse_from(["sysparams", "set", "AutoCommit", "0"]).expect("parse");
    match cli.command {
        Commands::Set(command) => {
            assert_eq!(command.key, "AutoCommit");
            assert_eq!(command.value, "0");
            assert_eq!(command.session, 1);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_global_config_flag_after_subcommand() {
    let cli = Cli::try_parse_from(["sysparams", "config", "validate", "--config", "x.toml"])
        .expect("parse");
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("x.toml")));
    assert!(matches!(
        cli.command,
        Commands::Config {
            command: ConfigCommand::Validate
        }
    ));
}

#[test]
fn rejects_get_without_key() {
    assert!(Cli::try_parse_from(["sysparams", "get"]).is_err());
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

#[test]
fn list_renders_sorted_lowercase_keys() {
    let mut store = ParameterStore::default();
    store.set("Sql_Mode", "STRICT_ALL_TABLES").expect("set");
    store.set("autocommit", "0").expect("set");
    assert_eq!(render_list(&store), vec!["autocommit=0", "sql_mode=STRICT_ALL_TABLES"]);
}

#[test]
fn effective_renders_typed_json() {
    let mut store = ParameterStore::default();
    store.set("autocommit", "0").expect("set");
    store.set("character_set_results", "latin1").expect("set");
    store.set("antsdb_mysqlslave_slave_ignore_db", "b,a").expect("set");
    store.set("antsdb_mysqlslave_master_password", "hunter2").expect("set");

    let json = render_effective(&store).expect("render");
    let value: serde_json::Value = serde_json::from_str(&json).expect("json");
    assert_eq!(value["auto_commit"], serde_json::json!(false));
    assert_eq!(value["result_charset"], serde_json::json!("ISO-8859-1"));
    assert_eq!(value["request_charset"], serde_json::json!("UTF-8"));
    assert_eq!(value["lock_timeout_ms"], serde_json::json!(50_000));
    assert_eq!(value["replication"]["ignore_db"], serde_json::json!(["a", "b"]));
    assert_eq!(value["replication"]["master_port"], serde_json::json!(3306));
    assert!(!json.contains("hunter2"));
}

#[test]
fn effective_reports_unparseable_numeric_parameter() {
    let mut store = ParameterStore::default();
    store.set("antsdb_mysqlslave_master_port", "not-a-port").expect("set");
    let err = render_effective(&store).expect_err("bad port");
    assert!(err.to_string().contains("antsdb_mysqlslave_master_port"));
}

#[test]
fn history_renders_one_line_per_version() {
    let entries = vec![
        ConfigHistoryEntry {
            key: "autocommit".to_string(),
            version: 1,
            value: "0".to_string(),
            session_id: 4,
            saved_at: 10,
        },
        ConfigHistoryEntry {
            key: "autocommit".to_string(),
            version: 2,
            value: "1".to_string(),
            session_id: 5,
            saved_at: 20,
        },
    ];
    assert_eq!(render_history(&entries), vec!["1\t10\tsession=4\t0", "2\t20\tsession=5\t1"]);
}

// ============================================================================
// SECTION: Store Access
// ============================================================================

#[test]
fn open_root_reads_sqlite_store_from_config() {
    let temp = TempDir::new().expect("tempdir");
    let db_path = temp.path().join("params.db");
    let toml = format!(
        "[store]\ntype = \"sqlite\"\npath = '{}'\n\n[bootstrap.params]\nsql_mode = \
         \"STRICT_TRANS_TABLES\"\n",
        db_path.display()
    );
    let config: SysParamsConfig = toml::from_str(&toml).expect("config");
    let root = open_root(&config).expect("root");
    assert!(root.is_root());
    assert!(root.is_strict());
    assert!(db_path.exists());
}

#[test]
fn set_refuses_memory_store() {
    let config = SysParamsConfig::default();
    let command = SetCommand {
        key: "autocommit".to_string(),
        value: "0".to_string(),
        session: 1,
    };
    let err = command_set(&config, &command).expect_err("memory store");
    assert!(err.to_string().contains("requires a sqlite store"));
}

#[test]
fn set_persists_through_sqlite_store() {
    let temp = TempDir::new().expect("tempdir");
    let db_path = temp.path().join("params.db");
    let toml = format!("[store]\ntype = \"sqlite\"\npath = '{}'\n", db_path.display());
    let config: SysParamsConfig = toml::from_str(&toml).expect("config");
    let command = SetCommand {
        key: "AutoCommit".to_string(),
        value: "0".to_string(),
        session: 2,
    };
    command_set(&config, &command).expect("set");
    let reopened = open_root(&config).expect("reopen");
    assert_eq!(reopened.get("autocommit"), Some("0"));
    assert!(!reopened.auto_commit());
}
