//! Load and validation tests for sysparams-config.
// crates/sysparams-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load and Validation Tests
// Description: File loading limits and store/bootstrap invariants.
// Purpose: Ensure invalid configuration fails closed with a clear message.
// =============================================================================

use sysparams_config::MAX_CONFIG_FILE_SIZE;
use sysparams_config::StoreType;
use sysparams_config::SysParamsConfig;
use sysparams_store_sqlite::SqliteStoreMode;
use tempfile::TempDir;

mod common;

type TestResult = Result<(), String>;

// ============================================================================
// SECTION: Defaults
// ============================================================================

#[test]
fn default_config_validates() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.store.store_type != StoreType::Memory {
        return Err("store type should default to memory".to_string());
    }
    if !config.bootstrap.params.is_empty() {
        return Err("bootstrap params should default to empty".to_string());
    }
    Ok(())
}

#[test]
fn sqlite_store_settings_parse() -> TestResult {
    let config = common::config_from_toml(
        r#"
[store]
type = "sqlite"
path = "data/params.db"
journal_mode = "delete"
max_versions = 10
"#,
    )
    .map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    let sqlite = config.store.sqlite_config().ok_or("sqlite config missing")?;
    if sqlite.journal_mode != SqliteStoreMode::Delete || sqlite.max_versions != Some(10) {
        return Err("unexpected sqlite journal mode or retention".to_string());
    }
    Ok(())
}

#[test]
fn unknown_fields_are_rejected() -> TestResult {
    if common::config_from_toml("[store]\nkind = \"memory\"\n").is_ok() {
        return Err("unknown store field should fail to parse".to_string());
    }
    Ok(())
}

// ============================================================================
// SECTION: Store Validation
// ============================================================================

#[test]
fn sqlite_store_requires_path() -> TestResult {
    let config =
        common::config_from_toml("[store]\ntype = \"sqlite\"\n").map_err(|err| err.to_string())?;
    common::assert_invalid(config.validate(), "sqlite store requires path")
}

#[test]
fn memory_store_rejects_path() -> TestResult {
    let config = common::config_from_toml("[store]\ntype = \"memory\"\npath = \"x.db\"\n")
        .map_err(|err| err.to_string())?;
    common::assert_invalid(config.validate(), "memory store must not set path")
}

#[test]
fn zero_max_versions_is_rejected() -> TestResult {
    let config = common::config_from_toml(
        "[store]\ntype = \"sqlite\"\npath = \"x.db\"\nmax_versions = 0\n",
    )
    .map_err(|err| err.to_string())?;
    common::assert_invalid(config.validate(), "max_versions must be greater than zero")
}

// ============================================================================
// SECTION: Bootstrap Validation
// ============================================================================

#[test]
fn bootstrap_accepts_well_formed_values() -> TestResult {
    let config = common::config_from_toml(
        r#"
[bootstrap.params]
autocommit = "0"
sql_mode = "STRICT_TRANS_TABLES"
character_set_results = "utf8mb4"
time_zone = "+00:00"
"#,
    )
    .map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn bootstrap_rejects_invalid_well_known_value() -> TestResult {
    let config = common::config_from_toml("[bootstrap.params]\nautocommit = \"yes\"\n")
        .map_err(|err| err.to_string())?;
    common::assert_invalid(config.validate(), "bootstrap.params")
}

#[test]
fn bootstrap_rejects_keys_differing_only_by_case() -> TestResult {
    let config = common::config_from_toml(
        "[bootstrap.params]\nautocommit = \"0\"\nAUTOCOMMIT = \"1\"\n",
    )
    .map_err(|err| err.to_string())?;
    common::assert_invalid(config.validate(), "differ only by case")
}

// ============================================================================
// SECTION: Loading
// ============================================================================

#[test]
fn load_reads_and_validates_file() -> TestResult {
    let temp = TempDir::new().map_err(|err| err.to_string())?;
    let path = common::write_config(temp.path(), "[bootstrap.params]\nautocommit = \"0\"\n")
        .map_err(|err| err.to_string())?;
    let config = SysParamsConfig::load(Some(&path)).map_err(|err| err.to_string())?;
    if config.bootstrap.params.get("autocommit").map(String::as_str) != Some("0") {
        return Err("bootstrap autocommit not loaded".to_string());
    }
    Ok(())
}

#[test]
fn load_rejects_invalid_toml() -> TestResult {
    let temp = TempDir::new().map_err(|err| err.to_string())?;
    let path =
        common::write_config(temp.path(), "[store\n").map_err(|err| err.to_string())?;
    common::assert_invalid(SysParamsConfig::load(Some(&path)), "config parse error")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let temp = TempDir::new().map_err(|err| err.to_string())?;
    let padding = format!("# {}\n", "x".repeat(MAX_CONFIG_FILE_SIZE));
    let path = common::write_config(temp.path(), &padding).map_err(|err| err.to_string())?;
    common::assert_invalid(SysParamsConfig::load(Some(&path)), "exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let temp = TempDir::new().map_err(|err| err.to_string())?;
    let path = temp.path().join("sysparams.toml");
    std::fs::write(&path, [0xff, 0xfe, 0x00]).map_err(|err| err.to_string())?;
    common::assert_invalid(SysParamsConfig::load(Some(&path)), "must be utf-8")
}

#[test]
fn load_reports_missing_file_as_io_error() -> TestResult {
    let temp = TempDir::new().map_err(|err| err.to_string())?;
    let path = temp.path().join("missing.toml");
    common::assert_invalid(SysParamsConfig::load(Some(&path)), "config io error")
}
