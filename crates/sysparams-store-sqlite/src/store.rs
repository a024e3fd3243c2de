// crates/sysparams-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Config Backend
// Description: Durable ConfigBackend backed by SQLite WAL.
// Purpose: Persist root-scope parameters with a per-key change history.
// Dependencies: sysparams-core, rusqlite, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! This module implements a durable [`ConfigBackend`] using `SQLite`. Each
//! write updates the latest value in `config_entries` and appends a version to
//! `config_history` inside one transaction, so a failed write never leaves a
//! half-applied parameter. Loads validate stored sizes and fail closed on
//! corruption.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use sysparams_core::BackendError;
use sysparams_core::ConfigBackend;
use sysparams_core::SessionContext;
use sysparams_core::normalize_key;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum parameter name size accepted by the store.
pub const MAX_KEY_BYTES: usize = 256;
/// Maximum parameter value size accepted by the store.
pub const MAX_VALUE_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` config backend.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Optional maximum history versions per key (older versions pruned).
    #[serde(default)]
    pub max_versions: Option<u64>,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Payload exceeded configured size limits.
    #[error("sqlite store {field} too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Which part of the entry was oversized.
        field: &'static str,
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for BackendError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                field,
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "{field} exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

// ============================================================================
// SECTION: History
// ============================================================================

/// One recorded version of a persisted parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigHistoryEntry {
    /// Normalized parameter name.
    pub key: String,
    /// Per-key version, starting at 1.
    pub version: i64,
    /// Value written in this version.
    pub value: String,
    /// Session that wrote the value.
    pub session_id: u64,
    /// Unix epoch milliseconds of the write.
    pub saved_at: i64,
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed config backend with WAL support.
#[derive(Clone)]
pub struct SqliteConfigBackend {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteConfigBackend {
    /// Opens an `SQLite`-backed config backend.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        debug!(path = %config.path.display(), "sqlite config backend opened");
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the recorded versions of a parameter, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the history cannot be read.
    pub fn history(&self, key: &str) -> Result<Vec<ConfigHistoryEntry>, SqliteStoreError> {
        let key = normalize_key(key);
        let guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let mut statement = guard
            .prepare(
                "SELECT version, value, session_id, saved_at FROM config_history WHERE key = ?1 \
                 ORDER BY version ASC",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = statement
            .query_map(params![key], |row| {
                let version: i64 = row.get(0)?;
                let value: String = row.get(1)?;
                let session_id: i64 = row.get(2)?;
                let saved_at: i64 = row.get(3)?;
                Ok((version, value, session_id, saved_at))
            })
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut entries = Vec::new();
        for row in rows {
            let (version, value, session_id, saved_at) =
                row.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let session_id = u64::try_from(session_id).map_err(|_| {
                SqliteStoreError::Corrupt(format!("negative session id in history for {key}"))
            })?;
            entries.push(ConfigHistoryEntry {
                key: key.clone(),
                version,
                value,
                session_id,
                saved_at,
            });
        }
        Ok(entries)
    }
}

impl ConfigBackend for SqliteConfigBackend {
    fn load_all(&self) -> Result<BTreeMap<String, String>, BackendError> {
        self.load_entries().map_err(BackendError::from)
    }

    fn write(&self, ctx: &SessionContext, key: &str, value: &str) -> Result<(), BackendError> {
        self.write_entry(ctx, key, value).map_err(BackendError::from)
    }

    fn readiness(&self) -> Result<(), BackendError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| BackendError::Store("mutex poisoned".to_string()))?;
        guard
            .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| {
                row.get::<_, i64>(0)
            })
            .map_err(|err| BackendError::Unreachable(err.to_string()))?;
        drop(guard);
        Ok(())
    }
}

impl SqliteConfigBackend {
    /// Loads every persisted parameter.
    fn load_entries(&self) -> Result<BTreeMap<String, String>, SqliteStoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut entries = BTreeMap::new();
        {
            let mut statement = tx
                .prepare("SELECT key, value FROM config_entries ORDER BY key")
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let rows = statement
                .query_map(params![], |row| {
                    let key: String = row.get(0)?;
                    let value: String = row.get(1)?;
                    Ok((key, value))
                })
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            for row in rows {
                let (key, value) = row.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
                if key != normalize_key(&key) {
                    return Err(SqliteStoreError::Corrupt(format!(
                        "stored key {key} is not normalized"
                    )));
                }
                check_size("value", value.len(), MAX_VALUE_BYTES)?;
                entries.insert(key, value);
            }
        }
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(entries)
    }

    /// Writes a parameter and appends its history version.
    fn write_entry(
        &self,
        ctx: &SessionContext,
        key: &str,
        value: &str,
    ) -> Result<(), SqliteStoreError> {
        let key = normalize_key(key);
        if key.is_empty() {
            return Err(SqliteStoreError::Invalid("parameter name must be non-empty".to_string()));
        }
        check_size("key", key.len(), MAX_KEY_BYTES)?;
        check_size("value", value.len(), MAX_VALUE_BYTES)?;
        let session_id = i64::try_from(ctx.session_id().get())
            .map_err(|_| SqliteStoreError::Invalid("session id too large".to_string()))?;
        let saved_at = unix_millis();
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let latest_version: Option<i64> = tx
            .query_row(
                "SELECT latest_version FROM config_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let next_version = match latest_version {
            None => 1,
            Some(value) => {
                if value < 1 {
                    return Err(SqliteStoreError::Corrupt(format!(
                        "invalid latest_version for parameter {key}"
                    )));
                }
                value.checked_add(1).ok_or_else(|| {
                    SqliteStoreError::Corrupt(format!("version overflow for parameter {key}"))
                })?
            }
        };
        tx.execute(
            "INSERT INTO config_entries (key, value, latest_version, updated_at) VALUES (?1, ?2, \
             ?3, ?4) ON CONFLICT(key) DO UPDATE SET value = excluded.value, latest_version = \
             excluded.latest_version, updated_at = excluded.updated_at",
            params![key, value, next_version, saved_at],
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tx.execute(
            "INSERT INTO config_history (key, version, value, session_id, saved_at) VALUES (?1, \
             ?2, ?3, ?4, ?5)",
            params![key, next_version, value, session_id, saved_at],
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        enforce_retention(&tx, &key, next_version, self.config.max_versions)?;
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        debug!(key = %key, version = next_version, "parameter written to sqlite");
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects payloads above a size limit.
fn check_size(
    field: &'static str,
    actual_bytes: usize,
    max_bytes: usize,
) -> Result<(), SqliteStoreError> {
    if actual_bytes > max_bytes {
        return Err(SqliteStoreError::TooLarge {
            field,
            max_bytes,
            actual_bytes,
        });
    }
    Ok(())
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS config_entries (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    latest_version INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS config_history (
                    key TEXT NOT NULL,
                    version INTEGER NOT NULL,
                    value TEXT NOT NULL,
                    session_id INTEGER NOT NULL,
                    saved_at INTEGER NOT NULL,
                    PRIMARY KEY (key, version),
                    FOREIGN KEY (key) REFERENCES config_entries(key) ON DELETE CASCADE
                );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Enforces history retention if configured.
fn enforce_retention(
    tx: &rusqlite::Transaction<'_>,
    key: &str,
    latest_version: i64,
    max_versions: Option<u64>,
) -> Result<(), SqliteStoreError> {
    let Some(max_versions) = max_versions else {
        return Ok(());
    };
    if max_versions == 0 {
        return Err(SqliteStoreError::Invalid(
            "max_versions must be greater than zero".to_string(),
        ));
    }
    let max_versions = i64::try_from(max_versions)
        .map_err(|_| SqliteStoreError::Invalid("max_versions too large".to_string()))?;
    if latest_version > max_versions {
        let min_version = latest_version - max_versions + 1;
        tx.execute(
            "DELETE FROM config_history WHERE key = ?1 AND version < ?2",
            params![key, min_version],
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    }
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
