// crates/sysparams-cli/src/main.rs
// ============================================================================
// Module: SysParams CLI Entry Point
// Description: Command dispatcher for inspecting and editing root parameters.
// Purpose: Provide an operator CLI over the configured parameter store.
// Dependencies: clap, sysparams-config, sysparams-core, serde_json, tracing.
// ============================================================================

//! ## Overview
//! The `sysparams` CLI opens the root parameter store described by
//! `sysparams.toml` (or `SYSPARAMS_CONFIG`) and exposes list, get, persistent
//! set, effective-value and history views. Diagnostics go through `tracing`
//! to stderr, filtered by `SYSPARAMS_LOG`.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use serde::Serialize;
use sysparams_config::StoreType;
use sysparams_config::SysParamsConfig;
use sysparams_config::open_root_store;
use sysparams_core::Charset;
use sysparams_core::ParamError;
use sysparams_core::ParameterStore;
use sysparams_core::SessionContext;
use sysparams_core::SessionId;
use sysparams_store_sqlite::ConfigHistoryEntry;
use sysparams_store_sqlite::SqliteConfigBackend;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable holding the log filter directive.
const LOG_ENV_VAR: &str = "SYSPARAMS_LOG";
/// Log filter used when `SYSPARAMS_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "sysparams", version, disable_help_subcommand = true)]
struct Cli {
    /// Optional config file path (defaults to sysparams.toml or env override).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List every parameter in the root scope.
    List,
    /// Print the raw value of one parameter.
    Get(GetCommand),
    /// Persist a parameter through the root scope.
    Set(SetCommand),
    /// Print typed effective values as JSON.
    Effective,
    /// Print the recorded versions of a parameter (sqlite store only).
    History(HistoryCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate,
}

/// Arguments for `get`.
#[derive(Args, Debug)]
struct GetCommand {
    /// Parameter name (case-insensitive).
    key: String,
}

/// Arguments for `set`.
#[derive(Args, Debug)]
struct SetCommand {
    /// Parameter name (case-insensitive).
    key: String,
    /// Raw parameter value.
    value: String,
    /// Session id recorded with the write.
    #[arg(long, value_name = "ID", default_value_t = 1)]
    session: u64,
}

/// Arguments for `history`.
#[derive(Args, Debug)]
struct HistoryCommand {
    /// Parameter name (case-insensitive).
    key: String,
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Typed view of the root scope, excluding secrets.
#[derive(Debug, Serialize)]
struct EffectiveParams {
    /// Whether statements commit implicitly.
    auto_commit: bool,
    /// Lock wait timeout in milliseconds.
    lock_timeout_ms: u64,
    /// Charset used to decode client requests.
    request_charset: Charset,
    /// Charset used to encode results.
    result_charset: Charset,
    /// `NO_AUTO_VALUE_ON_ZERO` SQL mode flag.
    no_auto_value_on_zero: bool,
    /// Strict SQL mode flag.
    strict: bool,
    /// Dialect name.
    database_type: String,
    /// Whether bulk import runs asynchronously.
    async_import_enabled: bool,
    /// Worker threads for asynchronous import.
    async_import_threads: usize,
    /// Whether foreign keys are enforced.
    foreign_key_checks: bool,
    /// Replication settings.
    replication: EffectiveReplication,
    /// Authentication plugin name.
    auth_plugin: Option<String>,
}

/// Replication portion of [`EffectiveParams`].
#[derive(Debug, Serialize)]
struct EffectiveReplication {
    /// Replica server id.
    server_id: Option<u32>,
    /// Master host.
    master_host: Option<String>,
    /// Master port.
    master_port: u16,
    /// Replication user.
    master_user: Option<String>,
    /// Databases skipped by replication.
    ignore_db: Vec<String>,
}

impl EffectiveParams {
    /// Collects typed values from a store.
    fn from_store(store: &ParameterStore) -> Result<Self, ParamError> {
        Ok(Self {
            auto_commit: store.auto_commit(),
            lock_timeout_ms: store.lock_timeout_ms(),
            request_charset: store.request_decoder().charset(),
            result_charset: store.result_encoding(),
            no_auto_value_on_zero: store.is_no_auto_value_on_zero(),
            strict: store.is_strict(),
            database_type: store.database_type().to_string(),
            async_import_enabled: store.is_async_import_enabled(),
            async_import_threads: store.async_import_threads()?,
            foreign_key_checks: store.foreign_key_checks(),
            replication: EffectiveReplication {
                server_id: store.replication_server_id()?,
                master_host: store.replication_master_host().map(str::to_string),
                master_port: store.replication_master_port()?,
                master_user: store.replication_master_user().map(str::to_string),
                ignore_db: store.replication_ignore_list().into_iter().collect(),
            },
            auth_plugin: store.auth_plugin().map(str::to_string),
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Installs the stderr log subscriber.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = SysParamsConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    match cli.command {
        Commands::List => command_list(&config),
        Commands::Get(command) => command_get(&config, &command),
        Commands::Set(command) => command_set(&config, &command),
        Commands::Effective => command_effective(&config),
        Commands::History(command) => command_history(&config, &command),
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Opens the configured root store.
fn open_root(config: &SysParamsConfig) -> CliResult<ParameterStore> {
    open_root_store(config).map_err(|err| CliError::new(format!("failed to open store: {err}")))
}

/// Prints `key=value` for every root parameter.
fn command_list(config: &SysParamsConfig) -> CliResult<ExitCode> {
    let root = open_root(config)?;
    for line in render_list(&root) {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints one parameter value.
fn command_get(config: &SysParamsConfig, command: &GetCommand) -> CliResult<ExitCode> {
    let root = open_root(config)?;
    let value = root
        .get(&command.key)
        .ok_or_else(|| CliError::new(format!("parameter {} is not set", command.key)))?;
    write_stdout_line(value).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Persists one parameter through the root scope.
fn command_set(config: &SysParamsConfig, command: &SetCommand) -> CliResult<ExitCode> {
    if config.store.store_type == StoreType::Memory {
        return Err(CliError::new(
            "set requires a sqlite store; a memory store is discarded when the command exits"
                .to_string(),
        ));
    }
    let session = SessionId::from_raw(command.session)
        .ok_or_else(|| CliError::new("session id must be greater than zero".to_string()))?;
    let mut root = open_root(config)?;
    debug!(key = %command.key, session = %session, "persisting parameter");
    root.set_persistent(&SessionContext::new(session), &command.key, command.value.as_str())
        .map_err(|err| CliError::new(format!("failed to set {}: {err}", command.key)))?;
    write_stdout_line(&format!("{}={}", command.key.to_lowercase(), command.value))
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the typed effective values as pretty JSON.
fn command_effective(config: &SysParamsConfig) -> CliResult<ExitCode> {
    let root = open_root(config)?;
    let json = render_effective(&root)?;
    write_stdout_line(&json).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the recorded history of one parameter.
fn command_history(config: &SysParamsConfig, command: &HistoryCommand) -> CliResult<ExitCode> {
    let sqlite = config
        .store
        .sqlite_config()
        .ok_or_else(|| CliError::new("history requires a sqlite store".to_string()))?;
    let backend = SqliteConfigBackend::new(sqlite)
        .map_err(|err| CliError::new(format!("failed to open store: {err}")))?;
    let entries = backend
        .history(&command.key)
        .map_err(|err| CliError::new(format!("failed to read history: {err}")))?;
    for line in render_history(&entries) {
        write_stdout_line(&line).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Reports a successfully loaded configuration.
fn command_config_validate() -> CliResult<ExitCode> {
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Formats root parameters as sorted `key=value` lines.
fn render_list(store: &ParameterStore) -> Vec<String> {
    store.get_all().iter().map(|(key, value)| format!("{key}={value}")).collect()
}

/// Formats typed effective values as pretty JSON.
fn render_effective(store: &ParameterStore) -> CliResult<String> {
    let effective = EffectiveParams::from_store(store)
        .map_err(|err| CliError::new(format!("failed to resolve parameters: {err}")))?;
    serde_json::to_string_pretty(&effective)
        .map_err(|err| CliError::new(format!("failed to encode parameters: {err}")))
}

/// Formats history entries as tab-separated lines.
fn render_history(entries: &[ConfigHistoryEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| {
            format!(
                "{}\t{}\tsession={}\t{}",
                entry.version, entry.saved_at, entry.session_id, entry.value
            )
        })
        .collect()
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
