//! CLI command implementations
//!
//! `serve` boots in a fixed order: configuration, logging, query surface,
//! schema registry, HTTP listener. Any failure before the listener is bound
//! aborts the process.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::executor::PostgresSurface;
use crate::filter::SearchProfile;
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{init_logging, Event, LogFormat};
use crate::schema::{CatalogFile, SchemaLoader};
use crate::service::{SearchPlanner, SearchService};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_payload, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Postgres connection string. Required, but may come from
    /// `--database-url` / `DATABASE_URL` instead of the file.
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default)]
    pub http: HttpServerConfig,

    /// Default tracing level when `RUST_LOG` is unset (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            http: HttpServerConfig::default(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// File (if any), then command-line overrides, then validation.
    pub fn resolve(
        path: Option<&Path>,
        database_url: Option<String>,
        port: Option<u16>,
    ) -> CliResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(url) = database_url {
            config.database_url = Some(url);
        }
        if let Some(port) = port {
            config.http.port = port;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        self.database_url()?;

        self.log_level.parse::<tracing::Level>().map_err(|_| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Expected trace, debug, info, warn or error.",
                self.log_level
            ))
        })?;

        if self.http.host.trim().is_empty() {
            return Err(CliError::config_error("http.host must not be empty"));
        }

        Ok(())
    }

    pub fn database_url(&self) -> CliResult<&str> {
        match self.database_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(CliError::config_error(
                "database_url is required (config file, --database-url or DATABASE_URL)",
            )),
        }
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            config,
            database_url,
            port,
        } => serve(config.as_deref(), database_url, port),
        Command::Plan { resource, schema } => plan(&resource, &schema),
    }
}

/// Boot and serve the HTTP API until ctrl-c
pub fn serve(
    config_path: Option<&Path>,
    database_url: Option<String>,
    port: Option<u16>,
) -> CliResult<()> {
    let config = Config::resolve(config_path, database_url, port)?;

    init_logging(&config.log_level, config.log_format)
        .map_err(|e| CliError::config_error(format!("Failed to initialize logging: {}", e)))?;
    tracing::info!(event = %Event::BootStart, version = env!("CARGO_PKG_VERSION"));
    tracing::info!(
        event = %Event::ConfigLoaded,
        addr = %config.http.socket_addr(),
        log_format = %config.log_format
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let surface = PostgresSurface::new(config.database_url()?)?;
        tracing::info!(tls = surface.uses_tls(), "query surface configured");

        let registry = SchemaLoader::load(&surface).await?;
        let service = Arc::new(SearchService::new(Arc::new(registry), Arc::new(surface)));

        HttpServer::new(config.http.clone(), service)
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print the statement a payload on stdin translates to
pub fn plan(resource: &str, schema_path: &Path) -> CliResult<()> {
    let payload = read_payload()?;
    write_response(plan_payload(resource, schema_path, &payload)?)
}

pub(crate) fn plan_payload(resource: &str, schema_path: &Path, payload: &Value) -> CliResult<Value> {
    let profile = SearchProfile::parse(resource).ok_or_else(|| {
        CliError::config_error(format!(
            "Unknown resource '{}'. Expected flights, crew, crew_available, assignments or passengers.",
            resource
        ))
    })?;
    let registry = CatalogFile::load(schema_path).map_err(|e| CliError::config_error(e.to_string()))?;

    let statement = SearchPlanner::new(Arc::new(registry)).plan(profile, payload)?;
    Ok(json!({
        "table": profile.resource().table_name(),
        "sql": statement.text,
        "params": statement.params,
    }))
}
