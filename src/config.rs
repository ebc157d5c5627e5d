// file: src/config.rs
// version: 1.0.0
// guid: 0a62dc7d-e591-40ee-919d-ea203883d542

use crate::error::{InvokeError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Toolchain executable, resolved on the search path
pub const DEFAULT_EXECUTABLE: &str = "dotnet";

/// Project-level configuration file, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".dotnet-invoke.toml";

/// Variables kept when the child environment is isolated
pub const DEFAULT_ENV_ALLOWLIST: &[&str] = &[
    "PATH",
    "HOME",
    "USERPROFILE",
    "TEMP",
    "TMP",
    "SYSTEMROOT",
    "DOTNET_ROOT",
    "NUGET_PACKAGES",
];

/// Default output drain window after process exit, in milliseconds
pub const DEFAULT_OUTPUT_DRAIN_MS: u64 = 1000;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub execution: ExecutionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub executable: String,
    pub working_directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    #[default]
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = InvokeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            other => Err(InvokeError::config(format!("Unknown log format: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Start the child with only `environment_allowlist` set
    pub isolate_environment: bool,
    pub environment_allowlist: Vec<String>,
    /// How long to keep reading output after the toolchain exits, for
    /// descendants that still hold its pipes
    pub output_drain_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.to_string(),
            working_directory: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            isolate_environment: false,
            environment_allowlist: DEFAULT_ENV_ALLOWLIST.iter().map(|v| v.to_string()).collect(),
            output_drain_ms: DEFAULT_OUTPUT_DRAIN_MS,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources
    pub async fn load() -> Result<Self> {
        let mut config = Self::default();

        // Try to load from user config directory
        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                info!("Loading user configuration from: {}", user_config.display());
                config = Self::load_from_file(&user_config).await?;
            }
        }

        // Try to load from project config
        let project_config = Path::new(PROJECT_CONFIG_FILE);
        if project_config.exists() {
            info!(
                "Loading project configuration from: {}",
                project_config.display()
            );
            config = Self::load_from_file(project_config).await?;
        }

        // Override with environment variables
        config = Self::apply_overrides(config, |key| std::env::var(key).ok())?;

        debug!("Final configuration: {:#?}", config);
        Ok(config)
    }

    /// Get the user configuration file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dotnet-invoke").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| {
            InvokeError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&content).map_err(|e| {
            InvokeError::config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| InvokeError::config(e.to_string()))
    }

    /// Apply `DOTNET_INVOKE_*` overrides read through `lookup`
    pub fn apply_overrides<F>(mut config: Self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(executable) = lookup("DOTNET_INVOKE_EXECUTABLE") {
            if !executable.trim().is_empty() {
                config.general.executable = executable;
            }
        }

        if let Some(dir) = lookup("DOTNET_INVOKE_WORKDIR") {
            config.general.working_directory = Some(PathBuf::from(dir));
        }

        if let Some(isolate) = lookup("DOTNET_INVOKE_ISOLATE_ENV") {
            config.execution.isolate_environment = matches!(
                isolate.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        if let Some(level) = lookup("DOTNET_INVOKE_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(format) = lookup("DOTNET_INVOKE_LOG_FORMAT") {
            config.logging.format = format.parse()?;
        }

        Ok(config)
    }
}
