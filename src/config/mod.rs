//! Configuration management.
//!
//! Settings resolve in layers, later layers winning:
//!
//! 1. Built-in defaults ([`LeadflowConfig::default`])
//! 2. A TOML file: the explicit `--config` path, else `LEADFLOW_CONFIG_PATH`,
//!    else `leadflow/config.toml` under the platform config dir
//! 3. `MM_DATA_DIR` for the data directory
//! 4. Command-line flags (applied by the binary)
//!
//! ```toml
//! data_dir = "./data"
//! run_log_path = "./run_log.json"
//! sample_size = 5
//! top_n = 3
//! semantic_table = "semantic_kg_triples"
//!
//! [logging]
//! format = "json"
//! level = "debug"
//! file = "/var/log/leadflow.log"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file.
pub const CONFIG_PATH_ENV: &str = "LEADFLOW_CONFIG_PATH";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "MM_DATA_DIR";

/// Main configuration for leadflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadflowConfig {
    /// Directory holding the CSV tables.
    pub data_dir: PathBuf,
    /// Where a pipeline run writes its log.
    pub run_log_path: PathBuf,
    /// Maximum number of leads a pipeline run processes.
    pub sample_size: usize,
    /// Number of campaigns a pipeline run ranks.
    pub top_n: usize,
    /// Table loaded into every agent's semantic memory.
    pub semantic_table: String,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Logging section of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Output format: `pretty` or `json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Append logs to this file instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Data directory.
    pub data_dir: Option<String>,
    /// Run log path.
    pub run_log_path: Option<String>,
    /// Pipeline sample size.
    pub sample_size: Option<usize>,
    /// Campaigns to rank.
    pub top_n: Option<usize>,
    /// Semantic triples table.
    pub semantic_table: Option<String>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

impl Default for LeadflowConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            run_log_path: PathBuf::from("./run_log.json"),
            sample_size: 5,
            top_n: 3,
            semantic_table: "semantic_kg_triples".to_string(),
            logging: LoggingSettings::default(),
        }
    }
}

impl LeadflowConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the configuration file and environment layers.
    ///
    /// An explicit path, or one named by `LEADFLOW_CONFIG_PATH`, must load;
    /// the platform default is optional.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> crate::Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::load_default(),
        };
        Ok(config.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config file.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the platform config dir.
    ///
    /// Returns default configuration if no config file is found or it does
    /// not load.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                Self::default()
            },
        }
    }

    /// Returns `leadflow/config.toml` under the platform config dir.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("leadflow").join("config.toml"))
    }

    /// Applies environment overrides read through `lookup`.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        self
    }

    /// Converts a `ConfigFile` to `LeadflowConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(data_dir) = file.data_dir {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Some(run_log_path) = file.run_log_path {
            config.run_log_path = PathBuf::from(run_log_path);
        }
        if let Some(sample_size) = file.sample_size {
            config.sample_size = sample_size;
        }
        if let Some(top_n) = file.top_n {
            config.top_n = top_n;
        }
        if let Some(table) = file.semantic_table {
            config.semantic_table = table;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Sets the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = path.into();
        self
    }

    /// Sets the run log path.
    #[must_use]
    pub fn with_run_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.run_log_path = path.into();
        self
    }

    /// Sets the pipeline sample size.
    #[must_use]
    pub const fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    /// Sets the number of campaigns to rank.
    #[must_use]
    pub const fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is not valid UTF-8.
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::OperationFailed {
            operation: "render_config".to_string(),
            cause: e.to_string(),
        })
    }
}
