//! Structured logging settings.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the config names one.
pub const DEFAULT_LEVEL: &str = "info";

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, defaulting to pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Line format.
    pub format: LogFormat,
    /// Filter directive applied when `RUST_LOG` is unset.
    pub directive: String,
    /// Log file; stderr when absent.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            directive: DEFAULT_LEVEL.to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Builds logging config from the settings section.
    ///
    /// `verbose` raises the default directive to `debug`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let format = settings
            .and_then(|s| s.format.as_deref())
            .map(LogFormat::parse)
            .unwrap_or_default();
        let directive = if verbose {
            "debug".to_string()
        } else {
            settings
                .and_then(|s| s.level.clone())
                .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
        };

        Self {
            format,
            directive,
            file: settings.and_then(|s| s.file.clone()),
        }
    }

    /// Builds the event filter. `RUST_LOG` wins over the directive.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.directive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("xml"), LogFormat::Pretty);
    }

    #[test]
    fn test_from_settings() {
        let settings = LoggingSettings {
            format: Some("json".to_string()),
            level: Some("leadflow=trace".to_string()),
            file: Some(PathBuf::from("/tmp/leadflow.log")),
        };
        let config = LoggingConfig::from_settings(Some(&settings), false);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.directive, "leadflow=trace");
        assert_eq!(config.file, Some(PathBuf::from("/tmp/leadflow.log")));

        let verbose = LoggingConfig::from_settings(Some(&settings), true);
        assert_eq!(verbose.directive, "debug");
    }

    #[test]
    fn test_defaults_without_settings() {
        assert_eq!(LoggingConfig::from_settings(None, false), LoggingConfig::default());
    }
}
