//! Layered configuration and
//! structured stderr logging.
//!
//! Precedence is env > file > built-in defaults, applied field by field so
//! a partially-specified file or environment never wipes out the rest of
//! the defaults.

mod logging;

pub use logging::init_logging;

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path} as TOML: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidEnv { field: &'static str, reason: String },
}

/// Transport mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Stdio,
    Http,
}

impl Default for TransportMode {
    fn default() -> Self {
        TransportMode::Stdio
    }
}

impl TransportMode {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" => Some(TransportMode::Stdio),
            "http" => Some(TransportMode::Http),
            _ => None,
        }
    }
}

/// `emergent.*` knobs: graph backend connection and retry policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmergentBackendConfig {
    pub url: String,
    pub token: Option<String>,
    /// `-1` means infinite retries, `0` means no retry.
    pub max_retries: i64,
    pub long_outage_interval_mins: u64,
    pub long_outage_threshold: u32,
}

impl Default for EmergentBackendConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8420".to_string(),
            token: None,
            max_retries: -1,
            long_outage_interval_mins: 5,
            long_outage_threshold: 20,
        }
    }
}

/// `transport.*` knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub mode: TransportMode,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_minutes: u64,
    pub idle_timeout_minutes: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::Stdio,
            host: "127.0.0.1".to_string(),
            port: 8787,
            cors_origins: vec!["*".to_string()],
            request_timeout_minutes: 1,
            idle_timeout_minutes: 2,
        }
    }
}

/// `log.*` knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `janitor.*` knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    pub enabled: bool,
    pub interval_hours: u64,
    pub create_proposal: bool,
    pub create_improvements: bool,
    pub improvement_severities: Vec<String>,
    /// Stale-change threshold in days, configurable since upstream tools
    /// don't agree on one.
    pub stale_change_days: u64,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_hours: 24,
            create_proposal: true,
            create_improvements: true,
            improvement_severities: vec!["critical".to_string(), "warning".to_string()],
            stale_change_days: 90,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub emergent: EmergentBackendConfig,
    pub transport: TransportConfig,
    pub log: LogConfig,
    pub janitor: JanitorConfig,
}

impl Config {
    /// Load configuration: start from defaults, overlay an optional TOML
    /// file, then overlay `EMERGENT_*` environment variables. Env wins over
    /// file wins over defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let contents = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.display().to_string(),
                    source,
                })?;
                toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                    path: p.display().to_string(),
                    source,
                })?
            }
            _ => Config::default(),
        };

        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        use std::env::var;

        if let Ok(v) = var("EMERGENT_URL") {
            self.emergent.url = v;
        }
        if let Ok(v) = var("EMERGENT_TOKEN") {
            self.emergent.token = Some(v);
        }
        if let Ok(v) = var("EMERGENT_MAX_RETRIES") {
            self.emergent.max_retries = v.parse().map_err(|_| ConfigError::InvalidEnv {
                field: "EMERGENT_MAX_RETRIES",
                reason: format!("{v:?} is not an integer"),
            })?;
        }
        if let Ok(v) = var("EMERGENT_LONG_OUTAGE_INTERVAL_MINS") {
            self.emergent.long_outage_interval_mins =
                v.parse().map_err(|_| ConfigError::InvalidEnv {
                    field: "EMERGENT_LONG_OUTAGE_INTERVAL_MINS",
                    reason: format!("{v:?} is not a non-negative integer"),
                })?;
        }
        if let Ok(v) = var("EMERGENT_LONG_OUTAGE_THRESHOLD") {
            self.emergent.long_outage_threshold =
                v.parse().map_err(|_| ConfigError::InvalidEnv {
                    field: "EMERGENT_LONG_OUTAGE_THRESHOLD",
                    reason: format!("{v:?} is not a non-negative integer"),
                })?;
        }

        if let Ok(v) = var("EMERGENT_TRANSPORT_MODE") {
            self.transport.mode = TransportMode::parse(&v).ok_or_else(|| ConfigError::InvalidEnv {
                field: "EMERGENT_TRANSPORT_MODE",
                reason: format!("{v:?} must be \"stdio\" or \"http\""),
            })?;
        }
        if let Ok(v) = var("EMERGENT_TRANSPORT_HOST") {
            self.transport.host = v;
        }
        if let Ok(v) = var("EMERGENT_TRANSPORT_PORT") {
            self.transport.port = v.parse().map_err(|_| ConfigError::InvalidEnv {
                field: "EMERGENT_TRANSPORT_PORT",
                reason: format!("{v:?} is not a valid port"),
            })?;
        }
        if let Ok(v) = var("EMERGENT_TRANSPORT_CORS_ORIGINS") {
            self.transport.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = var("EMERGENT_TRANSPORT_REQUEST_TIMEOUT_MINUTES") {
            self.transport.request_timeout_minutes =
                v.parse().map_err(|_| ConfigError::InvalidEnv {
                    field: "EMERGENT_TRANSPORT_REQUEST_TIMEOUT_MINUTES",
                    reason: format!("{v:?} is not a non-negative integer"),
                })?;
        }
        if let Ok(v) = var("EMERGENT_TRANSPORT_IDLE_TIMEOUT_MINUTES") {
            self.transport.idle_timeout_minutes =
                v.parse().map_err(|_| ConfigError::InvalidEnv {
                    field: "EMERGENT_TRANSPORT_IDLE_TIMEOUT_MINUTES",
                    reason: format!("{v:?} is not a non-negative integer"),
                })?;
        }

        if let Ok(v) = var("EMERGENT_LOG_LEVEL") {
            self.log.level = v;
        }

        if let Ok(v) = var("EMERGENT_JANITOR_ENABLED") {
            self.janitor.enabled = parse_bool(&v, "EMERGENT_JANITOR_ENABLED")?;
        }
        if let Ok(v) = var("EMERGENT_JANITOR_INTERVAL_HOURS") {
            self.janitor.interval_hours = v.parse().map_err(|_| ConfigError::InvalidEnv {
                field: "EMERGENT_JANITOR_INTERVAL_HOURS",
                reason: format!("{v:?} is not a non-negative integer"),
            })?;
        }
        if let Ok(v) = var("EMERGENT_JANITOR_CREATE_PROPOSAL") {
            self.janitor.create_proposal = parse_bool(&v, "EMERGENT_JANITOR_CREATE_PROPOSAL")?;
        }
        if let Ok(v) = var("EMERGENT_JANITOR_CREATE_IMPROVEMENTS") {
            self.janitor.create_improvements =
                parse_bool(&v, "EMERGENT_JANITOR_CREATE_IMPROVEMENTS")?;
        }
        if let Ok(v) = var("EMERGENT_JANITOR_STALE_CHANGE_DAYS") {
            self.janitor.stale_change_days = v.parse().map_err(|_| ConfigError::InvalidEnv {
                field: "EMERGENT_JANITOR_STALE_CHANGE_DAYS",
                reason: format!("{v:?} is not a non-negative integer"),
            })?;
        }

        Ok(())
    }
}

fn parse_bool(v: &str, field: &'static str) -> Result<bool, ConfigError> {
    match v.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnv {
            field,
            reason: format!("{other:?} is not a boolean"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.emergent.max_retries, -1);
        assert_eq!(config.transport.mode, TransportMode::Stdio);
        assert_eq!(config.log.level, "info");
        assert!(!config.janitor.enabled);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [emergent]
            url = "https://graph.example.com"
            max_retries = 5

            [transport]
            mode = "http"
            port = 9999
            "#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.emergent.url, "https://graph.example.com");
        assert_eq!(config.emergent.max_retries, 5);
        assert_eq!(config.transport.mode, TransportMode::Http);
        assert_eq!(config.transport.port, 9999);
        // Untouched fields keep their defaults.
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[emergent]\nurl = \"https://from-file\"\n").unwrap();

        std::env::set_var("EMERGENT_URL", "https://from-env");
        let config = Config::load(Some(file.path())).unwrap();
        std::env::remove_var("EMERGENT_URL");

        assert_eq!(config.emergent.url, "https://from-env");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/path.toml"))).unwrap();
        assert_eq!(config.emergent.url, EmergentBackendConfig::default().url);
    }

    #[test]
    fn invalid_env_int_is_rejected() {
        std::env::set_var("EMERGENT_MAX_RETRIES", "not-a-number");
        let result = Config::load(None);
        std::env::remove_var("EMERGENT_MAX_RETRIES");
        assert!(result.is_err());
    }
}
