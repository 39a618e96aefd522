//! API configuration

use serde::Deserialize;
use std::path::PathBuf;

use domain_routing::{DataflowMode, EngineConfig};

const ENV_PREFIX: &str = "ROUTER";

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    /// Entries kept in each recent-activity buffer
    pub recent_capacity: usize,
    /// `streaming` or `fallback`
    pub dataflow: DataflowMode,
    /// Buffered events per streaming subscriber
    pub event_capacity: usize,
    /// JSON file of rules loaded at startup
    pub rules_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            recent_capacity: engine.recent_capacity,
            dataflow: engine.dataflow,
            event_capacity: engine.event_capacity,
            rules_path: engine.rules_path,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `ROUTER_*` environment variables
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    /// Reads each variable on its own, keeping the default for anything
    /// missing or unparseable
    pub fn from_env_vars() -> Self {
        let defaults = Self::default();
        let var = |name: &str| std::env::var(format!("{}_{}", ENV_PREFIX, name)).ok();

        Self {
            host: var("HOST").unwrap_or(defaults.host),
            port: var("PORT").and_then(|p| p.parse().ok()).unwrap_or(defaults.port),
            log_level: var("LOG_LEVEL")
                .or_else(|| std::env::var("RUST_LOG").ok())
                .unwrap_or(defaults.log_level),
            recent_capacity: var("RECENT_CAPACITY")
                .and_then(|c| c.parse().ok())
                .unwrap_or(defaults.recent_capacity),
            dataflow: match var("DATAFLOW").as_deref() {
                Some("fallback") => DataflowMode::Fallback,
                Some("streaming") => DataflowMode::Streaming,
                _ => defaults.dataflow,
            },
            event_capacity: var("EVENT_CAPACITY")
                .and_then(|c| c.parse().ok())
                .unwrap_or(defaults.event_capacity),
            rules_path: var("RULES_PATH").map(PathBuf::from).or(defaults.rules_path),
        }
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The engine settings carried by this configuration
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            recent_capacity: self.recent_capacity,
            dataflow: self.dataflow,
            event_capacity: self.event_capacity,
            rules_path: self.rules_path.clone(),
        }
    }
}
