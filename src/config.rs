use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::Matcher;
use crate::models::MatchMode;
use crate::services::RoleLabels;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub roles: RoleLabels,
    #[serde(default)]
    pub demo: DemoSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub default_mode: MatchMode,
    #[serde(default = "default_max_agents")]
    pub max_agents_per_side: Option<usize>,
    #[serde(default)]
    pub include_trace: bool,
    /// Largest side a request may have when it asks for a trace
    #[serde(default = "default_max_trace_agents")]
    pub max_trace_agents: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_mode: MatchMode::default(),
            max_agents_per_side: default_max_agents(),
            include_trace: false,
            max_trace_agents: default_max_trace_agents(),
        }
    }
}

fn default_max_agents() -> Option<usize> { Some(10_000) }
fn default_max_trace_agents() -> usize { 200 }

impl MatchingSettings {
    /// Matcher for `mode`, carrying the configured size limit
    pub fn matcher(&self, mode: MatchMode) -> Matcher {
        let matcher = Matcher::new(mode);
        match self.max_agents_per_side {
            Some(limit) => matcher.with_limit(limit),
            None => matcher,
        }
    }
}

/// A pair of preference files for the demo driver
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DemoRun {
    pub proposers: PathBuf,
    pub proposees: PathBuf,
    #[serde(default)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemoSettings {
    #[serde(default)]
    pub runs: Vec<DemoRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with STABLE_MATCH)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., STABLE_MATCH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("STABLE_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
