//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::chart::{ChartOptions, Curve, Insets, Rgb};
use crate::records::HttpServiceConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub chart: ChartConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote record service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl From<&ServiceConfig> for HttpServiceConfig {
    fn from(c: &ServiceConfig) -> Self {
        HttpServiceConfig {
            base_url: c.base_url.clone(),
            request_timeout_ms: c.request_timeout_ms,
        }
    }
}

/// Reference record server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON file the records are persisted to; `None` keeps them in memory
    #[serde(default = "default_data_file")]
    pub data_file: Option<String>,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_data_file() -> Option<String> {
    let path = dirs::data_local_dir()
        .map(|p| p.join("spendline").join("consumptions.json"))
        .unwrap_or_else(|| PathBuf::from("./spendline_data/consumptions.json"));
    Some(path.to_string_lossy().to_string())
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_file: default_data_file(),
            cors_origins: Vec::new(),
        }
    }
}

/// Chart rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default)]
    pub margins: Insets,

    #[serde(default = "default_colors")]
    pub colors: Vec<Rgb>,

    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,

    #[serde(default = "default_marker_radius")]
    pub marker_radius: f64,

    #[serde(default = "default_marker_series")]
    pub marker_series: Option<usize>,

    #[serde(default)]
    pub curve: Curve,

    #[serde(default = "default_gridlines")]
    pub gridlines: bool,

    pub background: Option<Rgb>,

    #[serde(default = "default_container_id")]
    pub container_id: String,
}

fn default_width() -> u32 {
    700
}

fn default_height() -> u32 {
    400
}

fn default_colors() -> Vec<Rgb> {
    vec![Rgb::BLUE, Rgb::RED]
}

fn default_stroke_width() -> f64 {
    2.0
}

fn default_marker_radius() -> f64 {
    5.0
}

fn default_marker_series() -> Option<usize> {
    Some(1)
}

fn default_gridlines() -> bool {
    true
}

fn default_container_id() -> String {
    "container".to_string()
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margins: Insets::default(),
            colors: default_colors(),
            stroke_width: default_stroke_width(),
            marker_radius: default_marker_radius(),
            marker_series: default_marker_series(),
            curve: Curve::default(),
            gridlines: default_gridlines(),
            background: None,
            container_id: default_container_id(),
        }
    }
}

impl ChartConfig {
    /// Chart options with these settings and the sample series
    pub fn to_chart_options(&self) -> ChartOptions {
        ChartOptions {
            width: self.width,
            height: self.height,
            insets: self.margins,
            colors: self.colors.clone(),
            stroke_width: self.stroke_width,
            marker_radius: self.marker_radius,
            marker_series: self.marker_series,
            curve: self.curve,
            gridlines: self.gridlines,
            background: self.background,
            container_id: self.container_id.clone(),
            ..ChartOptions::default()
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("spendline").join("config.toml")),
            Some(PathBuf::from("/etc/spendline/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SPENDLINE_SERVICE_URL") {
            self.service.base_url = url;
        }

        if let Some(host) = var("SPENDLINE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("SPENDLINE_PORT") {
            if let Ok(p) = port.parse() {
                self.server.port = p;
            }
        }
        if let Some(file) = var("SPENDLINE_DATA_FILE") {
            // An empty value switches persistence off
            self.server.data_file = Some(file).filter(|f| !f.is_empty());
        }

        if let Some(level) = var("SPENDLINE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SPENDLINE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r##"# Spendline Configuration
#
# Environment variables override these settings:
# - SPENDLINE_SERVICE_URL
# - SPENDLINE_HOST
# - SPENDLINE_PORT
# - SPENDLINE_DATA_FILE
# - SPENDLINE_LOG_LEVEL
# - SPENDLINE_LOG_FORMAT

[service]
# Record server the CLI talks to
base_url = "http://localhost:3000"

# Request timeout in milliseconds
request_timeout_ms = 10000

[server]
# Record server host
host = "0.0.0.0"

# Record server port
port = 3000

# JSON file the server persists records to
# (defaults to <data dir>/spendline/consumptions.json)
# data_file = "/var/lib/spendline/consumptions.json"

# Allowed CORS origins (empty allows any)
cors_origins = []

[chart]
# Canvas size in pixels
width = 700
height = 400

# Series colors, reused in order
colors = ["#0000ff", "#ff0000"]

stroke_width = 2.0
marker_radius = 5.0

# Index of the series that gets point markers
marker_series = 1

# Curve between points: linear or basis
curve = "linear"

gridlines = true

# id attribute of the SVG root element
container_id = "container"

[chart.margins]
left = 35
right = 20
top = 20
bottom = 20

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"##
    .to_string()
}
