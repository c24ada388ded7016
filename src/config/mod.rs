//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/pinpoint/config.toml
//!
//! Credentials may also come from the environment (`MAPBOX_TOKEN`,
//! `OPENAI_API_KEY`, `OPENAI_MODEL`), which take precedence over the file.

pub mod defaults;

use crate::constants::env as env_vars;
use crate::error::{Error, Result};
use crate::geo::gate::{SearchGate, SearchTrigger};
use crate::geo::LngLat;
use crate::map::spin::SpinSettings;
use crate::map::Theme;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Geocoding provider settings
    #[serde(default)]
    pub mapbox: MapboxConfig,

    /// Assistant backend settings
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Initial camera and selection zoom policy
    #[serde(default)]
    pub map: MapConfig,

    /// Idle rotation settings
    #[serde(default)]
    pub spin: SpinConfig,

    /// Search gating policy
    #[serde(default)]
    pub search: SearchConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapboxConfig {
    /// Mapbox access token
    #[serde(default)]
    pub access_token: String,

    /// Forward geocoding endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Number of results requested per search
    #[serde(default = "default_search_limit")]
    pub limit: usize,

    /// Comma-separated feature types
    #[serde(default = "default_search_types")]
    pub types: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Assistant backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// OpenAI API key (used when talking to OpenAI directly)
    #[serde(default)]
    pub openai_api_key: String,

    /// OpenAI Responses endpoint
    #[serde(default = "default_openai_url")]
    pub openai_url: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Base URL of a running pinpoint server; when set, questions are routed
    /// through its /api/georesponse endpoint instead of OpenAI
    #[serde(default)]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Initial camera and selection zoom policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial center as [lng, lat]
    #[serde(default = "default_center")]
    pub center: [f64; 2],

    /// Initial zoom
    #[serde(default = "default_zoom")]
    pub zoom: f64,

    /// "light" or "dark"
    #[serde(default = "default_theme")]
    pub theme: String,

    /// Zoom for results with a bounding box
    #[serde(default = "default_region_zoom")]
    pub region_zoom: f64,

    /// Zoom for results without a bounding box
    #[serde(default = "default_point_zoom")]
    pub point_zoom: f64,

    /// Padding used when fitting to a bounding box
    #[serde(default = "default_fit_padding")]
    pub fit_padding: f64,
}

/// Idle rotation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinConfig {
    /// Whether the globe spins while idle
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_seconds_per_revolution")]
    pub seconds_per_revolution: f64,

    #[serde(default = "default_max_spin_zoom")]
    pub max_spin_zoom: f64,

    #[serde(default = "default_slow_spin_zoom")]
    pub slow_spin_zoom: f64,

    /// Duration of each eased rotation step in milliseconds
    #[serde(default = "default_spin_step_ms")]
    pub step_ms: u64,
}

/// Search gating policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Queries shorter than this are never sent
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// "submit" or "keystroke"
    #[serde(default = "default_search_trigger")]
    pub trigger: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions for serde
fn default_geocoding_url() -> String {
    crate::constants::api::MAPBOX_GEOCODING_URL.to_string()
}
fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}
fn default_search_types() -> String {
    DEFAULT_SEARCH_TYPES.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_openai_url() -> String {
    crate::constants::api::OPENAI_RESPONSES_URL.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}
fn default_center() -> [f64; 2] {
    DEFAULT_CENTER
}
fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}
fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}
fn default_region_zoom() -> f64 {
    DEFAULT_REGION_ZOOM
}
fn default_point_zoom() -> f64 {
    DEFAULT_POINT_ZOOM
}
fn default_fit_padding() -> f64 {
    DEFAULT_FIT_PADDING
}
fn default_true() -> bool {
    true
}
fn default_seconds_per_revolution() -> f64 {
    DEFAULT_SECONDS_PER_REVOLUTION
}
fn default_max_spin_zoom() -> f64 {
    DEFAULT_MAX_SPIN_ZOOM
}
fn default_slow_spin_zoom() -> f64 {
    DEFAULT_SLOW_SPIN_ZOOM
}
fn default_spin_step_ms() -> u64 {
    DEFAULT_SPIN_STEP_MS
}
fn default_min_query_chars() -> usize {
    DEFAULT_MIN_QUERY_CHARS
}
fn default_search_trigger() -> String {
    DEFAULT_SEARCH_TRIGGER.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for MapboxConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            geocoding_url: default_geocoding_url(),
            limit: default_search_limit(),
            types: default_search_types(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_url: default_openai_url(),
            model: default_model(),
            temperature: default_temperature(),
            endpoint: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center: default_center(),
            zoom: default_zoom(),
            theme: default_theme(),
            region_zoom: default_region_zoom(),
            point_zoom: default_point_zoom(),
            fit_padding: default_fit_padding(),
        }
    }
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seconds_per_revolution: default_seconds_per_revolution(),
            max_spin_zoom: default_max_spin_zoom(),
            slow_spin_zoom: default_slow_spin_zoom(),
            step_ms: default_spin_step_ms(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_chars: default_min_query_chars(),
            trigger: default_search_trigger(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load the file alone, without environment overrides
    ///
    /// Creates default config if file doesn't exist
    pub fn load_file() -> Result<Self> {
        let path = Self::config_path()?;

        let config = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })?
        } else {
            let config = Config::default();
            config.save()?;
            config
        };

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Override credentials from environment variables
    ///
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(env_vars::MAPBOX_TOKEN) {
            self.mapbox.access_token = token;
        }
        if let Some(key) = non_empty(env_vars::OPENAI_API_KEY) {
            self.assistant.openai_api_key = key;
        }
        if let Some(model) = non_empty(env_vars::OPENAI_MODEL) {
            self.assistant.model = model;
        }
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["mapbox", "access_token"] => Some(self.mapbox.access_token.clone()),
            ["mapbox", "geocoding_url"] => Some(self.mapbox.geocoding_url.clone()),
            ["mapbox", "limit"] => Some(self.mapbox.limit.to_string()),
            ["mapbox", "types"] => Some(self.mapbox.types.clone()),
            ["mapbox", "timeout_secs"] => Some(self.mapbox.timeout_secs.to_string()),

            ["assistant", "openai_api_key"] => Some(self.assistant.openai_api_key.clone()),
            ["assistant", "openai_url"] => Some(self.assistant.openai_url.clone()),
            ["assistant", "model"] => Some(self.assistant.model.clone()),
            ["assistant", "temperature"] => Some(self.assistant.temperature.to_string()),
            ["assistant", "endpoint"] => Some(self.assistant.endpoint.clone()),
            ["assistant", "timeout_secs"] => Some(self.assistant.timeout_secs.to_string()),

            ["map", "zoom"] => Some(self.map.zoom.to_string()),
            ["map", "theme"] => Some(self.map.theme.clone()),
            ["map", "region_zoom"] => Some(self.map.region_zoom.to_string()),
            ["map", "point_zoom"] => Some(self.map.point_zoom.to_string()),
            ["map", "fit_padding"] => Some(self.map.fit_padding.to_string()),

            ["spin", "enabled"] => Some(self.spin.enabled.to_string()),
            ["spin", "seconds_per_revolution"] => {
                Some(self.spin.seconds_per_revolution.to_string())
            }
            ["spin", "max_spin_zoom"] => Some(self.spin.max_spin_zoom.to_string()),
            ["spin", "slow_spin_zoom"] => Some(self.spin.slow_spin_zoom.to_string()),
            ["spin", "step_ms"] => Some(self.spin.step_ms.to_string()),

            ["search", "min_query_chars"] => Some(self.search.min_query_chars.to_string()),
            ["search", "trigger"] => Some(self.search.trigger.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fn parse<T: FromStr>(key: &str, value: &str) -> Result<T> {
            value
                .parse()
                .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
        }

        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["mapbox", "access_token"] => self.mapbox.access_token = value.to_string(),
            ["mapbox", "geocoding_url"] => self.mapbox.geocoding_url = value.to_string(),
            ["mapbox", "limit"] => self.mapbox.limit = parse(key, value)?,
            ["mapbox", "types"] => self.mapbox.types = value.to_string(),
            ["mapbox", "timeout_secs"] => self.mapbox.timeout_secs = parse(key, value)?,

            ["assistant", "openai_api_key"] => self.assistant.openai_api_key = value.to_string(),
            ["assistant", "openai_url"] => self.assistant.openai_url = value.to_string(),
            ["assistant", "model"] => self.assistant.model = value.to_string(),
            ["assistant", "temperature"] => self.assistant.temperature = parse(key, value)?,
            ["assistant", "endpoint"] => self.assistant.endpoint = value.to_string(),
            ["assistant", "timeout_secs"] => self.assistant.timeout_secs = parse(key, value)?,

            ["map", "zoom"] => self.map.zoom = parse(key, value)?,
            ["map", "theme"] => {
                Theme::from_str(value).map_err(Error::Config)?;
                self.map.theme = value.to_string();
            }
            ["map", "region_zoom"] => self.map.region_zoom = parse(key, value)?,
            ["map", "point_zoom"] => self.map.point_zoom = parse(key, value)?,
            ["map", "fit_padding"] => self.map.fit_padding = parse(key, value)?,

            ["spin", "enabled"] => self.spin.enabled = parse(key, value)?,
            ["spin", "seconds_per_revolution"] => {
                self.spin.seconds_per_revolution = parse(key, value)?
            }
            ["spin", "max_spin_zoom"] => self.spin.max_spin_zoom = parse(key, value)?,
            ["spin", "slow_spin_zoom"] => self.spin.slow_spin_zoom = parse(key, value)?,
            ["spin", "step_ms"] => self.spin.step_ms = parse(key, value)?,

            ["search", "min_query_chars"] => self.search.min_query_chars = parse(key, value)?,
            ["search", "trigger"] => {
                SearchTrigger::from_str(value).map_err(Error::Config)?;
                self.search.trigger = value.to_string();
            }

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => self.server.port = parse(key, value)?,

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "mapbox.access_token",
            "mapbox.geocoding_url",
            "mapbox.limit",
            "mapbox.types",
            "mapbox.timeout_secs",
            "assistant.openai_api_key",
            "assistant.openai_url",
            "assistant.model",
            "assistant.temperature",
            "assistant.endpoint",
            "assistant.timeout_secs",
            "map.zoom",
            "map.theme",
            "map.region_zoom",
            "map.point_zoom",
            "map.fit_padding",
            "spin.enabled",
            "spin.seconds_per_revolution",
            "spin.max_spin_zoom",
            "spin.slow_spin_zoom",
            "spin.step_ms",
            "search.min_query_chars",
            "search.trigger",
            "server.host",
            "server.port",
        ]
    }

    /// Keys whose values are credentials and must be masked when displayed
    pub fn is_secret_key(key: &str) -> bool {
        matches!(key, "mapbox.access_token" | "assistant.openai_api_key")
    }

    /// Initial camera center
    pub fn initial_center(&self) -> LngLat {
        LngLat::new(self.map.center[0], self.map.center[1])
    }

    /// Parsed theme
    pub fn theme(&self) -> Result<Theme> {
        Theme::from_str(&self.map.theme).map_err(Error::Config)
    }

    /// Idle rotation parameters
    pub fn spin_settings(&self) -> SpinSettings {
        SpinSettings {
            seconds_per_revolution: self.spin.seconds_per_revolution,
            max_spin_zoom: self.spin.max_spin_zoom,
            slow_spin_zoom: self.spin.slow_spin_zoom,
            step: Duration::from_millis(self.spin.step_ms),
        }
    }

    /// Search gating policy
    pub fn search_gate(&self) -> Result<SearchGate> {
        let trigger = SearchTrigger::from_str(&self.search.trigger).map_err(Error::Config)?;
        Ok(SearchGate::new(self.search.min_query_chars, trigger))
    }

    /// Whether a geocoding credential is available
    pub fn search_configured(&self) -> bool {
        !self.mapbox.access_token.trim().is_empty()
    }

    /// Whether an assistant backend is available
    pub fn assistant_configured(&self) -> bool {
        !self.assistant.endpoint.trim().is_empty()
            || !self.assistant.openai_api_key.trim().is_empty()
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
