//! TOML Configuration File Support
//!
//! Configuration is read from `~/.config/ecobin/ecobin.toml`.
//!
//! # Configuration Priority
//!
//! Values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables (`ECOBIN_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [navigation]
//! initial_screen = "landing"
//!
//! [reveal]
//! strict_selection = false
//! leaf_count = 4
//! flower_count = 3
//! sparkle_count = 3
//!
//! [map]
//! fallback_latitude = 25.2677
//! fallback_longitude = 82.9913
//! zoom = 14
//! geolocation_timeout_ms = 5000
//! # fixed_latitude = 25.27
//! # fixed_longitude = 82.99
//!
//! [chat]
//! reply_delay_ms = 800
//! quick_reply_delay_ms = 600
//!
//! [storage]
//! path = "/home/me/.local/share/ecobin/storage.json"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::{GeoPosition, MapConfig};
use crate::reveal::RevealConfig;
use crate::screens::ScreenId;

/// Highest zoom level the tile server offers
const MAX_ZOOM: u8 = 19;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[navigation]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationToml {
    /// Screen shown on start
    pub initial_screen: Option<String>,
}

/// `[reveal]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealToml {
    /// Refuse to reveal without a selection
    pub strict_selection: Option<bool>,
    /// Leaves on the happy plant
    pub leaf_count: Option<usize>,
    /// Flowers on the happy plant
    pub flower_count: Option<usize>,
    /// Sparkles around the happy plant
    pub sparkle_count: Option<usize>,
}

/// `[map]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapToml {
    /// Fallback latitude
    pub fallback_latitude: Option<f64>,
    /// Fallback longitude
    pub fallback_longitude: Option<f64>,
    /// Zoom level
    pub zoom: Option<u8>,
    /// Geolocation timeout in milliseconds
    pub geolocation_timeout_ms: Option<u64>,
    /// Pretend the user is here (latitude)
    pub fixed_latitude: Option<f64>,
    /// Pretend the user is here (longitude)
    pub fixed_longitude: Option<f64>,
}

/// `[chat]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatToml {
    /// Delay before replying to typed messages
    pub reply_delay_ms: Option<u64>,
    /// Delay before replying to quick actions
    pub quick_reply_delay_ms: Option<u64>,
}

/// `[storage]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageToml {
    /// Key-value store file
    pub path: Option<PathBuf>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EcobinToml {
    /// Navigation section
    pub navigation: NavigationToml,
    /// Reveal section
    pub reveal: RevealToml,
    /// Map section
    pub map: MapToml,
    /// Chat section
    pub chat: ChatToml,
    /// Storage section
    pub storage: StorageToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Effective configuration
#[derive(Clone, Debug)]
pub struct EcobinConfig {
    /// Screen shown on start
    pub initial_screen: ScreenId,

    /// Reveal behaviour
    pub reveal: RevealConfig,

    /// Map presenter settings
    pub map: MapConfig,

    /// Report this position instead of asking the platform
    pub fixed_position: Option<GeoPosition>,

    /// Delay before replying to typed chat messages
    pub chat_reply_delay: Duration,

    /// Delay before replying to quick actions
    pub chat_quick_reply_delay: Duration,

    /// Key-value store file (`None` keeps signups in memory)
    pub storage_path: Option<PathBuf>,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for EcobinConfig {
    fn default() -> Self {
        Self {
            initial_screen: ScreenId::Landing,
            reveal: RevealConfig::default(),
            map: MapConfig::default(),
            fixed_position: None,
            chat_reply_delay: Duration::from_millis(800),
            chat_quick_reply_delay: Duration::from_millis(600),
            storage_path: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl EcobinConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Check values that parse but make no sense
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map.zoom == 0 || self.map.zoom > MAX_ZOOM {
            return Err(ConfigError::ValidationError(format!(
                "map zoom must be between 1 and {MAX_ZOOM}, got {}",
                self.map.zoom
            )));
        }
        if self.map.options.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "geolocation timeout must be positive".to_string(),
            ));
        }
        for position in std::iter::once(self.map.fallback).chain(self.fixed_position) {
            if !(-90.0..=90.0).contains(&position.latitude)
                || !(-180.0..=180.0).contains(&position.longitude)
            {
                return Err(ConfigError::ValidationError(format!(
                    "coordinates out of range: {}",
                    position.label()
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/ecobin/ecobin.toml` or
/// `~/.config/ecobin/ecobin.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ecobin").join("ecobin.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resulting values are invalid. A missing config file is not an error.
pub fn load_config() -> Result<EcobinConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then the process environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<EcobinConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<EcobinConfig, ConfigError> {
    let mut config = EcobinConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: EcobinToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env)?;
    config.validate()?;

    Ok(config)
}

fn parse_screen(value: &str) -> Result<ScreenId, ConfigError> {
    value
        .parse()
        .map_err(|bad| ConfigError::ValidationError(format!("unknown screen: {bad}")))
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut EcobinConfig, toml: &EcobinToml) -> Result<(), ConfigError> {
    if let Some(ref screen) = toml.navigation.initial_screen {
        config.initial_screen = parse_screen(screen)?;
    }

    if let Some(strict) = toml.reveal.strict_selection {
        config.reveal.strict_selection = strict;
    }
    let decorations = &mut config.reveal.decorations;
    if let Some(n) = toml.reveal.leaf_count {
        decorations.leaves = n;
    }
    if let Some(n) = toml.reveal.flower_count {
        decorations.flowers = n;
    }
    if let Some(n) = toml.reveal.sparkle_count {
        decorations.sparkles = n;
    }

    if let Some(lat) = toml.map.fallback_latitude {
        config.map.fallback.latitude = lat;
    }
    if let Some(lon) = toml.map.fallback_longitude {
        config.map.fallback.longitude = lon;
    }
    if let Some(zoom) = toml.map.zoom {
        config.map.zoom = zoom;
    }
    if let Some(ms) = toml.map.geolocation_timeout_ms {
        config.map.options.timeout = Duration::from_millis(ms);
    }
    match (toml.map.fixed_latitude, toml.map.fixed_longitude) {
        (Some(lat), Some(lon)) => config.fixed_position = Some(GeoPosition::new(lat, lon)),
        (None, None) => {}
        _ => {
            return Err(ConfigError::ValidationError(
                "fixed_latitude and fixed_longitude must be set together".to_string(),
            ))
        }
    }

    if let Some(ms) = toml.chat.reply_delay_ms {
        config.chat_reply_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.chat.quick_reply_delay_ms {
        config.chat_quick_reply_delay = Duration::from_millis(ms);
    }

    if toml.storage.path.is_some() {
        config.storage_path = toml.storage.path.clone();
    }
    Ok(())
}

/// Apply environment variable overrides to the config
fn apply_env_config(
    config: &mut EcobinConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(screen) = env("ECOBIN_INITIAL_SCREEN") {
        config.initial_screen = parse_screen(&screen)?;
        config.source = ConfigSource::Env;
    }
    if let Some(strict) = env("ECOBIN_STRICT_SELECTION") {
        config.reveal.strict_selection = strict != "0" && strict.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
    if let Some(zoom) = env("ECOBIN_MAP_ZOOM") {
        match zoom.parse::<u8>() {
            Ok(z) => {
                config.map.zoom = z;
                config.source = ConfigSource::Env;
            }
            Err(_) => {
                tracing::warn!(value = %zoom, "Ignoring unparsable ECOBIN_MAP_ZOOM");
            }
        }
    }
    if let Some(timeout) = env("ECOBIN_GEOLOCATION_TIMEOUT_MS") {
        match timeout.parse::<u64>() {
            Ok(ms) => {
                config.map.options.timeout = Duration::from_millis(ms);
                config.source = ConfigSource::Env;
            }
            Err(_) => {
                tracing::warn!(
                    value = %timeout,
                    "Ignoring unparsable ECOBIN_GEOLOCATION_TIMEOUT_MS"
                );
            }
        }
    }
    match (env("ECOBIN_FIXED_LATITUDE"), env("ECOBIN_FIXED_LONGITUDE")) {
        (Some(lat), Some(lon)) => {
            let (Ok(lat), Ok(lon)) = (lat.trim().parse::<f64>(), lon.trim().parse::<f64>()) else {
                return Err(ConfigError::ValidationError(format!(
                    "fixed position must be numeric, got {lat:?}, {lon:?}"
                )));
            };
            config.fixed_position = Some(GeoPosition::new(lat, lon));
            config.source = ConfigSource::Env;
        }
        (None, None) => {}
        _ => {
            return Err(ConfigError::ValidationError(
                "ECOBIN_FIXED_LATITUDE and ECOBIN_FIXED_LONGITUDE must be set together".to_string(),
            ))
        }
    }
    if let Some(delay) = env("ECOBIN_CHAT_REPLY_DELAY_MS") {
        match delay.parse::<u64>() {
            Ok(ms) => {
                config.chat_reply_delay = Duration::from_millis(ms);
                config.source = ConfigSource::Env;
            }
            Err(_) => {
                tracing::warn!(value = %delay, "Ignoring unparsable ECOBIN_CHAT_REPLY_DELAY_MS");
            }
        }
    }
    if let Some(path) = env("ECOBIN_STORAGE_PATH") {
        config.storage_path = Some(PathBuf::from(path));
        config.source = ConfigSource::Env;
    }
    Ok(())
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Initial screen override
    pub initial_screen: Option<ScreenId>,

    /// Strict selection override
    pub strict_selection: Option<bool>,

    /// Fixed user position override
    pub fixed_position: Option<GeoPosition>,

    /// Storage path override
    pub storage_path: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set initial screen override
    #[must_use]
    pub fn with_initial_screen(mut self, screen: ScreenId) -> Self {
        self.initial_screen = Some(screen);
        self
    }

    /// Set strict selection override
    #[must_use]
    pub fn with_strict_selection(mut self, strict: bool) -> Self {
        self.strict_selection = Some(strict);
        self
    }

    /// Set fixed position override
    #[must_use]
    pub fn with_fixed_position(mut self, position: GeoPosition) -> Self {
        self.fixed_position = Some(position);
        self
    }

    /// Set storage path override
    #[must_use]
    pub fn with_storage_path(mut self, path: PathBuf) -> Self {
        self.storage_path = Some(path);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut EcobinConfig) {
        if self.initial_screen.is_some()
            || self.strict_selection.is_some()
            || self.fixed_position.is_some()
            || self.storage_path.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(screen) = self.initial_screen {
            config.initial_screen = screen;
        }
        if let Some(strict) = self.strict_selection {
            config.reveal.strict_selection = strict;
        }
        if let Some(position) = self.fixed_position {
            config.fixed_position = Some(position);
        }
        if let Some(ref path) = self.storage_path {
            config.storage_path = Some(path.clone());
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{DEFAULT_ZOOM, FALLBACK_POSITION};
    use crate::reveal::DecorationCounts;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = EcobinConfig::default();

        assert_eq!(config.initial_screen, ScreenId::Landing);
        assert!(!config.reveal.strict_selection);
        assert_eq!(config.reveal.decorations, DecorationCounts::default());
        assert_eq!(config.map.fallback, FALLBACK_POSITION);
        assert_eq!(config.map.zoom, DEFAULT_ZOOM);
        assert_eq!(config.map.options.timeout, Duration::from_secs(5));
        assert_eq!(config.chat_reply_delay, Duration::from_millis(800));
        assert_eq!(config.chat_quick_reply_delay, Duration::from_millis(600));
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.to_string_lossy().contains("ecobin"));
            assert!(p.to_string_lossy().ends_with("ecobin.toml"));
        }
    }

    #[test]
    fn test_parse_valid_toml() {
        let file = toml_file(
            r#"
[navigation]
initial_screen = "home-screen"

[reveal]
strict_selection = true
leaf_count = 2

[map]
zoom = 12
geolocation_timeout_ms = 2500
fixed_latitude = 10.5
fixed_longitude = 20.25

[chat]
reply_delay_ms = 100

[storage]
path = "/tmp/ecobin.json"
"#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();

        assert_eq!(config.initial_screen, ScreenId::Home);
        assert!(config.reveal.strict_selection);
        assert_eq!(config.reveal.decorations.leaves, 2);
        assert_eq!(config.reveal.decorations.flowers, 3);
        assert_eq!(config.map.zoom, 12);
        assert_eq!(config.map.options.timeout, Duration::from_millis(2500));
        assert_eq!(config.fixed_position, Some(GeoPosition::new(10.5, 20.25)));
        assert_eq!(config.chat_reply_delay, Duration::from_millis(100));
        assert_eq!(config.chat_quick_reply_delay, Duration::from_millis(600));
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/ecobin.json")));
        assert_eq!(config.source(), ConfigSource::File);
    }

    #[test]
    fn test_missing_file_graceful() {
        let path = PathBuf::from("/nonexistent/path/ecobin.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let file = toml_file("[map\nzoom = \"close\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_unknown_screen_rejected() {
        let file = toml_file("[navigation]\ninitial_screen = \"settings\"\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_half_fixed_position_rejected() {
        let file = toml_file("[map]\nfixed_latitude = 1.0\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_zoom_out_of_range_rejected() {
        let file = toml_file("[map]\nzoom = 25\n");
        let result = load_config_with_env(Some(file.path().to_path_buf()), no_env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = toml_file("[navigation]\ninitial_screen = \"home\"\n[chat]\nreply_delay_ms = 5\n");
        let env = env_from(&[
            ("ECOBIN_INITIAL_SCREEN", "map"),
            ("ECOBIN_FIXED_LATITUDE", "1.5"),
            ("ECOBIN_FIXED_LONGITUDE", "2.5"),
        ]);

        let config = load_config_with_env(Some(file.path().to_path_buf()), env).unwrap();

        assert_eq!(config.initial_screen, ScreenId::Map);
        assert_eq!(config.chat_reply_delay, Duration::from_millis(5));
        assert_eq!(config.fixed_position, Some(GeoPosition::new(1.5, 2.5)));
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_env_bad_number_ignored() {
        let env = env_from(&[("ECOBIN_MAP_ZOOM", "very")]);
        let config = load_config_with_env(None, env).unwrap();
        assert_eq!(config.map.zoom, DEFAULT_ZOOM);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_env_half_fixed_position_rejected() {
        let env = env_from(&[("ECOBIN_FIXED_LATITUDE", "25.3")]);
        let result = load_config_with_env(None, env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));

        let env = env_from(&[("ECOBIN_FIXED_LONGITUDE", "82.9")]);
        let result = load_config_with_env(None, env);
        assert!(matches!(result.unwrap_err(), ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_env_unparsable_fixed_position_rejected() {
        let env = env_from(&[
            ("ECOBIN_FIXED_LATITUDE", "north"),
            ("ECOBIN_FIXED_LONGITUDE", "82.9"),
        ]);
        let err = load_config_with_env(None, env).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("north"));
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config = EcobinConfig::default();
        config.initial_screen = ScreenId::Map;
        config.set_source(ConfigSource::Env);

        ConfigOverrides::new()
            .with_initial_screen(ScreenId::Signup)
            .apply(&mut config);

        assert_eq!(config.initial_screen, ScreenId::Signup);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = EcobinConfig::default();
        ConfigOverrides::new().apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }

    #[test]
    fn test_toml_round_trip() {
        let mut original = EcobinToml::default();
        original.reveal.sparkle_count = Some(5);
        original.map.zoom = Some(10);

        let text = toml::to_string(&original).unwrap();
        let parsed: EcobinToml = toml::from_str(&text).unwrap();
        assert_eq!(parsed.reveal.sparkle_count, Some(5));
        assert_eq!(parsed.map.zoom, Some(10));
    }
}
