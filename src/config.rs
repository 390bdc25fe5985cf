//! Configuration file handling for frame-grabber.
//!
//! Loads configuration from `~/.config/frame-grabber/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::grabber::{GrabSettings, ReadFailurePolicy, DEFAULT_INTERVAL, DEFAULT_KEY_TIMEOUT};
use crate::preview::DEFAULT_WINDOW_TITLE;
use crate::storage::DEFAULT_OUTPUT_DIR;

/// Configuration file structure for frame-grabber.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct CameraConfig {
    #[serde(default)]
    pub device: u32,
    #[serde(default)]
    pub mirror: bool,
}

#[derive(Debug, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_key_timeout_ms")]
    pub key_timeout_ms: u64,
    #[serde(default)]
    pub on_read_failure: ReadFailurePolicy,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            key_timeout_ms: default_key_timeout_ms(),
            on_read_failure: ReadFailurePolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_window_title")]
    pub window_title: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_title: default_window_title(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL.as_millis() as u64
}

fn default_key_timeout_ms() -> u64 {
    DEFAULT_KEY_TIMEOUT.as_millis() as u64
}

fn default_window_title() -> String {
    DEFAULT_WINDOW_TITLE.to_string()
}

impl Config {
    /// Load configuration from the default path.
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = default_path();
        if path.exists() {
            Self::load_from_explicit(path)
        } else {
            log::debug!("no config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Load configuration from a path the user asked for explicitly.
    /// Unlike [`Config::load`], a missing file is an error.
    pub fn load_from_explicit(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            path: path.clone(),
            source: e,
        })?;
        let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Output directory, falling back to `raw_images`.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Grab loop settings described by the `[capture]` table.
    pub fn grab_settings(&self) -> GrabSettings {
        GrabSettings {
            interval: Duration::from_millis(self.capture.interval_ms),
            key_timeout: Duration::from_millis(self.capture.key_timeout_ms),
            on_read_failure: self.capture.on_read_failure,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("frame-grabber").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".frame-grabber.toml"))
}

/// Contents written by `config init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# frame-grabber configuration

# Directory frames are saved into (created if missing)
output_dir = "raw_images"

[camera]
# Camera device index (see `frame-grabber list-cameras`)
device = 0
# Mirror horizontally (selfie mode)
mirror = false

[capture]
# Pause between captures in milliseconds
interval_ms = 1000
# How long to wait for the Escape key each iteration
key_timeout_ms = 30
# What to do when a frame can't be read: "skip" or "abort"
on_read_failure = "skip"

[preview]
# Show a preview window (needs the `highgui` feature); otherwise stop with Ctrl+C
enabled = true
window_title = "CSI Camera"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.output_dir(), PathBuf::from("raw_images"));
        assert_eq!(config.camera.device, 0);
        assert!(!config.camera.mirror);
        assert_eq!(config.capture.interval_ms, 1000);
        assert_eq!(config.capture.key_timeout_ms, 30);
        assert_eq!(config.capture.on_read_failure, ReadFailurePolicy::Skip);
        assert!(config.preview.enabled);
        assert_eq!(config.preview.window_title, "CSI Camera");
    }

    #[test]
    fn test_default_config_toml_parses_to_defaults() {
        let config = Config::parse(DEFAULT_CONFIG_TOML).unwrap();
        let defaults = Config::default();
        assert_eq!(config.output_dir(), defaults.output_dir());
        assert_eq!(config.capture.interval_ms, defaults.capture.interval_ms);
        assert_eq!(config.preview.window_title, defaults.preview.window_title);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
output_dir = "/tmp/shots"

[capture]
interval_ms = 250
on_read_failure = "abort"
"#,
        )
        .unwrap();
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/shots"));
        let settings = config.grab_settings();
        assert_eq!(settings.interval, Duration::from_millis(250));
        assert_eq!(settings.key_timeout, Duration::from_millis(30));
        assert_eq!(settings.on_read_failure, ReadFailurePolicy::Abort);
    }

    #[test]
    fn test_invalid_policy_is_parse_error() {
        assert!(Config::parse("[capture]\non_read_failure = \"retry\"\n").is_err());
    }

    #[test]
    fn test_load_from_explicit_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nope.toml");
        let err = Config::load_from_explicit(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn test_load_from_explicit_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[camera\ndevice = 1").unwrap();
        let err = Config::load_from_explicit(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_load_from_explicit_reads_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[camera]\ndevice = 2\nmirror = true\n").unwrap();
        let config = Config::load_from_explicit(&path).unwrap();
        assert_eq!(config.camera.device, 2);
        assert!(config.camera.mirror);
    }
}
