//! TOML configuration for the bridge.
//!
//! Every field has a serde default, so a missing file or an older file
//! missing newer fields still yields a working configuration:
//!
//! ```toml
//! log_level = "info"
//!
//! [port]
//! name = "/mousecast"
//! peer = "/gesture-recognizer"
//!
//! [surface]
//! width = 640
//! height = 480
//!
//! [messages]
//! button_framing = "combined"
//! button_min_interval_ms = 25
//! ```

use std::path::Path;

use mousecast_core::{ButtonFraming, ButtonPacing, SurfaceError, SurfaceSize};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The configured surface dimensions are invalid.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub port: PortConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub messages: MessageConfig,
}

/// Outbound port identity and optional auto-connect peer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortConfig {
    /// Logical name the channel is bound under.
    #[serde(default = "default_port_name")]
    pub name: String,
    /// Receiver to route to at startup.  Absent means no auto-connect;
    /// connecting is then the operator's responsibility.
    #[serde(default)]
    pub peer: Option<String>,
}

/// Reference surface raw coordinates are measured against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurfaceConfig {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
}

/// Button-message framing and pacing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageConfig {
    #[serde(default)]
    pub button_framing: ButtonFraming,
    /// Minimum spacing between consecutive button messages, in ms.
    #[serde(default = "default_button_interval")]
    pub button_min_interval_ms: u64,
}

impl BridgeConfig {
    /// The reference surface as a validated domain type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Surface`] when the configured dimensions are
    /// not strictly positive.
    pub fn surface_size(&self) -> Result<SurfaceSize, ConfigError> {
        Ok(SurfaceSize::new(self.surface.width, self.surface.height)?)
    }

    /// The button pacing policy as a domain type.
    pub fn button_pacing(&self) -> ButtonPacing {
        ButtonPacing {
            min_interval_ms: self.messages.button_min_interval_ms,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            port: PortConfig::default(),
            surface: SurfaceConfig::default(),
            messages: MessageConfig::default(),
        }
    }
}

impl Default for PortConfig {
    fn default() -> Self {
        Self {
            name: default_port_name(),
            peer: None,
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            button_framing: ButtonFraming::default(),
            button_min_interval_ms: default_button_interval(),
        }
    }
}

fn default_port_name() -> String {
    "/mousecast".to_string()
}

fn default_width() -> i32 {
    640
}

fn default_height() -> i32 {
    480
}

fn default_button_interval() -> u64 {
    mousecast_core::domain::policy::DEFAULT_BUTTON_INTERVAL_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Load / save ───────────────────────────────────────────────────────────────

/// Loads the configuration from `path`, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError`] for unreadable files or malformed TOML; a
/// missing file is not an error.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(toml::from_str(&text)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BridgeConfig::default()),
        Err(err) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

/// Writes the configuration to `path` as TOML.
///
/// # Errors
///
/// Returns [`ConfigError`] on serialization or I/O failure.
pub fn save_config(path: &Path, config: &BridgeConfig) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config)?;
    std::fs::write(path, text).map_err(|err| ConfigError::Io {
        path: path.to_path_buf(),
        source: err,
    })
}
