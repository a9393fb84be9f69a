// SPDX-License-Identifier: GPL-3.0-only

//! User configuration loaded from a JSON file.
//!
//! Every field has a default, so a partial file (or no file at all) is fine.
//!
//! ```json
//! {
//!     "shift_release_ms": 3000,
//!     "focus_debounce_ms": 50,
//!     "layout_path": "layouts/compact.json",
//!     "backspace_target": "active",
//!     "show_on_startup": true
//! }
//! ```

use crate::app_settings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which element Backspace deletes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackspaceTarget {
    /// The tracked active target, like text insertion.
    #[default]
    Active,
    /// Always the default target, whatever has focus.
    Default,
}

/// User configuration that persists between application runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Delay before an unused shift releases itself.
    pub shift_release_ms: u64,
    /// Delay between focus leaving an element and the hide decision.
    pub focus_debounce_ms: u64,
    /// Delay after pointer-up before a keyboard interaction ends.
    pub interaction_release_ms: u64,
    /// Layout file; the embedded QWERTY layout when absent.
    pub layout_path: Option<PathBuf>,
    /// Element that Backspace edits.
    pub backspace_target: BackspaceTarget,
    /// Whether the keyboard is visible right after startup.
    pub show_on_startup: bool,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            shift_release_ms: app_settings::SHIFT_RELEASE_MS,
            focus_debounce_ms: app_settings::FOCUS_LOSS_DEBOUNCE_MS,
            interaction_release_ms: app_settings::INTERACTION_RELEASE_MS,
            layout_path: None,
            backspace_target: BackspaceTarget::default(),
            show_on_startup: true,
        }
    }
}

/// Timer delays derived from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub shift_release: Duration,
    pub focus_debounce: Duration,
    pub interaction_release: Duration,
}

impl KeyboardConfig {
    /// Loads the configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            source,
            path: path.to_path_buf(),
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            source,
            path: path.to_path_buf(),
        })
    }

    /// Loads the configuration, falling back to defaults on any error.
    ///
    /// A missing file is expected and logged at debug level; a broken file
    /// is logged as a warning.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io { source, path })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Timer delays for the keyboard controller.
    pub fn timings(&self) -> Timings {
        Timings {
            shift_release: Duration::from_millis(self.shift_release_ms),
            focus_debounce: Duration::from_millis(self.focus_debounce_ms),
            interaction_release: Duration::from_millis(self.interaction_release_ms),
        }
    }
}

/// Errors that can occur while loading the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
    /// The file is not valid configuration JSON.
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { source, path } => {
                write!(f, "Failed to read config '{}': {}", path.display(), source)
            }
            ConfigError::Json { source, path } => {
                write!(
                    f,
                    "Invalid config '{}' at line {}: {}",
                    path.display(),
                    source.line(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json { source, .. } => Some(source),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
