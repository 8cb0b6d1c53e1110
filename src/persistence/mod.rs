//! # Persistence Module
//!
//! ## Why This Module Exists
//! The controller carries a tiny amount of state across restarts: which game
//! mode (layout) was active and which LED pattern the owner picked. Mode
//! switching in particular is persist-then-restart - the new mode is written
//! out and the process restarts into it - so the store has to be reliable at
//! exactly the moment the process is about to die.
//!
//! ## Design Philosophy
//! Fail-safe throughout: a missing or corrupt settings file degrades to
//! defaults (mode 0, solid LEDs) rather than blocking startup, and an
//! out-of-range persisted mode is clamped, never treated as fatal. Every
//! access opens and closes the file; no handle is held across poll ticks.
//!
//! ## Error Handling Strategy
//! Uses `color_eyre` for rich context on the write path (the only path whose
//! failure the operator needs to hear about). Reads swallow errors into
//! defaults by design.

use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::layout::Layout;

const SETTINGS_DIR: &str = "pincontroller";
const SETTINGS_FILE: &str = "settings.toml";

/// Everything the device persists across restarts.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeviceSettings {
    /// Active game mode as its integer form; see [`Layout::from_mode`].
    #[serde(default)]
    pub mode: u8,
    /// LED strip pattern; see [`crate::feedback::led::LedPattern`].
    #[serde(default)]
    pub led_pattern: u8,
}

impl DeviceSettings {
    pub fn layout(&self) -> Layout {
        Layout::from_mode(self.mode)
    }
}

/// Advances to the next game mode, wrapping around the closed set.
pub fn next_mode(mode: u8) -> u8 {
    (mode + 1) % Layout::COUNT
}

/// Open/read/close-per-access settings store.
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store under the user config directory, creating the directory
    /// eagerly so the later persist-then-restart write cannot fail on it.
    pub fn open_default() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| eyre!("No config directory available"))?;
        let dir = base.join(SETTINGS_DIR);
        fs::create_dir_all(&dir)
            .wrap_err_with(|| format!("Creating settings directory {:?}", dir))?;
        Ok(Self {
            path: dir.join(SETTINGS_FILE),
        })
    }

    /// Store at an explicit path (tests).
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the settings file fresh. Missing or unparsable content is a
    /// default, not an error.
    pub fn load(&self) -> DeviceSettings {
        let settings = match fs::read_to_string(&self.path) {
            Ok(raw) => match toml::from_str::<DeviceSettings>(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("Settings file unparsable ({}), using defaults", e);
                    DeviceSettings::default()
                }
            },
            Err(e) => {
                debug!("No settings file ({}), using defaults", e);
                DeviceSettings::default()
            }
        };
        info!(
            "Loaded settings: mode={} led_pattern={}",
            settings.mode, settings.led_pattern
        );
        settings
    }

    /// Writes the whole settings file. This is the call that happens right
    /// before a mode-switch restart, so failures propagate loudly.
    pub fn store(&self, settings: &DeviceSettings) -> Result<()> {
        let raw = toml::to_string_pretty(settings).wrap_err("Serializing settings")?;
        fs::write(&self.path, raw)
            .wrap_err_with(|| format!("Writing settings to {:?}", self.path))?;
        info!(
            "Persisted settings: mode={} led_pattern={}",
            settings.mode, settings.led_pattern
        );
        Ok(())
    }
}
