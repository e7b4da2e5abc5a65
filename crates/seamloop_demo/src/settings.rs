// SPDX-License-Identifier: MIT OR Apache-2.0
//! Demo settings stored as RON.

use seamloop_engine::LoopConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Errors while loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for [`DemoSettings`]
    #[error("invalid settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("failed to serialize settings: {0}")]
    Write(#[from] ron::Error),

    /// File was written by a newer demo
    #[error("settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },
}

/// One card on the simulated strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEntry {
    /// Card title
    pub title: String,
    /// Unscaled width in pixels
    pub width: f64,
    /// Horizontal scale applied by the host
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl CardEntry {
    /// Unscaled card
    pub fn new(title: impl Into<String>, width: f64) -> Self {
        Self {
            title: title.into(),
            width,
            scale_x: 1.0,
        }
    }
}

/// Everything the demo host needs to run a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// Format version
    pub version: u32,
    /// Viewport width in pixels
    pub viewport_width: f64,
    /// Viewport width after the simulated resize
    pub resized_viewport_width: Option<f64>,
    /// Gap between cards in pixels
    pub gap: f64,
    /// Frames per second of the simulated host
    pub fps: f64,
    /// Seconds of free running before the scripted interactions
    pub run_seconds: f64,
    /// Cards in loop order
    pub cards: Vec<CardEntry>,
    /// Engine settings
    pub loop_config: LoopConfig,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            viewport_width: 640.0,
            resized_viewport_width: Some(480.0),
            gap: 16.0,
            fps: 60.0,
            run_seconds: 3.0,
            cards: ["Aurora", "Basalt", "Cinder", "Delta", "Ember", "Fjord"]
                .iter()
                .enumerate()
                .map(|(i, title)| CardEntry::new(*title, 160.0 + 20.0 * (i % 3) as f64))
                .collect(),
            loop_config: LoopConfig::default().with_center(true).with_autoplay(2.0),
        }
    }
}

impl DemoSettings {
    /// Parse settings from RON text
    pub fn from_ron(text: &str) -> Result<Self, SettingsError> {
        let settings: DemoSettings = ron::from_str(text)?;
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }
        Ok(settings)
    }

    /// Serialize settings as pretty RON
    pub fn to_ron(&self) -> Result<String, SettingsError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Seconds per simulated frame
    pub fn frame_time(&self) -> f64 {
        if self.fps.is_finite() && self.fps > 0.0 {
            1.0 / self.fps
        } else {
            1.0 / 60.0
        }
    }
}
