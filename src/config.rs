use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Capture config common to all platforms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Draw the cursor onto captured frames at all.
    pub capture_cursor: bool,
    /// Asset drawn instead of the system cursor while the captured window is unfocused.
    pub custom_cursor: Option<String>,
    /// Directory bundled assets are loaded from.
    pub asset_dir: PathBuf,
    /// How often the recording overlay refreshes its timer.
    pub timer_interval_ms: u64,
    /// Write a snapshot every N frames, 0 to disable.
    pub snapshot_every: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        normal_defaults()
    }
}

impl CaptureConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// "Normal" default values.
pub fn normal_defaults() -> CaptureConfig {
    CaptureConfig {
        capture_cursor: true,
        custom_cursor: Some("cursor.png".into()),
        asset_dir: PathBuf::from("data"),
        timer_interval_ms: 100,
        snapshot_every: 30,
    }
}

/// "Fallback" default values: system cursor only, no bundled assets.
pub fn fallback_defaults() -> CaptureConfig {
    CaptureConfig {
        custom_cursor: None,
        ..normal_defaults()
    }
}
