//! Motion configuration (motion.toml)

use crate::easing::Easing;
use crate::transition::DEFAULT_DURATION_MS;
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Runtime and preset defaults
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Interval between interpolation steps of running transitions
    pub frame_interval_ms: u64,
    /// Duration used by presets that take none
    pub default_duration_ms: u32,
    /// Easing used by presets that take none
    pub default_easing: Easing,
    /// Keep a start/settle/fail log of every transition
    pub record_history: bool,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            default_duration_ms: DEFAULT_DURATION_MS,
            default_easing: Easing::default(),
            record_history: true,
        }
    }
}

impl MotionConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MotionConfig =
            toml::from_str(content).context("Failed to parse motion config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.frame_interval_ms >= 1,
            "frame_interval_ms must be at least 1, got {}",
            self.frame_interval_ms
        );
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize motion config")
    }
}
