//! # Board Configuration
//!
//! Tuning constants for gesture recognition and substitution, plus the
//! defaults applied to new entries.
//!
//! ```rust
//! use lineup_core::config::BoardConfig;
//!
//! let config = BoardConfig::default();
//! assert_eq!(config.swap_radius, 8.0);
//! ```

use std::path::Path;
use std::{env, fs};

use serde::{Deserialize, Serialize};

use crate::engine::coordinates::{LogicalPos, PERCENT_MAX};
use crate::error::{BoardError, Result};
use crate::models::roster::{DEFAULT_KEEPER_COLOR, DEFAULT_TEAM_COLOR};

pub const CONFIG_PATH_ENV: &str = "LINEUP_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Bench drops closer than this (logical units) to a field entry swap with it.
    pub swap_radius: f64,
    /// Mouse travel (px) before a press becomes a drag.
    pub mouse_activation_px: f64,
    /// Touch hold (ms) before a press becomes a drag.
    pub touch_hold_ms: u64,
    /// Touch drift (px) tolerated during the hold.
    pub touch_tolerance_px: f64,
    /// Where new and benched entries are parked.
    pub bench_x: f64,
    pub bench_y: f64,
    /// Color reference for entries created without one.
    pub default_color: String,
    pub team_color: String,
    pub keeper_color: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            swap_radius: 8.0,
            mouse_activation_px: 5.0,
            touch_hold_ms: 600,
            touch_tolerance_px: 5.0,
            bench_x: 50.0,
            bench_y: 95.0,
            default_color: DEFAULT_TEAM_COLOR.to_string(),
            team_color: DEFAULT_TEAM_COLOR.to_string(),
            keeper_color: DEFAULT_KEEPER_COLOR.to_string(),
        }
    }
}

impl BoardConfig {
    /// Shorter hold and looser drift for small touch screens.
    pub fn touch_friendly() -> Self {
        Self { touch_hold_ms: 350, touch_tolerance_px: 8.0, ..Self::default() }
    }

    pub fn bench_pos(&self) -> LogicalPos {
        LogicalPos::new(self.bench_x, self.bench_y)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| BoardError::InvalidConfig(e.to_string()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| BoardError::InvalidConfig(e.to_string()))
    }

    /// Load a JSON or YAML file, chosen by extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| BoardError::InvalidConfig(format!("failed to read {}: {}", path.display(), e)))?;

        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content)?,
            _ => Self::from_json(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Config from the file named by `LINEUP_CONFIG_PATH`, defaults when unset.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        Self::from_file(Path::new(path))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.swap_radius.is_finite() || self.swap_radius < 0.0 {
            return Err(BoardError::InvalidConfig(format!("swap_radius must be >= 0, got {}", self.swap_radius)));
        }
        if !self.mouse_activation_px.is_finite() || self.mouse_activation_px < 0.0 {
            return Err(BoardError::InvalidConfig(format!(
                "mouse_activation_px must be >= 0, got {}",
                self.mouse_activation_px
            )));
        }
        if !self.touch_tolerance_px.is_finite() || self.touch_tolerance_px < 0.0 {
            return Err(BoardError::InvalidConfig(format!(
                "touch_tolerance_px must be >= 0, got {}",
                self.touch_tolerance_px
            )));
        }
        for (name, v) in [("bench_x", self.bench_x), ("bench_y", self.bench_y)] {
            if !(0.0..=PERCENT_MAX).contains(&v) {
                return Err(BoardError::InvalidConfig(format!("{} must be within [0, 100], got {}", name, v)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BoardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bench_pos(), LogicalPos::new(50.0, 95.0));
        assert!(BoardConfig::touch_friendly().validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = BoardConfig::from_yaml("swap_radius: 6.5\ntouch_hold_ms: 400\n").unwrap();
        assert_eq!(config.swap_radius, 6.5);
        assert_eq!(config.touch_hold_ms, 400);
        assert_eq!(config.bench_y, 95.0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = BoardConfig::from_json(r#"{"keeper_color":"bg-pink-500"}"#).unwrap();
        assert_eq!(config.keeper_color, "bg-pink-500");
        assert_eq!(config.swap_radius, 8.0);
    }

    #[test]
    fn rejects_bad_values() {
        let config = BoardConfig { swap_radius: -1.0, ..BoardConfig::default() };
        assert!(matches!(config.validate(), Err(BoardError::InvalidConfig(_))));
        let config = BoardConfig { bench_y: 140.0, ..BoardConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_from_file_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("board.yml");
        fs::write(&path, "mouse_activation_px: 3.0\n").unwrap();
        let config = BoardConfig::from_file(&path).unwrap();
        assert_eq!(config.mouse_activation_px, 3.0);

        let bad = dir.path().join("board.json");
        fs::write(&bad, "{not json").unwrap();
        assert!(BoardConfig::from_file(&bad).is_err());
    }
}
