//! Game settings and level campaign
//!
//! Loaded from a JSON file next to the binary; the simulation only sees the
//! parsed values.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_SPAWN;

/// Which directional signal drives gravity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InputMode {
    /// Touch/mouse position relative to the player (simulator, desktop)
    Pointer,
    /// Device accelerometer
    #[default]
    Tilt,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputMode::Pointer => "Pointer",
            InputMode::Tilt => "Tilt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pointer" | "touch" | "mouse" => Some(InputMode::Pointer),
            "tilt" | "accelerometer" => Some(InputMode::Tilt),
            _ => None,
        }
    }
}

/// What happens after the last level's finish is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CampaignEnd {
    /// Start over at the first level, score carried
    #[default]
    Loop,
    /// Stop simulating; the state becomes `Complete`
    Stop,
}

/// One level of the campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelEntry {
    /// Resource name (file stem for directory sources)
    pub name: String,
    /// Player spawn point in world units
    pub spawn: [f32; 2],
}

impl LevelEntry {
    pub fn new(name: impl Into<String>, spawn: Vec2) -> Self {
        Self {
            name: name.into(),
            spawn: spawn.to_array(),
        }
    }

    pub fn spawn_point(&self) -> Vec2 {
        Vec2::from_array(self.spawn)
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Gravity input strategy
    pub input_mode: InputMode,
    /// Directory holding `<name>.txt` level maps
    pub level_dir: PathBuf,
    /// Levels in play order
    pub levels: Vec<LevelEntry>,
    /// Behavior after the last level
    #[serde(default)]
    pub on_campaign_end: CampaignEnd,
}

impl Default for Settings {
    fn default() -> Self {
        let spawn = Vec2::new(DEFAULT_SPAWN.0, DEFAULT_SPAWN.1);
        Self {
            input_mode: InputMode::Tilt,
            level_dir: PathBuf::from("levels"),
            levels: vec![
                LevelEntry::new("level1", spawn),
                LevelEntry::new("level2", spawn),
            ],
            on_campaign_end: CampaignEnd::Loop,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("Settings {} unreadable ({}), using defaults", path.display(), err);
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) if !settings.levels.is_empty() => {
                log::info!(
                    "Loaded settings from {} ({} levels)",
                    path.display(),
                    settings.levels.len()
                );
                settings
            }
            Ok(_) => {
                log::warn!("Settings {} list no levels, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                log::warn!("Settings {} invalid ({}), using defaults", path.display(), err);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_campaign() {
        let settings = Settings::default();
        assert_eq!(settings.levels.len(), 2);
        assert_eq!(settings.levels[0].name, "level1");
        assert_eq!(settings.levels[0].spawn_point(), Vec2::new(96.0, 672.0));
        assert_eq!(settings.on_campaign_end, CampaignEnd::Loop);
    }

    #[test]
    fn test_settings_json() {
        let json = r#"{
            "input_mode": "Pointer",
            "level_dir": "maps",
            "levels": [{ "name": "intro", "spawn": [32.0, 32.0] }]
        }"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.input_mode, InputMode::Pointer);
        assert_eq!(settings.levels[0].spawn_point(), Vec2::new(32.0, 32.0));
        // Missing field takes the default
        assert_eq!(settings.on_campaign_end, CampaignEnd::Loop);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_from(Path::new("does/not/exist.json"));
        assert_eq!(settings.levels.len(), 2);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("tilt-maze-settings-{}.json", std::process::id()));
        let settings = Settings {
            input_mode: InputMode::Pointer,
            level_dir: PathBuf::from("maps"),
            levels: vec![LevelEntry::new("intro", Vec2::new(160.0, 96.0))],
            on_campaign_end: CampaignEnd::Stop,
        };
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path);
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.input_mode, InputMode::Pointer);
        assert_eq!(loaded.level_dir, PathBuf::from("maps"));
        assert_eq!(loaded.levels, settings.levels);
        assert_eq!(loaded.on_campaign_end, CampaignEnd::Stop);
    }

    #[test]
    fn test_input_mode_from_str() {
        assert_eq!(InputMode::from_str("TILT"), Some(InputMode::Tilt));
        assert_eq!(InputMode::from_str("touch"), Some(InputMode::Pointer));
        assert_eq!(InputMode::from_str("joystick"), None);
        assert_eq!(InputMode::Pointer.as_str(), "Pointer");
    }
}
