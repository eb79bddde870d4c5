//! Game settings and mid-game changes
//!
//! Board size, player count and starting lives shape the board and can only
//! take effect on a fresh game. Boundaries, coiling and theme are safe to flip
//! while a game is running.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Colour theme handed through to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Board edge length in cells (square board)
    pub grid_size: i32,
    /// Two snakes on one board
    pub multiplayer: bool,
    /// Wrap around the edges instead of dying on them
    pub no_boundaries: bool,
    /// Let a snake's head pass through its own body
    pub allow_coiling: bool,
    pub theme: Theme,
    /// Starting lives per snake
    pub lives: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            multiplayer: false,
            no_boundaries: false,
            allow_coiling: false,
            theme: Theme::Dark,
            lives: DEFAULT_LIVES,
        }
    }
}

impl Settings {
    /// Two-player settings with everything else at defaults
    pub fn multiplayer() -> Self {
        Self {
            multiplayer: true,
            ..Self::default()
        }
    }

    /// Reject values that would break the board before a game starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        if !(1..=MAX_LIVES).contains(&self.lives) {
            return Err(ConfigError::Lives(self.lives));
        }
        Ok(())
    }

    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings: grid {} multiplayer {} lives {}",
            settings.grid_size,
            settings.multiplayer,
            settings.lives
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Apply a patch field by field (no validation)
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(grid_size) = patch.grid_size {
            self.grid_size = grid_size;
        }
        if let Some(multiplayer) = patch.multiplayer {
            self.multiplayer = multiplayer;
        }
        if let Some(no_boundaries) = patch.no_boundaries {
            self.no_boundaries = no_boundaries;
        }
        if let Some(allow_coiling) = patch.allow_coiling {
            self.allow_coiling = allow_coiling;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(lives) = patch.lives {
            self.lives = lives;
        }
    }

    /// Whether moving from `self` to `other` needs a fresh board
    pub fn requires_restart(&self, other: &Settings) -> bool {
        self.grid_size != other.grid_size
            || self.multiplayer != other.multiplayer
            || self.lives != other.lives
    }
}

/// Partial settings change requested while a game may be running
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub grid_size: Option<i32>,
    pub multiplayer: Option<bool>,
    pub no_boundaries: Option<bool>,
    pub allow_coiling: Option<bool>,
    pub theme: Option<Theme>,
    pub lives: Option<u32>,
}

/// What applying a patch did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsOutcome {
    /// Live settings changed (boundaries, coiling or theme)
    pub applied_live: bool,
    /// Some change is recorded but waits for `Engine::restart`
    pub restart_required: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert_eq!(settings.grid_size, 20);
        assert_eq!(settings.lives, 1);
        assert!(settings.theme.is_dark());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_grid() {
        let settings = Settings {
            grid_size: -4,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::GridSize(-4))));

        let settings = Settings {
            grid_size: MAX_GRID_SIZE + 1,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_lives() {
        let settings = Settings {
            lives: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::Lives(0))));

        let settings = Settings {
            lives: MAX_LIVES + 1,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_offered_options_validate() {
        for grid_size in GRID_SIZE_OPTIONS {
            for lives in LIVES_OPTIONS {
                let settings = Settings {
                    grid_size,
                    lives,
                    ..Default::default()
                };
                assert!(settings.validate().is_ok(), "{grid_size} / {lives}");
            }
        }
    }

    #[test]
    fn test_json_partial_fields_take_defaults() {
        let settings = Settings::from_json(r#"{ "grid_size": 15, "multiplayer": true }"#).unwrap();
        assert_eq!(settings.grid_size, 15);
        assert!(settings.multiplayer);
        assert_eq!(settings.lives, DEFAULT_LIVES);
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn test_json_invalid_values() {
        assert!(matches!(
            Settings::from_json(r#"{ "lives": 0 }"#),
            Err(ConfigError::Lives(0))
        ));
        assert!(matches!(
            Settings::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_json_roundtrip_keeps_theme() {
        let settings = Settings {
            theme: Theme::Light,
            ..Settings::multiplayer()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!(Theme::from_str("LIGHT"), Some(Theme::Light));
        assert_eq!(Theme::from_str("dark"), Some(Theme::Dark));
        assert_eq!(Theme::from_str("sepia"), None);
        assert_eq!(Theme::Light.as_str(), "Light");
    }

    #[test]
    fn test_merge_and_restart_detection() {
        let current = Settings::default();
        let mut next = current.clone();
        next.merge(&SettingsPatch {
            no_boundaries: Some(true),
            theme: Some(Theme::Light),
            ..Default::default()
        });
        assert!(next.no_boundaries);
        assert!(!current.requires_restart(&next));

        next.merge(&SettingsPatch {
            grid_size: Some(25),
            ..Default::default()
        });
        assert!(current.requires_restart(&next));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir()
            .join(format!("snake-duel-settings-{}.json", std::process::id()));
        let settings = Settings {
            grid_size: 15,
            lives: 3,
            theme: Theme::Light,
            ..Settings::multiplayer()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("snake-duel-missing/settings.json");
        assert!(matches!(Settings::load(path), Err(ConfigError::Io(_))));
    }
}
