//! Session configuration loaded from a TOML file.
//!
//! Every field has a default, so a missing file or a file that sets only a
//! few keys is fine. The path comes from `SKYFIRE_CONFIG` and falls back to
//! `skyfire.toml` in the working directory.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use serde::{Deserialize, Serialize};

use crate::entities::{SHIP_SIZE, Screen};

pub const CONFIG_ENV_VAR: &str = "SKYFIRE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "skyfire.toml";

/// What losing the ship costs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeLossPolicy {
    /// Spend a life and keep playing with a fresh ship; enemies on screen are cleared
    #[default]
    Respawn,
    /// Spend a life and end the round; restarting continues with the lives left
    EndRound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Lives for a profile the store has never seen
    pub starting_lives: u32,
    pub life_loss: LifeLossPolicy,
    pub target_fps: u32,
    /// Upper bound on simulated time per frame
    pub max_frame_delta_ms: f64,
    pub star_count: usize,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
    /// Profile (wallet) identifier used as the store key
    pub profile: String,
    pub store_path: PathBuf,
    pub log_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            starting_lives: 3,
            life_loss: LifeLossPolicy::Respawn,
            target_fps: 60,
            max_frame_delta_ms: 100.0,
            star_count: 100,
            seed: None,
            profile: "local".to_string(),
            store_path: PathBuf::from("skyfire-profiles.json"),
            log_file: PathBuf::from("skyfire.log"),
        }
    }
}

impl GameConfig {
    /// Path named by `SKYFIRE_CONFIG`, or the default file name
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Reads and validates the file at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .wrap_err_with(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let dims_ok = self.screen_width.is_finite()
            && self.screen_height.is_finite()
            && self.screen_width >= SHIP_SIZE
            && self.screen_height >= SHIP_SIZE;
        if !dims_ok {
            return Err(eyre!(
                "screen must be finite and at least {SHIP_SIZE}x{SHIP_SIZE}, got {}x{}",
                self.screen_width,
                self.screen_height
            ));
        }
        if self.target_fps == 0 {
            return Err(eyre!("target_fps must be positive"));
        }
        if !(self.max_frame_delta_ms.is_finite() && self.max_frame_delta_ms > 0.0) {
            return Err(eyre!(
                "max_frame_delta_ms must be positive, got {}",
                self.max_frame_delta_ms
            ));
        }
        Ok(())
    }

    pub fn screen(&self) -> Screen {
        Screen::new(self.screen_width, self.screen_height)
    }

    pub fn frame_budget_ms(&self) -> u64 {
        1000 / u64::from(self.target_fps.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.screen(), Screen::new(800.0, 600.0));
        assert_eq!(config.frame_budget_ms(), 16);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml(
            r#"
            starting_lives = 5
            life_loss = "end_round"
            seed = 99
            "#,
        )
        .unwrap();
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.life_loss, LifeLossPolicy::EndRound);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.screen_width, 800.0);
        assert_eq!(config.profile, "local");
    }

    #[test]
    fn test_rejects_tiny_screen() {
        assert!(GameConfig::from_toml("screen_width = 10.0").is_err());
    }

    #[test]
    fn test_rejects_zero_fps() {
        assert!(GameConfig::from_toml("target_fps = 0").is_err());
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(GameConfig::from_toml(r#"life_loss = "forever""#).is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skyfire.toml");
        std::fs::write(&path, "profile = \"0xabc\"\nstar_count = 10\n").unwrap();
        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.profile, "0xabc");
        assert_eq!(config.star_count, 10);
    }
}
