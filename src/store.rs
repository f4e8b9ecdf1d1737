//! Lives per profile, kept in a small JSON file between sessions.
//!
//! The file is an object keyed by profile id:
//!
//! ```json
//! { "0xabc": { "lives": 2, "purchased_items": ["shield"] } }
//! ```
//!
//! Only `lives` is interpreted; purchased items and any other fields are
//! carried through as-is.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub lives: u32,
    #[serde(default)]
    pub purchased_items: Vec<String>,
    /// Fields this game does not read, written back unchanged
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
    profiles: BTreeMap<String, Profile>,
}

impl ProfileStore {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let profiles = if path.exists() {
            let text = fs::read_to_string(&path)
                .wrap_err_with(|| format!("failed to read profile store {}", path.display()))?;
            serde_json::from_str(&text)
                .wrap_err_with(|| format!("invalid profile store {}", path.display()))?
        } else {
            log::warn!("profile store {} not found, starting empty", path.display());
            BTreeMap::new()
        };

        Ok(Self { path, profiles })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lives_for(&self, profile: &str) -> Option<u32> {
        self.profiles.get(profile).map(|p| p.lives)
    }

    pub fn set_lives(&mut self, profile: &str, lives: u32) {
        self.profiles.entry(profile.to_string()).or_default().lives = lives;
    }

    pub fn purchased_items(&self, profile: &str) -> &[String] {
        self.profiles
            .get(profile)
            .map(|p| p.purchased_items.as_slice())
            .unwrap_or(&[])
    }

    /// Writes to a sibling temp file, then renames it over the store
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.profiles)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .wrap_err_with(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .wrap_err_with(|| format!("failed to replace {}", self.path.display()))?;
        log::info!("saved {} profile(s) to {}", self.profiles.len(), self.path.display());
        Ok(())
    }
}
