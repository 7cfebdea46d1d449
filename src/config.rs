use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Tunables for one simulation run. Every field has a default, so a config
/// file only needs the values it changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed. The same seed, map and commands replay the same run.
    pub seed: u64,
    /// Villagers spawned at start and on reset.
    pub initial_villagers: usize,
    /// Carrot cap for the spawn timer and the add-carrot command.
    pub max_carrots: usize,
    /// Ticks between automatic carrot spawns.
    pub carrot_spawn_interval: u32,
    /// Walking speed in pixels per tick.
    pub villager_speed: f32,
    /// Adult sprite size in pixels (width, height).
    pub villager_size: [f32; 2],
    /// Baby sprite size relative to an adult.
    pub baby_scale: f32,
    /// Nominal tile size in pixels for the isometric projection.
    pub tile_scale: f32,
    /// Screen position of the map's top corner.
    pub map_origin: [f32; 2],
    /// Optional text map. The default island is used when absent.
    pub map_path: Option<PathBuf>,
    /// Ticks the headless runner executes (0 = until killed).
    pub run_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_villagers: 3,
            max_carrots: 5,
            carrot_spawn_interval: 180,
            villager_speed: 1.0,
            villager_size: [40.0, 60.0],
            baby_scale: 0.6,
            tile_scale: 100.0,
            map_origin: [400.0, 0.0],
            map_path: None,
            run_ticks: 3600,
        }
    }
}

impl SimConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.villager_speed.is_finite() && self.villager_speed > 0.0) {
            return Err(SimError::InvalidConfig(
                "villager_speed must be positive and finite".into(),
            ));
        }
        if self.villager_size.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(SimError::InvalidConfig(
                "villager_size must be positive and finite".into(),
            ));
        }
        if !(self.baby_scale.is_finite() && self.baby_scale > 0.0) {
            return Err(SimError::InvalidConfig(
                "baby_scale must be positive and finite".into(),
            ));
        }
        if !(self.tile_scale.is_finite() && self.tile_scale > 0.0) {
            return Err(SimError::InvalidConfig(
                "tile_scale must be positive and finite".into(),
            ));
        }
        if self.carrot_spawn_interval == 0 {
            return Err(SimError::InvalidConfig(
                "carrot_spawn_interval must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn adult_size(&self) -> Vec2 {
        Vec2::from_array(self.villager_size)
    }

    pub fn baby_size(&self) -> Vec2 {
        self.adult_size() * self.baby_scale
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::from_array(self.map_origin)
    }
}
