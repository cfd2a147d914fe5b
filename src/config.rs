//! Game and level configuration
//!
//! A config file is JSON with an optional `game` table and a required `levels`
//! list. Every `GameConfig` field has a default, so a file may override only
//! the values it cares about. Level data is validated once at load; a bad level
//! list is a fatal startup error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Global tuning shared by every level
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Play field ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Horizontal inset for enemy spawn positions
    pub field_margin: f32,

    // === Player ===
    /// Pixels per second at full input
    pub player_speed: f32,
    pub player_size: f32,
    pub base_health: u32,
    pub base_damage: u32,
    pub player_shoot_cooldown_ticks: u32,

    // === Bullets ===
    pub player_bullet_speed: f32,
    pub enemy_bullet_speed: f32,

    // === Enemies ===
    /// Inclusive range an ordinary enemy's fire interval is drawn from
    pub enemy_shoot_min_ticks: u32,
    pub enemy_shoot_max_ticks: u32,
    pub boss_shoot_interval_ticks: u32,
    /// Line the boss stops descending at
    pub boss_hover_y: f32,

    // === Props ===
    pub prop_fall_speed: f32,
    /// Chance a destroyed enemy drops a prop
    pub prop_drop_chance: f64,
    pub score_prop_value: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 480.0,
            canvas_height: 720.0,
            field_margin: 20.0,

            player_speed: 300.0,
            player_size: 40.0,
            base_health: 5,
            base_damage: 1,
            player_shoot_cooldown_ticks: 10,

            player_bullet_speed: 600.0,
            enemy_bullet_speed: 300.0,

            enemy_shoot_min_ticks: 90,
            enemy_shoot_max_ticks: 180,
            boss_shoot_interval_ticks: 45,
            boss_hover_y: 150.0,

            prop_fall_speed: 120.0,
            prop_drop_chance: 0.3,
            score_prop_value: 100,
        }
    }
}

/// One level's spawn budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Enemies spawned before the level can complete
    pub enemy_count: u32,
    /// Time budget the spawns are spread across
    pub level_time_secs: u32,
    /// Multiplier on every enemy type's base speed
    pub speed_multiplier: f32,
    /// First spawn of the level is a boss
    #[serde(default)]
    pub boss: bool,
    /// Explicit spawn interval; derived from the time budget when absent
    #[serde(default)]
    pub spawn_interval_ms: Option<u32>,
}

impl LevelConfig {
    pub fn new(enemy_count: u32, level_time_secs: u32, speed_multiplier: f32, boss: bool) -> Self {
        Self {
            enemy_count,
            level_time_secs,
            speed_multiplier,
            boss,
            spawn_interval_ms: None,
        }
    }

    /// Milliseconds between spawns: explicit, or the time budget split evenly
    pub fn spawn_interval_ms(&self) -> u32 {
        match self.spawn_interval_ms {
            Some(ms) => ms,
            None => {
                let total_ms = u64::from(self.level_time_secs) * 1000;
                (total_ms / u64::from(self.enemy_count.max(1))) as u32
            }
        }
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let invalid = |reason| ConfigError::InvalidLevel { index, reason };
        if self.enemy_count == 0 {
            return Err(invalid("enemy_count must be positive"));
        }
        if self.level_time_secs == 0 {
            return Err(invalid("level_time_secs must be positive"));
        }
        if !(self.speed_multiplier > 0.0) {
            return Err(invalid("speed_multiplier must be positive"));
        }
        if self.spawn_interval_ms == Some(0) {
            return Err(invalid("spawn_interval_ms must be positive"));
        }
        Ok(())
    }
}

/// Built-in campaign: five levels, bosses on 3 and 5
pub fn default_levels() -> Vec<LevelConfig> {
    vec![
        LevelConfig::new(20, 40, 1.0, false),
        LevelConfig::new(30, 45, 1.1, false),
        LevelConfig::new(40, 50, 1.2, true),
        LevelConfig::new(50, 55, 1.3, false),
        LevelConfig::new(60, 60, 1.4, true),
    ]
}

/// Everything loaded at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub game: GameConfig,
    pub levels: Vec<LevelConfig>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            levels: default_levels(),
        }
    }
}

impl ConfigFile {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(json)?;
        file.validate()?;
        Ok(file)
    }

    /// Read, parse, and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file = Self::from_json(&json)?;
        log::info!(
            "Loaded {} levels from {}",
            file.levels.len(),
            path.display()
        );
        Ok(file)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        for (index, level) in self.levels.iter().enumerate() {
            level.validate(index)?;
        }
        Ok(())
    }
}
