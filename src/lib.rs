//! Astro Blaster - a vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `game`: Fixed-timestep loop controller driving the simulation
//! - `config`: Game and level configuration
//! - `audio`: Sound effect sink boundary
//! - `platform`: Browser frame scheduling

pub mod audio;
pub mod config;
pub mod error;
pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;

pub use config::{GameConfig, LevelConfig};
pub use error::ConfigError;
pub use game::{Game, Renderer};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Longest wall-clock gap a single frame may feed into the accumulator
    pub const MAX_FRAME_TIME: f32 = 0.25;

    /// Hard cap on player shield charges
    pub const MAX_SHIELD: u32 = 5;
    /// Weapon level bounds
    pub const MIN_WEAPON_LEVEL: u8 = 1;
    pub const MAX_WEAPON_LEVEL: u8 = 5;
}
