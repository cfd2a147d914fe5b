//! Game state and session lifecycle
//!
//! Everything one play session needs lives in [`GameState`]: the player, the
//! three entity managers, the particle pool, the level being played, and the
//! seeded RNG. Nothing here is global, so two sessions never share state.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::bullet::{Bullet, BulletManager};
use super::enemy::{Enemy, EnemyKind, EnemyManager, EnemyShot};
use super::particles::{Particle, ParticlePool};
use super::player::Player;
use super::prop::{Prop, PropKind, PropManager};
use crate::config::{ConfigFile, GameConfig, LevelConfig};
use crate::error::ConfigError;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Title screen, waiting for start input
    Menu,
    /// Active gameplay
    Playing,
    /// Gameplay frozen by the player
    Paused,
    /// Level cleared, waiting for advance input
    LevelComplete,
    /// Run ended (death, or final level cleared)
    GameOver,
}

/// Things that happened during a tick, drained by the loop controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    PlayerFired,
    EnemyFired,
    /// `credited` is the score awarded (zero when the enemy rammed the player)
    EnemyDestroyed { kind: EnemyKind, credited: u64 },
    PlayerHit,
    PlayerDestroyed,
    PropCollected(PropKind),
    LevelComplete { level: usize },
    GameOver { victory: bool },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub config: GameConfig,
    pub levels: Vec<LevelConfig>,
    /// Index into `levels` (0-based)
    pub level_index: usize,
    pub player: Player,
    pub bullets: BulletManager,
    pub enemies: EnemyManager,
    pub props: PropManager,
    /// Visual particles (not gameplay-affecting)
    pub particles: ParticlePool,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Time spent in the current level
    pub level_elapsed_ms: f32,
    /// Time since the last enemy spawn
    pub spawn_timer_ms: f32,
    pub enemies_spawned: u32,
    /// Set when the final level was cleared
    pub victory: bool,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    /// Level being played (copied at load so it is immutable during play)
    current_level: LevelConfig,
    /// Scratch buffer for enemy fire requests
    pub(crate) shots: Vec<EnemyShot>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create a session in the menu from a validated config
    pub fn new(file: ConfigFile, seed: u64) -> Result<Self, ConfigError> {
        file.validate()?;
        Ok(Self::build(file, seed))
    }

    /// Session using the built-in config and campaign
    pub fn with_default_config(seed: u64) -> Self {
        Self::build(ConfigFile::default(), seed)
    }

    fn build(file: ConfigFile, seed: u64) -> Self {
        let ConfigFile { game, levels } = file;
        let current_level = levels
            .first()
            .cloned()
            .unwrap_or_else(|| LevelConfig::new(1, 1, 1.0, false));
        Self {
            seed,
            phase: GamePhase::Menu,
            player: Player::new(&game),
            config: game,
            levels,
            level_index: 0,
            bullets: BulletManager::default(),
            enemies: EnemyManager::default(),
            props: PropManager::default(),
            particles: ParticlePool::default(),
            score: 0,
            time_ticks: 0,
            level_elapsed_ms: 0.0,
            spawn_timer_ms: 0.0,
            enemies_spawned: 0,
            victory: false,
            events: Vec::new(),
            current_level,
            shots: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Replace the particle pool (capacity comes from settings)
    pub fn set_particle_pool(&mut self, pool: ParticlePool) {
        self.particles = pool;
    }

    /// Configuration of the level being played
    pub fn level(&self) -> &LevelConfig {
        &self.current_level
    }

    /// 1-based level number
    pub fn level_number(&self) -> usize {
        self.level_index + 1
    }

    pub fn is_final_level(&self) -> bool {
        self.level_index + 1 >= self.levels.len()
    }

    /// Remaining time budget for the current level
    pub fn level_time_remaining_ms(&self) -> f32 {
        (self.current_level.level_time_secs as f32 * 1000.0 - self.level_elapsed_ms).max(0.0)
    }

    /// Fresh run: reset stats and score, load the first level, start playing
    pub fn start_new_game(&mut self) {
        self.player = Player::new(&self.config);
        self.score = 0;
        self.victory = false;
        self.particles.clear();
        self.load_level(0);
        self.phase = GamePhase::Playing;
        log::info!("New game (seed {})", self.seed);
    }

    /// Load a level: clear the field, reset counters, recenter the player.
    /// Player stats carry over.
    pub fn load_level(&mut self, index: usize) {
        self.level_index = index.min(self.levels.len().saturating_sub(1));
        if let Some(level) = self.levels.get(self.level_index) {
            self.current_level = level.clone();
        }

        self.bullets.clear();
        self.enemies.clear();
        self.props.clear();
        self.level_elapsed_ms = 0.0;
        self.spawn_timer_ms = 0.0;
        self.enemies_spawned = 0;
        self.player.reset_position(&self.config);

        log::info!(
            "Level {} loaded: {} enemies over {}s, spawn every {}ms{}",
            self.level_number(),
            self.current_level.enemy_count,
            self.current_level.level_time_secs,
            self.current_level.spawn_interval_ms(),
            if self.current_level.boss { ", boss" } else { "" }
        );
    }

    /// Leave the level-complete screen: next level, or game over after the last one
    pub fn advance_level(&mut self) {
        if self.is_final_level() {
            self.victory = true;
            self.phase = GamePhase::GameOver;
            self.events.push(GameEvent::GameOver { victory: true });
            log::info!("Final level cleared, score {}", self.score);
        } else {
            self.load_level(self.level_index + 1);
            self.phase = GamePhase::Playing;
        }
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Read-only view for renderers
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            level: self.level_number(),
            score: self.score,
            victory: self.victory,
            level_time_remaining_ms: self.level_time_remaining_ms(),
            player: &self.player,
            enemies: self.enemies.active().collect(),
            bullets: self.bullets.active().collect(),
            props: self.props.active().collect(),
            particles: self.particles.active().collect(),
        }
    }
}

/// Borrowed, serializable view of what is on screen
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub level: usize,
    pub score: u64,
    pub victory: bool,
    pub level_time_remaining_ms: f32,
    pub player: &'a Player,
    pub enemies: Vec<&'a Enemy>,
    pub bullets: Vec<&'a Bullet>,
    pub props: Vec<&'a Prop>,
    pub particles: Vec<&'a Particle>,
}
