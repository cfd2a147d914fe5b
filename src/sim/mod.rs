//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio, or platform dependencies

pub mod bullet;
pub mod collision;
pub mod enemy;
pub mod geom;
pub mod particles;
pub mod player;
pub mod prop;
pub mod state;
pub mod tick;

pub use bullet::{Bullet, BulletManager, BulletOwner};
pub use collision::resolve;
pub use enemy::{Enemy, EnemyKind, EnemyManager};
pub use geom::{Rect, clamp, distance, overlaps, random_int};
pub use particles::{EffectKind, Particle, ParticleHandle, ParticlePool};
pub use player::{Player, WeaponKind};
pub use prop::{Prop, PropKind, PropManager};
pub use state::{GameEvent, GamePhase, GameState, Snapshot};
pub use tick::{TickInput, tick};
