//! Bullets fired by the player and by enemies

use glam::Vec2;
use serde::Serialize;

use super::enemy::Enemy;
use super::geom::{Rect, clamp};
use super::player::WeaponKind;
use crate::config::GameConfig;
use crate::consts::{MAX_WEAPON_LEVEL, MIN_WEAPON_LEVEL};

/// Width multiplier per weapon level for the normal gun
pub const NORMAL_SIZE_TABLE: [f32; 5] = [1.0, 2.0, 4.0, 7.0, 10.0];
/// Bullets per volley per weapon level for the spread gun
pub const SPREAD_COUNT_TABLE: [usize; 5] = [2, 3, 4, 5, 6];
/// Total fan angle of a spread volley (degrees)
pub const SPREAD_ARC_DEGREES: f32 = 30.0;
/// Lateral speed per pixel of horizontal distance to target (1/s)
pub const TRACKING_STEER: f32 = 4.0;

const NORMAL_SIZE: Vec2 = Vec2::new(4.0, 12.0);
const SPREAD_SIZE: Vec2 = Vec2::new(5.0, 10.0);
const TRACKING_SIZE: Vec2 = Vec2::new(6.0, 10.0);
const LASER_SIZE: Vec2 = Vec2::new(6.0, 28.0);
const ENEMY_SIZE: Vec2 = Vec2::new(6.0, 12.0);

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A bullet entity
#[derive(Debug, Clone, Serialize)]
pub struct Bullet {
    /// Center position
    pub pos: Vec2,
    /// Pixels per second
    pub vel: Vec2,
    pub size: Vec2,
    pub damage: u32,
    pub owner: BulletOwner,
    pub kind: WeaponKind,
    /// Horizontal position of the enemy a tracking bullet is steering toward
    pub target_x: Option<f32>,
    pub active: bool,
}

impl Bullet {
    fn new(
        pos: Vec2,
        vel: Vec2,
        size: Vec2,
        damage: u32,
        owner: BulletOwner,
        kind: WeaponKind,
    ) -> Self {
        Self {
            pos,
            vel,
            size,
            damage,
            owner,
            kind,
            target_x: None,
            active: true,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    fn out_of_bounds(&self, config: &GameConfig) -> bool {
        let r = self.rect();
        r.bottom() < 0.0
            || r.y > config.canvas_height
            || r.right() < 0.0
            || r.x > config.canvas_width
    }
}

/// Table index for a weapon level
#[inline]
fn level_index(level: u8) -> usize {
    (level.clamp(MIN_WEAPON_LEVEL, MAX_WEAPON_LEVEL) - MIN_WEAPON_LEVEL) as usize
}

/// Owns every bullet in flight
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulletManager {
    bullets: Vec<Bullet>,
}

impl BulletManager {
    /// Fire a player volley from `muzzle` for the given weapon and level
    pub fn spawn_player(
        &mut self,
        muzzle: Vec2,
        weapon: WeaponKind,
        level: u8,
        config: &GameConfig,
    ) {
        let idx = level_index(level);
        let speed = config.player_bullet_speed;
        let damage = config.base_damage;

        match weapon {
            WeaponKind::Normal => {
                let size = Vec2::new(NORMAL_SIZE.x * NORMAL_SIZE_TABLE[idx], NORMAL_SIZE.y);
                self.bullets.push(Bullet::new(
                    muzzle,
                    Vec2::new(0.0, -speed),
                    size,
                    damage,
                    BulletOwner::Player,
                    weapon,
                ));
            }
            WeaponKind::Spread => {
                let count = SPREAD_COUNT_TABLE[idx];
                for angle in fan_angles(count, SPREAD_ARC_DEGREES.to_radians()) {
                    self.bullets.push(Bullet::new(
                        muzzle,
                        Vec2::new(angle.sin() * speed, -speed),
                        SPREAD_SIZE,
                        damage,
                        BulletOwner::Player,
                        weapon,
                    ));
                }
            }
            WeaponKind::Tracking => {
                self.bullets.push(Bullet::new(
                    muzzle,
                    Vec2::new(0.0, -speed),
                    TRACKING_SIZE,
                    damage,
                    BulletOwner::Player,
                    weapon,
                ));
            }
            WeaponKind::Laser => {
                let steps = idx as f32;
                let size = Vec2::new(LASER_SIZE.x * (1.0 + 0.2 * steps), LASER_SIZE.y);
                self.bullets.push(Bullet::new(
                    muzzle,
                    Vec2::new(0.0, -speed * (1.0 + 0.5 * steps)),
                    size,
                    damage * 2,
                    BulletOwner::Player,
                    weapon,
                ));
            }
        }
    }

    /// Fire a single enemy bullet straight down
    pub fn spawn_enemy(&mut self, muzzle: Vec2, config: &GameConfig) {
        self.spawn_enemy_fan(muzzle, 1, config);
    }

    /// Fire `count` enemy bullets fanned downward across the spread arc
    pub fn spawn_enemy_fan(&mut self, muzzle: Vec2, count: usize, config: &GameConfig) {
        let speed = config.enemy_bullet_speed;
        for angle in fan_angles(count, SPREAD_ARC_DEGREES.to_radians()) {
            self.bullets.push(Bullet::new(
                muzzle,
                Vec2::new(angle.sin() * speed, speed),
                ENEMY_SIZE,
                1,
                BulletOwner::Enemy,
                WeaponKind::Normal,
            ));
        }
    }

    /// Drop dead bullets, steer trackers, move everything, cull off-screen bullets
    pub fn update(&mut self, dt: f32, enemies: &[Enemy], config: &GameConfig) {
        self.bullets.retain(|b| b.active);

        for bullet in &mut self.bullets {
            if bullet.kind == WeaponKind::Tracking && bullet.owner == BulletOwner::Player {
                let forward = bullet.vel.y.abs();
                bullet.target_x = nearest_enemy_x(bullet.pos.x, enemies);
                bullet.vel.x = match bullet.target_x {
                    Some(tx) => clamp((tx - bullet.pos.x) * TRACKING_STEER, -forward, forward),
                    None => 0.0,
                };
            }

            bullet.pos += bullet.vel * dt;

            if bullet.out_of_bounds(config) {
                bullet.active = false;
            }
        }
    }

    pub fn clear(&mut self) {
        self.bullets.clear();
    }

    /// All stored bullets, including ones deactivated this tick
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bullet> {
        self.bullets.iter_mut()
    }

    pub fn active(&self) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter().filter(|b| b.active)
    }

    pub fn as_slice(&self) -> &[Bullet] {
        &self.bullets
    }
}

/// Evenly stepped angles across `arc` centered on zero (a single shot goes straight)
fn fan_angles(count: usize, arc: f32) -> impl Iterator<Item = f32> {
    let step = if count > 1 { arc / (count - 1) as f32 } else { 0.0 };
    let start = if count > 1 { -arc / 2.0 } else { 0.0 };
    (0..count).map(move |i| start + step * i as f32)
}

/// Horizontal position of the closest active enemy by horizontal distance
fn nearest_enemy_x(x: f32, enemies: &[Enemy]) -> Option<f32> {
    enemies
        .iter()
        .filter(|e| e.active)
        .min_by(|a, b| {
            (a.pos.x - x)
                .abs()
                .partial_cmp(&(b.pos.x - x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos.x)
}
