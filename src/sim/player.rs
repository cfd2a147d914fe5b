//! Player craft: movement, firing, and stacking power-ups
//!
//! Power-ups are count-based and permanent for the run: shield charges stack
//! up to [`MAX_SHIELD`], weapon pickups raise or switch the weapon without ever
//! lowering its level. Only a fresh game resets them.

use glam::Vec2;
use serde::Serialize;

use super::bullet::BulletManager;
use super::geom::{Rect, clamp};
use super::prop::PropKind;
use super::tick::TickInput;
use crate::config::GameConfig;
use crate::consts::{MAX_SHIELD, MAX_WEAPON_LEVEL, MIN_WEAPON_LEVEL};

/// Player weapon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeaponKind {
    Normal,
    Spread,
    Tracking,
    Laser,
}

/// The player's craft
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub active: bool,
    pub health: u32,
    pub max_health: u32,
    /// Shield charges, each absorbs one point of damage
    pub shield: u32,
    pub weapon: WeaponKind,
    /// 1..=5, survives weapon switches
    pub weapon_level: u8,
    /// Ticks until the next shot is allowed
    pub shoot_cooldown: u32,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: Self::spawn_point(config),
            size: Vec2::splat(config.player_size),
            active: true,
            health: config.base_health,
            max_health: config.base_health,
            shield: 0,
            weapon: WeaponKind::Normal,
            weapon_level: MIN_WEAPON_LEVEL,
            shoot_cooldown: 0,
        }
    }

    fn spawn_point(config: &GameConfig) -> Vec2 {
        Vec2::new(
            config.canvas_width / 2.0,
            config.canvas_height - config.player_size * 1.5,
        )
    }

    /// Move back to the spawn point without touching stats (level load)
    pub fn reset_position(&mut self, config: &GameConfig) {
        self.pos = Self::spawn_point(config);
        self.shoot_cooldown = 0;
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Advance one tick: move, then fire if allowed. Returns true if a shot was fired.
    pub fn update(
        &mut self,
        input: &TickInput,
        dt: f32,
        config: &GameConfig,
        bullets: &mut BulletManager,
    ) -> bool {
        if !self.active {
            return false;
        }

        let mut dir = Vec2::ZERO;
        if input.left {
            dir.x -= 1.0;
        }
        if input.right {
            dir.x += 1.0;
        }
        if input.up {
            dir.y -= 1.0;
        }
        if input.down {
            dir.y += 1.0;
        }

        let half = self.size / 2.0;
        let next = self.pos + dir * config.player_speed * dt;
        self.pos.x = clamp(next.x, half.x, config.canvas_width - half.x);
        self.pos.y = clamp(next.y, half.y, config.canvas_height - half.y);

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        if input.fire && self.shoot_cooldown == 0 {
            self.shoot_cooldown = config.player_shoot_cooldown_ticks;
            let muzzle = Vec2::new(self.pos.x, self.pos.y - half.y);
            bullets.spawn_player(muzzle, self.weapon, self.weapon_level, config);
            return true;
        }
        false
    }

    /// Apply `amount` damage, spending shield charges first.
    /// Returns true if this hit took the last point of health.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.is_alive() {
            return false;
        }
        for _ in 0..amount {
            if self.shield > 0 {
                self.shield -= 1;
            } else {
                self.health = self.health.saturating_sub(1);
            }
        }
        if self.health == 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Apply a collected prop. Returns score to credit.
    pub fn apply_prop(&mut self, kind: PropKind, score_value: u64) -> u64 {
        match kind {
            PropKind::Shield => {
                self.shield = (self.shield + 1).min(MAX_SHIELD);
                0
            }
            PropKind::Score => score_value,
            PropKind::Normal => self.pick_weapon(WeaponKind::Normal),
            PropKind::Spread => self.pick_weapon(WeaponKind::Spread),
            PropKind::Tracking => self.pick_weapon(WeaponKind::Tracking),
            PropKind::Laser => self.pick_weapon(WeaponKind::Laser),
        }
    }

    fn pick_weapon(&mut self, weapon: WeaponKind) -> u64 {
        if self.weapon == weapon {
            self.weapon_level = (self.weapon_level + 1).min(MAX_WEAPON_LEVEL);
        } else {
            self.weapon = weapon;
        }
        0
    }
}
