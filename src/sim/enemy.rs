//! Enemy roster, spawning, movement, and fire scheduling

use glam::Vec2;
use rand::Rng;
use rand::distr::weighted::WeightedIndex;
use serde::Serialize;

use super::geom::{Rect, random_int};
use crate::config::GameConfig;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnemyKind {
    Scout,
    Fighter,
    Interceptor,
    Bomber,
    Gunship,
    Tank,
    Boss,
}

impl EnemyKind {
    /// Square hitbox edge (px)
    pub fn size(self) -> f32 {
        match self {
            EnemyKind::Scout => 28.0,
            EnemyKind::Fighter => 34.0,
            EnemyKind::Interceptor => 30.0,
            EnemyKind::Bomber => 42.0,
            EnemyKind::Gunship => 48.0,
            EnemyKind::Tank => 56.0,
            EnemyKind::Boss => 120.0,
        }
    }

    pub fn health(self) -> u32 {
        match self {
            EnemyKind::Scout => 1,
            EnemyKind::Fighter | EnemyKind::Interceptor => 2,
            EnemyKind::Bomber => 4,
            EnemyKind::Gunship => 6,
            EnemyKind::Tank => 10,
            EnemyKind::Boss => 80,
        }
    }

    /// Speed before the level multiplier (px/s)
    pub fn base_speed(self) -> f32 {
        match self {
            EnemyKind::Scout => 140.0,
            EnemyKind::Fighter => 110.0,
            EnemyKind::Interceptor => 190.0,
            EnemyKind::Bomber => 85.0,
            EnemyKind::Gunship => 75.0,
            EnemyKind::Tank => 55.0,
            EnemyKind::Boss => 40.0,
        }
    }

    pub fn score(self) -> u64 {
        match self {
            EnemyKind::Scout => 10,
            EnemyKind::Fighter => 20,
            EnemyKind::Interceptor => 30,
            EnemyKind::Bomber => 40,
            EnemyKind::Gunship => 60,
            EnemyKind::Tank => 100,
            EnemyKind::Boss => 1000,
        }
    }

    /// Bullets per volley
    pub fn volley(self) -> usize {
        match self {
            EnemyKind::Boss => 3,
            _ => 1,
        }
    }
}

/// Spawn weights (percent) per level. Levels past the table use the last row.
/// The boss never appears here; boss levels force it explicitly.
const SPAWN_TABLE: [&[(EnemyKind, u32)]; 5] = [
    &[(EnemyKind::Scout, 70), (EnemyKind::Fighter, 30)],
    &[
        (EnemyKind::Scout, 50),
        (EnemyKind::Fighter, 35),
        (EnemyKind::Interceptor, 15),
    ],
    &[
        (EnemyKind::Scout, 35),
        (EnemyKind::Fighter, 30),
        (EnemyKind::Interceptor, 20),
        (EnemyKind::Bomber, 15),
    ],
    &[
        (EnemyKind::Scout, 25),
        (EnemyKind::Fighter, 25),
        (EnemyKind::Interceptor, 20),
        (EnemyKind::Bomber, 20),
        (EnemyKind::Gunship, 10),
    ],
    &[
        (EnemyKind::Scout, 20),
        (EnemyKind::Fighter, 20),
        (EnemyKind::Interceptor, 20),
        (EnemyKind::Bomber, 15),
        (EnemyKind::Gunship, 15),
        (EnemyKind::Tank, 10),
    ],
];

/// Spawn weights for a 1-based level number
pub fn spawn_weights(level: usize) -> &'static [(EnemyKind, u32)] {
    let idx = level.saturating_sub(1).min(SPAWN_TABLE.len() - 1);
    SPAWN_TABLE[idx]
}

/// Weighted random enemy type for a 1-based level number
pub fn pick_kind(level: usize, rng: &mut impl Rng) -> EnemyKind {
    let weights = spawn_weights(level);
    match WeightedIndex::new(weights.iter().map(|&(_, w)| w)) {
        Ok(dist) => weights[rng.sample(&dist)].0,
        Err(e) => {
            log::warn!("Bad spawn weights for level {}: {}", level, e);
            EnemyKind::Scout
        }
    }
}

/// A request to fire, produced by an enemy's cooldown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyShot {
    pub muzzle: Vec2,
    pub count: usize,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub active: bool,
    pub kind: EnemyKind,
    pub health: u32,
    pub max_health: u32,
    /// Base speed times level multiplier (px/s)
    pub speed: f32,
    pub score: u64,
    /// Ticks since the last shot
    pub shoot_timer: u32,
    /// Fixed for the enemy's lifetime
    pub shoot_interval: u32,
    /// Horizontal direction while strafing (boss only)
    pub strafe_dir: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, speed_multiplier: f32, shoot_interval: u32) -> Self {
        Self {
            pos,
            size: Vec2::splat(kind.size()),
            active: true,
            kind,
            health: kind.health(),
            max_health: kind.health(),
            speed: kind.base_speed() * speed_multiplier,
            score: kind.score(),
            shoot_timer: 0,
            shoot_interval: shoot_interval.max(1),
            strafe_dir: 1.0,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    /// Subtract damage. Returns true if this hit was lethal.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.active {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.active = false;
            return true;
        }
        false
    }

    fn advance(&mut self, dt: f32, config: &GameConfig) {
        if self.kind == EnemyKind::Boss && self.pos.y >= config.boss_hover_y {
            let half = self.size.x / 2.0;
            let lo = config.field_margin + half;
            let hi = config.canvas_width - config.field_margin - half;
            self.pos.x += self.strafe_dir * self.speed * 2.0 * dt;
            if self.pos.x <= lo {
                self.pos.x = lo;
                self.strafe_dir = 1.0;
            } else if self.pos.x >= hi {
                self.pos.x = hi;
                self.strafe_dir = -1.0;
            }
        } else {
            self.pos.y += self.speed * dt;
        }
    }

    /// Count one tick of fire cooldown; fires on the tick the interval is reached
    fn tick_cooldown(&mut self) -> Option<EnemyShot> {
        self.shoot_timer += 1;
        if self.shoot_timer < self.shoot_interval {
            return None;
        }
        self.shoot_timer = 0;
        // Hold fire until on screen
        if self.pos.y < 0.0 {
            return None;
        }
        Some(EnemyShot {
            muzzle: Vec2::new(self.pos.x, self.pos.y + self.size.y / 2.0),
            count: self.kind.volley(),
        })
    }
}

/// Owns every enemy in the level
#[derive(Debug, Clone, Default, Serialize)]
pub struct EnemyManager {
    enemies: Vec<Enemy>,
}

impl EnemyManager {
    /// Spawn one enemy above the visible area.
    ///
    /// `level` is 1-based. When `force_boss` is set the boss is spawned
    /// regardless of the level's weights.
    pub fn spawn(
        &mut self,
        level: usize,
        speed_multiplier: f32,
        force_boss: bool,
        config: &GameConfig,
        rng: &mut impl Rng,
    ) -> EnemyKind {
        let kind = if force_boss {
            EnemyKind::Boss
        } else {
            pick_kind(level, rng)
        };

        let half = kind.size() / 2.0;
        let lo = (config.field_margin + half) as i32;
        let hi = (config.canvas_width - config.field_margin - half) as i32;
        let x = random_int(rng, lo, hi) as f32;

        let interval = if kind == EnemyKind::Boss {
            config.boss_shoot_interval_ticks
        } else {
            random_int(
                rng,
                config.enemy_shoot_min_ticks as i32,
                config.enemy_shoot_max_ticks as i32,
            ) as u32
        };

        let enemy = Enemy::new(kind, Vec2::new(x, -half), speed_multiplier, interval);
        log::debug!("Spawned {:?} at x={} (fire every {} ticks)", kind, x, interval);
        self.enemies.push(enemy);
        kind
    }

    /// Drop dead enemies, move the rest, and collect shots fired this tick
    pub fn update(&mut self, dt: f32, config: &GameConfig, shots: &mut Vec<EnemyShot>) {
        self.enemies.retain(|e| e.active);

        for enemy in &mut self.enemies {
            enemy.advance(dt, config);

            if let Some(shot) = enemy.tick_cooldown() {
                shots.push(shot);
            }

            if enemy.rect().y > config.canvas_height {
                enemy.active = false;
            }
        }
    }

    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    pub fn push(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut()
    }

    pub fn active(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn as_slice(&self) -> &[Enemy] {
        &self.enemies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_weights_sum_to_100() {
        for level in 1..=7 {
            let total: u32 = spawn_weights(level).iter().map(|(_, w)| w).sum();
            assert_eq!(total, 100, "level {level}");
            assert!(spawn_weights(level).iter().all(|(k, _)| *k != EnemyKind::Boss));
        }
    }

    #[test]
    fn test_pick_kind_respects_level_bands() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..500 {
            let k = pick_kind(1, &mut rng);
            assert!(matches!(k, EnemyKind::Scout | EnemyKind::Fighter));
        }
        let mut saw_tank = false;
        for _ in 0..2000 {
            saw_tank |= pick_kind(9, &mut rng) == EnemyKind::Tank;
        }
        assert!(saw_tank);
    }

    #[test]
    fn test_spawn_position_and_speed() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut m = EnemyManager::default();
        for _ in 0..100 {
            m.spawn(3, 1.5, false, &config, &mut rng);
        }
        for e in m.as_slice() {
            let half = e.size.x / 2.0;
            assert!(e.pos.x >= config.field_margin + half - 1.0);
            assert!(e.pos.x <= config.canvas_width - config.field_margin - half);
            assert!(e.rect().bottom() <= 0.0);
            assert!((e.speed - e.kind.base_speed() * 1.5).abs() < 1e-4);
            assert!(e.shoot_interval >= config.enemy_shoot_min_ticks);
            assert!(e.shoot_interval <= config.enemy_shoot_max_ticks);
        }
    }

    #[test]
    fn test_forced_boss() {
        let config = GameConfig::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut m = EnemyManager::default();
        assert_eq!(m.spawn(1, 1.0, true, &config, &mut rng), EnemyKind::Boss);
        assert_eq!(m.as_slice()[0].shoot_interval, config.boss_shoot_interval_ticks);
    }

    #[test]
    fn test_shoot_interval_reused_each_cycle() {
        let config = GameConfig::default();
        let mut m = EnemyManager::default();
        let mut e = Enemy::new(EnemyKind::Scout, Vec2::new(100.0, 50.0), 0.0, 30);
        e.speed = 0.0;
        m.push(e);

        let mut fired_at = Vec::new();
        let mut shots = Vec::new();
        for t in 1..=90 {
            m.update(SIM_DT, &config, &mut shots);
            if !shots.is_empty() {
                fired_at.push(t);
                shots.clear();
            }
        }
        assert_eq!(fired_at, vec![30, 60, 90]);
        assert_eq!(m.as_slice()[0].shoot_interval, 30);
    }

    #[test]
    fn test_offscreen_enemy_holds_fire() {
        let config = GameConfig::default();
        let mut m = EnemyManager::default();
        let mut e = Enemy::new(EnemyKind::Scout, Vec2::new(100.0, -200.0), 0.0, 1);
        e.speed = 0.0;
        m.push(e);
        let mut shots = Vec::new();
        m.update(SIM_DT, &config, &mut shots);
        assert!(shots.is_empty());
    }

    #[test]
    fn test_enemy_culled_below_field() {
        let config = GameConfig::default();
        let mut m = EnemyManager::default();
        m.push(Enemy::new(
            EnemyKind::Scout,
            Vec2::new(100.0, config.canvas_height + 13.0),
            1.0,
            100,
        ));
        let mut shots = Vec::new();
        m.update(SIM_DT, &config, &mut shots);
        assert_eq!(m.active_count(), 0);
        m.update(SIM_DT, &config, &mut shots);
        assert!(m.as_slice().is_empty());
    }

    #[test]
    fn test_boss_hovers_and_strafes() {
        let config = GameConfig::default();
        let mut m = EnemyManager::default();
        m.push(Enemy::new(
            EnemyKind::Boss,
            Vec2::new(240.0, config.boss_hover_y),
            1.0,
            1000,
        ));
        let mut shots = Vec::new();
        for _ in 0..600 {
            m.update(SIM_DT, &config, &mut shots);
        }
        let boss = &m.as_slice()[0];
        assert!(boss.active);
        assert_eq!(boss.pos.y, config.boss_hover_y);
        let half = boss.size.x / 2.0;
        assert!(boss.pos.x >= config.field_margin + half);
        assert!(boss.pos.x <= config.canvas_width - config.field_margin - half);
    }

    #[test]
    fn test_lethal_damage() {
        let mut e = Enemy::new(EnemyKind::Fighter, Vec2::ZERO, 1.0, 100);
        assert!(!e.take_damage(1));
        assert!(e.take_damage(5));
        assert_eq!(e.health, 0);
        assert!(!e.active);
        assert!(!e.take_damage(1));
    }
}
