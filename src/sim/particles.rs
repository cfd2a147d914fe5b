//! Pooled visual-effect particles
//!
//! The pool is a growable arena of [`Particle`] records addressed by index.
//! Records are recycled through their `active` bit and never freed; when every
//! record is busy the arena grows by one instead of refusing the request.
//! Particles are purely cosmetic and never feed back into gameplay.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

/// Visual-effect preset requested by gameplay code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EffectKind {
    /// Enemy or player destroyed
    Explosion,
    /// Bullet impact that did not kill
    HitSpark,
    /// Power-up collected
    PickupBurst,
    /// Exhaust under the player craft (stays in place)
    EngineGlow,
}

/// Tuning for one effect kind. Speeds are in pixels per 16 ms frame.
#[derive(Debug, Clone, Copy)]
pub struct EffectPreset {
    pub count: usize,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Lifetime before fading starts (ms); fading takes the same again
    pub duration_ms: f32,
    pub palette: &'static [u32],
    pub physics: bool,
}

const EXPLOSION_PALETTE: &[u32] = &[0xFF6A00, 0xFFC400, 0xFF2D2D, 0xFFFFFF];
const SPARK_PALETTE: &[u32] = &[0xFFFFFF, 0x7FDBFF];
const PICKUP_PALETTE: &[u32] = &[0x2ECC40, 0xFFDC00, 0x39CCCC];
const ENGINE_PALETTE: &[u32] = &[0x00BFFF, 0x7FDBFF, 0xFFFFFF];

impl EffectKind {
    pub fn preset(self) -> EffectPreset {
        match self {
            EffectKind::Explosion => EffectPreset {
                count: 18,
                min_speed: 1.0,
                max_speed: 4.0,
                min_size: 2.0,
                max_size: 6.0,
                duration_ms: 400.0,
                palette: EXPLOSION_PALETTE,
                physics: true,
            },
            EffectKind::HitSpark => EffectPreset {
                count: 6,
                min_speed: 1.5,
                max_speed: 3.5,
                min_size: 1.0,
                max_size: 3.0,
                duration_ms: 150.0,
                palette: SPARK_PALETTE,
                physics: true,
            },
            EffectKind::PickupBurst => EffectPreset {
                count: 12,
                min_speed: 0.5,
                max_speed: 2.5,
                min_size: 2.0,
                max_size: 4.0,
                duration_ms: 300.0,
                palette: PICKUP_PALETTE,
                physics: true,
            },
            EffectKind::EngineGlow => EffectPreset {
                count: 1,
                min_speed: 0.0,
                max_speed: 0.0,
                min_size: 3.0,
                max_size: 6.0,
                duration_ms: 120.0,
                palette: ENGINE_PALETTE,
                physics: false,
            },
        }
    }
}

/// A particle record owned by the pool
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per 16 ms
    pub vel: Vec2,
    pub size: f32,
    pub alpha: f32,
    pub color: u32,
    /// Remaining life (ms); fading begins once this reaches zero
    pub life: f32,
    pub max_life: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub physics: bool,
    pub active: bool,
}

impl Particle {
    fn dead() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 0.0,
            alpha: 0.0,
            color: 0,
            life: 0.0,
            max_life: 0.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            physics: false,
            active: false,
        }
    }
}

/// Index of a record inside a [`ParticlePool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleHandle(usize);

impl ParticleHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Growable arena of reusable particle records
#[derive(Debug, Clone)]
pub struct ParticlePool {
    records: Vec<Particle>,
    /// Handles that were active after the last `tick`
    active_view: Vec<ParticleHandle>,
    enabled: bool,
}

impl Default for ParticlePool {
    fn default() -> Self {
        Self::with_capacity(crate::settings::QualityPreset::default().max_particles())
    }
}

impl ParticlePool {
    /// Pre-fill the pool with `capacity` dead records. Capacity is a soft target.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: (0..capacity).map(|_| Particle::dead()).collect(),
            active_view: Vec::with_capacity(capacity),
            enabled: true,
        }
    }

    /// Disabled pools ignore `emit` (settings toggle)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Total records ever allocated (only grows)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reserve the first free record, growing the arena if none is free.
    ///
    /// The returned record is marked active so a second `acquire` before
    /// `release` can never hand out the same slot.
    pub fn acquire(&mut self) -> ParticleHandle {
        let index = match self.records.iter().position(|p| !p.active) {
            Some(i) => i,
            None => {
                self.records.push(Particle::dead());
                log::debug!("Particle pool grew to {}", self.records.len());
                self.records.len() - 1
            }
        };
        self.records[index].active = true;
        ParticleHandle(index)
    }

    /// Return a record to the free set. Storage is kept for reuse.
    pub fn release(&mut self, handle: ParticleHandle) {
        if let Some(p) = self.records.get_mut(handle.0) {
            p.active = false;
            p.life = 0.0;
            p.alpha = 0.0;
        }
    }

    /// Fill a record for `kind` at (x, y) and mark it active
    pub fn initialize(
        &mut self,
        handle: ParticleHandle,
        x: f32,
        y: f32,
        kind: EffectKind,
        rng: &mut impl Rng,
    ) {
        let preset = kind.preset();
        let Some(p) = self.records.get_mut(handle.0) else {
            return;
        };

        p.pos = Vec2::new(x, y);
        p.vel = if preset.physics {
            let angle = rng.random_range(0.0..TAU);
            let speed = random_f32(rng, preset.min_speed, preset.max_speed);
            Vec2::new(angle.cos(), angle.sin()) * speed
        } else {
            Vec2::ZERO
        };
        p.size = random_f32(rng, preset.min_size, preset.max_size);
        p.rotation = rng.random_range(0.0..TAU);
        p.rotation_speed = random_f32(rng, -0.2, 0.2);
        p.color = preset.palette[rng.random_range(0..preset.palette.len())];
        p.alpha = 1.0;
        p.life = preset.duration_ms;
        p.max_life = preset.duration_ms;
        p.physics = preset.physics;
        p.active = true;
    }

    /// Spawn a full burst of `kind` at `pos`. Returns the number of particles emitted.
    pub fn emit(&mut self, kind: EffectKind, pos: Vec2, rng: &mut impl Rng) -> usize {
        if !self.enabled {
            return 0;
        }
        let count = kind.preset().count;
        for _ in 0..count {
            let handle = self.acquire();
            self.initialize(handle, pos.x, pos.y, kind, rng);
        }
        count
    }

    /// Age, fade, and move every active particle (`dt_ms` in milliseconds)
    pub fn tick(&mut self, dt_ms: f32) {
        let frame_scale = dt_ms / 16.0;

        for i in 0..self.records.len() {
            let p = &mut self.records[i];
            if !p.active {
                continue;
            }
            p.life -= dt_ms;
            if p.life <= 0.0 && p.max_life > 0.0 {
                p.alpha -= dt_ms / p.max_life;
            }
            if p.physics {
                p.pos += p.vel * frame_scale;
            }
            p.rotation += p.rotation_speed * frame_scale;

            if p.alpha <= 0.0 {
                self.release(ParticleHandle(i));
            }
        }

        self.active_view.clear();
        self.active_view.extend(
            self.records
                .iter()
                .enumerate()
                .filter(|(_, p)| p.active)
                .map(|(i, _)| ParticleHandle(i)),
        );
    }

    /// Deactivate everything without shrinking
    pub fn clear(&mut self) {
        for p in &mut self.records {
            p.active = false;
            p.alpha = 0.0;
        }
        self.active_view.clear();
    }

    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.records.get(handle.0)
    }

    /// Handles active as of the last `tick`
    pub fn active_handles(&self) -> &[ParticleHandle] {
        &self.active_view
    }

    /// Every currently active record
    pub fn active(&self) -> impl Iterator<Item = &Particle> {
        self.records.iter().filter(|p| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.records.iter().filter(|p| p.active).count()
    }
}

fn random_f32(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_acquire_never_aliases_active_records() {
        let mut pool = ParticlePool::with_capacity(4);
        let handles: Vec<_> = (0..10).map(|_| pool.acquire()).collect();

        let mut indices: Vec<_> = handles.iter().map(|h| h.index()).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), 10);
        // Grew past the soft capacity instead of failing
        assert_eq!(pool.len(), 10);
    }

    #[test]
    fn test_released_record_is_reused() {
        let mut pool = ParticlePool::with_capacity(2);
        let a = pool.acquire();
        let _b = pool.acquire();
        pool.release(a);

        let c = pool.acquire();
        assert_eq!(c, a);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_initialize_sets_preset_ranges() {
        let mut pool = ParticlePool::with_capacity(1);
        let mut rng = rng();
        let h = pool.acquire();
        pool.initialize(h, 10.0, 20.0, EffectKind::Explosion, &mut rng);

        let p = pool.get(h).unwrap();
        let preset = EffectKind::Explosion.preset();
        assert!(p.active);
        assert_eq!(p.pos, Vec2::new(10.0, 20.0));
        assert_eq!(p.alpha, 1.0);
        assert_eq!(p.life, preset.duration_ms);
        assert!(p.size >= preset.min_size && p.size <= preset.max_size);
        let speed = p.vel.length();
        assert!(speed >= preset.min_speed - 1e-4 && speed <= preset.max_speed + 1e-4);
        assert!(preset.palette.contains(&p.color));
    }

    #[test]
    fn test_engine_glow_has_no_velocity() {
        let mut pool = ParticlePool::with_capacity(1);
        let h = pool.acquire();
        pool.initialize(h, 5.0, 5.0, EffectKind::EngineGlow, &mut rng());
        assert_eq!(pool.get(h).unwrap().vel, Vec2::ZERO);

        pool.tick(16.0);
        assert_eq!(pool.get(h).unwrap().pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_particle_fades_then_retires() {
        let mut pool = ParticlePool::with_capacity(1);
        let h = pool.acquire();
        pool.initialize(h, 0.0, 0.0, EffectKind::HitSpark, &mut rng());
        let duration = EffectKind::HitSpark.preset().duration_ms;

        // Still fully opaque while life remains
        pool.tick(duration / 2.0);
        assert_eq!(pool.get(h).unwrap().alpha, 1.0);
        assert_eq!(pool.active_handles(), &[h]);

        // Life expires, fade starts
        pool.tick(duration * 0.75);
        let alpha = pool.get(h).unwrap().alpha;
        assert!(alpha < 1.0 && alpha > 0.0);

        pool.tick(duration);
        let p = pool.get(h).unwrap();
        assert!(!p.active);
        assert_eq!(p.alpha, 0.0);
        assert_eq!(p.life, 0.0);
        assert!(pool.active_handles().is_empty());
        assert_eq!(pool.len(), 1);

        // The expired record is back in the free set
        assert_eq!(pool.acquire(), h);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_emit_and_disable() {
        let mut pool = ParticlePool::with_capacity(8);
        let mut rng = rng();
        let n = pool.emit(EffectKind::Explosion, Vec2::ZERO, &mut rng);
        assert_eq!(n, EffectKind::Explosion.preset().count);
        assert_eq!(pool.active_count(), n);

        pool.set_enabled(false);
        assert_eq!(pool.emit(EffectKind::Explosion, Vec2::ZERO, &mut rng), 0);
    }

    #[test]
    fn test_pool_never_shrinks() {
        let mut pool = ParticlePool::with_capacity(0);
        let mut rng = rng();
        pool.emit(EffectKind::Explosion, Vec2::ZERO, &mut rng);
        let grown = pool.len();
        pool.clear();
        for _ in 0..100 {
            pool.tick(16.0);
        }
        assert_eq!(pool.len(), grown);
        assert_eq!(pool.active_count(), 0);
    }
}
