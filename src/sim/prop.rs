//! Falling power-ups dropped by destroyed enemies

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::geom::Rect;
use crate::config::GameConfig;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropKind {
    /// One shield charge
    Shield,
    /// Normal gun (shown as the "speed" pickup)
    Normal,
    Spread,
    Tracking,
    Laser,
    /// Flat score bonus
    Score,
}

impl PropKind {
    pub const ALL: [PropKind; 6] = [
        PropKind::Shield,
        PropKind::Normal,
        PropKind::Spread,
        PropKind::Tracking,
        PropKind::Laser,
        PropKind::Score,
    ];

    /// Uniformly random kind
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Square edge of every prop (px)
pub const PROP_SIZE: f32 = 24.0;

/// A falling power-up
#[derive(Debug, Clone, Serialize)]
pub struct Prop {
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PropKind,
    pub active: bool,
}

impl Prop {
    pub fn new(kind: PropKind, pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(PROP_SIZE),
            kind,
            active: true,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }
}

/// Owns every prop on the field
#[derive(Debug, Clone, Default, Serialize)]
pub struct PropManager {
    props: Vec<Prop>,
}

impl PropManager {
    pub fn spawn(&mut self, kind: PropKind, pos: Vec2) {
        log::debug!("Prop {:?} dropped at ({:.0}, {:.0})", kind, pos.x, pos.y);
        self.props.push(Prop::new(kind, pos));
    }

    /// Roll the drop chance for a destroyed enemy at `pos`.
    /// Returns the kind spawned, if any.
    pub fn roll_drop(&mut self, pos: Vec2, chance: f64, rng: &mut impl Rng) -> Option<PropKind> {
        if !rng.random_bool(chance.clamp(0.0, 1.0)) {
            return None;
        }
        let kind = PropKind::random(rng);
        self.spawn(kind, pos);
        Some(kind)
    }

    /// Drop dead props, let the rest fall, cull the ones below the field
    pub fn update(&mut self, dt: f32, config: &GameConfig) {
        self.props.retain(|p| p.active);

        for prop in &mut self.props {
            prop.pos.y += config.prop_fall_speed * dt;
            if prop.rect().y > config.canvas_height {
                prop.active = false;
            }
        }
    }

    pub fn clear(&mut self) {
        self.props.clear();
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Prop> {
        self.props.iter_mut()
    }

    pub fn active(&self) -> impl Iterator<Item = &Prop> {
        self.props.iter().filter(|p| p.active)
    }

    pub fn as_slice(&self) -> &[Prop] {
        &self.props
    }
}
