//! Sound effect vocabulary and the sink the loop controller plays into
//!
//! The simulation never touches audio. It raises [`GameEvent`]s, the loop
//! controller maps them with [`sound_for`] and hands the result to whatever
//! [`AudioSink`] the host installed (Web Audio in the browser, a log line in
//! the native runner, nothing at all in tests).

use crate::sim::{EnemyKind, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player gun fired
    PlayerShot,
    /// Enemy gun fired
    EnemyShot,
    /// Regular enemy destroyed
    Explosion,
    /// Boss destroyed
    BossExplosion,
    /// Player took damage
    PlayerHit,
    /// Player destroyed
    PlayerDestroyed,
    /// Prop collected
    Pickup,
    /// Level cleared
    LevelComplete,
    /// Run lost
    GameOver,
    /// Final level cleared
    Victory,
}

/// Map a simulation event to the sound it should make
pub fn sound_for(event: &GameEvent) -> SoundEffect {
    match event {
        GameEvent::PlayerFired => SoundEffect::PlayerShot,
        GameEvent::EnemyFired => SoundEffect::EnemyShot,
        GameEvent::EnemyDestroyed {
            kind: EnemyKind::Boss,
            ..
        } => SoundEffect::BossExplosion,
        GameEvent::EnemyDestroyed { .. } => SoundEffect::Explosion,
        GameEvent::PlayerHit => SoundEffect::PlayerHit,
        GameEvent::PlayerDestroyed => SoundEffect::PlayerDestroyed,
        GameEvent::PropCollected(_) => SoundEffect::Pickup,
        GameEvent::LevelComplete { .. } => SoundEffect::LevelComplete,
        GameEvent::GameOver { victory: true } => SoundEffect::Victory,
        GameEvent::GameOver { victory: false } => SoundEffect::GameOver,
    }
}

/// Something that can play sound effects
pub trait AudioSink {
    /// Play `effect` at `volume` (0.0 - 1.0, already mixed)
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Discards every sound
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Logs sounds at trace level and counts them (headless runs)
#[derive(Debug, Default, Clone)]
pub struct LogAudio {
    pub played: usize,
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.played += 1;
        log::trace!("sfx {:?} @ {:.2}", effect, volume);
    }
}

/// Records every sound played, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub effects: Vec<(SoundEffect, f32)>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.effects.push((effect, volume));
    }
}
