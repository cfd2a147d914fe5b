//! Audio sink using Web Audio API
//!
//! Procedurally generated tones - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::audio::{AudioSink, SoundEffect};

/// One oscillator voice: a frequency sweep under an exponential decay
struct Voice {
    wave: OscillatorType,
    freq: f32,
    end_freq: f32,
    gain: f32,
    /// Start offset (s)
    delay: f64,
    /// Decay length (s)
    decay: f64,
}

impl Voice {
    fn new(wave: OscillatorType, freq: f32, end_freq: f32, gain: f32, decay: f64) -> Self {
        Self {
            wave,
            freq,
            end_freq,
            gain,
            delay: 0.0,
            decay,
        }
    }

    fn after(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }
}

fn voices(effect: SoundEffect) -> Vec<Voice> {
    use OscillatorType::{Sawtooth, Sine, Square, Triangle};
    match effect {
        SoundEffect::PlayerShot => vec![Voice::new(Square, 880.0, 440.0, 0.12, 0.06)],
        SoundEffect::EnemyShot => vec![Voice::new(Triangle, 330.0, 220.0, 0.1, 0.08)],
        SoundEffect::Explosion => vec![
            Voice::new(Sawtooth, 100.0, 30.0, 0.5, 0.4),
            Voice::new(Square, 1500.0, 1500.0, 0.2, 0.1),
        ],
        SoundEffect::BossExplosion => vec![
            Voice::new(Sawtooth, 80.0, 20.0, 0.6, 1.0),
            Voice::new(Sine, 60.0, 30.0, 0.5, 0.8),
            Voice::new(Square, 1200.0, 200.0, 0.2, 0.3).after(0.1),
        ],
        SoundEffect::PlayerHit => vec![Voice::new(Square, 220.0, 110.0, 0.3, 0.15)],
        SoundEffect::PlayerDestroyed => vec![
            Voice::new(Sawtooth, 300.0, 40.0, 0.5, 0.8),
            Voice::new(Sine, 80.0, 30.0, 0.4, 0.6),
        ],
        SoundEffect::Pickup => vec![
            Voice::new(Sine, 600.0, 600.0, 0.25, 0.1),
            Voice::new(Sine, 900.0, 900.0, 0.25, 0.15).after(0.06),
        ],
        SoundEffect::LevelComplete => [523.0, 659.0, 784.0]
            .iter()
            .enumerate()
            .map(|(i, &f)| Voice::new(Triangle, f, f, 0.3, 0.3).after(i as f64 * 0.12))
            .collect(),
        SoundEffect::GameOver => [392.0, 330.0, 262.0]
            .iter()
            .enumerate()
            .map(|(i, &f)| Voice::new(Sine, f, f, 0.35, 0.4).after(i as f64 * 0.25))
            .collect(),
        SoundEffect::Victory => [523.0, 659.0, 784.0, 1047.0]
            .iter()
            .enumerate()
            .map(|(i, &f)| Voice::new(Triangle, f, f, 0.35, 0.5).after(i as f64 * 0.15))
            .collect(),
    }
}

/// Web Audio output
pub struct WebAudio {
    ctx: Option<AudioContext>,
}

impl Default for WebAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudio {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        wave: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(wave);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_voice(ctx: &AudioContext, voice: &Voice, vol: f32) {
        let Some((osc, gain)) = Self::create_osc(ctx, voice.freq, voice.wave) else {
            return;
        };
        let t = ctx.current_time() + voice.delay;
        let end = t + voice.decay;

        gain.gain().set_value_at_time(vol * voice.gain, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();
        if voice.end_freq != voice.freq {
            osc.frequency().set_value_at_time(voice.freq, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(voice.end_freq, end)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(end + 0.05).ok();
    }
}

impl AudioSink for WebAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        for voice in voices(effect) {
            Self::play_voice(ctx, &voice, volume);
        }
    }
}
