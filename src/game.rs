//! Loop controller
//!
//! Turns wall-clock frame callbacks into fixed simulation ticks. Each frame the
//! elapsed time is added to an accumulator which is drained in whole
//! [`SIM_DT`] steps, leaving the fractional remainder for the next frame. After
//! the ticks, raised events go to the audio sink and the renderer is invoked
//! exactly once.

use crate::audio::{AudioSink, sound_for};
use crate::config::ConfigFile;
use crate::consts::{MAX_FRAME_TIME, SIM_DT};
use crate::error::ConfigError;
use crate::settings::Settings;
use crate::sim::{GamePhase, GameState, ParticlePool, TickInput, tick};

/// Read-only consumer of the game state, called once per frame
pub trait Renderer {
    fn render(&mut self, state: &GameState);
}

/// Renderer that draws nothing
impl Renderer for () {
    fn render(&mut self, _state: &GameState) {}
}

/// Game instance: session state plus the services driving it
pub struct Game<A: AudioSink> {
    pub state: GameState,
    pub audio: A,
    settings: Settings,
    accumulator: f32,
    last_time_ms: Option<f64>,
    /// Input applied to every tick. One-shot commands are cleared after the
    /// first tick that sees them.
    pub input: TickInput,
}

impl<A: AudioSink> Game<A> {
    pub fn new(
        file: ConfigFile,
        settings: Settings,
        audio: A,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut state = GameState::new(file, seed)?;
        state.set_particle_pool(Self::particle_pool(&settings));
        Ok(Self {
            state,
            audio,
            settings,
            accumulator: 0.0,
            last_time_ms: None,
            input: TickInput::default(),
        })
    }

    fn particle_pool(settings: &Settings) -> ParticlePool {
        let mut pool = ParticlePool::with_capacity(settings.particle_capacity());
        pool.set_enabled(settings.particles);
        pool
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap settings. Particle changes take effect immediately, clearing live effects.
    pub fn apply_settings(&mut self, settings: Settings) {
        if settings.quality != self.settings.quality
            || settings.particles != self.settings.particles
        {
            self.state.set_particle_pool(Self::particle_pool(&settings));
        }
        self.settings = settings;
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Time carried over to the next frame (always below one step)
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Discard the carried time and the last timestamp (after the host was suspended)
    pub fn reset_clock(&mut self) {
        self.accumulator = 0.0;
        self.last_time_ms = None;
    }

    /// Start a fresh run with a new seed, keeping config and settings
    pub fn restart(&mut self, seed: u64) -> Result<(), ConfigError> {
        let file = ConfigFile {
            game: self.state.config.clone(),
            levels: self.state.levels.clone(),
        };
        let mut state = GameState::new(file, seed)?;
        state.set_particle_pool(Self::particle_pool(&self.settings));
        state.start_new_game();
        self.state = state;
        self.reset_clock();
        Ok(())
    }

    /// One animation frame at host time `now_ms`. Returns the number of ticks run.
    pub fn frame(&mut self, now_ms: f64, renderer: &mut impl Renderer) -> u32 {
        let dt = match self.last_time_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time_ms = Some(now_ms);

        let ticks = self.advance(dt);
        renderer.render(&self.state);
        ticks
    }

    /// Feed `dt` seconds of wall-clock time and run every whole tick it covers
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = if dt > MAX_FRAME_TIME {
            log::warn!("Frame delta {:.0}ms clamped", dt * 1000.0);
            MAX_FRAME_TIME
        } else {
            dt.max(0.0)
        };
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator >= SIM_DT {
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            ticks += 1;

            // Clear one-shot inputs after processing
            self.input.start = false;
            self.input.restart = false;
            self.input.advance = false;
            self.input.pause = false;
        }

        self.play_events();
        ticks
    }

    fn play_events(&mut self) {
        let volume = self.settings.effective_volume();
        for event in self.state.drain_events() {
            if volume > 0.0 {
                self.audio.play(sound_for(&event), volume);
            }
        }
    }
}
