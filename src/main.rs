//! Astro Blaster entry point
//!
//! The browser build is driven from JavaScript through `platform::web::WebGame`.
//! Natively this runs a headless autopilot session for smoke testing:
//!
//! ```text
//! RUST_LOG=info astro-blaster [config.json] [seed]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use astro_blaster::audio::LogAudio;
    use astro_blaster::config::ConfigFile;
    use astro_blaster::sim::{GamePhase, GameState};
    use astro_blaster::{ConfigError, Game, Renderer, Settings};

    /// Simulated display refresh (ms)
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Logs phase and level changes instead of drawing
    #[derive(Default)]
    struct LogRenderer {
        last: Option<(GamePhase, usize)>,
        frames: u32,
    }

    impl Renderer for LogRenderer {
        fn render(&mut self, state: &GameState) {
            self.frames += 1;
            let now = (state.phase, state.level_number());
            if self.last != Some(now) {
                log::info!(
                    "[frame {}] {:?} level {} score {} health {} shield {}",
                    self.frames,
                    state.phase,
                    state.level_number(),
                    state.score,
                    state.player.health,
                    state.player.shield
                );
                self.last = Some(now);
            }
        }
    }

    pub fn run() -> Result<(), ConfigError> {
        let mut args = std::env::args().skip(1);
        let file = match args.next() {
            Some(path) => ConfigFile::load(&path)?,
            None => ConfigFile::default(),
        };
        let seed = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0x5EED);

        let mut game = Game::new(file, Settings::default(), LogAudio::default(), seed)?;
        game.input.autopilot = true;
        let mut renderer = LogRenderer::default();

        let mut now = 0.0;
        let mut ticks = 0u64;
        for _ in 0..MAX_FRAMES {
            ticks += u64::from(game.frame(now, &mut renderer));
            now += FRAME_MS;
            if game.phase() == GamePhase::GameOver {
                break;
            }
        }

        let state = &game.state;
        log::info!(
            "Finished: {:?} victory={} level {} score {} after {} ticks ({} sounds)",
            state.phase,
            state.victory,
            state.level_number(),
            state.score,
            ticks,
            game.audio.played
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Astro Blaster (native headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::init, this is just to satisfy the compiler
}
