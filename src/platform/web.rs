//! Browser host: `requestAnimationFrame` loop and the JS-facing game handle

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::web_audio::WebAudio;
use crate::config::ConfigFile;
use crate::game::{Game, Renderer};
use crate::settings::{QualityPreset, Settings};
use crate::sim::GameState;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

struct LoopInner {
    window: web_sys::Window,
    running: Cell<bool>,
    pending: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl LoopInner {
    fn schedule(&self) {
        if let Some(callback) = self.callback.borrow().as_ref() {
            let id = self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())
                .ok();
            self.pending.set(id);
        }
    }

    fn cancel(&self) {
        self.running.set(false);
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

/// A running `requestAnimationFrame` loop.
///
/// Stopping or dropping the loop cancels the pending frame, so no callback
/// fires after teardown. Must not be dropped from inside its own callback.
pub struct AnimationLoop {
    inner: Rc<LoopInner>,
}

impl AnimationLoop {
    /// Call `on_frame(timestamp_ms)` once per animation frame until stopped
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let inner = Rc::new(LoopInner {
            window,
            running: Cell::new(true),
            pending: Cell::new(None),
            callback: RefCell::new(None),
        });

        let weak: Weak<LoopInner> = Rc::downgrade(&inner);
        let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let Some(inner) = weak.upgrade() else { return };
            inner.pending.set(None);
            if !inner.running.get() {
                return;
            }
            on_frame(time);
            if inner.running.get() {
                inner.schedule();
            }
        });
        *inner.callback.borrow_mut() = Some(callback);
        inner.schedule();

        Ok(Self { inner })
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Cancel the pending frame; the loop does not resume
    pub fn stop(&self) {
        self.inner.cancel();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.inner.cancel();
        self.inner.callback.borrow_mut().take();
    }
}

/// Hands each frame's snapshot to a JS callback as a JSON string
struct JsRenderer {
    callback: js_sys::Function,
}

impl Renderer for JsRenderer {
    fn render(&mut self, state: &GameState) {
        match serde_json::to_string(&state.snapshot()) {
            Ok(json) => {
                if let Err(e) = self.callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    log::warn!("Render callback failed: {:?}", e);
                }
            }
            Err(e) => log::warn!("Snapshot serialization failed: {}", e),
        }
    }
}

struct Host {
    game: Game<WebAudio>,
    renderer: JsRenderer,
}

/// Game handle exported to JavaScript
#[wasm_bindgen]
pub struct WebGame {
    host: Rc<RefCell<Host>>,
    frame_loop: Option<AnimationLoop>,
}

#[wasm_bindgen]
impl WebGame {
    /// `config_json` may be empty for the built-in campaign.
    /// `quality` is "low", "medium" or "high".
    /// `render` receives each frame's snapshot JSON and must not call back into this handle.
    #[wasm_bindgen(constructor)]
    pub fn new(
        config_json: &str,
        quality: &str,
        seed: u32,
        render: js_sys::Function,
    ) -> Result<WebGame, JsValue> {
        let file = if config_json.trim().is_empty() {
            ConfigFile::default()
        } else {
            ConfigFile::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let preset = QualityPreset::parse(quality).unwrap_or_default();
        let game = Game::new(file, Settings::from_preset(preset), WebAudio::new(), u64::from(seed))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Game created with seed {} ({} quality)", seed, preset.as_str());

        Ok(WebGame {
            host: Rc::new(RefCell::new(Host {
                game,
                renderer: JsRenderer { callback: render },
            })),
            frame_loop: None,
        })
    }

    /// Start (or resume) the frame loop
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.frame_loop.as_ref().is_some_and(AnimationLoop::is_running) {
            return Ok(());
        }
        {
            let mut host = self.host.borrow_mut();
            host.game.reset_clock();
            host.game.audio.resume();
        }
        let host = self.host.clone();
        self.frame_loop = Some(AnimationLoop::start(move |time| {
            let mut host = host.borrow_mut();
            let Host { game, renderer } = &mut *host;
            game.frame(time, renderer);
        })?);
        Ok(())
    }

    /// Stop the frame loop and cancel the pending frame
    pub fn stop(&mut self) {
        if let Some(frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }
    }

    /// Held movement/fire keys
    pub fn set_keys(&self, up: bool, down: bool, left: bool, right: bool, fire: bool) {
        let mut host = self.host.borrow_mut();
        let input = &mut host.game.input;
        input.up = up;
        input.down = down;
        input.left = left;
        input.right = right;
        input.fire = fire;
    }

    pub fn press_start(&self) {
        let mut host = self.host.borrow_mut();
        host.game.audio.resume();
        host.game.input.start = true;
    }

    pub fn press_advance(&self) {
        self.host.borrow_mut().game.input.advance = true;
    }

    pub fn press_restart(&self) {
        self.host.borrow_mut().game.input.restart = true;
    }

    pub fn press_pause(&self) {
        self.host.borrow_mut().game.input.pause = true;
    }

    pub fn set_autopilot(&self, enabled: bool) {
        self.host.borrow_mut().game.input.autopilot = enabled;
        log::info!("Autopilot: {}", enabled);
    }

    pub fn set_muted(&self, muted: bool) {
        let mut host = self.host.borrow_mut();
        let settings = Settings {
            muted,
            ..host.game.settings().clone()
        };
        host.game.apply_settings(settings);
    }

    pub fn set_particles(&self, enabled: bool) {
        let mut host = self.host.borrow_mut();
        let settings = Settings {
            particles: enabled,
            ..host.game.settings().clone()
        };
        host.game.apply_settings(settings);
    }

    /// Current frame state as JSON (for hosts that poll instead of using the callback)
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.host.borrow().game.state.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
