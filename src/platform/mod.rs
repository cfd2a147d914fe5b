//! Platform abstraction layer
//!
//! Browser-only pieces live in `web` (wasm32): the animation-frame loop, the
//! Web Audio sink, and the JS-facing game handle. The native build drives
//! [`crate::Game`] directly from `main.rs`.

#[cfg(target_arch = "wasm32")]
pub mod web;
#[cfg(target_arch = "wasm32")]
pub mod web_audio;
