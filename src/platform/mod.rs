//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Sprite frame loading (filesystem or `fetch`)
//! - Keyboard mapping into scene input
//! - The DOM text overlay (web only)

pub mod assets;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod overlay;
