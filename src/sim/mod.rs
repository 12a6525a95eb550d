//! Scene simulation module
//!
//! All per-frame logic lives here. This module is pure:
//! - No rendering, audio or platform dependencies
//! - Time comes in through `TickInput::now_ms`
//! - Every state change happens inside `tick` or `handle_event`

pub mod anim;
pub mod character;
pub mod dialog;
pub mod state;
pub mod tick;

pub use anim::AnimationCycle;
pub use character::Character;
pub use dialog::{DialogPhase, DialogSession};
pub use state::{AudioLatch, FrameSize, SceneEvent, SceneState, SpriteInfo};
pub use tick::{InputEvent, Key, TickInput, handle_event, tick};
