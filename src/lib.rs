//! Pixel Greeter - two sprite characters and a name prompt
//!
//! Core modules:
//! - `sim`: Per-frame scene logic (physics, animation timing, dialog)
//! - `renderer`: Draw list construction and the WebGPU backend
//! - `platform`: Asset loading and browser glue
//! - `settings`: Tunable constants with serde support

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Scene defaults, taken over by `Settings::default()`
pub mod consts {
    /// Primary character idle cycle
    pub const PRIMARY_FRAME_COUNT: u32 = 35;
    pub const PRIMARY_FRAME_INTERVAL_MS: f64 = 100.0;
    /// Secondary character idle cycle
    pub const SECONDARY_FRAME_COUNT: u32 = 16;
    pub const SECONDARY_FRAME_INTERVAL_MS: f64 = 120.0;

    /// Primary sprite frames are drawn at this integer scale
    pub const PRIMARY_SCALE: f32 = 4.0;
    /// Display size used when no primary frame could be loaded
    pub const FALLBACK_DISPLAY_SIZE: f32 = 200.0;
    /// Secondary height relative to the primary display height
    pub const SECONDARY_HEIGHT_RATIO: f32 = 0.8;
    /// Secondary width:height when no secondary frame is available
    pub const SECONDARY_FALLBACK_ASPECT: f32 = 21.0 / 30.0;

    /// Gap between the primary sprite bottom and the canvas bottom
    pub const GROUND_MARGIN: f32 = 20.0;
    /// Horizontal gap between the two characters at startup
    pub const START_GAP: f32 = 40.0;
    /// Extra distance added to the half widths for the proximity check
    pub const PROXIMITY_MARGIN: f32 = 40.0;

    /// Physics, in pixels per tick
    pub const PRIMARY_SPEED: f32 = 6.0;
    pub const PRIMARY_GRAVITY: f32 = 0.8;
    pub const PRIMARY_JUMP: f32 = -15.0;
    pub const SECONDARY_SPEED: f32 = 4.0;
    pub const SECONDARY_GRAVITY: f32 = 0.8;
    pub const SECONDARY_JUMP: f32 = -12.0;

    /// Dialog texts
    pub const PROMPT_TEXT: &str = "請問你叫甚麼名字";
    pub const WELCOME_SUFFIX: &str = "歡迎你";
    pub const AUDIO_HINT_TEXT: &str = "點擊或按任意鍵以播放音效";
    pub const MISSING_FRAMES_TEXT: &str =
        "找不到動畫幀：請確認 `1/` 資料夾內有 all0001..all0035.png";
}

/// Sanitize a display dimension: non-finite or negative values become zero
#[inline]
pub fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}
