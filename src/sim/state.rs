//! Scene state and core simulation types
//!
//! Everything the frame loop mutates lives in `SceneState`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::AnimationCycle;
use super::character::Character;
use super::dialog::{DialogPhase, DialogSession};
use crate::sanitize_extent;
use crate::settings::Settings;

/// Pixel size of a loaded sprite frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

/// What the asset provider delivered for one sprite
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpriteInfo {
    /// Number of frames loaded
    pub frame_count: usize,
    /// Size of the first frame; all frames of a cycle share it
    pub frame_size: Option<FrameSize>,
}

impl SpriteInfo {
    pub fn new(frame_count: usize, frame_size: Option<FrameSize>) -> Self {
        Self {
            frame_count,
            frame_size,
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

/// One-shot "enable audio" latch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AudioLatch {
    /// A clip is configured and could be created
    pub available: bool,
    /// Playback was started (never reverts)
    pub started: bool,
}

impl AudioLatch {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            started: false,
        }
    }

    /// Returns true exactly once, on the first call with a clip available
    pub fn unlock(&mut self) -> bool {
        if !self.available || self.started {
            return false;
        }
        self.started = true;
        true
    }

    /// Whether to show the "click to enable audio" hint
    pub fn hint_visible(&self) -> bool {
        self.available && !self.started
    }
}

/// Notifications for the platform layer, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// First user gesture: start the audio clip
    AudioUnlocked,
    PrimaryJumped,
    SecondaryJumped,
    /// Dialog moved to a new phase
    Dialog(DialogPhase),
    /// Name confirmed; carries the greeting
    NameSubmitted(String),
}

/// Complete scene state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneState {
    /// Canvas size in CSS pixels
    pub canvas_size: Vec2,
    /// Floor y-coordinate for both characters
    pub ground_y: f32,
    /// Player-controlled main character (arrow keys + space)
    pub primary: Character,
    /// Second character (A/D + W) that asks for the name
    pub secondary: Character,
    pub primary_cycle: AnimationCycle,
    pub secondary_cycle: AnimationCycle,
    pub dialog: DialogSession,
    pub audio: AudioLatch,
    /// Texts and margins used by the tick
    pub prompt_text: String,
    pub welcome_suffix: String,
    pub proximity_margin: f32,
    ground_margin: f32,
    /// Pending notifications
    #[serde(skip)]
    pub events: Vec<SceneEvent>,
}

impl SceneState {
    /// Build the scene for a canvas and the sprites that were loaded
    pub fn new(
        canvas_width: f32,
        canvas_height: f32,
        primary_sprite: SpriteInfo,
        secondary_sprite: SpriteInfo,
        settings: &Settings,
    ) -> Self {
        let canvas_size = Vec2::new(sanitize_extent(canvas_width), sanitize_extent(canvas_height));

        let primary_size = match primary_sprite.frame_size {
            Some(size) => Vec2::new(size.width as f32, size.height as f32) * settings.primary_scale,
            None => Vec2::splat(settings.fallback_display_size),
        };
        let secondary_height = primary_size.y * settings.secondary_height_ratio;
        let secondary_aspect = match secondary_sprite.frame_size {
            Some(size) if size.height > 0 => size.width as f32 / size.height as f32,
            _ => settings.secondary_fallback_aspect,
        };
        let secondary_size = Vec2::new(secondary_aspect * secondary_height, secondary_height);

        let ground_y = Self::compute_ground(canvas_size.y, primary_size.y, settings.ground_margin);
        let primary_x = canvas_size.x / 2.0;
        let secondary_x = primary_x - primary_size.x - settings.start_gap;

        let state = Self {
            canvas_size,
            ground_y,
            primary: Character::new(primary_x, ground_y, primary_size, &settings.primary),
            secondary: Character::new(secondary_x, ground_y, secondary_size, &settings.secondary),
            primary_cycle: AnimationCycle::new(
                primary_sprite.frame_count,
                settings.primary_sprite.interval_ms,
            ),
            secondary_cycle: AnimationCycle::new(
                secondary_sprite.frame_count,
                settings.secondary_sprite.interval_ms,
            ),
            dialog: DialogSession::new(),
            audio: AudioLatch::new(settings.audio.clip.is_some()),
            prompt_text: settings.prompt_text.clone(),
            welcome_suffix: settings.welcome_suffix.clone(),
            proximity_margin: settings.proximity_margin,
            ground_margin: settings.ground_margin,
            events: Vec::new(),
        };

        log::debug!(
            "Scene {}x{}: ground at {:.1}, primary {:?}, secondary {:?}",
            state.canvas_size.x,
            state.canvas_size.y,
            state.ground_y,
            state.primary.size,
            state.secondary.size
        );

        state
    }

    fn compute_ground(canvas_height: f32, primary_height: f32, margin: f32) -> f32 {
        canvas_height - primary_height / 2.0 - margin
    }

    /// Without primary frames there is nothing to animate; only the
    /// placeholder is drawn.
    pub fn assets_missing(&self) -> bool {
        self.primary_cycle.is_empty()
    }

    /// Center distance below which the name prompt opens
    pub fn proximity_threshold(&self) -> f32 {
        self.primary.half_width() + self.secondary.half_width() + self.proximity_margin
    }

    /// Canvas size changed: move the ground and keep standing characters on it
    pub fn resize(&mut self, width: f32, height: f32) {
        self.canvas_size = Vec2::new(sanitize_extent(width), sanitize_extent(height));
        self.ground_y = Self::compute_ground(self.canvas_size.y, self.primary.size.y, self.ground_margin);
        self.primary.snap_to_ground(self.ground_y);
        self.secondary.snap_to_ground(self.ground_y);
        log::debug!(
            "Resized to {}x{}, ground at {:.1}",
            self.canvas_size.x,
            self.canvas_size.y,
            self.ground_y
        );
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprites() -> (SpriteInfo, SpriteInfo) {
        (
            SpriteInfo::new(35, Some(FrameSize { width: 50, height: 50 })),
            SpriteInfo::new(16, Some(FrameSize { width: 30, height: 40 })),
        )
    }

    #[test]
    fn test_initial_layout() {
        let (primary, secondary) = sprites();
        let state = SceneState::new(1000.0, 800.0, primary, secondary, &Settings::default());

        assert_eq!(state.primary.size, Vec2::new(200.0, 200.0));
        assert_eq!(state.secondary.size, Vec2::new(120.0, 160.0));
        assert_eq!(state.ground_y, 800.0 - 100.0 - 20.0);
        assert_eq!(state.primary.pos, Vec2::new(500.0, state.ground_y));
        assert_eq!(state.secondary.pos.x, 500.0 - 200.0 - 40.0);
        assert_eq!(state.proximity_threshold(), 100.0 + 60.0 + 40.0);
        assert!(!state.assets_missing());
        assert!(state.audio.hint_visible());
    }

    #[test]
    fn test_missing_sprites_use_fallback_sizes() {
        let state = SceneState::new(
            1000.0,
            800.0,
            SpriteInfo::missing(),
            SpriteInfo::missing(),
            &Settings::default(),
        );
        assert!(state.assets_missing());
        assert_eq!(state.primary.size, Vec2::splat(200.0));
        assert!((state.secondary.size.x - 21.0 / 30.0 * 160.0).abs() < 1e-4);
        assert_eq!(state.secondary.size.y, 160.0);
    }

    #[test]
    fn test_resize_snaps_standing_characters() {
        let (primary, secondary) = sprites();
        let mut state = SceneState::new(1000.0, 800.0, primary, secondary, &Settings::default());
        state.primary.on_ground = true;
        state.secondary.on_ground = false;
        let secondary_y = state.secondary.pos.y;

        state.resize(1000.0, 600.0);
        assert_eq!(state.ground_y, 600.0 - 100.0 - 20.0);
        assert_eq!(state.primary.pos.y, state.ground_y);
        assert_eq!(state.secondary.pos.y, secondary_y);
    }

    #[test]
    fn test_resize_rejects_garbage() {
        let (primary, secondary) = sprites();
        let mut state = SceneState::new(1000.0, 800.0, primary, secondary, &Settings::default());
        state.resize(f32::NAN, -5.0);
        assert_eq!(state.canvas_size, Vec2::ZERO);
    }

    #[test]
    fn test_audio_latch_fires_once() {
        let mut latch = AudioLatch::new(true);
        assert!(latch.unlock());
        assert!(!latch.unlock());
        assert!(latch.started);
        assert!(!latch.hint_visible());

        let mut silent = AudioLatch::new(false);
        assert!(!silent.unlock());
        assert!(!silent.hint_visible());
    }

    #[test]
    fn test_snapshot_round_trip_drops_pending_events() {
        let (primary, secondary) = sprites();
        let mut state = SceneState::new(1000.0, 800.0, primary, secondary, &Settings::default());
        state.dialog.observe(0.0, 1.0, "hello");
        state.dialog.type_char('Q');
        state.primary_cycle.advance(500.0);
        state.events.push(SceneEvent::AudioUnlocked);

        let json = serde_json::to_string(&state).unwrap();
        let restored: SceneState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.primary, state.primary);
        assert_eq!(restored.secondary, state.secondary);
        assert_eq!(restored.primary_cycle, state.primary_cycle);
        assert_eq!(restored.dialog, state.dialog);
        assert_eq!(restored.audio, state.audio);
        assert_eq!(restored.ground_y, state.ground_y);
        assert_eq!(restored.proximity_threshold(), state.proximity_threshold());
        assert!(restored.events.is_empty());

        // Ground margin survives, so a resize lands on the same line
        let mut resized = restored;
        resized.resize(1000.0, 600.0);
        assert_eq!(resized.ground_y, 600.0 - 100.0 - 20.0);
    }

    #[test]
    fn test_no_clip_disables_audio() {
        let (primary, secondary) = sprites();
        let mut settings = Settings::default();
        settings.audio.clip = None;
        let state = SceneState::new(1000.0, 800.0, primary, secondary, &settings);
        assert!(!state.audio.available);
    }
}
