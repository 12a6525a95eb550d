//! Scene settings
//!
//! Every tunable number and text of the scene. Defaults reproduce the
//! constants in `crate::consts`; the native harness can override them from a
//! JSON file.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics constants for one character (pixels per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterSettings {
    /// Horizontal distance per tick while a movement key is held
    pub speed: f32,
    /// Added to vertical velocity every tick (positive = down)
    pub gravity: f32,
    /// Vertical velocity set on jump (negative = up)
    pub jump_impulse: f32,
}

/// Where a sprite's frames live and how fast they cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSettings {
    /// Relative path with a `{}` placeholder for the frame number
    pub template: String,
    /// Number of the first frame file
    pub first_index: u32,
    /// Number of frame files
    pub frame_count: u32,
    /// Zero-padding applied to the frame number
    pub index_width: usize,
    /// Display duration of one frame
    pub interval_ms: f64,
}

impl SpriteSettings {
    /// Path of the `n`-th frame (0-based, independent of `first_index`)
    pub fn frame_path(&self, n: u32) -> String {
        let number = format!(
            "{:0width$}",
            self.first_index + n,
            width = self.index_width
        );
        self.template.replacen("{}", &number, 1)
    }

    /// All frame paths in cycle order
    pub fn frame_paths(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.frame_count).map(|n| self.frame_path(n))
    }
}

/// Audio clip played once the user has interacted with the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// Relative path of the clip; `None` disables audio and its hint
    pub clip: Option<String>,
    /// Playback volume (0.0 - 1.0)
    pub volume: f32,
    pub muted: bool,
}

/// Scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Characters ===
    pub primary: CharacterSettings,
    pub secondary: CharacterSettings,

    // === Sprites ===
    pub primary_sprite: SpriteSettings,
    pub secondary_sprite: SpriteSettings,
    /// Integer scale applied to primary frames
    pub primary_scale: f32,
    /// Secondary height relative to primary height
    pub secondary_height_ratio: f32,
    /// Secondary width:height when its frames are missing
    pub secondary_fallback_aspect: f32,
    /// Primary size when its frames are missing
    pub fallback_display_size: f32,

    // === Layout ===
    pub ground_margin: f32,
    pub start_gap: f32,
    pub proximity_margin: f32,

    // === Texts ===
    pub prompt_text: String,
    pub welcome_suffix: String,
    pub audio_hint_text: String,
    pub missing_frames_text: String,

    pub audio: AudioSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            primary: CharacterSettings {
                speed: PRIMARY_SPEED,
                gravity: PRIMARY_GRAVITY,
                jump_impulse: PRIMARY_JUMP,
            },
            secondary: CharacterSettings {
                speed: SECONDARY_SPEED,
                gravity: SECONDARY_GRAVITY,
                jump_impulse: SECONDARY_JUMP,
            },

            primary_sprite: SpriteSettings {
                template: "1/all{}.png".to_string(),
                first_index: 1,
                frame_count: PRIMARY_FRAME_COUNT,
                index_width: 4,
                interval_ms: PRIMARY_FRAME_INTERVAL_MS,
            },
            secondary_sprite: SpriteSettings {
                template: "micky/{}.png".to_string(),
                first_index: 0,
                frame_count: SECONDARY_FRAME_COUNT,
                index_width: 0,
                interval_ms: SECONDARY_FRAME_INTERVAL_MS,
            },
            primary_scale: PRIMARY_SCALE,
            secondary_height_ratio: SECONDARY_HEIGHT_RATIO,
            secondary_fallback_aspect: SECONDARY_FALLBACK_ASPECT,
            fallback_display_size: FALLBACK_DISPLAY_SIZE,

            ground_margin: GROUND_MARGIN,
            start_gap: START_GAP,
            proximity_margin: PROXIMITY_MARGIN,

            prompt_text: PROMPT_TEXT.to_string(),
            welcome_suffix: WELCOME_SUFFIX.to_string(),
            audio_hint_text: AUDIO_HINT_TEXT.to_string(),
            missing_frames_text: MISSING_FRAMES_TEXT.to_string(),

            audio: AudioSettings {
                clip: Some("y848.wav".to_string()),
                volume: 1.0,
                muted: false,
            },
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults.
    ///
    /// The file is overlaid onto the serialized defaults, so a nested object
    /// may set a single field (`{"primary": {"speed": 3.0}}`) and the rest of
    /// that object keeps the value for *its* character.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(Self::default())?;
        overlay(&mut merged, overrides);
        serde_json::from_value(merged)
    }

    /// Effective clip volume (respects `muted`)
    pub fn effective_volume(&self) -> f32 {
        if self.audio.muted {
            0.0
        } else {
            self.audio.volume.clamp(0.0, 1.0)
        }
    }
}

/// Recursively replace `base` values with those present in `overrides`
fn overlay(base: &mut serde_json::Value, overrides: serde_json::Value) {
    use serde_json::Value;

    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, value) => *base = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_paths_match_asset_layout() {
        let settings = Settings::default();
        let primary: Vec<String> = settings.primary_sprite.frame_paths().collect();
        assert_eq!(primary.len(), 35);
        assert_eq!(primary[0], "1/all0001.png");
        assert_eq!(primary[34], "1/all0035.png");

        let secondary: Vec<String> = settings.secondary_sprite.frame_paths().collect();
        assert_eq!(secondary.len(), 16);
        assert_eq!(secondary[0], "micky/0.png");
        assert_eq!(secondary[15], "micky/15.png");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "welcome_suffix": "welcome", "proximity_margin": 10.0 }"#)
                .unwrap();
        assert_eq!(settings.welcome_suffix, "welcome");
        assert_eq!(settings.proximity_margin, 10.0);
        assert_eq!(settings.primary.jump_impulse, PRIMARY_JUMP);
        assert_eq!(settings.prompt_text, PROMPT_TEXT);
    }

    #[test]
    fn test_nested_partial_json_keeps_sibling_defaults() {
        let settings = Settings::from_json(
            r#"{
                "primary": { "speed": 3.0 },
                "secondary": { "jump_impulse": -9.0, "wings": true },
                "audio": { "muted": true },
                "start_gap": 12.0
            }"#,
        )
        .unwrap();
        assert_eq!(settings.primary.speed, 3.0);
        assert_eq!(settings.primary.gravity, PRIMARY_GRAVITY);
        assert_eq!(settings.primary.jump_impulse, PRIMARY_JUMP);
        // Each character falls back to its own defaults
        assert_eq!(settings.secondary.speed, SECONDARY_SPEED);
        assert_eq!(settings.secondary.jump_impulse, -9.0);
        assert!(settings.audio.muted);
        assert_eq!(settings.audio.clip.as_deref(), Some("y848.wav"));
        assert_eq!(settings.start_gap, 12.0);
    }

    #[test]
    fn test_null_clip_disables_audio() {
        let settings = Settings::from_json(r#"{ "audio": { "clip": null } }"#).unwrap();
        assert_eq!(settings.audio.clip, None);
        assert_eq!(settings.audio.volume, 1.0);
    }

    #[test]
    fn test_wrong_type_is_error() {
        assert!(Settings::from_json(r#"{ "primary": { "speed": "fast" } }"#).is_err());
    }

    #[test]
    fn test_muted_volume() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_volume(), 1.0);
        settings.audio.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
