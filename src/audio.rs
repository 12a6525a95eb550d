//! Audio playback through an HTML audio element
//!
//! Browsers only allow playback after a user gesture, so the clip is
//! created up front and started when the scene reports `AudioUnlocked`.

use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

use crate::settings::Settings;

/// Audio manager for the scene
pub struct AudioManager {
    clip: Option<HtmlAudioElement>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let clip = settings.audio.clip.as_deref().and_then(|src| {
            match HtmlAudioElement::new_with_src(src) {
                Ok(el) => {
                    el.set_preload("auto");
                    Some(el)
                }
                Err(e) => {
                    log::warn!("Failed to create audio element for {}: {:?}", src, e);
                    None
                }
            }
        });
        Self {
            clip,
            volume: settings.effective_volume(),
        }
    }

    /// A clip exists and can be started
    pub fn available(&self) -> bool {
        self.clip.is_some()
    }

    /// Start the clip once
    pub fn play(&self) {
        let Some(clip) = &self.clip else { return };
        clip.set_volume(self.volume as f64);
        match clip.play() {
            Ok(promise) => {
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        log::warn!("Audio playback rejected: {:?}", e);
                    }
                });
            }
            Err(e) => log::warn!("Audio playback failed: {:?}", e),
        }
    }
}
