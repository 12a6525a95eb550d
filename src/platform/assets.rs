//! Sprite frame loading
//!
//! Frames come from the filesystem on native and from `fetch` relative to
//! the page on the web. Both decode with the `image` crate into RGBA8.
//! A frame that cannot be loaded is skipped with a warning; the cycle simply
//! gets shorter.

use crate::settings::SpriteSettings;
use crate::sim::{FrameSize, SpriteInfo};

/// Asset loading failures
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: String, reason: String },
}

/// One decoded frame, tightly packed RGBA8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl FrameImage {
    pub fn decode(path: &str, bytes: &[u8]) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes)
            .map_err(|source| AssetError::Decode {
                path: path.to_string(),
                source,
            })?
            .to_rgba8();
        Ok(Self {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    pub fn size(&self) -> FrameSize {
        FrameSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// All frames that loaded for one sprite, in cycle order
#[derive(Debug, Clone, Default)]
pub struct SpriteFrames {
    pub frames: Vec<FrameImage>,
}

impl SpriteFrames {
    /// Keep the frames that loaded, warn about the rest
    pub fn collect(results: impl IntoIterator<Item = Result<FrameImage, AssetError>>) -> Self {
        let mut frames = Vec::new();
        for result in results {
            match result {
                Ok(frame) => frames.push(frame),
                Err(e) => log::warn!("Skipping frame: {}", e),
            }
        }
        Self { frames }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame count and first frame size for the scene
    pub fn info(&self) -> SpriteInfo {
        SpriteInfo::new(self.frames.len(), self.frames.first().map(FrameImage::size))
    }
}

/// Read every frame of a sprite below `root`
#[cfg(not(target_arch = "wasm32"))]
pub fn load_frames(root: &std::path::Path, sprite: &SpriteSettings) -> SpriteFrames {
    let frames = SpriteFrames::collect(sprite.frame_paths().map(|path| {
        let bytes = std::fs::read(root.join(&path)).map_err(|source| AssetError::Io {
            path: path.clone(),
            source,
        })?;
        FrameImage::decode(&path, &bytes)
    }));
    log::info!(
        "Loaded {}/{} frames for {}",
        frames.frames.len(),
        sprite.frame_count,
        sprite.template
    );
    frames
}

/// Fetch every frame of a sprite relative to the page.
///
/// All requests are issued before the first one is awaited, so the
/// downloads overlap; results are still collected in cycle order.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_frames(sprite: &SpriteSettings) -> SpriteFrames {
    let pending: Vec<(String, Result<js_sys::Promise, AssetError>)> = sprite
        .frame_paths()
        .map(|path| {
            let request = start_fetch(&path);
            (path, request)
        })
        .collect();

    let mut results = Vec::with_capacity(pending.len());
    for (path, request) in pending {
        let result = match request {
            Ok(promise) => match read_response(&path, promise).await {
                Ok(bytes) => FrameImage::decode(&path, &bytes),
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        };
        results.push(result);
    }
    let frames = SpriteFrames::collect(results);
    log::info!(
        "Fetched {}/{} frames for {}",
        frames.frames.len(),
        sprite.frame_count,
        sprite.template
    );
    frames
}

#[cfg(target_arch = "wasm32")]
fn fetch_error(path: &str, reason: String) -> AssetError {
    AssetError::Fetch {
        path: path.to_string(),
        reason,
    }
}

/// Issue the request; the browser starts downloading immediately
#[cfg(target_arch = "wasm32")]
fn start_fetch(path: &str) -> Result<js_sys::Promise, AssetError> {
    let window = web_sys::window().ok_or_else(|| fetch_error(path, "no window".into()))?;
    Ok(window.fetch_with_str(path))
}

#[cfg(target_arch = "wasm32")]
async fn read_response(path: &str, request: js_sys::Promise) -> Result<Vec<u8>, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let response: web_sys::Response = JsFuture::from(request)
        .await
        .map_err(|e| fetch_error(path, format!("{:?}", e)))?
        .dyn_into()
        .map_err(|e| fetch_error(path, format!("not a response: {:?}", e)))?;
    if !response.ok() {
        return Err(fetch_error(path, format!("HTTP {}", response.status())));
    }

    let buffer = response
        .array_buffer()
        .map_err(|e| fetch_error(path, format!("{:?}", e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| fetch_error(path, format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let frame = FrameImage::decode("a.png", &png_bytes(3, 2)).unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(frame.rgba.len(), 3 * 2 * 4);
        assert_eq!(&frame.rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_decode_garbage_is_error() {
        let err = FrameImage::decode("bad.png", b"not a png").unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
        assert!(err.to_string().contains("bad.png"));
    }

    #[test]
    fn test_collect_skips_failures() {
        let ok = FrameImage::decode("a.png", &png_bytes(4, 5)).unwrap();
        let frames = SpriteFrames::collect(vec![
            Err(AssetError::Fetch {
                path: "0.png".into(),
                reason: "HTTP 404".into(),
            }),
            Ok(ok),
        ]);
        let info = frames.info();
        assert_eq!(info.frame_count, 1);
        assert_eq!(info.frame_size, Some(FrameSize { width: 4, height: 5 }));
    }

    #[test]
    fn test_collect_keeps_cycle_order() {
        let frames = SpriteFrames::collect(vec![
            FrameImage::decode("0.png", &png_bytes(1, 1)),
            Err(AssetError::Fetch {
                path: "1.png".into(),
                reason: "HTTP 404".into(),
            }),
            FrameImage::decode("2.png", &png_bytes(2, 1)),
            FrameImage::decode("3.png", &png_bytes(3, 1)),
        ]);
        let widths: Vec<u32> = frames.frames.iter().map(|f| f.width).collect();
        assert_eq!(widths, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_frames_report_missing() {
        let frames = SpriteFrames::default();
        assert!(frames.is_empty());
        assert_eq!(frames.info(), SpriteInfo::missing());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_frames_from_directory() {
        let root = std::env::temp_dir().join(format!("pixel-greeter-assets-{}", std::process::id()));
        std::fs::create_dir_all(root.join("micky")).unwrap();
        std::fs::write(root.join("micky/0.png"), png_bytes(21, 30)).unwrap();
        std::fs::write(root.join("micky/1.png"), png_bytes(21, 30)).unwrap();

        let sprite = SpriteSettings {
            template: "micky/{}.png".into(),
            first_index: 0,
            frame_count: 3,
            index_width: 0,
            interval_ms: 120.0,
        };
        let frames = load_frames(&root, &sprite);
        std::fs::remove_dir_all(&root).ok();

        assert_eq!(frames.frames.len(), 2);
        assert_eq!(frames.info().frame_size, Some(FrameSize { width: 21, height: 30 }));
    }
}
