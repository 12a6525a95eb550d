//! Rendering module
//!
//! `draw` turns the scene into a backend-neutral `DrawList`; `pipeline`
//! draws that list with a wgpu textured-quad pipeline. On the web,
//! `WebRenderer` pairs the pipeline with the DOM text overlay.

pub mod draw;
pub mod pipeline;
pub mod shapes;
pub mod vertex;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use draw::{
    DrawCommand, DrawList, RecordingSink, RenderError, RenderSink, SpriteId, Stroke, TextAlign,
    TextBaseline, build_draw_list, text_width,
};
pub use pipeline::RenderState;
#[cfg(target_arch = "wasm32")]
pub use web::WebRenderer;
