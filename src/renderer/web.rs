//! Browser render sink: wgpu for shapes and sprites, DOM for text

use super::draw::{DrawList, RenderError, RenderSink};
use super::pipeline::RenderState;
use crate::platform::overlay::TextOverlay;

pub struct WebRenderer {
    pub gpu: RenderState,
    overlay: TextOverlay,
}

impl WebRenderer {
    pub fn new(gpu: RenderState, overlay: TextOverlay) -> Self {
        Self { gpu, overlay }
    }
}

impl RenderSink for WebRenderer {
    fn submit(&mut self, list: &DrawList) -> Result<(), RenderError> {
        // Text first: it must update even if the surface is lost this frame
        self.overlay.render(list)?;
        match self.gpu.render(list) {
            Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                log::warn!("Surface lost, reconfiguring");
                self.gpu.reconfigure();
                Ok(())
            }
            other => other,
        }
    }
}
