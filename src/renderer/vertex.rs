//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with texture coordinate and tint.
///
/// Untextured shapes sample a 1x1 white texture, so one pipeline covers
/// sprites and solid geometry.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            uv: [u, v],
            color,
        }
    }

    /// Untextured vertex
    pub const fn solid(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self::new(x, y, 0.5, 0.5, color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Convert an sRGB color to linear for an sRGB render target
pub fn srgb_to_linear(color: [f32; 4]) -> [f32; 4] {
    let channel = |c: f32| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [channel(color[0]), channel(color[1]), channel(color[2]), color[3]]
}

/// Colors for scene elements (sRGB)
pub mod colors {
    /// #ffcad4
    pub const BACKGROUND: [f32; 4] = [1.0, 202.0 / 255.0, 212.0 / 255.0, 1.0];
    pub const TEXT: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const OUTLINE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const DIALOG_FILL: [f32; 4] = [1.0, 1.0, 1.0, 245.0 / 255.0];
    pub const INPUT_FILL: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const GROUND_LINE: [f32; 4] = [0.0, 0.0, 0.0, 60.0 / 255.0];
    pub const HINT: [f32; 4] = [0.0, 0.0, 0.0, 150.0 / 255.0];
    /// Sprite tint (no change)
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        let desc = Vertex::desc();
        assert_eq!(desc.attributes[2].offset, 16);
    }

    #[test]
    fn test_srgb_endpoints() {
        let ends = srgb_to_linear([0.0, 1.0, 0.0, 0.5]);
        assert_eq!(ends[0], 0.0);
        assert!((ends[1] - 1.0).abs() < 1e-5);
        assert_eq!(ends[3], 0.5);
        let mid = srgb_to_linear([0.5, 0.5, 0.5, 1.0]);
        assert!((mid[0] - 0.214).abs() < 0.001);
    }
}
