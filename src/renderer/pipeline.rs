//! WebGPU render pipeline
//!
//! One textured-quad pipeline draws sprites, boxes and lines in painter's
//! order. Text commands are left to the DOM overlay.

use std::collections::HashMap;
use std::ops::Range;

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::draw::{DrawCommand, DrawList, RenderError, SpriteId};
use super::shapes;
use super::vertex::{Vertex, colors, srgb_to_linear};
use crate::platform::assets::FrameImage;

/// Texture to bind for a run of vertices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TextureKey {
    White,
    Frame(SpriteId, usize),
}

/// Consecutive vertices sharing one texture
#[derive(Debug)]
struct Batch {
    key: TextureKey,
    range: Range<u32>,
}

struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Main render state
pub struct RenderState {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: GpuTexture,
    frames: HashMap<(SpriteId, usize), GpuTexture>,
    /// Surface size in physical pixels
    pub size: (u32, u32),
}

impl RenderState {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("pixel-greeter-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sprite_shader.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Pixel art: no smoothing
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("render_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let white = create_texture(
            &device,
            &queue,
            &bind_group_layout,
            &sampler,
            "white",
            &FrameImage {
                width: 1,
                height: 1,
                rgba: vec![255; 4],
            },
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            bind_group_layout,
            sampler,
            white,
            frames: HashMap::new(),
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure with the current size (after a lost/outdated surface)
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload every frame of a sprite as its own texture
    pub fn upload_sprite(&mut self, sprite: SpriteId, frames: &[FrameImage]) {
        for (index, frame) in frames.iter().enumerate() {
            let label = format!("{:?}_{}", sprite, index);
            let texture = create_texture(
                &self.device,
                &self.queue,
                &self.bind_group_layout,
                &self.sampler,
                &label,
                frame,
            );
            self.frames.insert((sprite, index), texture);
        }
        log::info!("Uploaded {} {:?} frames", frames.len(), sprite);
    }

    fn bind_group(&self, key: TextureKey) -> &wgpu::BindGroup {
        match key {
            TextureKey::White => &self.white.bind_group,
            TextureKey::Frame(sprite, index) => self
                .frames
                .get(&(sprite, index))
                .map(|t| &t.bind_group)
                .unwrap_or(&self.white.bind_group),
        }
    }

    /// Draw everything except text
    pub fn render(&mut self, list: &DrawList) -> Result<(), RenderError> {
        let linear = self.config.format.is_srgb();
        let (clear, vertices, batches) = tessellate(list, linear);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Recreate buffer every frame (a dozen quads; not worth pooling)
        let vertex_buffer = (!vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("vertex_buffer"),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("render_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear[0] as f64,
                            g: clear[1] as f64,
                            b: clear[2] as f64,
                            a: clear[3] as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = &vertex_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                for batch in &batches {
                    render_pass.set_bind_group(0, self.bind_group(batch.key), &[]);
                    render_pass.draw(batch.range.clone(), 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn create_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    image: &FrameImage,
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    GpuTexture {
        _texture: texture,
        bind_group,
    }
}

/// Convert canvas pixels (origin top-left, y down) to NDC
fn to_ndc(p: [f32; 2], canvas: Vec2) -> [f32; 2] {
    let w = canvas.x.max(1.0);
    let h = canvas.y.max(1.0);
    [p[0] / w * 2.0 - 1.0, 1.0 - p[1] / h * 2.0]
}

/// Flatten a draw list into NDC vertices grouped by texture.
///
/// Returns the clear color, the vertices and the draw batches.
fn tessellate(list: &DrawList, linear: bool) -> ([f32; 4], Vec<Vertex>, Vec<Batch>) {
    let color = |c: [f32; 4]| if linear { srgb_to_linear(c) } else { c };
    let mut clear = color(colors::BACKGROUND);
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut batches: Vec<Batch> = Vec::new();

    for command in &list.commands {
        let (key, mut shape) = match command {
            DrawCommand::Clear { color: c } => {
                clear = color(*c);
                continue;
            }
            DrawCommand::Sprite {
                sprite,
                frame,
                center,
                size,
            } => (
                TextureKey::Frame(*sprite, *frame),
                shapes::sprite_quad(*center, *size, colors::WHITE),
            ),
            DrawCommand::Rect {
                center,
                size,
                corner_radius,
                fill,
                stroke,
            } => {
                let mut shape = shapes::rounded_rect(*center, *size, *corner_radius, color(*fill));
                if let Some(stroke) = stroke {
                    shape.extend(shapes::rounded_rect_outline(
                        *center,
                        *size,
                        *corner_radius,
                        stroke.width,
                        color(stroke.color),
                    ));
                }
                (TextureKey::White, shape)
            }
            DrawCommand::Line {
                from,
                to,
                width,
                color: c,
            } => (TextureKey::White, shapes::line(*from, *to, *width, color(*c))),
            DrawCommand::Text { .. } => continue,
        };

        if shape.is_empty() {
            continue;
        }
        for v in &mut shape {
            v.position = to_ndc(v.position, list.canvas_size);
        }

        let start = vertices.len() as u32;
        vertices.extend(shape);
        let end = vertices.len() as u32;
        match batches.last_mut() {
            Some(last) if last.key == key => last.range.end = end,
            _ => batches.push(Batch {
                key,
                range: start..end,
            }),
        }
    }

    (clear, vertices, batches)
}
