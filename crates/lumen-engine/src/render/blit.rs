use anyhow::{ensure, Result};
use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::framebuffer::FrameBuffer;
use crate::render::{RenderCtx, RenderTarget};

/// Texture format of the GPU mirror. Matches the framebuffer's `f32` channels.
const TEXEL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;
const TEXEL_BYTES: u32 = 16;

// ── fit uniform ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct FitUniform {
    scale: [f32; 2],
    _pad: [f32; 2], // 16-byte alignment
}

// ── quad vertex ───────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pos: [f32; 2], // 0..1
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [0.0, 0.0] },
    QuadVertex { pos: [1.0, 0.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [0.0, 1.0] },
];

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// NDC scale that fits `content` inside `surface` without distortion.
///
/// The wider dimension is shrunk (letterbox/pillarbox). Returns `[1.0, 1.0]`
/// when either size has a zero dimension.
pub fn fit_scale(content: (u32, u32), surface: (u32, u32)) -> [f32; 2] {
    let (cw, ch) = content;
    let (sw, sh) = surface;
    if cw == 0 || ch == 0 || sw == 0 || sh == 0 {
        return [1.0, 1.0];
    }

    let content_aspect = cw as f32 / ch as f32;
    let surface_aspect = sw as f32 / sh as f32;

    if surface_aspect > content_aspect {
        [content_aspect / surface_aspect, 1.0]
    } else {
        [1.0, surface_aspect / content_aspect]
    }
}

/// GPU mirror of a [`FrameBuffer`] plus the pipeline that draws it full-screen.
///
/// The texture is sampled with nearest filtering and clamped addressing, so
/// every displayed texel is an exact copy of a framebuffer pixel.
///
/// Fields drop in declaration order, which is the reverse of acquisition.
pub struct FrameBlitter {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    fit_ubo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,
    quad_vbo: wgpu::Buffer,
    texture: wgpu::Texture,

    width: u32,
    height: u32,

    /// Texel staging reused across uploads.
    staging: Vec<[f32; 4]>,
    last_fit: Option<FitUniform>,
}

impl FrameBlitter {
    /// Allocates the texture mirror and builds the blit pipeline for
    /// `ctx.surface_format`.
    pub fn new(ctx: &RenderCtx<'_>, width: u32, height: u32) -> Result<Self> {
        let max = ctx.device.limits().max_texture_dimension_2d;
        ensure!(
            width > 0 && height > 0 && width <= max && height <= max,
            "framebuffer size {width}x{height} is outside the supported 1..={max} range"
        );

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lumen frame texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXEL_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lumen frame sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let quad_vbo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen blit quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let quad_ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lumen blit quad ibo"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let fit_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen blit fit ubo"),
            size: std::mem::size_of::<FitUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lumen blit bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<FitUniform>() as u64,
                        ),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                    count: None,
                },
            ],
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lumen blit bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: fit_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lumen blit shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blit.wgsl").into()),
        });

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lumen blit pipeline layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lumen blit pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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

        log::debug!("frame blitter ready: {width}x{height} {TEXEL_FORMAT:?}");

        Ok(Self {
            pipeline,
            bind_group,
            fit_ubo,
            quad_ibo,
            quad_vbo,
            texture,
            width,
            height,
            staging: Vec::with_capacity(width as usize * height as usize),
            last_fit: None,
        })
    }

    /// Copies the whole framebuffer into the texture mirror.
    ///
    /// The queue takes its own copy of the data before this returns, so the
    /// framebuffer may be written again immediately after.
    pub fn upload(&mut self, queue: &wgpu::Queue, frame: &FrameBuffer) -> Result<()> {
        ensure!(
            (frame.width(), frame.height()) == (self.width, self.height),
            "framebuffer is {}x{} but the texture mirror is {}x{}",
            frame.width(),
            frame.height(),
            self.width,
            self.height
        );

        frame.write_texels(&mut self.staging);

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&self.staging),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * TEXEL_BYTES),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    /// Records the full-screen draw of the texture mirror into `target`.
    ///
    /// The pass loads the existing target contents; areas outside the fitted
    /// quad keep whatever the frame was cleared to.
    pub fn draw(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.write_fit_uniform(ctx);

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("lumen blit pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.quad_vbo.slice(..));
        rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }

    /// Rewrites the fit uniform only when the surface size changed it.
    fn write_fit_uniform(&mut self, ctx: &RenderCtx<'_>) {
        let u = FitUniform {
            scale: fit_scale((self.width, self.height), ctx.surface_size),
            _pad: [0.0; 2],
        };
        if self.last_fit == Some(u) {
            return;
        }
        ctx.queue.write_buffer(&self.fit_ubo, 0, bytemuck::bytes_of(&u));
        self.last_fit = Some(u);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_aspect_fills_the_surface() {
        assert_eq!(fit_scale((320, 240), (640, 480)), [1.0, 1.0]);
    }

    #[test]
    fn wide_surface_pillarboxes() {
        assert_eq!(fit_scale((100, 100), (200, 100)), [0.5, 1.0]);
    }

    #[test]
    fn tall_surface_letterboxes() {
        assert_eq!(fit_scale((100, 100), (100, 400)), [1.0, 0.25]);
    }

    #[test]
    fn zero_sized_surface_falls_back_to_identity() {
        assert_eq!(fit_scale((320, 240), (0, 480)), [1.0, 1.0]);
        assert_eq!(fit_scale((0, 240), (640, 480)), [1.0, 1.0]);
    }

    #[test]
    fn fit_uniform_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<FitUniform>(), 16);
        assert_eq!(TEXEL_BYTES as usize, std::mem::size_of::<[f32; 4]>());
    }
}
