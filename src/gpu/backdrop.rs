//! Persistent offscreen canvas.
//!
//! The scene is drawn into a texture that is never cleared. Each frame starts
//! with a fullscreen pass that blends a translucent fade and a radial
//! vignette over whatever the previous frame left behind, which is what
//! turns moving nodes into smeared trails. A second fullscreen pass copies the
//! canvas onto the swapchain surface.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::visuals::Rgba;

/// Background parameters, laid out to match `BackgroundUniforms` in WGSL.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct BackgroundUniforms {
    pub fade: [f32; 4],
    pub vignette_inner: [f32; 4],
    pub vignette_outer: [f32; 4],
    /// Vignette centre in logical pixels.
    pub center: [f32; 2],
    /// Canvas size in logical pixels.
    pub size: [f32; 2],
    pub radius: f32,
    pub _pad: [f32; 3],
}

impl BackgroundUniforms {
    pub fn new(fade: Rgba, inner: Rgba, outer: Rgba, center: [f32; 2], size: [f32; 2], radius: f32) -> Self {
        Self {
            fade: fade.to_array(),
            vignette_inner: inner.to_array(),
            vignette_outer: outer.to_array(),
            center,
            size,
            radius,
            _pad: [0.0; 3],
        }
    }

    /// Uniforms that leave the canvas untouched.
    pub fn transparent(size: [f32; 2]) -> Self {
        let clear = Rgba::TRANSPARENT;
        Self::new(clear, clear, clear, [0.0; 2], size, 1.0)
    }
}

/// GPU resources for the persistent canvas.
pub struct Backdrop {
    /// Offscreen render target that accumulates frames.
    texture: wgpu::Texture,
    /// View into the offscreen texture.
    pub view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    /// Pipeline for the fade + vignette pass.
    background_pipeline: wgpu::RenderPipeline,
    background_bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    /// Pipeline for copying the canvas to the surface.
    present_pipeline: wgpu::RenderPipeline,
    present_bind_group: wgpu::BindGroup,
    /// Bind group layout (needed for recreation on resize).
    present_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl Backdrop {
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        canvas_format: wgpu::TextureFormat,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let (texture, view) = create_canvas_texture(device, width, height, canvas_format);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Canvas Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // Background pass
        let uniforms = BackgroundUniforms::transparent([width as f32, height as f32]);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Background Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let background_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Background Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let background_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Background Bind Group"),
            layout: &background_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let background_pipeline = create_fullscreen_pipeline(
            device,
            "Background",
            &background_wgsl(),
            &background_layout,
            canvas_format,
            Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
        );

        // Present pass
        let present_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Present Bind Group Layout"),
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

        let present_bind_group = create_present_bind_group(device, &present_layout, &view, &sampler);

        let present_pipeline = create_fullscreen_pipeline(
            device,
            "Present",
            &present_wgsl(),
            &present_layout,
            surface_format,
            None,
        );

        Self {
            texture,
            view,
            format: canvas_format,
            background_pipeline,
            background_bind_group,
            uniform_buffer,
            present_pipeline,
            present_bind_group,
            present_layout,
            sampler,
        }
    }

    /// Recreate the canvas after a resize. Accumulated pixels are dropped.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if self.size() == (width, height) {
            return;
        }
        let (texture, view) = create_canvas_texture(device, width, height, self.format);
        self.texture = texture;
        self.view = view;
        self.present_bind_group =
            create_present_bind_group(device, &self.present_layout, &self.view, &self.sampler);
    }

    pub fn size(&self) -> (u32, u32) {
        let size = self.texture.size();
        (size.width, size.height)
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &BackgroundUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Blend the fade and vignette over the canvas.
    pub fn draw_background(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Background Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.background_pipeline);
        pass.set_bind_group(0, &self.background_bind_group, &[]);
        pass.draw(0..3, 0..1);
    }

    /// Copy the canvas onto `target`, clearing it first.
    pub fn present(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Present Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_pipeline(&self.present_pipeline);
        pass.set_bind_group(0, &self.present_bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

fn create_canvas_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Canvas Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn create_present_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Present Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn create_fullscreen_pipeline(
    device: &wgpu::Device,
    name: &str,
    source: &str,
    bind_group_layout: &wgpu::BindGroupLayout,
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} Shader", name)),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Pipeline Layout", name)),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", name)),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

const FULLSCREEN_VERTEX: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vertex_index: u32) -> VertexOutput {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var uvs = array<vec2<f32>, 3>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(2.0, 1.0),
        vec2<f32>(0.0, -1.0),
    );

    var out: VertexOutput;
    out.clip_position = vec4<f32>(positions[vertex_index], 0.0, 1.0);
    out.uv = uvs[vertex_index];
    return out;
}
"#;

const BACKGROUND_FRAGMENT: &str = r#"
struct BackgroundUniforms {
    fade: vec4<f32>,
    vignette_inner: vec4<f32>,
    vignette_outer: vec4<f32>,
    center: vec2<f32>,
    size: vec2<f32>,
    radius: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0)
var<uniform> bg: BackgroundUniforms;

// Output is premultiplied: vignette composited over fade, both over the canvas.
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let p = in.uv * bg.size;
    let t = smoothstep(0.0, max(bg.radius, 1.0), distance(p, bg.center));
    let v = mix(bg.vignette_inner, bg.vignette_outer, t);
    let f = bg.fade;

    let rgb = v.rgb * v.a + f.rgb * f.a * (1.0 - v.a);
    let a = 1.0 - (1.0 - f.a) * (1.0 - v.a);
    return vec4<f32>(rgb, a);
}
"#;

const PRESENT_FRAGMENT: &str = r#"
@group(0) @binding(0)
var canvas: texture_2d<f32>;
@group(0) @binding(1)
var canvas_sampler: sampler;

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let c = textureSample(canvas, canvas_sampler, in.uv);
    return vec4<f32>(c.rgb, 1.0);
}
"#;

/// Fade + vignette shader.
pub(crate) fn background_wgsl() -> String {
    format!("{}{}", FULLSCREEN_VERTEX, BACKGROUND_FRAGMENT)
}

/// Canvas to surface copy shader.
pub(crate) fn present_wgsl() -> String {
    format!("{}{}", FULLSCREEN_VERTEX, PRESENT_FRAGMENT)
}
