//! GPU backend.
//!
//! Each frame goes through four passes:
//!
//! 1. fade + vignette blended over the persistent canvas,
//! 2. the scene (links, trails, nodes, labels) drawn into the canvas,
//! 3. the canvas copied to the swapchain surface,
//! 4. the UI drawn on top of the surface.

mod backdrop;
mod egui_integration;
pub mod painter;

use std::sync::Arc;

use winit::window::Window;

use backdrop::Backdrop;
use egui_integration::EguiIntegration;

use crate::canvas::Canvas;
use crate::error::GpuError;
use crate::render::Frame;

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    backdrop: Backdrop,
    egui: EguiIntegration,
}

impl GpuState {
    pub async fn new(window: Arc<Window>, canvas: &Canvas) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        tracing::info!(adapter = %info.name, backend = ?info.backend, "using GPU adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        // Gamma-space target: colours are specified in sRGB and blended as such
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        let canvas_format = surface_format.remove_srgb_suffix();

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (bw, bh) = canvas.backing_size();
        let backdrop = Backdrop::new(&device, bw, bh, canvas_format, surface_format);
        let egui = EguiIntegration::new(&device, canvas_format, surface_format, &window);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            backdrop,
            egui,
        })
    }

    /// Reconfigure the surface and the canvas backing store.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>, canvas: &Canvas) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
        let (bw, bh) = canvas.backing_size();
        self.backdrop.resize(&self.device, bw, bh);
    }

    /// Reconfigure the surface with its current size, e.g. after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn egui_ctx(&self) -> &egui::Context {
        &self.egui.ctx
    }

    /// Forward a window event to egui.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) {
        self.egui.on_window_event(window, event);
    }

    /// Start collecting UI for this frame.
    pub fn begin_frame(&mut self, window: &Window) {
        self.egui.begin_frame(window);
    }

    /// Paint `frame` into the canvas and present it with the UI on top.
    ///
    /// Must follow [`begin_frame`](Self::begin_frame) in the same frame.
    pub fn render(&mut self, window: &Window, frame: &Frame, canvas: &Canvas) -> Result<(), wgpu::SurfaceError> {
        let scene = painter::paint(&self.egui.ctx, frame);
        let output = self.egui.end_frame(window, scene, canvas.scale);

        self.backdrop
            .write_uniforms(&self.queue, &painter::background(frame, canvas));

        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let (bw, bh) = self.backdrop.size();
        let scene_screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [bw, bh],
            pixels_per_point: canvas.scale,
        };
        let ui_screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: output.pixels_per_point,
        };
        let egui_buffers = self.egui.prepare(
            &self.device,
            &self.queue,
            &mut encoder,
            &output,
            &scene_screen,
            &ui_screen,
        );

        self.backdrop.draw_background(&mut encoder);

        {
            let scene_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.backdrop.view,
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
            self.egui
                .render_scene(&mut scene_pass.forget_lifetime(), &output, &scene_screen);
        }

        self.backdrop.present(&mut encoder, &view);

        {
            let ui_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("UI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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
            self.egui
                .render_ui(&mut ui_pass.forget_lifetime(), &output, &ui_screen);
        }

        self.queue
            .submit(egui_buffers.into_iter().chain(std::iter::once(encoder.finish())));
        surface_texture.present();

        self.egui.cleanup(&output);
        Ok(())
    }
}
