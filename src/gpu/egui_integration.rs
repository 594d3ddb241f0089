//! Egui integration.
//!
//! One egui context drives two renderers: the scene renderer draws tessellated
//! constellation shapes into the persistent canvas, the UI renderer draws the
//! word entry straight onto the surface so it never smears.

use std::sync::Arc;

use egui::epaint::ClippedShape;
use winit::window::Window;

/// Egui integration state.
///
/// Wraps egui context, winit state, and the two wgpu renderers.
pub struct EguiIntegration {
    pub ctx: egui::Context,
    state: egui_winit::State,
    scene_renderer: egui_wgpu::Renderer,
    ui_renderer: egui_wgpu::Renderer,
}

/// Output from egui frame processing.
pub struct EguiFrameOutput {
    pub ui_jobs: Vec<egui::ClippedPrimitive>,
    pub scene_jobs: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

impl EguiIntegration {
    /// Create new egui integration.
    pub fn new(
        device: &wgpu::Device,
        canvas_format: wgpu::TextureFormat,
        surface_format: wgpu::TextureFormat,
        window: &Arc<Window>,
    ) -> Self {
        let ctx = egui::Context::default();

        // Dark, shadowless style so the entry field sits quietly on the sky
        let mut style = egui::Style::default();
        style.visuals = egui::Visuals::dark();
        style.visuals.window_shadow = egui::Shadow::NONE;
        style.visuals.popup_shadow = egui::Shadow::NONE;
        ctx.set_style(style);

        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window.as_ref(),
            Some(window.scale_factor() as f32),
            None,
            None,
        );

        let scene_renderer = egui_wgpu::Renderer::new(
            device,
            canvas_format,
            None,  // depth format
            1,     // msaa samples
            false, // dithering
        );
        let ui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            ctx,
            state,
            scene_renderer,
            ui_renderer,
        }
    }

    /// Feed a winit event to egui.
    ///
    /// Nothing else in the window reacts to raw input and the loop redraws
    /// continuously, so the response is not needed.
    pub fn on_window_event(&mut self, window: &Window, event: &winit::event::WindowEvent) {
        let _ = self.state.on_window_event(window, event);
    }

    /// Begin a new frame. Call before any UI or scene painting.
    pub fn begin_frame(&mut self, window: &Window) {
        let raw_input = self.state.take_egui_input(window);
        self.ctx.begin_pass(raw_input);
    }

    /// End the frame and tessellate both layers.
    ///
    /// `scene_pixels_per_point` is the canvas backing scale, which may differ
    /// from the window's when the pixel ratio is capped.
    pub fn end_frame(
        &mut self,
        window: &Window,
        scene: Vec<ClippedShape>,
        scene_pixels_per_point: f32,
    ) -> EguiFrameOutput {
        let full_output = self.ctx.end_pass();

        // Handle platform output (clipboard, cursor, etc.)
        self.state.handle_platform_output(window, full_output.platform_output);

        let ui_jobs = self.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let scene_jobs = self.ctx.tessellate(scene, scene_pixels_per_point);

        EguiFrameOutput {
            ui_jobs,
            scene_jobs,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        }
    }

    /// Prepare textures and buffers for both layers. Call before creating
    /// render passes and submit the returned command buffers with the frame.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        output: &EguiFrameOutput,
        scene_screen: &egui_wgpu::ScreenDescriptor,
        ui_screen: &egui_wgpu::ScreenDescriptor,
    ) -> Vec<wgpu::CommandBuffer> {
        // Both renderers sample the same font atlas
        for (id, image_delta) in &output.textures_delta.set {
            self.scene_renderer.update_texture(device, queue, *id, image_delta);
            self.ui_renderer.update_texture(device, queue, *id, image_delta);
        }

        let mut buffers = self.scene_renderer.update_buffers(
            device,
            queue,
            encoder,
            &output.scene_jobs,
            scene_screen,
        );
        buffers.extend(self.ui_renderer.update_buffers(
            device,
            queue,
            encoder,
            &output.ui_jobs,
            ui_screen,
        ));
        buffers
    }

    pub fn render_scene(
        &self,
        pass: &mut wgpu::RenderPass<'static>,
        output: &EguiFrameOutput,
        screen: &egui_wgpu::ScreenDescriptor,
    ) {
        self.scene_renderer.render(pass, &output.scene_jobs, screen);
    }

    pub fn render_ui(
        &self,
        pass: &mut wgpu::RenderPass<'static>,
        output: &EguiFrameOutput,
        screen: &egui_wgpu::ScreenDescriptor,
    ) {
        self.ui_renderer.render(pass, &output.ui_jobs, screen);
    }

    /// Free textures after frame is done.
    pub fn cleanup(&mut self, output: &EguiFrameOutput) {
        for id in &output.textures_delta.free {
            self.scene_renderer.free_texture(id);
            self.ui_renderer.free_texture(id);
        }
    }
}
