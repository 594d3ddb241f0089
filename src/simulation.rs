//! Constellation builder and frame driver.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::canvas::Canvas;
use crate::config::SimConfig;
use crate::error::RunError;
use crate::gpu::GpuState;
use crate::render::Renderer;
use crate::time::FrameClock;
use crate::ui::WordEntry;
use crate::visuals::VisualConfig;
use crate::world::World;

/// A constellation window builder.
///
/// Use method chaining to configure, then call `.run()` to start.
///
/// ```ignore
/// Constellation::new()
///     .with_physics(|p| p.constellation_distance = 140.0)
///     .with_visuals(|v| v.label_size = 15.0)
///     .with_words(["orbit", "drift"])
///     .run()?;
/// ```
pub struct Constellation {
    physics: SimConfig,
    visuals: VisualConfig,
    seed: Option<u64>,
    window_size: (f64, f64),
    title: String,
    words: Vec<String>,
}

impl Constellation {
    /// Create a new constellation with default settings and no words.
    pub fn new() -> Self {
        Self {
            physics: SimConfig::default(),
            visuals: VisualConfig::default(),
            seed: None,
            window_size: (1280.0, 720.0),
            title: "Constellation".to_string(),
            words: Vec::new(),
        }
    }

    /// Adjust the physics constants.
    pub fn with_physics<F: FnOnce(&mut SimConfig)>(mut self, f: F) -> Self {
        f(&mut self.physics);
        self
    }

    /// Adjust the rendering constants.
    pub fn with_visuals<F: FnOnce(&mut VisualConfig)>(mut self, f: F) -> Self {
        f(&mut self.visuals);
        self
    }

    /// Make every random draw reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: f64, height: f64) -> Self {
        self.window_size = (width, height);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Words placed at random before the first frame.
    pub fn with_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words.extend(words.into_iter().map(Into::into));
        self
    }

    /// Build the world this configuration starts with.
    pub fn build_world(&self) -> World {
        let canvas = Canvas::new(self.window_size.0 as f32, self.window_size.1 as f32, 1.0);
        let mut world = match self.seed {
            Some(seed) => World::with_seed(self.physics.clone(), canvas, seed),
            None => World::new(self.physics.clone(), canvas),
        };
        for word in &self.words {
            world.add_node(word, None);
        }
        world
    }

    /// Open the window and animate until it is closed.
    pub fn run(self) -> Result<(), RunError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Constellation {
    fn default() -> Self {
        Self::new()
    }
}

struct App {
    title: String,
    window_size: (f64, f64),
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    world: World,
    renderer: Renderer,
    clock: FrameClock,
    entry: WordEntry,
    /// First fatal error; returned from `run` once the loop exits.
    error: Option<RunError>,
}

impl App {
    fn new(builder: Constellation) -> Self {
        let world = builder.build_world();
        let clock = FrameClock::new(world.config().first_frame_dt, world.config().max_dt);
        Self {
            window: None,
            gpu_state: None,
            renderer: Renderer::new(builder.visuals),
            title: builder.title,
            window_size: builder.window_size,
            world,
            clock,
            entry: WordEntry::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RunError) {
        tracing::error!("{}", error);
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    /// Push the window's current size and scale into the world and the GPU.
    fn sync_canvas(&mut self, physical: PhysicalSize<u32>) {
        let Some(window) = &self.window else {
            return;
        };
        let scale = window.scale_factor();
        let logical: LogicalSize<f64> = physical.to_logical(scale);
        self.world
            .resize(logical.width as f32, logical.height as f32, scale as f32);
        if let Some(gpu_state) = &mut self.gpu_state {
            gpu_state.resize(physical, self.world.canvas());
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu_state)) = (self.window.as_ref(), self.gpu_state.as_mut()) else {
            return;
        };

        let dt = self.clock.tick();

        gpu_state.begin_frame(window);
        if let Some(word) = self.entry.show(gpu_state.egui_ctx()) {
            self.world.add_node_near_center(&word);
        }

        self.world.tick(dt);
        let frame = self.renderer.draw(&self.world);

        match gpu_state.render(window, &frame, self.world.canvas()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu_state.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                tracing::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => tracing::warn!("render error: {:?}", e),
        }

        if self.clock.fps_refreshed() {
            window.set_title(&format!(
                "{} - {} words - {:.0} fps",
                self.title,
                self.world.nodes().len(),
                self.clock.fps()
            ));
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(self.window_size.0, self.window_size.1));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());
        self.sync_canvas(window.inner_size());

        match pollster::block_on(GpuState::new(window.clone(), self.world.canvas())) {
            Ok(gpu_state) => self.gpu_state = Some(gpu_state),
            Err(e) => return self.fail(event_loop, e.into()),
        }

        tracing::info!(
            width = self.world.canvas().width,
            height = self.world.canvas().height,
            scale = self.world.canvas().scale,
            "window ready"
        );
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) {
            gpu_state.on_window_event(window, &event);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                self.sync_canvas(physical_size);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    self.sync_canvas(size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let world = Constellation::new().with_seed(1).build_world();
        assert!(world.nodes().is_empty());
        assert_eq!(world.canvas().width, 1280.0);
        assert_eq!(world.canvas().height, 720.0);
        assert_eq!(world.config(), &SimConfig::default());
    }

    #[test]
    fn test_builder_closures_apply() {
        let world = Constellation::new()
            .with_physics(|p| p.constellation_distance = 90.0)
            .with_window_size(640.0, 480.0)
            .with_seed(3)
            .build_world();
        assert_eq!(world.config().constellation_distance, 90.0);
        assert_eq!(world.canvas().size(), glam::Vec2::new(640.0, 480.0));
    }

    #[test]
    fn test_seeded_words() {
        let builder = Constellation::new()
            .with_seed(7)
            .with_words(["alpha", "  ", "beta"]);
        let a = builder.build_world();
        let b = builder.build_world();
        assert_eq!(a.nodes().len(), 2);
        assert_eq!(a.nodes()[1].text(), "beta");
        assert_eq!(a.nodes()[0].position, b.nodes()[0].position);
    }
}
