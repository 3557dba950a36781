//! Window host: winit event handling and the frame loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use litho_catalog::Catalog;
use litho_config::Config;
use litho_render::{
    RenderContext, SurfaceError, init_render_context_blocking, snapshot_path,
};
use litho_scene::{Command, RebuildOutcome, SceneOptions, SceneState};
use litho_shading::LightColor;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::input::{self, KeyAction, PointerState};
use crate::renderer::PreviewRenderer;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Scene behavior knobs from the loaded config.
fn scene_options(config: &Config) -> SceneOptions {
    let light_color = match config.light.default_color.parse::<LightColor>() {
        Ok(color) => color,
        Err(error) => {
            warn!("Config light color: {error}; using warm");
            LightColor::Warm
        }
    };
    SceneOptions {
        frame_rate_independent_easing: config.preview.frame_rate_independent_easing,
        light_color,
        light_on: config.light.start_on,
        ..SceneOptions::default()
    }
}

/// Where snapshot PNGs land.
fn snapshot_dir() -> PathBuf {
    dirs::picture_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Application state driven by winit callbacks.
///
/// The window and GPU exist only after the first `resumed`; every event
/// before that is dropped.
pub struct PreviewApp {
    config: Config,
    /// Commands queued before the window exists (CLI selections).
    startup: Vec<Command>,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    renderer: Option<PreviewRenderer>,
    scene: SceneState,
    pointer: PointerState,
    last_frame: Instant,
    /// Set by the snapshot key, consumed by the next presented frame.
    snapshot_requested: bool,
}

impl PreviewApp {
    pub fn new(config: Config, catalog: Catalog, startup: Vec<Command>) -> Self {
        let scene = SceneState::new(catalog, scene_options(&config));
        Self {
            config,
            startup,
            window: None,
            gpu: None,
            renderer: None,
            scene,
            pointer: PointerState::new(),
            last_frame: Instant::now(),
            snapshot_requested: false,
        }
    }

    fn handle_key(&mut self, action: KeyAction) {
        if action == KeyAction::Snapshot {
            self.snapshot_requested = true;
            return;
        }
        for command in input::commands_for_action(action, &self.scene) {
            self.scene.push(command);
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        match self.scene.update(dt) {
            Some(RebuildOutcome::Rebuilt(kind)) => info!("Rebuilt {kind} mesh"),
            Some(RebuildOutcome::Failed(error)) => warn!("Rebuild failed: {error}"),
            Some(RebuildOutcome::NothingToBuild) | None => {}
        }

        let (Some(gpu), Some(renderer)) = (&mut self.gpu, &mut self.renderer) else {
            return;
        };

        renderer.sync_scene(gpu, &self.scene);

        let snapshot = if std::mem::take(&mut self.snapshot_requested) {
            Some(snapshot_path(&snapshot_dir()))
        } else {
            None
        };

        match renderer.render(gpu, &self.scene, snapshot.as_deref()) {
            Ok(()) => {}
            Err(SurfaceError::Lost) => {
                let (width, height) = (gpu.surface_config.width, gpu.surface_config.height);
                gpu.resize(width, height);
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for PreviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = window_attributes_from_config(&self.config);
            let window = event_loop
                .create_window(attrs)
                .expect("Failed to create window");
            let window = Arc::new(window);

            match init_render_context_blocking(window.clone(), self.config.window.vsync) {
                Ok(ctx) => {
                    self.renderer = Some(PreviewRenderer::new(&ctx, &self.config));
                    self.gpu = Some(ctx);
                }
                Err(e) => {
                    error!("GPU initialization failed: {e}");
                    event_loop.exit();
                    return;
                }
            }

            for command in self.startup.drain(..) {
                self.scene.push(command);
            }
            self.last_frame = Instant::now();
            window.request_redraw();
            self.window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(
                            &gpu.device,
                            gpu.surface_config.width,
                            gpu.surface_config.height,
                        );
                    }
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && let PhysicalKey::Code(code) = event.physical_key
                    && let Some(action) = input::key_action(code)
                {
                    self.handle_key(action);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let sensitivity = self.config.camera.orbit_sensitivity;
                if let Some(command) =
                    self.pointer
                        .on_cursor_moved(position.x, position.y, sensitivity)
                {
                    self.scene.push(command);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.pointer.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scene
                    .push(input::zoom_command(delta, self.config.camera.zoom_sensitivity));
            }
            WindowEvent::DroppedFile(path) => {
                info!("Image dropped: {}", path.display());
                self.scene.push(Command::LoadImage(path));
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }
}

/// Creates the event loop and runs the preview until the window closes.
pub fn run(config: Config, catalog: Catalog, startup: Vec<Command>) {
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = PreviewApp::new(config, catalog, startup);
    event_loop.run_app(&mut app).expect("Event loop failed");
}
