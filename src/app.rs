use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::config::Config;
use crate::controller::{CameraController, FrameClock, InputEvent, InputProcessor, InputState};
use crate::error::{Error, Result};
use crate::model::{Camera, Light};
use crate::ui::{Overlay, OverlayStats};
use crate::view::{Cube, GpuContext, RenderState};

pub const WINDOW_TITLE: &str = "cubelight";

/// What a key press or release means to the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyAction {
    Quit,
    ToggleOverlay,
    Input(InputEvent),
    Ignore,
}

pub fn key_action(processor: &InputProcessor, key: KeyCode, state: ElementState, repeat: bool) -> KeyAction {
    match state {
        ElementState::Pressed if processor.is_quit(key) => KeyAction::Quit,
        ElementState::Pressed if processor.is_overlay_toggle(key) => {
            if repeat {
                KeyAction::Ignore
            } else {
                KeyAction::ToggleOverlay
            }
        }
        ElementState::Pressed => KeyAction::Input(InputEvent::KeyDown(key)),
        ElementState::Released => KeyAction::Input(InputEvent::KeyUp(key)),
    }
}

/// Hide the cursor and keep it inside the window.
fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
    if let Err(err) = grabbed {
        // Raw device motion still drives mouse look
        tracing::warn!("cursor grab unavailable: {err}");
    }
    window.set_cursor_visible(false);
}

fn release_cursor(window: &Window) {
    let _ = window.set_cursor_grab(CursorGrabMode::None);
    window.set_cursor_visible(true);
}

/// Everything that only exists once the window is up
struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    render: RenderState,
    cube: Cube,
    overlay: Overlay,
}

/// Owns the scene and drives it from winit's event loop.
pub struct Engine {
    config: Config,
    clock: FrameClock,
    camera: Camera,
    light: Light,
    input: InputState,
    controller: CameraController,
    running: Option<Running>,
    last_error: Option<Error>,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self {
            clock: FrameClock::new(config.max_fps, Instant::now()),
            camera: Camera::new(config.aspect_ratio()),
            light: Light::default(),
            input: InputState::new(),
            controller: CameraController::default(),
            running: None,
            last_error: None,
            config,
        }
    }

    /// Open the window and run until it is closed or Escape is pressed.
    pub fn run(config: Config) -> Result<()> {
        let event_loop = EventLoop::new()?;
        let mut engine = Engine::new(config);
        event_loop.run_app(&mut engine)?;
        match engine.last_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(self.config.resizable);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let gpu = pollster::block_on(GpuContext::new(
            Arc::clone(&window),
            self.config.backend.backends(),
            self.config.vsync(),
        ))?;
        self.camera.set_aspect(gpu.config.width, gpu.config.height);

        let render = RenderState::new(&gpu);
        let cube = Cube::new(
            &gpu,
            &render.scene,
            &self.light,
            &self.camera,
            &self.config.shader_path(),
            &self.config.texture_path(),
        )?;
        let overlay = Overlay::new(&window);

        grab_cursor(&window);
        self.input.process_event(&InputEvent::CursorGrabChanged { grabbed: true });

        Ok(Running { window, gpu, render, cube, overlay })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        tracing::error!("{err}");
        self.last_error = Some(err);
        self.shutdown(event_loop);
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(running) = self.running.take() {
            release_cursor(&running.window);
            running.cube.destroy();
            running.render.destroy();
            tracing::info!("shutting down");
        }
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match key_action(self.controller.processor(), code, event.state, event.repeat) {
            KeyAction::Quit => self.shutdown(event_loop),
            KeyAction::ToggleOverlay => {
                self.input.toggle_overlay();
                tracing::debug!("overlay {}", if self.input.show_overlay { "shown" } else { "hidden" });
            }
            KeyAction::Input(input) => self.input.process_event(&input),
            KeyAction::Ignore => {}
        }
    }

    /// One iteration: time, camera, uniforms, draw.
    fn frame(&mut self) -> Result<()> {
        let Some(running) = self.running.as_mut() else {
            return Ok(());
        };

        // OS-requested redraws are held to the same cap
        let Some(time) = self.clock.try_tick(Instant::now()) else {
            return Ok(());
        };
        self.controller.update(&mut self.camera, &mut self.input, time.delta_ms);
        running.cube.update(&running.gpu.queue, time.elapsed_seconds, &self.camera);

        let overlay = if self.input.show_overlay {
            let stats = OverlayStats::new(&self.camera, self.clock.fps(), time.elapsed_seconds);
            Some(running.overlay.run(&running.window, &stats))
        } else {
            None
        };

        running.render.draw_frame(&running.gpu, &running.cube, overlay)
    }
}

impl ApplicationHandler for Engine {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                tracing::info!(
                    "window {}x{} on {:?}",
                    running.gpu.config.width,
                    running.gpu.config.height,
                    running.gpu.backend
                );
                self.clock = FrameClock::new(self.config.max_fps, Instant::now());
                self.running = Some(running);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if let Some(running) = self.running.as_mut() {
            if self.input.show_overlay {
                running.overlay.on_window_event(&running.window, &event);
            }
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::Focused(focused) => {
                if !focused {
                    self.input.process_event(&InputEvent::FocusLost);
                }
                if let Some(running) = &self.running {
                    if focused {
                        grab_cursor(&running.window);
                    } else {
                        release_cursor(&running.window);
                    }
                }
                self.input.process_event(&InputEvent::CursorGrabChanged { grabbed: focused });
            }
            WindowEvent::Resized(size) => {
                if let Some(running) = self.running.as_mut() {
                    if running.gpu.resize(size.width, size.height) {
                        running.render.resize(&running.gpu);
                        self.camera.set_aspect(size.width, size.height);
                        tracing::debug!("resized to {}x{}", size.width, size.height);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.frame() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.input.process_event(&InputEvent::MouseMove { dx: dx as f32, dy: dy as f32 });
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = &self.running else {
            return;
        };
        if self.clock.is_frame_due(Instant::now()) {
            running.window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.clock.next_frame_at()));
    }
}
