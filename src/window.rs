//! Window, event loop, and the frame-driving application handler.
//!
//! The event loop is the only scheduler: resize events and redraws are
//! serialized on the main thread, so a resize regeneration can never race a
//! frame advance. Unlike the original's self-perpetuating animation callback,
//! the loop has an explicit exit path (window close or Escape) and `run`
//! returns once it fires.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::error::RunError;
use crate::field::ParticleField;
use crate::gpu::GpuState;
use crate::time::Time;
use crate::visuals::VisualConfig;

/// The particle-field application: owns the window, field, and GPU state.
pub struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    field: Option<ParticleField>,
    time: Time,
    visuals: VisualConfig,
    error: Option<RunError>,
}

impl App {
    /// Create an application with the given visual configuration.
    pub fn new(visuals: VisualConfig) -> Self {
        Self {
            window: None,
            gpu: None,
            field: None,
            time: Time::new(),
            visuals,
            error: None,
        }
    }

    /// Run until the window is closed or Escape is pressed.
    pub fn run(mut self) -> Result<(), RunError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);
        event_loop.run_app(&mut self)?;

        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RunError) {
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("Constellation")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let size = window.inner_size();
        self.field = Some(ParticleField::new(
            size.width,
            size.height,
            self.visuals.particle_count,
        ));

        match pollster::block_on(GpuState::new(
            window.clone(),
            self.visuals,
            self.visuals.particle_count,
        )) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => return self.fail(event_loop, e.into()),
        }

        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
                // Full reset: new extents, fresh particle set.
                if let Some(field) = &mut self.field {
                    field.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.time.update();

                if let Some(field) = &mut self.field {
                    field.advance();
                }

                if let (Some(gpu), Some(field)) = (&mut self.gpu, &self.field) {
                    match gpu.render(field) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            gpu.resize(winit::dpi::PhysicalSize {
                                width: gpu.config.width,
                                height: gpu.config.height,
                            })
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => eprintln!("Render error: {:?}", e),
                    }
                }

                if let Some(window) = &self.window {
                    if self.time.frame() % 30 == 0 {
                        window.set_title(&format!("Constellation ({:.0} fps)", self.time.fps()));
                    }
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
