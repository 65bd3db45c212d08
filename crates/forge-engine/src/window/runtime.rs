use anyhow::Context;
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::engine::{Engine, EngineConfig, EngineError};
use crate::event::Lifecycle;
use crate::input::platform::translate_window_event;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::time::FrameClock;

/// Window settings.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "forge".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Runs an [`Engine`] in a single window until it is closed.
pub struct Runtime;

impl Runtime {
    /// Opens the window, acquires the GPU, calls `setup` and starts the loop.
    ///
    /// If the window or device cannot be acquired, or `setup` fails, no
    /// frame is ever run and the error is returned as
    /// [`EngineError::Setup`] / [`EngineError::Window`].
    pub fn run<F>(
        config: RuntimeConfig,
        gpu_init: GpuInit,
        engine_config: EngineConfig,
        setup: F,
    ) -> Result<(), EngineError>
    where
        F: FnOnce(&mut Engine) -> anyhow::Result<()>,
    {
        let event_loop = EventLoop::new()?;
        let mut state = AppState {
            config,
            gpu_init,
            engine: Engine::new(engine_config),
            setup: Some(setup),
            surface: None,
            clock: FrameClock::new(),
            suspended: false,
            failure: None,
        };

        event_loop.run_app(&mut state)?;

        match state.failure {
            Some(err) => Err(err),
            None => {
                log::info!("event loop finished");
                Ok(())
            }
        }
    }
}

#[self_referencing]
struct WindowSurface {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowSurface {
    fn open(
        event_loop: &ActiveEventLoop,
        config: &RuntimeConfig,
        gpu_init: GpuInit,
    ) -> Result<Self, EngineError> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window = event_loop.create_window(attrs)?;

        WindowSurfaceTryBuilder {
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).context("GPU initialization failed")
            },
        }
        .try_build()
        .map_err(EngineError::setup)
    }
}

struct AppState<F> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    engine: Engine,
    /// Taken on first resume.
    setup: Option<F>,
    surface: Option<WindowSurface>,
    clock: FrameClock,
    suspended: bool,
    failure: Option<EngineError>,
}

impl<F> AppState<F>
where
    F: FnOnce(&mut Engine) -> anyhow::Result<()>,
{
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        log::error!("{err}");
        self.failure = Some(err);
        event_loop.exit();
    }

    /// First resume: window, device, user setup, then `Started`.
    fn launch(&mut self, event_loop: &ActiveEventLoop) -> Result<(), EngineError> {
        let surface = WindowSurface::open(event_loop, &self.config, self.gpu_init.clone())?;

        if let Some(setup) = self.setup.take() {
            setup(&mut self.engine).map_err(EngineError::setup)?;
        }

        let size = surface.with_gpu(|gpu| gpu.size());
        let engine = &mut self.engine;
        pollster::block_on(async {
            engine.start().await;
            engine.resize(size.width, size.height).await;
        });

        surface.with_window(|w| w.request_redraw());
        self.surface = Some(surface);
        self.clock.reset();
        Ok(())
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.with_gpu_mut(|gpu| gpu.resize(new_size));
        surface.with_window(|w| w.request_redraw());
        if new_size.width > 0 && new_size.height > 0 {
            pollster::block_on(self.engine.resize(new_size.width, new_size.height));
        }
    }

    /// Simulates and draws one frame. Returns false if the loop must stop.
    fn redraw(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return true;
        };

        let time = self.clock.tick();
        self.engine.tick(time);

        let engine = &self.engine;
        let clear = engine.config().clear_color;
        surface.with_mut(|fields| {
            let gpu = fields.gpu;
            let size = gpu.size();
            if size.width == 0 || size.height == 0 {
                return true;
            }

            let mut frame = match gpu.begin_frame() {
                Ok(frame) => frame,
                Err(err) => return gpu.handle_surface_error(err) != SurfaceErrorAction::Fatal,
            };

            clear_pass(&mut frame.encoder, &frame.view, clear);

            let scale_factor = fields.window.scale_factor() as f32;
            let rctx = RenderCtx::new(
                gpu.device(),
                gpu.queue(),
                gpu.surface_format(),
                (size.width, size.height),
                scale_factor,
            );
            {
                let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
                engine.draw(&rctx, &mut target);
            }

            fields.window.pre_present_notify();
            gpu.submit(frame);
            true
        })
    }
}

fn clear_pass(encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, clear: Color) {
    let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("forge clear"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
}

impl<F> ApplicationHandler for AppState<F>
where
    F: FnOnce(&mut Engine) -> anyhow::Result<()>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_none() {
            if let Err(err) = self.launch(event_loop) {
                self.fail(event_loop, err);
            }
            return;
        }

        if self.suspended {
            self.suspended = false;
            self.clock.reset();
            pollster::block_on(self.engine.lifecycle(Lifecycle::Resumed));
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        self.suspended = true;
        pollster::block_on(self.engine.lifecycle(Lifecycle::Suspended));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        if !self.suspended
            && let Some(surface) = &self.surface
        {
            surface.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(surface) = &self.surface else {
            return;
        };

        let input = surface
            .with_window(|w| translate_window_event(w, self.engine.input_state(), &event));
        if let Some(input) = input {
            pollster::block_on(self.engine.handle_input(&input));
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested");
                self.surface = None;
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => self.resize(new_size),
            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = surface.with_window(|w| w.inner_size());
                self.resize(new_size);
            }
            WindowEvent::RedrawRequested => {
                if !self.redraw() {
                    self.fail(
                        event_loop,
                        EngineError::Setup("surface ran out of memory".to_string()),
                    );
                }
            }
            _ => {}
        }
    }
}
