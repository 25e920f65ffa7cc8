use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App as CoreApp, AppControl, DisplayPhase, FrameCtx, WindowCtx};
use crate::device::{ContextError, Gpu, GpuInit};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "lumen".to_string(),
            initial_size: LogicalSize::new(960.0, 720.0),
        }
    }
}

/// Runtime context passed to the application.
///
/// Requests are applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    exit_requested: bool,
    error: Option<anyhow::Error>,
}

impl RuntimeCtx {
    /// Ends the loop after this frame.
    pub fn exit(&mut self) {
        self.exit_requested = true;
    }

    /// Ends the loop after this frame and makes `Runtime::run` return `err`.
    ///
    /// Only the first failure is kept.
    pub fn fail(&mut self, err: anyhow::Error) {
        self.exit_requested = true;
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens one window, drives `app` until a close request, then tears
    /// everything down in reverse acquisition order.
    ///
    /// Returns the first fatal error (context creation, app setup or a
    /// failure reported through [`RuntimeCtx::fail`]).
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowEntry {
    fn open(
        event_loop: &ActiveEventLoop,
        config: &RuntimeConfig,
        gpu_init: GpuInit,
    ) -> Result<Self, ContextError> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);

        let window = event_loop.create_window(attrs)?;

        WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
    }
}

struct AppState<A>
where
    A: CoreApp,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    entry: Option<WindowEntry>,
    clock: FrameClock,
    phase: DisplayPhase,
    error: Option<anyhow::Error>,
}

impl<A> AppState<A>
where
    A: CoreApp,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            entry: None,
            clock: FrameClock::new(),
            phase: DisplayPhase::Uninitialized,
            error: None,
        }
    }

    fn set_phase(&mut self, next: DisplayPhase) {
        if !self.phase.can_transition_to(next) {
            log::warn!("ignoring display phase change {:?} -> {next:?}", self.phase);
            return;
        }
        log::debug!("display phase {:?} -> {next:?}", self.phase);
        self.phase = next;
    }

    fn terminate(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase != DisplayPhase::Terminated {
            self.set_phase(DisplayPhase::Terminated);
        }
        event_loop.exit();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.error.is_none() {
            self.error = Some(err);
        }
        self.terminate(event_loop);
    }

    /// Uninitialized → ContextReady → Running.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let entry = WindowEntry::open(event_loop, &self.config, self.gpu_init.clone())
            .context("failed to initialize the display context")?;
        self.set_phase(DisplayPhase::ContextReady);

        let app = &mut self.app;
        let ready = entry.with_gpu(|gpu| app.on_context_ready(gpu));
        self.entry = Some(entry);
        ready.context("failed to prepare frame resources")?;

        self.set_phase(DisplayPhase::Running);
        self.clock = FrameClock::new();
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId) {
        let Some(entry) = self.entry.as_mut() else {
            return;
        };

        let mut runtime_ctx = RuntimeCtx::default();
        let time = self.clock.tick();
        let app = &mut self.app;

        let control = entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
                time,
                runtime: &mut runtime_ctx,
            };
            app.on_frame(&mut ctx)
        });

        if let Some(err) = runtime_ctx.error.take() {
            self.fail(event_loop, err);
        } else if control == AppControl::Exit || runtime_ctx.exit_requested {
            self.terminate(event_loop);
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase != DisplayPhase::Uninitialized {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.phase.is_running() {
            return;
        }

        // Continuous redraw; never block waiting for input.
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if !self.phase.is_running() {
            return;
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.terminate(event_loop);
            return;
        }

        match &event {
            WindowEvent::CloseRequested => self.terminate(event_loop),

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.entry.as_mut() {
                    entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.entry.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_gpu_mut(|gpu| gpu.resize(new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop, window_id),

            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.phase != DisplayPhase::Terminated {
            self.set_phase(DisplayPhase::Terminated);
        }

        // App resources first, then the GPU context, then the window.
        if self.entry.is_some() {
            self.app.on_exit();
        }
        self.entry = None;
        log::debug!("display context released");
    }
}
