use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{DepthTarget, Gpu, GpuInit, SurfaceErrorAction};
use crate::sim::{FrameDriver, PipelineSetup};
use crate::time::FrameClock;

/// Pacing log cadence, in frames.
const PACE_LOG_EVERY: u64 = 300;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "tiamat".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        }
    }
}

/// Entry point for the runtime.
///
/// Opens one window, bootstraps the GPU context and the particle pipeline
/// from `setup`, then runs one tick per paint-ready signal until the window
/// closes or a fatal error ends the loop.
pub struct Runtime;

impl Runtime {
    pub fn run(config: RuntimeConfig, gpu_init: GpuInit, setup: PipelineSetup) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, setup);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        // Bootstrap and surface failures end the loop; report them to the
        // caller instead of burying them in the log.
        match state.fatal.take() {
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

struct AppState {
    config: RuntimeConfig,
    gpu_init: GpuInit,

    /// Consumed by the first resume; the pipeline is built exactly once.
    setup: Option<PipelineSetup>,

    entry: Option<WindowEntry>,
    depth: Option<DepthTarget>,
    driver: Option<FrameDriver>,
    clock: FrameClock,

    fatal: Option<anyhow::Error>,
    exit_requested: bool,
}

impl AppState {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, setup: PipelineSetup) -> Self {
        Self {
            config,
            gpu_init,
            setup: Some(setup),
            entry: None,
            depth: None,
            driver: None,
            clock: FrameClock::default(),
            fatal: None,
            exit_requested: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    /// Creates the window, the GPU context bound to it, and the pipeline.
    fn bootstrap(&mut self, event_loop: &ActiveEventLoop, setup: PipelineSetup) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        let built = entry.with_gpu(|gpu| {
            let depth = DepthTarget::new(gpu.device(), gpu.size());
            pollster::block_on(FrameDriver::new(gpu, setup)).map(|driver| (depth, driver))
        });
        let (depth, driver) = built.context("particle pipeline setup failed")?;

        entry.with_window(|w| w.request_redraw());

        self.entry = Some(entry);
        self.depth = Some(depth);
        self.driver = Some(driver);
        self.clock.reset();
        Ok(())
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let (Some(entry), Some(depth)) = (self.entry.as_mut(), self.depth.as_mut()) else {
            return;
        };
        entry.with_gpu_mut(|gpu| gpu.resize(new_size));
        entry.with_gpu(|gpu| depth.resize(gpu.device(), new_size));
        entry.with_window(|w| w.request_redraw());
    }

    /// Drives one tick. Surface errors are downgraded to per-tick outcomes;
    /// only OOM-class failures end the loop.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let ft = self.clock.tick();

        let (Some(entry), Some(depth), Some(driver)) =
            (self.entry.as_mut(), self.depth.as_ref(), self.driver.as_mut())
        else {
            return;
        };

        match entry.with_gpu(|gpu| driver.advance(gpu, depth)) {
            Ok(()) => {
                if ft.frame_index % PACE_LOG_EVERY == 0 {
                    log::debug!("tick {} ({:.0} fps)", driver.tick(), 1.0 / ft.dt);
                }
            }
            Err(err) => {
                log::warn!("{err}");
                let action = entry.with_gpu_mut(|gpu| gpu.handle_surface_error(err.source));
                match action {
                    SurfaceErrorAction::Reconfigured => {
                        self.clock.reset();
                        entry.with_window(|w| w.request_redraw());
                    }
                    SurfaceErrorAction::SkipFrame => {}
                    SurfaceErrorAction::Fatal => {
                        self.fail(event_loop, anyhow::anyhow!("surface error was fatal"));
                    }
                }
            }
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // Desktop platforms resume once; the pipeline outlives any further
        // suspend/resume cycles because it holds no surface resources.
        let Some(setup) = self.setup.take() else {
            return;
        };

        if let Err(err) = self.bootstrap(event_loop, setup) {
            self.fail(event_loop, err);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous animation: queue the next paint each time the loop
        // settles. Present pacing (FIFO) throttles the tick rate.
        if let Some(entry) = &self.entry {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                self.resize(new_size);
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = &self.entry {
                    let new_size = entry.with_window(|w| w.inner_size());
                    self.resize(new_size);
                }
            }

            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }

            _ => {}
        }
    }
}
