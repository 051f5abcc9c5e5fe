use std::sync::Arc;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use pixel_hall::cli::Cli;
use pixel_hall::core::{
    FramePresenter, LoopState, PresentTarget, SchedulerConfig, Simulation, SurfaceRenderer,
    SystemClock, TickScheduler, VideoContext, VideoEvent, WinitEventAdapter,
};
use pixel_hall::demo::DemoSim;

/// Everything the loop owns once the window exists.
struct VideoState {
    clock: SystemClock,
    adapter: WinitEventAdapter,
    sim: DemoSim,
    video: VideoContext,
    presenter: FramePresenter,
    renderer: SurfaceRenderer,
    scheduler: TickScheduler,
}

struct App {
    cli: Cli,
    window: Option<Arc<Window>>,
    state: Option<VideoState>,
}

impl App {
    fn new(cli: Cli) -> Self {
        Self {
            cli,
            window: None,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Pixel Hall")
                .with_inner_size(winit::dpi::PhysicalSize::new(
                    self.cli.width,
                    self.cli.height,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                eprintln!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let sim = DemoSim::new(self.cli.scene);
        let video = match VideoContext::new(size.width, size.height, sim.color_depth()) {
            Ok(v) => v,
            Err(e) => {
                eprintln!("Failed to allocate backing store: {e}");
                event_loop.exit();
                return;
            }
        };
        let mut renderer = match SurfaceRenderer::new(window.clone(), video.width(), video.height())
        {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to initialize display surface: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut adapter = WinitEventAdapter::new();
        if self.cli.fullscreen && renderer.toggle_fullscreen(true) {
            adapter.push(VideoEvent::FullscreenChanged(true));
        }

        let scheduler = TickScheduler::new(SchedulerConfig {
            tick_period_ms: self.cli.tick_ms.max(1),
            ..Default::default()
        });

        self.window = Some(window);
        self.state = Some(VideoState {
            clock: SystemClock::new(),
            adapter,
            sim,
            video,
            presenter: FramePresenter::new(),
            renderer,
            scheduler,
        });
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        state.adapter.process_event(&event);

        if let WindowEvent::RedrawRequested = event {
            if let Err(e) = state.renderer.blit() {
                eprintln!("Render error: {e}");
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            let outcome = state.scheduler.run_iteration(
                &mut state.clock,
                &mut state.adapter,
                &mut state.sim,
                &mut state.video,
                &mut state.presenter,
                &mut state.renderer,
            );
            if outcome == LoopState::Terminated {
                event_loop.exit();
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let event_loop = EventLoop::new()?;
    // The scheduler paces itself; the event loop must keep calling back
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::new(cli);

    println!("Pixel Hall - Space pauses, Shift fast-forwards, Escape quits");
    event_loop.run_app(&mut app)?;

    Ok(())
}
