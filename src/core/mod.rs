pub mod backing_store;
pub mod clock;
pub mod compositor;
pub mod dirty;
pub mod error;
pub mod events;
pub mod gpu_context;
pub mod input_adapter;
pub mod palette;
pub mod presenter;
pub mod scheduler;
pub mod simulation;
pub mod surface_renderer;
pub mod video;

pub use backing_store::{BackingStore, ColorDepth, DrawSurface, SurfaceDescriptor};
pub use clock::{Clock, SystemClock};
pub use dirty::{DirtyRegions, Rect, DIRTY_RECT_CAPACITY};
pub use error::VideoError;
pub use events::{EventSource, Key, Modifiers, MouseButton, VideoEvent};
pub use gpu_context::GpuContext;
pub use input_adapter::WinitEventAdapter;
pub use palette::{pack_rgb, Palette, OPAQUE_BLACK, PALETTE_SIZE};
pub use presenter::{FramePresenter, PresentMode, PresentTarget, SurfaceOrigin};
pub use scheduler::{LoopState, SchedulerConfig, TickScheduler, DEFAULT_TICK_MS};
pub use simulation::Simulation;
pub use surface_renderer::SurfaceRenderer;
pub use video::VideoContext;
