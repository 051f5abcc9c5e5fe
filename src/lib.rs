pub mod cli;
pub mod core;
pub mod demo;

// Re-export the component types collaborators wire together
pub use crate::core::{
    BackingStore, Clock, ColorDepth, DirtyRegions, DrawSurface, EventSource, FramePresenter,
    LoopState, Palette, PresentTarget, Rect, SchedulerConfig, Simulation, SurfaceRenderer,
    SystemClock, TickScheduler, VideoContext, VideoError,
};
