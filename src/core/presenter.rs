use super::backing_store::{BackingStore, ColorDepth};
use super::compositor;
use super::dirty::Rect;
use super::error::VideoError;
use super::palette::Palette;

/// Coordinate origin of a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceOrigin {
    /// Matches the backing store; rows upload as-is.
    TopLeft,
    /// Rows are flipped vertically before upload.
    BottomLeft,
}

/// How a frame reaches the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentMode {
    /// Hand the damage to the surface and let it repaint on its own cycle.
    Deferred,
    /// Block until the surface has actually redrawn.
    Immediate,
}

/// Display surface abstraction the presenter pushes pixels into.
///
/// Implemented by the wgpu-backed window surface and by scripted targets in
/// tests. Display-control queries live here too, since the same object owns
/// the native window.
pub trait PresentTarget {
    /// Whether the surface is currently visible (not minimized/occluded).
    fn is_visible(&self) -> bool;

    fn origin(&self) -> SurfaceOrigin {
        SurfaceOrigin::TopLeft
    }

    /// Upload changed pixels for `dest` (target coordinates).
    ///
    /// `data` holds `dest.height()` rows of `dest.width()` pixels starting at
    /// its first byte, consecutive rows `bytes_per_row` apart.
    fn upload(&mut self, data: &[u8], bytes_per_row: u32, dest: Rect) -> Result<(), VideoError>;

    /// Make uploaded damage reach the screen.
    fn present(&mut self, mode: PresentMode) -> Result<(), VideoError>;

    /// Recreate any binding to the backing store after it was reallocated.
    fn rebind(&mut self, width: u32, height: u32) -> Result<(), VideoError>;

    fn set_visible(&mut self, _visible: bool) {}

    /// Ask the native layer for a new window resolution. `false` when the
    /// display cannot satisfy it; buffers are untouched either way.
    fn change_resolution(&mut self, _width: u32, _height: u32) -> bool {
        false
    }

    /// `false` when the display refuses the switch.
    fn toggle_fullscreen(&mut self, _fullscreen: bool) -> bool {
        false
    }

    /// Display modes the surface can switch to, ordered ascending.
    fn supported_resolutions(&self) -> Vec<(u32, u32)> {
        Vec::new()
    }
}

/// Pushes dirty backing-store rectangles to a [`PresentTarget`].
///
/// In paletted mode each rectangle is resolved through the compositor
/// immediately before its upload, so the target never reads unresolved
/// indexed pixels.
#[derive(Debug, Default)]
pub struct FramePresenter {
    flip_rows: Vec<u32>,
}

impl FramePresenter {
    pub fn new() -> Self {
        Self {
            flip_rows: Vec::new(),
        }
    }

    /// Present `rects`. No-op on an empty set or an invisible target.
    pub fn present(
        &mut self,
        store: &mut BackingStore,
        palette: &Palette,
        rects: &[Rect],
        force_now: bool,
        target: &mut dyn PresentTarget,
    ) -> Result<(), VideoError> {
        if rects.is_empty() || !target.is_visible() {
            return Ok(());
        }

        let surface = store.bounds();
        for rect in rects {
            let rect = rect.intersection(&surface);
            if rect.is_empty() {
                continue;
            }
            if store.depth() == ColorDepth::Indexed8 {
                compositor::resolve(store, palette, rect);
            }
            self.upload_rect(store, rect, target)?;
        }

        let mode = if force_now {
            PresentMode::Immediate
        } else {
            PresentMode::Deferred
        };
        target.present(mode)
    }

    fn upload_rect(
        &mut self,
        store: &BackingStore,
        rect: Rect,
        target: &mut dyn PresentTarget,
    ) -> Result<(), VideoError> {
        let pitch = store.pitch() as usize;
        match target.origin() {
            SurfaceOrigin::TopLeft => {
                let offset = (rect.top as usize * pitch + rect.left as usize) * 4;
                target.upload(&store.bytes()[offset..], store.pitch() * 4, rect)
            }
            SurfaceOrigin::BottomLeft => {
                let width = rect.width() as usize;
                self.flip_rows.clear();
                self.flip_rows.reserve(width * rect.height() as usize);
                for y in (rect.top..rect.bottom).rev() {
                    let row = y as usize * pitch + rect.left as usize;
                    self.flip_rows
                        .extend_from_slice(&store.pixels()[row..row + width]);
                }
                let dest = Rect::new(
                    rect.left,
                    store.height() - rect.bottom,
                    rect.right,
                    store.height() - rect.top,
                );
                target.upload(bytemuck::cast_slice(&self.flip_rows), rect.width() * 4, dest)
            }
        }
    }
}
