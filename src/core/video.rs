use super::backing_store::{BackingStore, ColorDepth, DrawSurface, SurfaceDescriptor};
use super::dirty::{DirtyRegions, Rect};
use super::error::VideoError;
use super::palette::Palette;
use super::presenter::{FramePresenter, PresentTarget};

/// Owned state of the video subsystem: backing store, palette table, and the
/// dirty-region set, with a single-writer lifecycle (created when the display
/// comes up, dropped at shutdown). Passed explicitly to collaborators instead
/// of living in globals.
#[derive(Debug)]
pub struct VideoContext {
    store: BackingStore,
    palette: Palette,
    dirty: DirtyRegions,
    needs_rebind: bool,
}

impl VideoContext {
    pub fn new(width: u32, height: u32, depth: ColorDepth) -> Result<Self, VideoError> {
        Ok(Self {
            store: BackingStore::allocate(width, height, depth)?,
            palette: Palette::new(),
            dirty: DirtyRegions::new(),
            needs_rebind: false,
        })
    }

    /// Record a changed region, callable by the simulation whenever it
    /// writes pixels.
    pub fn mark_dirty(&mut self, left: u32, top: u32, width: u32, height: u32) {
        self.dirty.mark(left, top, width, height);
    }

    /// Tag the whole surface for repaint.
    pub fn mark_all_dirty(&mut self) {
        self.dirty
            .mark(0, 0, self.store.width(), self.store.height());
    }

    /// The drawing buffer for direct pixel writes.
    pub fn draw_surface(&mut self) -> DrawSurface<'_> {
        self.store.draw_surface()
    }

    pub fn descriptor(&self) -> SurfaceDescriptor {
        self.store.descriptor()
    }

    pub fn width(&self) -> u32 {
        self.store.width()
    }

    pub fn height(&self) -> u32 {
        self.store.height()
    }

    pub fn color_depth(&self) -> ColorDepth {
        self.store.depth()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn backing_store(&self) -> &BackingStore {
        &self.store
    }

    /// Pull palette entries from the authoritative simulation-side palette.
    ///
    /// Any written entry re-tags the entire surface: a palette change affects
    /// every pixel whose index falls in the range, and the whole-surface mark
    /// is the conservative answer. Returns the number of entries written
    /// after clamping.
    pub fn update_palette(&mut self, first: usize, colors: &[(u8, u8, u8)]) -> usize {
        let written = self.palette.update_range(first, colors);
        if written > 0 {
            self.mark_all_dirty();
        }
        written
    }

    /// Reallocate the backing store for a new window resolution.
    ///
    /// Runs to completion before the next present. On failure the previous
    /// buffers stay valid and the error is fatal to the surface. Success
    /// leaves the whole surface dirty and flags the presenter for rebinding.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), VideoError> {
        if width == self.store.width() && height == self.store.height() {
            return Ok(());
        }
        self.store = BackingStore::allocate(width, height, self.store.depth())?;
        self.dirty = DirtyRegions::new();
        self.mark_all_dirty();
        self.needs_rebind = true;
        log::debug!("backing store reallocated to {width}x{height}");
        Ok(())
    }

    /// Switch pixel format, reallocating at the current resolution.
    pub fn set_color_depth(&mut self, depth: ColorDepth) -> Result<(), VideoError> {
        if depth == self.store.depth() {
            return Ok(());
        }
        self.store = BackingStore::allocate(self.store.width(), self.store.height(), depth)?;
        self.dirty = DirtyRegions::new();
        self.mark_all_dirty();
        self.needs_rebind = true;
        Ok(())
    }

    /// Whether the last reallocation still needs a presenter rebind.
    /// Reading clears the flag.
    pub fn take_needs_rebind(&mut self) -> bool {
        std::mem::take(&mut self.needs_rebind)
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Composite and push the accumulated dirty regions to `target`.
    ///
    /// The dirty set is only consumed when the target is visible; presenting
    /// while hidden must not discard damage that would otherwise be lost
    /// when the surface reappears.
    pub fn present(
        &mut self,
        presenter: &mut FramePresenter,
        target: &mut dyn PresentTarget,
        force_now: bool,
    ) -> Result<(), VideoError> {
        if self.dirty.is_empty() || !target.is_visible() {
            return Ok(());
        }
        let rects = self.dirty.take(self.store.bounds());
        presenter.present(&mut self.store, &self.palette, &rects, force_now, target)
    }

    /// Dirty regions as the presenter would see them; resets the set.
    pub fn take_dirty(&mut self) -> Vec<Rect> {
        self.dirty.take(self.store.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::palette::{pack_rgb, OPAQUE_BLACK};

    #[test]
    fn palette_update_marks_whole_surface() {
        let mut video = VideoContext::new(16, 16, ColorDepth::Indexed8).unwrap();
        assert!(!video.has_dirty());

        video.update_palette(0, &[(1, 2, 3)]);
        assert!(video.has_dirty());
        assert_eq!(video.take_dirty(), vec![Rect::new(0, 0, 16, 16)]);
        assert_eq!(video.palette().color(0), pack_rgb(1, 2, 3));
    }

    #[test]
    fn clamped_out_palette_update_marks_nothing() {
        let mut video = VideoContext::new(16, 16, ColorDepth::Indexed8).unwrap();
        assert_eq!(video.update_palette(256, &[(1, 2, 3)]), 0);
        assert!(!video.has_dirty());
    }

    #[test]
    fn resize_reallocates_and_flags_rebind() {
        let mut video = VideoContext::new(8, 8, ColorDepth::TrueColor32).unwrap();
        assert!(!video.take_needs_rebind());

        video.resize(32, 16).unwrap();
        assert_eq!((video.width(), video.height()), (32, 16));
        assert!(video.take_needs_rebind());
        assert!(!video.take_needs_rebind());
        assert_eq!(video.take_dirty(), vec![Rect::new(0, 0, 32, 16)]);
        assert!(video
            .backing_store()
            .pixels()
            .iter()
            .all(|&p| p == OPAQUE_BLACK));
    }

    #[test]
    fn resize_to_same_size_is_a_no_op() {
        let mut video = VideoContext::new(8, 8, ColorDepth::TrueColor32).unwrap();
        video.resize(8, 8).unwrap();
        assert!(!video.take_needs_rebind());
        assert!(!video.has_dirty());
    }

    #[test]
    fn depth_switch_swaps_indexed_buffer() {
        let mut video = VideoContext::new(8, 8, ColorDepth::TrueColor32).unwrap();
        assert!(matches!(video.draw_surface(), DrawSurface::TrueColor { .. }));

        video.set_color_depth(ColorDepth::Indexed8).unwrap();
        assert!(matches!(video.draw_surface(), DrawSurface::Indexed { .. }));
        assert!(video.take_needs_rebind());
    }

    #[test]
    fn mark_dirty_flows_to_take() {
        let mut video = VideoContext::new(64, 64, ColorDepth::TrueColor32).unwrap();
        video.mark_dirty(1, 2, 3, 4);
        video.mark_dirty(10, 10, 1, 1);
        assert_eq!(
            video.take_dirty(),
            vec![Rect::from_size(1, 2, 3, 4), Rect::from_size(10, 10, 1, 1)]
        );
    }
}
