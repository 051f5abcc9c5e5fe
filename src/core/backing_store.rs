use super::dirty::Rect;
use super::error::VideoError;
use super::palette::OPAQUE_BLACK;

/// Rows are padded to a multiple of 4 pixels (16 bytes) for the presenter.
pub const ROW_ALIGN_PIXELS: u32 = 4;

/// Active pixel format; controls whether the indexed buffer exists and
/// whether the compositor runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    /// 8-bit indices into the 256-entry palette, resolved before present.
    Indexed8,
    /// Packed 32-bit colors written directly by the simulation.
    TrueColor32,
}

/// Geometry of the drawing surface handed to the simulation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    pub width: u32,
    pub height: u32,
    /// Row stride of the true-color buffer, in pixels. Always `>= width`.
    pub pitch: u32,
    pub depth: ColorDepth,
}

/// Mutable view of the buffer the simulation draws into: the indexed bytes
/// in paletted mode, the true-color rows otherwise.
pub enum DrawSurface<'a> {
    Indexed {
        pixels: &'a mut [u8],
        width: u32,
        height: u32,
    },
    TrueColor {
        pixels: &'a mut [u32],
        pitch: u32,
        width: u32,
        height: u32,
    },
}

fn align_up(value: u32, align: u32) -> u32 {
    value.div_ceil(align) * align
}

/// Owns the resident pixel memory the presenter reads from.
///
/// The true-color buffer is `pitch * height` packed pixels; paletted mode
/// adds a tightly-packed `width * height` index buffer whose lifecycle is
/// tied to [`ColorDepth::Indexed8`]. Reallocation drops the old buffers
/// before the new ones are touched, so nothing can read stale memory.
#[derive(Debug)]
pub struct BackingStore {
    width: u32,
    height: u32,
    pitch: u32,
    depth: ColorDepth,
    pixels: Vec<u32>,
    indexed: Option<Vec<u8>>,
}

impl BackingStore {
    /// Allocate fresh buffers, opaque-black (and zero-index) filled.
    ///
    /// Allocation failure is fatal to the surface; callers tear down rather
    /// than retry.
    pub fn allocate(width: u32, height: u32, depth: ColorDepth) -> Result<Self, VideoError> {
        let width = width.max(1);
        let height = height.max(1);
        let pitch = align_up(width, ROW_ALIGN_PIXELS);

        let len = pitch as usize * height as usize;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| VideoError::Allocation { bytes: len * 4 })?;
        pixels.resize(len, OPAQUE_BLACK);

        let indexed = match depth {
            ColorDepth::Indexed8 => {
                let index_len = width as usize * height as usize;
                let mut buf = Vec::new();
                buf.try_reserve_exact(index_len)
                    .map_err(|_| VideoError::Allocation { bytes: index_len })?;
                buf.resize(index_len, 0u8);
                Some(buf)
            }
            ColorDepth::TrueColor32 => None,
        };

        Ok(Self {
            width,
            height,
            pitch,
            depth,
            pixels,
            indexed,
        })
    }

    pub fn descriptor(&self) -> SurfaceDescriptor {
        SurfaceDescriptor {
            width: self.width,
            height: self.height,
            pitch: self.pitch,
            depth: self.depth,
        }
    }

    /// The buffer the simulation writes into for the current depth.
    pub fn draw_surface(&mut self) -> DrawSurface<'_> {
        match self.indexed.as_mut() {
            Some(indexed) => DrawSurface::Indexed {
                pixels: indexed,
                width: self.width,
                height: self.height,
            },
            None => DrawSurface::TrueColor {
                pixels: &mut self.pixels,
                pitch: self.pitch,
                width: self.width,
                height: self.height,
            },
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pitch(&self) -> u32 {
        self.pitch
    }

    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Presented true-color pixels, row stride [`BackingStore::pitch`].
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Byte view of the true-color buffer for texture uploads.
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Indexed source + true-color destination for the compositor.
    /// `None` outside paletted mode.
    pub(crate) fn split_for_resolve(&mut self) -> Option<(&[u8], &mut [u32], u32, u32)> {
        let pitch = self.pitch;
        let width = self.width;
        match &self.indexed {
            Some(indexed) => Some((indexed.as_slice(), self.pixels.as_mut_slice(), pitch, width)),
            None => None,
        }
    }
}
