/// Number of entries in the hardware palette.
pub const PALETTE_SIZE: usize = 256;

/// Packed opaque black, the fill value for fresh buffers and palettes.
pub const OPAQUE_BLACK: u32 = 0xFF00_0000;

/// Pack an RGB triple into the presenter's 32-bit format, full opacity.
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    OPAQUE_BLACK | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Maps 8-bit color indices to packed 32-bit colors.
///
/// Mutated only through [`Palette::update_range`], which pulls entries from
/// the authoritative simulation-side palette and clamps rather than index
/// past entry 255.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: [u32; PALETTE_SIZE],
}

impl Palette {
    /// All entries opaque black.
    pub fn new() -> Self {
        Self {
            colors: [OPAQUE_BLACK; PALETTE_SIZE],
        }
    }

    /// Recompute entries `first..first + source.len()` from RGB triples.
    ///
    /// Requests reaching past the table are clamped. Returns the number of
    /// entries actually written so callers can observe the clamp.
    pub fn update_range(&mut self, first: usize, source: &[(u8, u8, u8)]) -> usize {
        if first >= PALETTE_SIZE {
            return 0;
        }
        let count = source.len().min(PALETTE_SIZE - first);
        for (slot, &(r, g, b)) in self.colors[first..first + count].iter_mut().zip(source) {
            *slot = pack_rgb(r, g, b);
        }
        count
    }

    /// Packed color for an index. Indices are `u8`, so this cannot miss.
    pub fn color(&self, index: u8) -> u32 {
        self.colors[usize::from(index)]
    }

    pub fn colors(&self) -> &[u32; PALETTE_SIZE] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}
