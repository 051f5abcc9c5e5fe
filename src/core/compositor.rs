use super::backing_store::{BackingStore, ColorDepth};
use super::dirty::Rect;
use super::palette::Palette;

/// Blit indexed pixels through the palette into the true-color buffer for
/// one rectangle.
///
/// This is the only path by which indexed pixels become visible; it must run
/// before the presenter reads the affected rectangle. Outside
/// [`ColorDepth::Indexed8`] the simulation writes true color directly and
/// this must not be called (a call is a no-op in release, an assertion in
/// debug builds).
pub fn resolve(store: &mut BackingStore, palette: &Palette, rect: Rect) {
    debug_assert_eq!(store.depth(), ColorDepth::Indexed8);

    let clipped = rect.intersection(&store.bounds());
    if clipped.is_empty() {
        return;
    }
    let Some((indexed, pixels, pitch, width)) = store.split_for_resolve() else {
        return;
    };

    for y in clipped.top..clipped.bottom {
        let src_row = (y * width) as usize;
        let dst_row = (y * pitch) as usize;
        for x in clipped.left as usize..clipped.right as usize {
            pixels[dst_row + x] = palette.color(indexed[src_row + x]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backing_store::DrawSurface;
    use crate::core::palette::{pack_rgb, OPAQUE_BLACK};

    fn indexed_store(width: u32, height: u32) -> BackingStore {
        BackingStore::allocate(width, height, ColorDepth::Indexed8).unwrap()
    }

    #[test]
    fn resolve_maps_every_pixel_through_palette() {
        let mut store = indexed_store(5, 3);
        let mut palette = Palette::new();
        palette.update_range(0, &[(0, 0, 0), (255, 0, 0), (0, 255, 0)]);

        if let DrawSurface::Indexed { pixels, width, .. } = store.draw_surface() {
            for y in 0..3u32 {
                for x in 0..5u32 {
                    pixels[(y * width + x) as usize] = ((x + y) % 3) as u8;
                }
            }
        }

        let bounds = store.bounds();
        resolve(&mut store, &palette, bounds);

        let pitch = store.pitch();
        for y in 0..3u32 {
            for x in 0..5u32 {
                let expected = palette.color(((x + y) % 3) as u8);
                assert_eq!(store.pixels()[(y * pitch + x) as usize], expected);
            }
        }
    }

    #[test]
    fn resolve_touches_only_the_rectangle() {
        let mut store = indexed_store(8, 8);
        let mut palette = Palette::new();
        palette.update_range(1, &[(10, 20, 30)]);

        if let DrawSurface::Indexed { pixels, .. } = store.draw_surface() {
            pixels.fill(1);
        }

        resolve(&mut store, &palette, Rect::new(2, 2, 4, 4));

        let pitch = store.pitch();
        let resolved = pack_rgb(10, 20, 30);
        for y in 0..8u32 {
            for x in 0..8u32 {
                let value = store.pixels()[(y * pitch + x) as usize];
                let inside = (2..4).contains(&x) && (2..4).contains(&y);
                if inside {
                    assert_eq!(value, resolved);
                } else {
                    assert_eq!(value, OPAQUE_BLACK);
                }
            }
        }
    }

    #[test]
    fn resolve_is_idempotent() {
        let mut store = indexed_store(4, 4);
        let mut palette = Palette::new();
        palette.update_range(0, &[(7, 7, 7), (8, 8, 8)]);

        if let DrawSurface::Indexed { pixels, .. } = store.draw_surface() {
            for (i, px) in pixels.iter_mut().enumerate() {
                *px = (i % 2) as u8;
            }
        }

        let bounds = store.bounds();
        resolve(&mut store, &palette, bounds);
        let first = store.pixels().to_vec();
        resolve(&mut store, &palette, bounds);
        assert_eq!(store.pixels(), first.as_slice());
    }

    #[test]
    fn out_of_bounds_rect_is_clipped() {
        let mut store = indexed_store(4, 4);
        let palette = Palette::new();
        // Must not panic
        resolve(&mut store, &palette, Rect::new(2, 2, 100, 100));
        resolve(&mut store, &palette, Rect::new(50, 50, 60, 60));
    }
}
