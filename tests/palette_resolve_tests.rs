use pixel_hall::core::{
    compositor, pack_rgb, BackingStore, ColorDepth, DrawSurface, Palette, Rect, OPAQUE_BLACK,
    PALETTE_SIZE,
};

// ============================================================================
// Palette range updates
// ============================================================================

#[test]
fn test_in_range_update_touches_exactly_those_entries() {
    let mut palette = Palette::new();
    let colors: Vec<(u8, u8, u8)> = (0..16).map(|i| (i as u8, 0, 255 - i as u8)).collect();
    assert_eq!(palette.update_range(100, &colors), 16);

    for i in 0..PALETTE_SIZE {
        let expected = if (100..116).contains(&i) {
            let c = colors[i - 100];
            pack_rgb(c.0, c.1, c.2)
        } else {
            OPAQUE_BLACK
        };
        assert_eq!(palette.colors()[i], expected, "entry {i}");
    }
}

#[test]
fn test_overflowing_update_is_clamped_not_rejected_entirely() {
    let mut palette = Palette::new();
    let colors = vec![(200u8, 100u8, 50u8); 20];
    assert_eq!(palette.update_range(246, &colors), 10);
    assert_eq!(palette.colors()[255], pack_rgb(200, 100, 50));
    assert_eq!(palette.colors()[245], OPAQUE_BLACK);
}

#[test]
fn test_update_entirely_past_table_is_refused() {
    let mut palette = Palette::new();
    assert_eq!(palette.update_range(PALETTE_SIZE, &[(1, 2, 3)]), 0);
}

// ============================================================================
// Compositor resolve
// ============================================================================

fn checkerboard_store(width: u32, height: u32) -> BackingStore {
    let mut store = BackingStore::allocate(width, height, ColorDepth::Indexed8).unwrap();
    if let DrawSurface::Indexed { pixels, width, .. } = store.draw_surface() {
        for y in 0..height {
            for x in 0..width {
                pixels[(y * width + x) as usize] = ((x + y) % 2) as u8;
            }
        }
    }
    store
}

#[test]
fn test_resolve_round_trip_every_pixel() {
    let mut store = checkerboard_store(17, 9);
    let mut palette = Palette::new();
    palette.update_range(0, &[(255, 0, 0), (0, 0, 255)]);

    let bounds = store.bounds();
    compositor::resolve(&mut store, &palette, bounds);

    let pitch = store.pitch();
    for y in 0..9u32 {
        for x in 0..17u32 {
            let expected = palette.colors()[((x + y) % 2) as usize];
            assert_eq!(
                store.pixels()[(y * pitch + x) as usize],
                expected,
                "pixel ({x},{y})"
            );
        }
    }
}

#[test]
fn test_resolve_is_idempotent_without_writes() {
    let mut store = checkerboard_store(8, 8);
    let mut palette = Palette::new();
    palette.update_range(0, &[(10, 20, 30), (40, 50, 60)]);

    let bounds = store.bounds();
    compositor::resolve(&mut store, &palette, bounds);
    let once = store.pixels().to_vec();

    compositor::resolve(&mut store, &palette, bounds);
    compositor::resolve(&mut store, &palette, Rect::new(2, 2, 6, 6));
    assert_eq!(store.pixels(), once.as_slice());
}

#[test]
fn test_resolve_after_palette_change_repaints_with_new_colors() {
    let mut store = checkerboard_store(4, 4);
    let mut palette = Palette::new();
    palette.update_range(0, &[(1, 1, 1), (2, 2, 2)]);
    let bounds = store.bounds();
    compositor::resolve(&mut store, &palette, bounds);
    assert_eq!(store.pixels()[0], pack_rgb(1, 1, 1));

    palette.update_range(0, &[(9, 9, 9)]);
    compositor::resolve(&mut store, &palette, bounds);
    assert_eq!(store.pixels()[0], pack_rgb(9, 9, 9));
    // Index 1 untouched by the second update
    assert_eq!(store.pixels()[1], pack_rgb(2, 2, 2));
}

#[test]
fn test_resolve_partial_rect_leaves_padding_rows_black() {
    let mut store = checkerboard_store(5, 5);
    let mut palette = Palette::new();
    palette.update_range(0, &[(100, 100, 100), (200, 200, 200)]);

    compositor::resolve(&mut store, &palette, Rect::new(0, 0, 2, 2));

    let pitch = store.pitch() as usize;
    // Outside the rect nothing resolved
    assert_eq!(store.pixels()[2], OPAQUE_BLACK);
    assert_eq!(store.pixels()[2 * pitch], OPAQUE_BLACK);
    // Pitch padding cells never written
    assert_eq!(store.pixels()[pitch - 1], OPAQUE_BLACK);
}
