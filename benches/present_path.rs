use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pixel_hall::core::{compositor, BackingStore, ColorDepth, DirtyRegions, DrawSurface, Palette};

fn grayscale_palette() -> Palette {
    let mut palette = Palette::new();
    let colors: Vec<(u8, u8, u8)> = (0..=255).map(|i| (i, i, i)).collect();
    palette.update_range(0, &colors);
    palette
}

fn seeded_store(width: u32, height: u32) -> BackingStore {
    let mut store = BackingStore::allocate(width, height, ColorDepth::Indexed8).unwrap();
    if let DrawSurface::Indexed { pixels, .. } = store.draw_surface() {
        for (i, px) in pixels.iter_mut().enumerate() {
            *px = (i % 256) as u8;
        }
    }
    store
}

fn bench_resolve_full_surface(c: &mut Criterion) {
    let mut store = seeded_store(640, 480);
    let palette = grayscale_palette();
    let full = store.bounds();

    c.bench_function("resolve_640x480_full", |b| {
        b.iter(|| {
            compositor::resolve(black_box(&mut store), &palette, full);
        })
    });
}

fn bench_resolve_dirty_tiles(c: &mut Criterion) {
    let mut store = seeded_store(640, 480);
    let palette = grayscale_palette();

    c.bench_function("resolve_32_tiles", |b| {
        b.iter(|| {
            let mut dirty = DirtyRegions::new();
            for i in 0..32u32 {
                dirty.mark((i % 8) * 80, (i / 8) * 120, 16, 16);
            }
            for rect in dirty.take(store.bounds()) {
                compositor::resolve(black_box(&mut store), &palette, rect);
            }
        })
    });
}

fn bench_dirty_overflow(c: &mut Criterion) {
    let store = seeded_store(640, 480);

    c.bench_function("dirty_mark_take_overflow", |b| {
        b.iter(|| {
            let mut dirty = DirtyRegions::new();
            for i in 0..100u32 {
                dirty.mark(i % 640, i % 480, 8, 8);
            }
            black_box(dirty.take(store.bounds()))
        })
    });
}

criterion_group!(
    benches,
    bench_resolve_full_surface,
    bench_resolve_dirty_tiles,
    bench_dirty_overflow
);
criterion_main!(benches);
