use crate::cli::DemoScene;
use crate::core::backing_store::{ColorDepth, DrawSurface};
use crate::core::events::{Key, Modifiers, VideoEvent};
use crate::core::palette::{OPAQUE_BLACK, PALETTE_SIZE};
use crate::core::simulation::Simulation;
use crate::core::video::VideoContext;

const BOX_SIZE: u32 = 24;
const CURSOR_SIZE: u32 = 3;

/// Simple color wheel over the 256 palette entries.
fn wheel(pos: u8) -> (u8, u8, u8) {
    let pos = u16::from(pos);
    if pos < 85 {
        ((255 - pos * 3) as u8, (pos * 3) as u8, 0)
    } else if pos < 170 {
        let p = pos - 85;
        (0, (255 - p * 3) as u8, (p * 3) as u8)
    } else {
        let p = pos - 170;
        ((p * 3) as u8, 0, (255 - p * 3) as u8)
    }
}

/// Built-in demo content for the binary.
///
/// `Plasma` seeds a ring pattern into the indexed buffer once and animates
/// by rotating the palette, exercising the palette-animation path and the
/// compositor. `Bounce` writes true-color pixels directly and marks only
/// the rectangles it touches.
pub struct DemoSim {
    scene: DemoScene,
    palette: Vec<(u8, u8, u8)>,
    palette_dirty: Option<(usize, usize)>,
    pattern_seeded: bool,
    box_x: i32,
    box_y: i32,
    vel_x: i32,
    vel_y: i32,
    cursor: Option<(i32, i32)>,
    cursor_drawn: Option<(i32, i32)>,
    paused: bool,
    finished: bool,
}

impl DemoSim {
    pub fn new(scene: DemoScene) -> Self {
        Self {
            scene,
            palette: (0..PALETTE_SIZE).map(|i| wheel(i as u8)).collect(),
            // Full upload on the first tick, like a fresh window
            palette_dirty: Some((0, PALETTE_SIZE)),
            pattern_seeded: false,
            box_x: 8,
            box_y: 8,
            vel_x: 3,
            vel_y: 2,
            cursor: None,
            cursor_drawn: None,
            paused: false,
            finished: false,
        }
    }

    fn step_plasma(&mut self, video: &mut VideoContext) {
        if !self.pattern_seeded {
            if let DrawSurface::Indexed {
                pixels,
                width,
                height,
            } = video.draw_surface()
            {
                let cx = i64::from(width / 2);
                let cy = i64::from(height / 2);
                for y in 0..height {
                    for x in 0..width {
                        let dx = i64::from(x) - cx;
                        let dy = i64::from(y) - cy;
                        let d = ((dx * dx + dy * dy) as f64).sqrt() as i64;
                        pixels[(y * width + x) as usize] = (d & 0xFF) as u8;
                    }
                }
            }
            video.mark_all_dirty();
            self.pattern_seeded = true;
        }

        self.palette.rotate_left(1);
        self.palette_dirty = Some((0, PALETTE_SIZE));
    }

    fn step_bounce(&mut self, video: &mut VideoContext) {
        Self::fill_box(video, self.box_x, self.box_y, OPAQUE_BLACK);

        let width = video.width() as i32;
        let height = video.height() as i32;
        let size = BOX_SIZE as i32;

        self.box_x += self.vel_x;
        self.box_y += self.vel_y;
        if self.box_x <= 0 || self.box_x + size >= width {
            self.vel_x = -self.vel_x;
            self.box_x = self.box_x.clamp(0, (width - size).max(0));
        }
        if self.box_y <= 0 || self.box_y + size >= height {
            self.vel_y = -self.vel_y;
            self.box_y = self.box_y.clamp(0, (height - size).max(0));
        }

        Self::fill_box(video, self.box_x, self.box_y, 0xFFFF_A030);
    }

    fn fill_box(video: &mut VideoContext, x: i32, y: i32, color: u32) {
        let left = x.max(0) as u32;
        let top = y.max(0) as u32;
        if let DrawSurface::TrueColor {
            pixels,
            pitch,
            width,
            height,
        } = video.draw_surface()
        {
            let right = left.saturating_add(BOX_SIZE).min(width);
            let bottom = top.saturating_add(BOX_SIZE).min(height);
            for yy in top..bottom {
                for xx in left..right {
                    pixels[(yy * pitch + xx) as usize] = color;
                }
            }
        }
        video.mark_dirty(left, top, BOX_SIZE, BOX_SIZE);
    }

    fn draw_cursor_block(video: &mut VideoContext, x: i32, y: i32, erase: bool) {
        let left = x.max(0) as u32;
        let top = y.max(0) as u32;
        match video.draw_surface() {
            DrawSurface::Indexed {
                pixels,
                width,
                height,
            } => {
                let right = left.saturating_add(CURSOR_SIZE).min(width);
                let bottom = top.saturating_add(CURSOR_SIZE).min(height);
                let index = if erase { 0 } else { 255 };
                for yy in top..bottom {
                    for xx in left..right {
                        pixels[(yy * width + xx) as usize] = index;
                    }
                }
            }
            DrawSurface::TrueColor {
                pixels,
                pitch,
                width,
                height,
            } => {
                let right = left.saturating_add(CURSOR_SIZE).min(width);
                let bottom = top.saturating_add(CURSOR_SIZE).min(height);
                let color = if erase { OPAQUE_BLACK } else { 0xFFFF_FFFF };
                for yy in top..bottom {
                    for xx in left..right {
                        pixels[(yy * pitch + xx) as usize] = color;
                    }
                }
            }
        }
        video.mark_dirty(left, top, CURSOR_SIZE, CURSOR_SIZE);
    }
}

impl Simulation for DemoSim {
    fn color_depth(&self) -> ColorDepth {
        match self.scene {
            DemoScene::Plasma => ColorDepth::Indexed8,
            DemoScene::Bounce => ColorDepth::TrueColor32,
        }
    }

    fn step(&mut self, video: &mut VideoContext) {
        if self.paused {
            return;
        }
        match self.scene {
            DemoScene::Plasma => self.step_plasma(video),
            DemoScene::Bounce => self.step_bounce(video),
        }
    }

    fn update_overlays(&mut self, video: &mut VideoContext) {
        if self.cursor == self.cursor_drawn {
            return;
        }
        if let Some((x, y)) = self.cursor_drawn {
            Self::draw_cursor_block(video, x, y, true);
        }
        if let Some((x, y)) = self.cursor {
            Self::draw_cursor_block(video, x, y, false);
        }
        self.cursor_drawn = self.cursor;
    }

    fn handle_input(&mut self, event: &VideoEvent) {
        match event {
            VideoEvent::Key {
                key: Key::Escape,
                pressed: true,
            } => self.finished = true,
            VideoEvent::Key {
                key: Key::Space,
                pressed: true,
            } => self.paused = !self.paused,
            VideoEvent::MouseMoved { x, y } => self.cursor = Some((*x, *y)),
            _ => {}
        }
    }

    fn handle_control_state_changed(&mut self, modifiers: Modifiers) {
        log::debug!("control state changed: {modifiers:?}");
    }

    fn palette(&self) -> &[(u8, u8, u8)] {
        &self.palette
    }

    fn take_dirty_palette_range(&mut self) -> Option<(usize, usize)> {
        self.palette_dirty.take()
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn finished(&self) -> bool {
        self.finished
    }
}
