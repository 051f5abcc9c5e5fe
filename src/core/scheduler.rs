use std::time::Duration;

use super::clock::Clock;
use super::events::{EventSource, Modifiers, VideoEvent};
use super::presenter::{FramePresenter, PresentTarget};
use super::simulation::Simulation;
use super::video::VideoContext;

/// Default simulation cadence.
pub const DEFAULT_TICK_MS: u32 = 30;

/// Bounded sleep between iterations when no tick is due.
pub const DEFAULT_IDLE_SLEEP: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub tick_period_ms: u32,
    /// Set to zero in tests driven by scripted clocks.
    pub idle_sleep: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_MS,
            idle_sleep: DEFAULT_IDLE_SLEEP,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Continue,
    Terminated,
}

/// Arbitrates the three timing domains: event drain, fixed-cadence
/// simulation steps, and presentation.
///
/// Single-threaded by contract. The only suspension points are the bounded
/// idle sleep and a forced present inside the target; input draining never
/// waits. Recoverable mid-loop failures are logged and the frame is skipped;
/// allocation failures shut the surface down through the same terminal path
/// as an ordinary close.
#[derive(Debug)]
pub struct TickScheduler {
    config: SchedulerConfig,
    started: bool,
    previous_now: u32,
    next_deadline: u32,
    elapsed_ms: u64,
    last_modifiers: Modifiers,
    fullscreen: bool,
    terminated: bool,
}

impl TickScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            started: false,
            previous_now: 0,
            next_deadline: 0,
            elapsed_ms: 0,
            last_modifiers: Modifiers::default(),
            fullscreen: false,
            terminated: false,
        }
    }

    /// Accumulated real time observed by the loop, for the simulation layer.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Request termination from outside the event stream.
    pub fn request_termination(&mut self) {
        self.terminated = true;
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// One loop iteration. Call repeatedly until [`LoopState::Terminated`].
    pub fn run_iteration(
        &mut self,
        clock: &mut dyn Clock,
        events: &mut dyn EventSource,
        sim: &mut dyn Simulation,
        video: &mut VideoContext,
        presenter: &mut FramePresenter,
        target: &mut dyn PresentTarget,
    ) -> LoopState {
        let now = clock.now_ms();
        let wrapped = self.started && now < self.previous_now;
        if !self.started {
            self.started = true;
            self.next_deadline = now.wrapping_add(self.config.tick_period_ms);
        } else if !wrapped {
            self.elapsed_ms += u64::from(now - self.previous_now);
        }
        self.previous_now = now;

        self.drain_events(events, sim, video, target);
        if sim.finished() {
            self.terminated = true;
        }

        if self.terminated {
            // Leaving fullscreen restores the desktop resolution before the
            // surface goes away.
            if self.fullscreen && target.toggle_fullscreen(false) {
                self.fullscreen = false;
            }
            return LoopState::Terminated;
        }

        if video.take_needs_rebind() {
            if let Err(err) = target.rebind(video.width(), video.height()) {
                log::error!("present target rebind failed: {err}");
                self.terminated = true;
                return LoopState::Terminated;
            }
        }

        let modifiers = events.modifiers();
        let fast_forward = modifiers.shift && sim.fast_forward_allowed() && !sim.paused();
        // Wraparound counts as due so the loop cannot stall waiting for a
        // deadline the clock will never reach again.
        let due =
            wrapped || fast_forward || now.wrapping_sub(self.next_deadline) as i32 >= 0;

        if due {
            let deadline_reached = now.wrapping_sub(self.next_deadline) as i32 >= 0;
            self.next_deadline = if !wrapped && deadline_reached {
                self.next_deadline.wrapping_add(self.config.tick_period_ms)
            } else {
                // Wraparound or a fast-forward step ahead of the cadence:
                // re-base so releasing the modifier resumes normal pacing.
                now.wrapping_add(self.config.tick_period_ms)
            };

            if modifiers != self.last_modifiers {
                sim.handle_control_state_changed(modifiers);
                self.last_modifiers = modifiers;
            }

            sim.step(video);
            sim.update_overlays(video);
            self.check_palette_animation(sim, video);
        } else {
            if !self.config.idle_sleep.is_zero() {
                std::thread::sleep(self.config.idle_sleep);
            }
            // Overlays can change without a simulation step.
            sim.update_overlays(video);
        }

        if let Err(err) = video.present(presenter, target, false) {
            log::warn!("present failed, frame skipped: {err}");
        }

        LoopState::Continue
    }

    fn drain_events(
        &mut self,
        events: &mut dyn EventSource,
        sim: &mut dyn Simulation,
        video: &mut VideoContext,
        target: &mut dyn PresentTarget,
    ) {
        while let Some(event) = events.poll_event() {
            match event {
                VideoEvent::Resized { width, height } => {
                    if let Err(err) = video.resize(width, height) {
                        log::error!("resize to {width}x{height} failed: {err}");
                        self.terminated = true;
                    }
                }
                VideoEvent::VisibilityChanged(visible) => target.set_visible(visible),
                VideoEvent::FullscreenChanged(fullscreen) => self.fullscreen = fullscreen,
                VideoEvent::CloseRequested => self.terminated = true,
                other => sim.handle_input(&other),
            }
        }
    }

    fn check_palette_animation(&self, sim: &mut dyn Simulation, video: &mut VideoContext) {
        if let Some((first, count)) = sim.take_dirty_palette_range() {
            let palette = sim.palette();
            let end = first.saturating_add(count).min(palette.len());
            if first < end {
                video.update_palette(first, &palette[first..end]);
            }
        }
    }
}
