use std::collections::VecDeque;
use winit::event::{ElementState, MouseButton as WinitMouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::events::{EventSource, Key, Modifiers, MouseButton, VideoEvent};

/// Bridges winit window events to the scheduler's [`EventSource`] contract.
///
/// Events are queued as they arrive from the OS and drained non-blockingly
/// by the tick scheduler on its next iteration.
#[derive(Debug, Default)]
pub struct WinitEventAdapter {
    queue: VecDeque<VideoEvent>,
    modifiers: Modifiers,
}

impl WinitEventAdapter {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            modifiers: Modifiers::default(),
        }
    }

    /// Inject a synthesized event, e.g. a close request from the app shell.
    pub fn push(&mut self, event: VideoEvent) {
        self.queue.push_back(event);
    }

    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(size) => self.queue.push_back(VideoEvent::Resized {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::CloseRequested => self.queue.push_back(VideoEvent::CloseRequested),
            WindowEvent::Occluded(occluded) => self
                .queue
                .push_back(VideoEvent::VisibilityChanged(!*occluded)),
            WindowEvent::ModifiersChanged(new_modifiers) => {
                let state = new_modifiers.state();
                self.modifiers = Modifiers {
                    shift: state.shift_key(),
                    control: state.control_key(),
                    alt: state.alt_key(),
                };
                self.queue
                    .push_back(VideoEvent::ModifiersChanged(self.modifiers));
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if let Some(key) = Self::keycode_to_key(code) {
                        self.queue.push_back(VideoEvent::Key {
                            key,
                            pressed: event.state == ElementState::Pressed,
                        });
                    }
                }
                if event.state == ElementState::Pressed {
                    if let Some(text) = event.text.as_ref() {
                        for ch in text.chars().filter(|c| !c.is_control()) {
                            self.queue.push_back(VideoEvent::Text(ch));
                        }
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = Self::mouse_button(*button) {
                    self.queue.push_back(VideoEvent::MouseButton {
                        button,
                        pressed: *state == ElementState::Pressed,
                    });
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.queue.push_back(VideoEvent::MouseMoved {
                    x: position.x as i32,
                    y: position.y as i32,
                });
            }
            _ => {}
        }
    }

    fn keycode_to_key(code: KeyCode) -> Option<Key> {
        match code {
            KeyCode::Escape => Some(Key::Escape),
            KeyCode::Space => Some(Key::Space),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::ArrowUp => Some(Key::Up),
            KeyCode::ArrowDown => Some(Key::Down),
            KeyCode::ArrowLeft => Some(Key::Left),
            KeyCode::ArrowRight => Some(Key::Right),
            KeyCode::PageUp => Some(Key::PageUp),
            KeyCode::PageDown => Some(Key::PageDown),
            _ => None,
        }
    }

    fn mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
        match button {
            WinitMouseButton::Left => Some(MouseButton::Left),
            WinitMouseButton::Right => Some(MouseButton::Right),
            WinitMouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

impl EventSource for WinitEventAdapter {
    fn poll_event(&mut self) -> Option<VideoEvent> {
        self.queue.pop_front()
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Winit event construction needs private fields; these cover the queue
    // contract and the synthesized-event path.

    #[test]
    fn new_adapter_has_nothing_pending() {
        let mut adapter = WinitEventAdapter::new();
        assert_eq!(adapter.poll_event(), None);
        assert_eq!(adapter.modifiers(), Modifiers::default());
    }

    #[test]
    fn pushed_events_drain_in_order() {
        let mut adapter = WinitEventAdapter::new();
        adapter.push(VideoEvent::VisibilityChanged(false));
        adapter.push(VideoEvent::CloseRequested);

        assert_eq!(
            adapter.poll_event(),
            Some(VideoEvent::VisibilityChanged(false))
        );
        assert_eq!(adapter.poll_event(), Some(VideoEvent::CloseRequested));
        assert_eq!(adapter.poll_event(), None);
    }
}
