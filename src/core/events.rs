/// Modifier-key state, queried once per scheduler iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

/// Keys the video layer forwards to the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Space,
    Enter,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Discrete events delivered into the tick scheduler's drain step.
///
/// Window-layer callbacks (resize, occlusion, fullscreen) arrive as explicit
/// messages alongside input, which keeps the loop single-threaded and
/// non-blocking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VideoEvent {
    Resized { width: u32, height: u32 },
    VisibilityChanged(bool),
    FullscreenChanged(bool),
    CloseRequested,
    Key { key: Key, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool },
    MouseMoved { x: i32, y: i32 },
    Text(char),
    ModifiersChanged(Modifiers),
}

/// Drainable, non-blocking source of [`VideoEvent`]s.
///
/// `poll_event` must never wait: if nothing is pending it returns `None`
/// immediately and the scheduler proceeds.
pub trait EventSource {
    fn poll_event(&mut self) -> Option<VideoEvent>;

    /// Current modifier-key state.
    fn modifiers(&self) -> Modifiers;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct QueueSource {
        queue: VecDeque<VideoEvent>,
        modifiers: Modifiers,
    }

    impl EventSource for QueueSource {
        fn poll_event(&mut self) -> Option<VideoEvent> {
            self.queue.pop_front()
        }

        fn modifiers(&self) -> Modifiers {
            self.modifiers
        }
    }

    #[test]
    fn poll_drains_in_order_then_returns_none() {
        let mut source = QueueSource {
            queue: VecDeque::from(vec![
                VideoEvent::CloseRequested,
                VideoEvent::Key {
                    key: Key::Space,
                    pressed: true,
                },
            ]),
            modifiers: Modifiers::default(),
        };

        assert_eq!(source.poll_event(), Some(VideoEvent::CloseRequested));
        assert_eq!(
            source.poll_event(),
            Some(VideoEvent::Key {
                key: Key::Space,
                pressed: true
            })
        );
        assert_eq!(source.poll_event(), None);
        assert_eq!(source.poll_event(), None);
    }

    #[test]
    fn default_modifiers_are_all_released() {
        let mods = Modifiers::default();
        assert!(!mods.shift && !mods.control && !mods.alt);
    }
}
