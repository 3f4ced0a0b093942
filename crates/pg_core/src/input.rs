//! Input state tracking with a level-triggered key set and a discrete event queue.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every tick the key
//!   is physically down. Movement and attacks read this.
//!
//! - **Discrete events:** key presses, typed characters, pointer moves, pointer
//!   presses and close requests are queued in arrival order. The main loop hands
//!   the whole queue to the first fixed simulation step of a frame via
//!   `take_events()`. A frame with zero simulation steps leaves the queue intact,
//!   so a click that lands between steps is never lost.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    W,
    A,
    S,
    D,
    Space,
    Enter,
    Escape,
    Backspace,
    F3,
    F11,
}

impl Key {
    /// Whether OS auto-repeat of this key is delivered as further presses.
    pub fn repeats(self) -> bool {
        matches!(self, Key::Backspace)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    Text(char),
    PointerMoved { x: f64, y: f64 },
    PointerDown { x: f64, y: f64 },
    CloseRequested,
}

pub struct InputState {
    held: HashSet<Key>,
    events: Vec<InputEvent>,

    pub mouse_position: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            events: Vec::new(),
            mouse_position: (0.0, 0.0),
        }
    }

    /// Physical press. OS auto-repeat must go through `key_repeat` instead.
    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.events.push(InputEvent::KeyDown(key));
        }
    }

    /// Auto-repeat of a key that is already held. Only editing keys repeat;
    /// toggles like F11 and F3 fire once per physical press.
    pub fn key_repeat(&mut self, key: Key) {
        if key.repeats() && self.held.contains(&key) {
            self.events.push(InputEvent::KeyDown(key));
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn text(&mut self, ch: char) {
        if !ch.is_control() {
            self.events.push(InputEvent::Text(ch));
        }
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.mouse_position = (x, y);
        self.events.push(InputEvent::PointerMoved { x, y });
    }

    pub fn pointer_down(&mut self) {
        let (x, y) = self.mouse_position;
        self.events.push(InputEvent::PointerDown { x, y });
    }

    pub fn close_requested(&mut self) {
        self.events.push(InputEvent::CloseRequested);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    pub fn take_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop held keys, e.g. when the window loses focus and releases are never delivered.
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_queues_event() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        assert!(input.is_held(Key::A));
        assert_eq!(input.take_events(), vec![InputEvent::KeyDown(Key::A)]);
    }

    #[test]
    fn test_key_up_clears_held() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_up(Key::A);
        assert!(!input.is_held(Key::A));
    }

    #[test]
    fn test_key_down_repeat_does_not_double_queue() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        // Second key_down for the same key is ignored since the key is
        // already in held (HashSet::insert returns false).
        input.key_down(Key::A);
        assert!(input.is_held(Key::A));
        assert_eq!(input.pending_events(), 1);
    }

    #[test]
    fn test_key_repeat_requires_held_key() {
        let mut input = InputState::new();
        input.key_repeat(Key::Backspace);
        assert_eq!(input.pending_events(), 0);

        input.key_down(Key::Backspace);
        input.key_repeat(Key::Backspace);
        input.key_repeat(Key::Backspace);
        assert_eq!(
            input.take_events(),
            vec![InputEvent::KeyDown(Key::Backspace); 3]
        );
    }

    #[test]
    fn test_key_repeat_ignores_toggle_keys() {
        let mut input = InputState::new();
        input.key_down(Key::F11);
        input.key_repeat(Key::F11);
        input.key_repeat(Key::F11);
        input.key_down(Key::F3);
        input.key_repeat(Key::F3);
        input.key_down(Key::Space);
        input.key_repeat(Key::Space);
        assert_eq!(
            input.take_events(),
            vec![
                InputEvent::KeyDown(Key::F11),
                InputEvent::KeyDown(Key::F3),
                InputEvent::KeyDown(Key::Space),
            ]
        );
        assert!(input.is_held(Key::F11));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::A);
        assert!(!input.is_held(Key::A));
        assert_eq!(input.pending_events(), 0);
    }

    #[test]
    fn test_take_events_drains_queue_but_keeps_held() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_down(Key::Space);
        assert_eq!(input.take_events().len(), 2);
        assert!(input.take_events().is_empty());
        // Held state should persist across ticks.
        assert!(input.is_held(Key::A));
        assert!(input.is_held(Key::Space));
    }

    #[test]
    fn test_text_filters_control_characters() {
        let mut input = InputState::new();
        input.text('R');
        input.text('\r');
        input.text('\u{8}');
        input.text(' ');
        assert_eq!(
            input.take_events(),
            vec![InputEvent::Text('R'), InputEvent::Text(' ')]
        );
    }

    #[test]
    fn test_pointer_down_uses_last_position() {
        let mut input = InputState::new();
        input.pointer_moved(100.0, 200.0);
        input.pointer_down();
        assert_eq!(
            input.take_events(),
            vec![
                InputEvent::PointerMoved { x: 100.0, y: 200.0 },
                InputEvent::PointerDown { x: 100.0, y: 200.0 },
            ]
        );
        assert!((input.mouse_position.0 - 100.0).abs() < f64::EPSILON);
        assert!((input.mouse_position.1 - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_events_keep_arrival_order() {
        let mut input = InputState::new();
        input.key_down(Key::F11);
        input.close_requested();
        input.text('x');
        assert_eq!(
            input.take_events(),
            vec![
                InputEvent::KeyDown(Key::F11),
                InputEvent::CloseRequested,
                InputEvent::Text('x'),
            ]
        );
    }

    #[test]
    fn test_release_all_clears_held() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::D);
        input.release_all();
        assert!(!input.is_held(Key::Left));
        assert!(!input.is_held(Key::D));
    }

    #[test]
    fn test_default_state_is_empty() {
        let input = InputState::new();
        assert!(!input.is_held(Key::A));
        assert!(!input.is_held(Key::Space));
        assert_eq!(input.pending_events(), 0);
        assert!((input.mouse_position.0 - 0.0).abs() < f64::EPSILON);
        assert!((input.mouse_position.1 - 0.0).abs() < f64::EPSILON);
    }
}
