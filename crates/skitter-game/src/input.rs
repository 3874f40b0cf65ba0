//! Input system with action-based mapping
//!
//! Raw winit events are mapped to camera actions and queued as press/release
//! edges. The camera rig drains the queue between frames; continuous cursor
//! state is read separately through [`Cursor`].

use std::collections::{HashMap, HashSet, VecDeque};

use glam::{IVec2, UVec2, Vec2};
use serde::{Deserialize, Serialize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Camera actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraAction {
    /// Orbit drag (middle mouse button by default)
    Orbit,
    /// Zoom in (scroll up)
    ZoomIn,
    /// Zoom out (scroll down)
    ZoomOut,
    /// Pan away from the camera (Up arrow by default)
    PanUp,
    /// Pan toward the camera (Down arrow by default)
    PanDown,
    /// Pan left (Left arrow by default)
    PanLeft,
    /// Pan right (Right arrow by default)
    PanRight,
}

/// A discrete input edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Pressed(CameraAction),
    Released(CameraAction),
}

/// Held state of the four directional pan keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl PanKeys {
    /// Record a press or release of a pan action. Returns false for non-pan actions.
    pub fn set(&mut self, action: CameraAction, held: bool) -> bool {
        match action {
            CameraAction::PanUp => self.up = held,
            CameraAction::PanDown => self.down = held,
            CameraAction::PanLeft => self.left = held,
            CameraAction::PanRight => self.right = held,
            _ => return false,
        }
        true
    }

    /// +1 for up, -1 for down, 0 when neither or both are held
    pub fn vertical(&self) -> i8 {
        match (self.up, self.down) {
            (true, false) => 1,
            (false, true) => -1,
            _ => 0,
        }
    }

    /// +1 for right, -1 for left, 0 when neither or both are held
    pub fn horizontal(&self) -> i8 {
        match (self.left, self.right) {
            (false, true) => 1,
            (true, false) => -1,
            _ => 0,
        }
    }

    /// Release every key
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Cursor collaborator supplied by the windowing layer.
///
/// Positions are normalized device coordinates in `[-1, 1]` with +Y up;
/// warps use window pixels with the origin in the top-left corner.
pub trait Cursor {
    /// Cursor position, or `None` while the pointer is outside the window
    fn position(&self) -> Option<Vec2>;

    /// Window size in pixels
    fn window_size(&self) -> UVec2;

    /// Hide the cursor
    fn hide(&mut self);

    /// Show the cursor
    fn show(&mut self);

    /// Move the pointer to a window pixel
    fn warp(&mut self, pixel: IVec2);
}

/// Binding of a physical key to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Keyboard key
    Key(KeyCode),
    /// Mouse button
    Mouse(u32), // 0 = left, 1 = right, 2 = middle
}

impl From<KeyCode> for InputBinding {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

/// Maps physical inputs to camera actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    /// Key/button to action mappings
    bindings: HashMap<InputBinding, CameraAction>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };

        bindings.bind_mouse(2, CameraAction::Orbit);

        bindings.bind(KeyCode::ArrowUp, CameraAction::PanUp);
        bindings.bind(KeyCode::ArrowDown, CameraAction::PanDown);
        bindings.bind(KeyCode::ArrowLeft, CameraAction::PanLeft);
        bindings.bind(KeyCode::ArrowRight, CameraAction::PanRight);

        bindings
    }
}

impl InputBindings {
    /// Create new input bindings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to an action
    pub fn bind(&mut self, key: KeyCode, action: CameraAction) {
        self.bindings.insert(InputBinding::Key(key), action);
    }

    /// Bind a mouse button to an action
    pub fn bind_mouse(&mut self, button: u32, action: CameraAction) {
        self.bindings.insert(InputBinding::Mouse(button), action);
    }

    /// Get the action for a binding, if any
    pub fn get_action(&self, binding: &InputBinding) -> Option<CameraAction> {
        self.bindings.get(binding).copied()
    }

    /// Get the action for a key, if any
    pub fn get_key_action(&self, key: KeyCode) -> Option<CameraAction> {
        self.get_action(&InputBinding::Key(key))
    }
}

/// Turns raw window events into queued press/release edges
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Input bindings
    pub bindings: InputBindings,
    /// Actions currently held down
    held: HashSet<CameraAction>,
    /// Edges not yet consumed
    pending: VecDeque<InputEvent>,
}

impl InputHandler {
    /// Create a new input handler with default bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        if let PhysicalKey::Code(key_code) = physical_key {
            if let Some(action) = self.bindings.get_key_action(key_code) {
                self.record(action, element_state);
            }
        }
    }

    /// Handle a mouse button event
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let button_id = match button {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
            MouseButton::Back => 3,
            MouseButton::Forward => 4,
            MouseButton::Other(id) => id as u32,
        };

        if let Some(action) = self.bindings.get_action(&InputBinding::Mouse(button_id)) {
            self.record(action, state);
        }
    }

    /// Handle scroll wheel. Each notch is a single zoom press.
    pub fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        let scroll = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
        };

        if scroll > 0.0 {
            self.pending.push_back(InputEvent::Pressed(CameraAction::ZoomIn));
        } else if scroll < 0.0 {
            self.pending.push_back(InputEvent::Pressed(CameraAction::ZoomOut));
        }
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: CameraAction) -> bool {
        self.held.contains(&action)
    }

    /// Take every queued edge in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.pending.drain(..)
    }

    /// Release everything, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        for action in self.held.drain() {
            self.pending.push_back(InputEvent::Released(action));
        }
    }

    fn record(&mut self, action: CameraAction, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // Ignore key repeat
                if self.held.insert(action) {
                    self.pending.push_back(InputEvent::Pressed(action));
                }
            }
            ElementState::Released => {
                if self.held.remove(&action) {
                    self.pending.push_back(InputEvent::Released(action));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = InputBindings::default();
        assert_eq!(
            bindings.get_key_action(KeyCode::ArrowUp),
            Some(CameraAction::PanUp)
        );
        assert_eq!(
            bindings.get_action(&InputBinding::Mouse(2)),
            Some(CameraAction::Orbit)
        );
        assert_eq!(bindings.get_key_action(KeyCode::KeyW), None);
    }

    #[test]
    fn test_key_repeat_is_filtered() {
        let mut handler = InputHandler::new();
        let up = PhysicalKey::Code(KeyCode::ArrowUp);
        handler.handle_keyboard(up, ElementState::Pressed);
        handler.handle_keyboard(up, ElementState::Pressed);
        assert!(handler.is_held(CameraAction::PanUp));
        handler.handle_keyboard(up, ElementState::Released);

        let events: Vec<_> = handler.drain().collect();
        assert_eq!(
            events,
            vec![
                InputEvent::Pressed(CameraAction::PanUp),
                InputEvent::Released(CameraAction::PanUp),
            ]
        );
        assert!(!handler.is_held(CameraAction::PanUp));
    }

    #[test]
    fn test_scroll_and_mouse() {
        let mut handler = InputHandler::new();
        handler.handle_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        handler.handle_scroll(MouseScrollDelta::LineDelta(0.0, -2.0));
        handler.handle_mouse_button(MouseButton::Middle, ElementState::Pressed);
        handler.handle_mouse_button(MouseButton::Left, ElementState::Pressed);

        let events: Vec<_> = handler.drain().collect();
        assert_eq!(
            events,
            vec![
                InputEvent::Pressed(CameraAction::ZoomIn),
                InputEvent::Pressed(CameraAction::ZoomOut),
                InputEvent::Pressed(CameraAction::Orbit),
            ]
        );

        handler.release_all();
        let events: Vec<_> = handler.drain().collect();
        assert_eq!(events, vec![InputEvent::Released(CameraAction::Orbit)]);
    }

    #[test]
    fn test_pan_keys_xor() {
        let mut keys = PanKeys::default();
        assert_eq!(keys.vertical(), 0);
        keys.set(CameraAction::PanUp, true);
        assert_eq!(keys.vertical(), 1);
        keys.set(CameraAction::PanDown, true);
        assert_eq!(keys.vertical(), 0);
        keys.set(CameraAction::PanUp, false);
        assert_eq!(keys.vertical(), -1);

        keys.set(CameraAction::PanLeft, true);
        assert_eq!(keys.horizontal(), -1);
        assert!(!keys.set(CameraAction::Orbit, true));
        keys.clear();
        assert_eq!(keys, PanKeys::default());
    }
}
