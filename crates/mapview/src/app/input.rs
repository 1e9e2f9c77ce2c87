use winit::event::{ElementState, MouseButton};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::geometry::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerAction {
    Quit,
    ToggleSpriteMode,
    Scroll(Vec2),
}

const KEY_SLOT_COUNT: usize = 6;

fn key_slot(key: KeyCode) -> Option<usize> {
    match key {
        KeyCode::Escape => Some(0),
        KeyCode::Tab => Some(1),
        KeyCode::ArrowUp | KeyCode::KeyW => Some(2),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(3),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(4),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(5),
        _ => None,
    }
}

pub fn action_for_key(key: PhysicalKey) -> Option<ViewerAction> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    match code {
        KeyCode::Escape => Some(ViewerAction::Quit),
        KeyCode::Tab => Some(ViewerAction::ToggleSpriteMode),
        KeyCode::ArrowUp | KeyCode::KeyW => Some(ViewerAction::Scroll(Vec2::new(0, -1))),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(ViewerAction::Scroll(Vec2::new(0, 1))),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(ViewerAction::Scroll(Vec2::new(-1, 0))),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(ViewerAction::Scroll(Vec2::new(1, 0))),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Moved(Vec2),
    LeftPressed(Vec2),
    RightPressed(Vec2),
    LeftReleased,
}

#[derive(Debug, Default)]
pub struct InputCollector {
    keys_down: [bool; KEY_SLOT_COUNT],
    cursor: Option<Vec2>,
    left_is_down: bool,
    right_is_down: bool,
    actions: Vec<ViewerAction>,
    pointer: Vec<PointerEvent>,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    // Edge-triggered: held keys do not repeat.
    pub fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        let Some(slot) = key_slot(code) else {
            return;
        };
        match state {
            ElementState::Pressed => {
                if !self.keys_down[slot] {
                    if let Some(action) = action_for_key(key) {
                        self.actions.push(action);
                    }
                }
                self.keys_down[slot] = true;
            }
            ElementState::Released => self.keys_down[slot] = false,
        }
    }

    pub fn set_cursor(&mut self, pos: Vec2) {
        if self.cursor != Some(pos) {
            self.pointer.push(PointerEvent::Moved(pos));
        }
        self.cursor = Some(pos);
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    pub fn handle_mouse_input(&mut self, button: MouseButton, state: ElementState) {
        match (button, state) {
            (MouseButton::Left, ElementState::Pressed) => {
                if !self.left_is_down {
                    if let Some(pos) = self.cursor {
                        self.pointer.push(PointerEvent::LeftPressed(pos));
                    }
                }
                self.left_is_down = true;
            }
            (MouseButton::Left, ElementState::Released) => {
                if self.left_is_down {
                    self.pointer.push(PointerEvent::LeftReleased);
                }
                self.left_is_down = false;
            }
            (MouseButton::Right, ElementState::Pressed) => {
                if !self.right_is_down {
                    if let Some(pos) = self.cursor {
                        self.pointer.push(PointerEvent::RightPressed(pos));
                    }
                }
                self.right_is_down = true;
            }
            (MouseButton::Right, ElementState::Released) => self.right_is_down = false,
            _ => {}
        }
    }

    pub fn take_actions(&mut self) -> Vec<ViewerAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn take_pointer_events(&mut self) -> Vec<PointerEvent> {
        std::mem::take(&mut self.pointer)
    }
}
