use std::collections::{BTreeMap, HashSet};

use crate::coords::Vec2;

use super::types::{
    FingerEvent, InputEvent, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent, TouchPhase,
};

/// Current input state for a single window.
///
/// Holds "is down" information, the pointer position and active fingers.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<Vec2>,

    pub buttons_down: HashSet<MouseButton>,

    /// Active touch points keyed by finger id, in id order.
    pub fingers: BTreeMap<u64, Vec2>,
}

impl InputState {
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoid stuck buttons when focus changes mid-press.
                    self.buttons_down.clear();
                    self.fingers.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some(Vec2::new(*x, *y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                x,
                y,
                modifiers,
            }) => {
                self.pointer_pos = Some(Vec2::new(*x, *y));
                self.modifiers = *modifiers;
                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }

            InputEvent::MouseWheel { modifiers, .. } => self.modifiers = *modifiers,

            InputEvent::Finger(FingerEvent { id, phase, x, y }) => match phase {
                TouchPhase::Started | TouchPhase::Moved => {
                    self.fingers.insert(*id, Vec2::new(*x, *y));
                }
                TouchPhase::Ended | TouchPhase::Cancelled => {
                    self.fingers.remove(id);
                }
            },

            InputEvent::Pinch { .. } | InputEvent::Rotate { .. } | InputEvent::Pan { .. } => {}
        }
    }

    /// Pointer position, or the origin when unknown.
    pub fn pointer(&self) -> Vec2 {
        self.pointer_pos.unwrap_or_default()
    }
}
