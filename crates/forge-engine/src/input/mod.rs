//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! The runtime translates platform events into [`InputEvent`]s and the
//! [`GestureRecognizer`] turns those into [`TouchEvent`](crate::event::TouchEvent)s.

mod gesture;
pub(crate) mod platform;
mod state;
mod types;

pub use gesture::{GestureConfig, GestureRecognizer};
pub use state::InputState;
pub use types::{
    FingerEvent,
    InputEvent,
    Modifiers,
    MouseButton,
    MouseButtonState,
    MouseWheelDelta,
    PointerButtonEvent,
    PointerMoveEvent,
    TouchPhase,
};
