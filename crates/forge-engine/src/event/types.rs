use std::fmt;
use std::time::Instant;

use crate::coords::Vec2;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TouchKind {
    Tap,
    Drag,
    Scale,
    Rotate,
    Translate,
    Resize,
}

impl fmt::Display for TouchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// One contact point in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchPoint {
    pub position: Vec2,
    pub timestamp: Instant,
}

impl TouchPoint {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            timestamp: Instant::now(),
        }
    }
}

/// A recognized gesture.
///
/// Field meaning depends on `kind`:
/// - `Tap`: `touches[0]` is the tap position.
/// - `Drag`: `touches` is `[from, to]`, `delta = to - from`.
/// - `Scale`: `scale` is the zoom delta (negative zooms in).
/// - `Rotate`: `rotation` in radians.
/// - `Translate`: `touches` are the fingers involved, `delta` the pan offset.
/// - `Resize`: `touches[0].position` carries the new surface size.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub kind: TouchKind,
    pub touches: Vec<TouchPoint>,
    pub delta: Vec2,
    pub scale: f32,
    pub rotation: f32,
}

impl TouchEvent {
    pub fn new(kind: TouchKind, touches: Vec<TouchPoint>) -> Self {
        Self {
            kind,
            touches,
            delta: Vec2::zero(),
            scale: 1.0,
            rotation: 0.0,
        }
    }

    pub fn tap(at: Vec2) -> Self {
        Self::new(TouchKind::Tap, vec![TouchPoint::new(at)])
    }

    pub fn drag(from: Vec2, to: Vec2) -> Self {
        Self {
            delta: to - from,
            ..Self::new(TouchKind::Drag, vec![TouchPoint::new(from), TouchPoint::new(to)])
        }
    }

    pub fn scale(delta: f32, at: Vec2) -> Self {
        Self {
            scale: delta,
            ..Self::new(TouchKind::Scale, vec![TouchPoint::new(at)])
        }
    }

    pub fn rotate(radians: f32, at: Vec2) -> Self {
        Self {
            rotation: radians,
            ..Self::new(TouchKind::Rotate, vec![TouchPoint::new(at)])
        }
    }

    pub fn translate(touches: &[Vec2], delta: Vec2) -> Self {
        Self {
            delta,
            ..Self::new(
                TouchKind::Translate,
                touches.iter().copied().map(TouchPoint::new).collect(),
            )
        }
    }

    pub fn resize(width: f32, height: f32) -> Self {
        Self::new(TouchKind::Resize, vec![TouchPoint::new(Vec2::new(width, height))])
    }

    /// Position of the first touch, or the origin when there is none.
    pub fn position(&self) -> Vec2 {
        self.touches.first().map_or(Vec2::zero(), |t| t.position)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    Started,
    Resumed,
    Suspended,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Touch(TouchEvent),
    Lifecycle(Lifecycle),
}

/// Timestamped event plus a consumable "handled" flag.
///
/// The payload is read-only once created; handlers may only mark the event
/// handled, which stops further delivery.
#[derive(Debug, Clone)]
pub struct Event {
    timestamp: Instant,
    handled: bool,
    kind: EventKind,
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            handled: false,
            kind,
        }
    }

    pub fn touch(touch: TouchEvent) -> Self {
        Self::new(EventKind::Touch(touch))
    }

    pub fn lifecycle(stage: Lifecycle) -> Self {
        Self::new(EventKind::Lifecycle(stage))
    }

    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn as_touch(&self) -> Option<&TouchEvent> {
        match &self.kind {
            EventKind::Touch(t) => Some(t),
            EventKind::Lifecycle(_) => None,
        }
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    pub fn mark_handled(&mut self) {
        self.handled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_delta_is_end_minus_start() {
        let t = TouchEvent::drag(Vec2::new(10.0, 10.0), Vec2::new(13.0, 6.0));
        assert_eq!(t.kind, TouchKind::Drag);
        assert_eq!(t.delta, Vec2::new(3.0, -4.0));
        assert_eq!(t.touches.len(), 2);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn resize_carries_size_as_first_point() {
        let t = TouchEvent::resize(800.0, 600.0);
        assert_eq!(t.position(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn translate_keeps_all_fingers() {
        let t = TouchEvent::translate(&[Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)], Vec2::new(0.5, 0.0));
        assert_eq!(t.touches.len(), 2);
        assert_eq!(t.delta, Vec2::new(0.5, 0.0));
    }

    #[test]
    fn handled_flag_starts_clear() {
        let mut e = Event::touch(TouchEvent::tap(Vec2::zero()));
        assert!(!e.is_handled());
        assert!(e.as_touch().is_some());
        e.mark_handled();
        assert!(e.is_handled());
        assert!(Event::lifecycle(Lifecycle::Started).as_touch().is_none());
    }
}
