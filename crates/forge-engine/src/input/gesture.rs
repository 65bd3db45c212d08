use crate::coords::Vec2;
use crate::event::TouchEvent;

use super::state::InputState;
use super::types::{
    FingerEvent, InputEvent, MouseButton, MouseButtonState, MouseWheelDelta, PointerButtonEvent,
    TouchPhase,
};

/// Logical pixels per wheel "line" when a trackpad reports pixel deltas.
const PIXELS_PER_LINE: f32 = 40.0;

/// Thresholds for raw input → gesture translation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GestureConfig {
    /// Max pointer travel (logical px) for a press/release to count as a tap.
    pub tap_slop: f32,
    /// Multiplier applied to drag and translate deltas.
    pub drag_scale: f32,
    /// Zoom delta per wheel line.
    pub wheel_zoom_step: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_slop: 4.0,
            drag_scale: 1.0,
            wheel_zoom_step: 0.25,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum PressMode {
    Drag,
    Translate,
}

#[derive(Debug, Copy, Clone)]
struct Press {
    mode: PressMode,
    button: Option<MouseButton>,
    origin: Vec2,
    last: Vec2,
    moved: bool,
}

/// Turns raw pointer, wheel, trackpad and touch input into [`TouchEvent`]s.
///
/// - primary press + release within `tap_slop` → `Tap`
/// - primary press + movement → `Drag` per move
/// - secondary/middle press (or primary with ctrl/shift) + movement,
///   two-finger touch or trackpad pan → `Translate`
/// - wheel, trackpad pinch, two-finger spread → `Scale` (negative zooms in)
/// - trackpad rotation → `Rotate`
/// - [`resize`](Self::resize) → `Resize`
#[derive(Debug, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    state: InputState,
    press: Option<Press>,
    /// Centroid and spread of the previous two-finger sample.
    pinch: Option<(Vec2, f32)>,
    size: (u32, u32),
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Last size reported through [`resize`](Self::resize).
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Feeds one raw event; returns the gestures it completes (often none).
    pub fn process(&mut self, ev: &InputEvent) -> Vec<TouchEvent> {
        let mut out = Vec::new();
        match ev {
            InputEvent::PointerButton(b) => self.on_button(b, &mut out),
            InputEvent::PointerMoved(m) => self.on_move(Vec2::new(m.x, m.y), &mut out),
            InputEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseWheelDelta::Line { y, .. } => *y,
                    MouseWheelDelta::Pixel { y, .. } => *y / PIXELS_PER_LINE,
                };
                if lines != 0.0 {
                    let at = self.state.pointer();
                    out.push(TouchEvent::scale(-lines * self.config.wheel_zoom_step, at));
                }
            }
            InputEvent::Pinch { delta } => {
                out.push(TouchEvent::scale(-*delta, self.state.pointer()));
            }
            InputEvent::Rotate { radians } => {
                out.push(TouchEvent::rotate(*radians, self.state.pointer()));
            }
            InputEvent::Pan { dx, dy } => {
                let at = self.state.pointer();
                let delta = Vec2::new(*dx, *dy) * self.config.drag_scale;
                out.push(TouchEvent::translate(&[at], delta));
            }
            InputEvent::Finger(f) => {
                // Finger state is applied inside, between the before/after samples.
                self.on_finger(f, &mut out);
                return out;
            }
            InputEvent::Focused(false) | InputEvent::PointerLeft => {
                self.press = None;
                self.pinch = None;
            }
            InputEvent::Focused(true) | InputEvent::ModifiersChanged(_) => {}
        }
        self.state.apply_event(ev);
        out
    }

    /// Records the new surface size and returns the matching gesture.
    pub fn resize(&mut self, width: u32, height: u32) -> TouchEvent {
        self.size = (width, height);
        TouchEvent::resize(width as f32, height as f32)
    }

    fn on_button(&mut self, b: &PointerButtonEvent, out: &mut Vec<TouchEvent>) {
        let at = Vec2::new(b.x, b.y);
        match b.state {
            MouseButtonState::Pressed => {
                let mode = match b.button {
                    MouseButton::Left if b.modifiers.ctrl || b.modifiers.shift => {
                        PressMode::Translate
                    }
                    MouseButton::Left => PressMode::Drag,
                    MouseButton::Right | MouseButton::Middle => PressMode::Translate,
                    _ => return,
                };
                if self.press.is_none() {
                    self.press = Some(Press {
                        mode,
                        button: Some(b.button),
                        origin: at,
                        last: at,
                        moved: false,
                    });
                }
            }
            MouseButtonState::Released => {
                let Some(press) = self.press else {
                    return;
                };
                if press.button != Some(b.button) {
                    return;
                }
                self.press = None;
                if press.mode == PressMode::Drag && !press.moved && press.origin.distance(at) <= self.config.tap_slop {
                    out.push(TouchEvent::tap(at));
                }
            }
        }
    }

    fn on_move(&mut self, to: Vec2, out: &mut Vec<TouchEvent>) {
        let scale = self.config.drag_scale;
        let slop = self.config.tap_slop;
        let Some(press) = self.press.as_mut() else {
            return;
        };
        if !press.moved && press.origin.distance(to) <= slop {
            return;
        }
        press.moved = true;

        let from = press.last;
        press.last = to;
        match press.mode {
            PressMode::Drag => {
                let mut drag = TouchEvent::drag(from, to);
                drag.delta = drag.delta * scale;
                out.push(drag);
            }
            PressMode::Translate => {
                out.push(TouchEvent::translate(&[to], (to - from) * scale));
            }
        }
    }

    fn on_finger(&mut self, f: &FingerEvent, out: &mut Vec<TouchEvent>) {
        let at = Vec2::new(f.x, f.y);
        let before = self.state.fingers.len();
        self.state.apply_event(&InputEvent::Finger(*f));
        let fingers: Vec<Vec2> = self.state.fingers.values().copied().collect();

        match (f.phase, before, fingers.len()) {
            // First finger down: behaves like a primary press.
            (TouchPhase::Started, 0, 1) => {
                self.press = Some(Press {
                    mode: PressMode::Drag,
                    button: None,
                    origin: at,
                    last: at,
                    moved: false,
                });
            }
            (TouchPhase::Moved, _, 1) => self.on_move(at, out),
            (TouchPhase::Ended, 1, 0) => {
                if let Some(press) = self.press.take()
                    && !press.moved
                    && press.origin.distance(at) <= self.config.tap_slop
                {
                    out.push(TouchEvent::tap(at));
                }
            }
            (_, _, 2) => {
                // Two fingers cancel any single-finger gesture.
                self.press = None;
                let centroid = Vec2::centroid(&fingers);
                let spread = fingers[0].distance(fingers[1]);
                if let Some((prev_centroid, prev_spread)) = self.pinch
                    && f.phase == TouchPhase::Moved
                {
                    let delta = (centroid - prev_centroid) * self.config.drag_scale;
                    if delta != Vec2::zero() {
                        out.push(TouchEvent::translate(&fingers, delta));
                    }
                    if prev_spread > 0.0 && spread != prev_spread {
                        out.push(TouchEvent::scale(1.0 - spread / prev_spread, centroid));
                    }
                }
                self.pinch = Some((centroid, spread));
            }
            _ => {}
        }

        if fingers.len() != 2 {
            self.pinch = None;
        }
        if fingers.is_empty() {
            self.press = None;
        }
    }
}
