use std::cell::Cell;

use async_trait::async_trait;

use crate::event::{Event, EventHandler, EventKind, TouchKind};
use crate::module::{Module, UpdateCtx};

/// Logs every event it sees at `info` and never consumes one.
///
/// Subscribe it first so it observes events before any handler marks them
/// handled. Also reports the frame rate once per `report_every` frames at
/// `debug`.
pub struct InputLogger {
    report_every: u64,
    events: Cell<u64>,
    frames: Cell<u64>,
    frame_time: Cell<f32>,
}

impl InputLogger {
    pub fn new() -> Self {
        Self::with_report_interval(600)
    }

    pub fn with_report_interval(frames: u64) -> Self {
        Self {
            report_every: frames.max(1),
            events: Cell::new(0),
            frames: Cell::new(0),
            frame_time: Cell::new(0.0),
        }
    }

    /// Events observed so far.
    pub fn event_count(&self) -> u64 {
        self.events.get()
    }
}

impl Default for InputLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for InputLogger {
    fn name(&self) -> &str {
        "input-logger"
    }

    fn update(&self, ctx: &mut UpdateCtx<'_>) {
        let frames = self.frames.get() + 1;
        let total = self.frame_time.get() + ctx.dt();
        if frames < self.report_every {
            self.frames.set(frames);
            self.frame_time.set(total);
            return;
        }
        if total > 0.0 {
            log::debug!("{:.1} fps over {frames} frames", frames as f32 / total);
        }
        self.frames.set(0);
        self.frame_time.set(0.0);
    }
}

#[async_trait(?Send)]
impl EventHandler for InputLogger {
    async fn handle(&self, event: &mut Event) -> anyhow::Result<()> {
        self.events.set(self.events.get() + 1);
        match event.kind() {
            EventKind::Lifecycle(stage) => log::info!("lifecycle: {stage:?}"),
            EventKind::Touch(t) => match t.kind {
                TouchKind::Tap => log::info!("tap at {:?}", t.position()),
                TouchKind::Drag => log::info!("drag by {:?}", t.delta),
                TouchKind::Translate => {
                    log::info!("translate by {:?} with {} touches", t.delta, t.touches.len())
                }
                TouchKind::Scale => log::info!("scale {:+.3}", t.scale),
                TouchKind::Rotate => log::info!("rotate {:+.3} rad", t.rotation),
                TouchKind::Resize => {
                    let size = t.position();
                    log::info!("resize to {}x{}", size.x, size.y)
                }
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::event::TouchEvent;

    #[test]
    fn counts_without_consuming() {
        let logger = InputLogger::new();
        let mut tap = Event::touch(TouchEvent::tap(Vec2::new(1.0, 2.0)));
        let mut resize = Event::touch(TouchEvent::resize(640.0, 480.0));

        pollster::block_on(async {
            logger.handle(&mut tap).await.unwrap();
            logger.handle(&mut resize).await.unwrap();
        });

        assert_eq!(logger.event_count(), 2);
        assert!(!tap.is_handled());
        assert!(!resize.is_handled());
    }
}
