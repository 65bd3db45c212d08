use std::rc::Rc;

use crate::event::{Event, EventDispatcher, EventHandler, Lifecycle, TouchEvent};
use crate::input::{GestureRecognizer, InputEvent, InputState};
use crate::module::{DrawCtx, Module, ModuleStack, UpdateCtx};
use crate::render::{RenderCtx, RenderTarget};
use crate::resource::Resources;
use crate::scene::Scene;
use crate::time::FrameTime;

use super::EngineConfig;

/// Owns every piece of engine state and drives it.
///
/// Two pipelines run through it independently:
/// - the frame pipeline: [`tick`](Self::tick) then [`draw`](Self::draw),
///   once per presented frame;
/// - the event pipeline: raw input → [`GestureRecognizer`] → [`Event`] →
///   [`EventDispatcher`], one awaited handler at a time.
///
/// Building an `Engine` never touches the GPU. The runtime acquires the
/// device first and only hands frames to an engine once that succeeded.
pub struct Engine {
    config: EngineConfig,
    scene: Scene,
    resources: Resources,
    dispatcher: EventDispatcher,
    modules: ModuleStack,
    gestures: GestureRecognizer,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_resources(config, Resources::new())
    }

    /// Builds an engine around resource tables shared with other contexts
    /// (for example a background loader holding a clone of `resources`).
    pub fn with_resources(config: EngineConfig, resources: Resources) -> Self {
        let gestures = GestureRecognizer::new(config.gesture);
        Self {
            config,
            scene: Scene::new(),
            resources,
            dispatcher: EventDispatcher::new(),
            modules: ModuleStack::new(),
            gestures,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn modules(&self) -> &ModuleStack {
        &self.modules
    }

    /// Pointer, modifier and finger state as seen by the gesture recognizer.
    pub fn input_state(&self) -> &InputState {
        self.gestures.state()
    }

    /// Returns false if `module` was already on the stack.
    pub fn add_module(&self, module: Rc<dyn Module>) -> bool {
        self.modules.add(module)
    }

    pub fn remove_module<M: Module + ?Sized>(&self, module: &Rc<M>) -> bool {
        self.modules.remove(module)
    }

    /// Subscribes without taking ownership; the caller keeps `handler` alive.
    pub fn subscribe<H: EventHandler + 'static>(&self, handler: &Rc<H>) {
        self.dispatcher.subscribe(handler);
    }

    pub fn unsubscribe<H: EventHandler + 'static>(&self, handler: &Rc<H>) -> bool {
        self.dispatcher.unsubscribe(handler)
    }

    /// Adds a module that also handles events. The module stack keeps it
    /// alive; the dispatcher only observes it.
    pub fn add_participant<M>(&self, participant: &Rc<M>)
    where
        M: Module + EventHandler + 'static,
    {
        self.add_module(participant.clone());
        self.dispatcher.subscribe(participant);
    }

    /// Reverses [`add_participant`](Self::add_participant). Returns true if
    /// it was present in either pipeline.
    pub fn remove_participant<M>(&self, participant: &Rc<M>) -> bool
    where
        M: Module + EventHandler + 'static,
    {
        let in_stack = self.remove_module(participant);
        let subscribed = self.dispatcher.unsubscribe(participant);
        in_stack || subscribed
    }

    /// Announces that the engine is running.
    pub async fn start(&self) -> bool {
        log::info!(
            "engine started: {} modules, {} subscribers",
            self.modules.len(),
            self.dispatcher.len()
        );
        self.lifecycle(Lifecycle::Started).await
    }

    pub async fn lifecycle(&self, stage: Lifecycle) -> bool {
        self.dispatch(Event::lifecycle(stage)).await
    }

    /// Dispatches `event`; returns whether a handler marked it handled.
    pub async fn dispatch(&self, mut event: Event) -> bool {
        self.dispatcher.dispatch(&mut event).await
    }

    /// Wraps a gesture in a timestamped [`Event`] and dispatches it.
    pub async fn handle_touch(&self, touch: TouchEvent) -> bool {
        log::trace!("touch: {} at {:?}", touch.kind, touch.position());
        self.dispatch(Event::touch(touch)).await
    }

    /// Feeds one raw input event through gesture recognition and dispatches
    /// every gesture it completes, in order. Returns how many were dispatched.
    pub async fn handle_input(&mut self, input: &InputEvent) -> usize {
        let touches = self.gestures.process(input);
        let count = touches.len();
        for touch in touches {
            self.handle_touch(touch).await;
        }
        count
    }

    /// Runs one simulation step: every module's `update`, in stack order.
    pub fn tick(&mut self, time: FrameTime) {
        let mut ctx = UpdateCtx {
            time,
            scene: &mut self.scene,
            resources: &self.resources,
        };
        self.modules.update_all(&mut ctx);
    }

    /// Lets every module record draw commands into `target`.
    pub fn draw<'r>(&self, render: &RenderCtx<'r>, target: &mut RenderTarget<'r>) {
        let mut ctx = DrawCtx {
            scene: &self.scene,
            resources: &self.resources,
            render,
            target,
        };
        self.modules.draw_all(&mut ctx);
    }

    /// Notifies modules of the new surface size, then dispatches a `Resize`
    /// gesture carrying it.
    pub async fn resize(&mut self, width: u32, height: u32) -> bool {
        if (width, height) == self.gestures.size() {
            return false;
        }
        log::debug!("resize to {width}x{height}");
        let touch = self.gestures.resize(width, height);
        self.modules.resize_all(width, height);
        self.handle_touch(touch).await
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::time::Instant;

    use async_trait::async_trait;

    use super::*;
    use crate::components::Position;
    use crate::coords::Vec2;
    use crate::event::{EventKind, TouchKind};
    use crate::input::{Modifiers, MouseButton, MouseButtonState, PointerButtonEvent};

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<String>>,
        updates: Cell<u32>,
        resized: Cell<(u32, u32)>,
        consume: bool,
    }

    impl Module for Recorder {
        fn update(&self, ctx: &mut UpdateCtx<'_>) {
            self.updates.set(self.updates.get() + 1);
            ctx.scene.registry_mut().for_each_mut::<Position>(|_, p| p.x += 1.0);
        }

        fn resize(&self, width: u32, height: u32) {
            self.resized.set((width, height));
        }
    }

    #[async_trait(?Send)]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &mut Event) -> anyhow::Result<()> {
            let label = match event.kind() {
                EventKind::Touch(t) => t.kind.to_string(),
                EventKind::Lifecycle(l) => format!("{l:?}"),
            };
            self.seen.borrow_mut().push(label);
            if self.consume {
                event.mark_handled();
            }
            Ok(())
        }
    }

    fn frame(index: u64) -> FrameTime {
        FrameTime {
            dt: 1.0 / 60.0,
            elapsed: index as f32 / 60.0,
            now: Instant::now(),
            frame_index: index,
        }
    }

    fn press(state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x,
            y,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn start_reaches_subscribers() {
        let engine = Engine::default();
        let recorder = Rc::new(Recorder::default());
        engine.subscribe(&recorder);

        assert!(!pollster::block_on(engine.start()));
        assert_eq!(*recorder.seen.borrow(), vec!["Started".to_string()]);
    }

    #[test]
    fn tick_runs_modules_against_scene() {
        let mut engine = Engine::default();
        let recorder = Rc::new(Recorder::default());
        engine.add_module(recorder.clone());

        let e = engine.scene_mut().create(Some("Model"));
        engine.scene_mut().add(e, Position::new(0.0, 0.0, 0.0));

        engine.tick(frame(0));
        engine.tick(frame(1));

        assert_eq!(recorder.updates.get(), 2);
        assert_eq!(engine.scene().get_component::<Position>(e).map(|p| p.x), Some(2.0));
    }

    #[test]
    fn handled_touch_stops_later_subscribers() {
        let engine = Engine::default();
        let first = Rc::new(Recorder {
            consume: true,
            ..Recorder::default()
        });
        let second = Rc::new(Recorder::default());
        engine.subscribe(&first);
        engine.subscribe(&second);

        let handled = pollster::block_on(engine.handle_touch(TouchEvent::tap(Vec2::new(3.0, 4.0))));

        assert!(handled);
        assert_eq!(first.seen.borrow().len(), 1);
        assert!(second.seen.borrow().is_empty());
    }

    #[test]
    fn raw_click_becomes_tap() {
        let mut engine = Engine::default();
        let recorder = Rc::new(Recorder::default());
        engine.subscribe(&recorder);

        let n = pollster::block_on(async {
            engine.handle_input(&press(MouseButtonState::Pressed, 10.0, 10.0)).await
                + engine.handle_input(&press(MouseButtonState::Released, 11.0, 10.0)).await
        });

        assert_eq!(n, 1);
        assert_eq!(*recorder.seen.borrow(), vec![TouchKind::Tap.to_string()]);
    }

    #[test]
    fn resize_notifies_modules_then_handlers_once() {
        let mut engine = Engine::default();
        let recorder = Rc::new(Recorder::default());
        engine.add_participant(&recorder);

        pollster::block_on(engine.resize(800, 600));
        pollster::block_on(engine.resize(800, 600));

        assert_eq!(recorder.resized.get(), (800, 600));
        assert_eq!(*recorder.seen.borrow(), vec![TouchKind::Resize.to_string()]);
    }

    #[test]
    fn participant_is_owned_by_stack_only() {
        let engine = Engine::default();
        let recorder = Rc::new(Recorder::default());
        engine.add_participant(&recorder);
        assert_eq!(engine.modules().len(), 1);
        assert_eq!(engine.dispatcher().len(), 1);

        assert!(engine.remove_participant(&recorder));
        assert!(engine.modules().is_empty());
        assert!(engine.dispatcher().is_empty());
        assert_eq!(Rc::strong_count(&recorder), 1);
    }

    #[test]
    fn participant_added_twice_updates_once_per_tick() {
        let mut engine = Engine::default();
        let recorder = Rc::new(Recorder::default());
        engine.add_participant(&recorder);
        engine.add_participant(&recorder);
        assert_eq!(engine.modules().len(), 1);
        assert_eq!(engine.dispatcher().len(), 1);

        engine.tick(frame(0));
        assert_eq!(recorder.updates.get(), 1);
    }

    #[test]
    fn dropped_participant_leaves_dispatch_quietly() {
        let engine = Engine::default();
        let recorder = Rc::new(Recorder::default());
        engine.subscribe(&recorder);
        drop(recorder);

        assert!(!pollster::block_on(engine.start()));
    }
}
