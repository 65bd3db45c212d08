//! Forge engine crate.
//!
//! Core: an entity-component [`Registry`](ecs::Registry) with a naming
//! [`Scene`] on top, generation-checked [`ResourceTable`]s for shaders and
//! materials, a non-owning [`EventDispatcher`] and an ordered
//! [`ModuleStack`], all owned by the [`Engine`].
//!
//! Platform: a winit [`Runtime`](window::Runtime) that acquires the GPU,
//! translates input into gestures and drives one tick + draw per frame.

pub mod components;
pub mod ecs;
pub mod engine;
pub mod event;
pub mod graphics;
pub mod handle;
pub mod module;
pub mod modules;
pub mod resource;
pub mod scene;

pub mod coords;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;

pub use engine::{Engine, EngineConfig, EngineError};
pub use event::EventDispatcher;
pub use module::ModuleStack;
pub use resource::{ResourceTable, Resources};
pub use scene::Scene;
