//! Entity-component registry.
//!
//! Entities are generational ids; each component type lives in its own
//! sparse-set [`ComponentStorage`], keyed by `TypeId` inside the [`Registry`].
//! Views intersect storages by walking the smallest one and probing the rest,
//! so a query costs O(smallest storage), not O(entities).

mod component;
mod entity;
mod registry;
mod storage;
mod view;

pub use component::Component;
pub use entity::Entity;
pub use registry::Registry;
pub use storage::{AnyStorage, ComponentStorage};
pub use view::{ComponentSet, View};
