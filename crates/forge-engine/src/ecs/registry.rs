use std::any::TypeId;
use std::collections::HashMap;

use super::entity::EntityAllocator;
use super::{AnyStorage, Component, ComponentSet, ComponentStorage, Entity, View};

/// Owns entity lifetimes and one storage per component type.
///
/// Single-threaded: mutated only from the frame-update path.
#[derive(Default)]
pub struct Registry {
    entities: EntityAllocator,
    storages: HashMap<TypeId, Box<dyn AnyStorage>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.allocate();
        log::trace!("created {entity}");
        entity
    }

    /// Purges every component of `entity`, then releases its id.
    ///
    /// Returns false if the entity was already destroyed.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }
        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }
        debug_assert!(
            self.storages.values().all(|s| !s.contains_entity(entity)),
            "{entity} still referenced after purge"
        );
        self.entities.release(entity);
        log::trace!("destroyed {entity}");
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Live entities in slot order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attaches `component`, overwriting any previous `T` on the entity.
    ///
    /// Returns the stored value, or `None` if the entity is not alive.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Option<&mut T> {
        if !self.entities.is_alive(entity) {
            log::debug!(
                "ignoring {} for dead {entity}",
                std::any::type_name::<T>()
            );
            return None;
        }
        let storage = self.storage_mut_or_insert::<T>()?;
        storage.insert(entity, component);
        storage.get_mut(entity)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.storage::<T>().is_some_and(|s| s.contains(entity))
    }

    /// Detaches and returns the `T` of `entity`; `None` if it had none.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Entities holding every component type in `Q`.
    ///
    /// The view borrows the registry, so no structural change can happen
    /// while it is being walked. Each call re-reads current membership.
    pub fn view<Q: ComponentSet>(&self) -> View<'_, Q> {
        View::new(self)
    }

    /// Mutable pass over every `T`.
    pub fn for_each_mut<T: Component>(&mut self, mut f: impl FnMut(Entity, &mut T)) {
        if let Some(storage) = self.storage_mut::<T>() {
            for (entity, value) in storage.iter_mut() {
                f(entity, value);
            }
        }
    }

    pub fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<ComponentStorage<T>>()
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
    }

    /// Storages are keyed by `TypeId::of::<T>()`, so the downcast only
    /// fails if that key invariant is broken.
    fn storage_mut_or_insert<T: Component>(&mut self) -> Option<&mut ComponentStorage<T>> {
        self.storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStorage::<T>::new()))
            .as_any_mut()
            .downcast_mut::<ComponentStorage<T>>()
    }

    pub(crate) fn any_storage<T: Component>(&self) -> Option<&dyn AnyStorage> {
        self.storages.get(&TypeId::of::<T>()).map(|s| s.as_ref())
    }
}
