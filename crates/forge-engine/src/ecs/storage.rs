use std::any::Any;

use super::{Component, Entity};

/// Sparse-set storage for one component type.
///
/// `sparse[entity.index]` points into the dense `entities`/`data` arrays.
/// Removal swaps the last dense element into the hole, so iteration stays
/// tightly packed and every operation is O(1).
pub struct ComponentStorage<T> {
    sparse: Vec<Option<u32>>,
    entities: Vec<Entity>,
    data: Vec<T>,
}

impl<T> ComponentStorage<T> {
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            entities: Vec::new(),
            data: Vec::new(),
        }
    }

    fn dense_index(&self, entity: Entity) -> Option<usize> {
        let dense = (*self.sparse.get(entity.index() as usize)?)? as usize;
        (self.entities[dense] == entity).then_some(dense)
    }

    /// Inserts or overwrites. Returns the previous value, if any.
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(dense) = self.dense_index(entity) {
            return Some(std::mem::replace(&mut self.data[dense], value));
        }

        let slot = entity.index() as usize;
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, None);
        }
        self.sparse[slot] = Some(self.entities.len() as u32);
        self.entities.push(entity);
        self.data.push(value);
        None
    }

    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.dense_index(entity).map(|d| &self.data[d])
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.dense_index(entity).map(|d| &mut self.data[d])
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let dense = self.dense_index(entity)?;
        self.sparse[entity.index() as usize] = None;

        let last = self.entities.len() - 1;
        if dense != last {
            let moved = self.entities[last];
            self.sparse[moved.index() as usize] = Some(dense as u32);
        }
        self.entities.swap_remove(dense);
        Some(self.data.swap_remove(dense))
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities holding this component, in dense order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.entities.iter().copied().zip(self.data.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.entities.iter().copied().zip(self.data.iter_mut())
    }
}

impl<T> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased operations the registry needs on every storage.
pub trait AnyStorage {
    fn component_name(&self) -> &'static str;
    fn contains_entity(&self, entity: Entity) -> bool;
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn dense_entities(&self) -> &[Entity];
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyStorage for ComponentStorage<T> {
    fn component_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn dense_entities(&self) -> &[Entity] {
        self.entities()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
