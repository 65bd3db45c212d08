use std::collections::HashMap;

use crate::ecs::{Component, ComponentSet, Entity, Registry, View};

/// Registry plus a name → entity index.
///
/// The scene never owns component data; names are dropped together with
/// the entity they point to.
#[derive(Default)]
pub struct Scene {
    registry: Registry,
    names: HashMap<String, Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an entity, optionally binding `name` to it.
    ///
    /// Binding a name that is already taken moves it to the new entity.
    pub fn create(&mut self, name: Option<&str>) -> Entity {
        let entity = self.registry.create_entity();
        if let Some(name) = name
            && let Some(previous) = self.names.insert(name.to_string(), entity)
        {
            log::debug!("scene: `{name}` rebound from {previous} to {entity}");
        }
        entity
    }

    /// Looks up a live entity by name.
    pub fn get(&self, name: &str) -> Option<Entity> {
        self.names
            .get(name)
            .copied()
            .filter(|e| self.registry.is_alive(*e))
    }

    /// First name bound to `entity`, if any.
    pub fn name_of(&self, entity: Entity) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, e)| **e == entity)
            .map(|(n, _)| n.as_str())
    }

    /// Destroys `entity` and unbinds every name pointing at it.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        self.names.retain(|_, e| *e != entity);
        self.registry.destroy_entity(entity)
    }

    pub fn destroy_named(&mut self, name: &str) -> bool {
        match self.names.get(name).copied() {
            Some(entity) => self.destroy(entity),
            None => false,
        }
    }

    pub fn add<T: Component>(&mut self, entity: Entity, component: T) -> Option<&mut T> {
        self.registry.add_component(entity, component)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.registry.get_component(entity)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.registry.get_component_mut(entity)
    }

    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.registry.remove_component(entity)
    }

    pub fn view<Q: ComponentSet>(&self) -> View<'_, Q> {
        self.registry.view()
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.registry.entities()
    }

    /// `(name, entity)` pairs sorted by name.
    pub fn named_entities(&self) -> Vec<(&str, Entity)> {
        let mut out: Vec<(&str, Entity)> = self
            .names
            .iter()
            .map(|(n, e)| (n.as_str(), *e))
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }
}
