use std::marker::PhantomData;

use super::{AnyStorage, Component, Entity, Registry};

/// A tuple of one to four component types a view requires.
pub trait ComponentSet {
    /// Borrowed components for one matching entity.
    type Refs<'r>;

    /// Storages backing each type, or `None` if any type was never stored.
    fn storages(registry: &Registry) -> Option<Vec<&dyn AnyStorage>>;

    fn fetch(registry: &Registry, entity: Entity) -> Option<Self::Refs<'_>>;
}

macro_rules! impl_component_set {
    ($($t:ident),+) => {
        impl<$($t: Component),+> ComponentSet for ($($t,)+) {
            type Refs<'r> = ($(&'r $t,)+);

            fn storages(registry: &Registry) -> Option<Vec<&dyn AnyStorage>> {
                Some(vec![$(registry.any_storage::<$t>()?),+])
            }

            fn fetch(registry: &Registry, entity: Entity) -> Option<Self::Refs<'_>> {
                Some(($(registry.get_component::<$t>(entity)?,)+))
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);

/// Lazy iterator over entities that hold every type in `Q`.
///
/// Walks the smallest contributing storage and checks the others.
pub struct View<'r, Q: ComponentSet> {
    registry: &'r Registry,
    driver: &'r [Entity],
    others: Vec<&'r dyn AnyStorage>,
    cursor: usize,
    _query: PhantomData<fn() -> Q>,
}

impl<'r, Q: ComponentSet> View<'r, Q> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        let (driver, others) = match Q::storages(registry) {
            Some(mut storages) => {
                let smallest = storages
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, s)| s.dense_entities().len())
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                let driver = storages.swap_remove(smallest).dense_entities();
                (driver, storages)
            }
            None => (&[][..], Vec::new()),
        };
        Self {
            registry,
            driver,
            others,
            cursor: 0,
            _query: PhantomData,
        }
    }

    /// Pairs each entity with borrowed components.
    pub fn with_components(self) -> impl Iterator<Item = (Entity, Q::Refs<'r>)> + 'r
    where
        Q: 'r,
    {
        let registry = self.registry;
        self.filter_map(move |e| Q::fetch(registry, e).map(|refs| (e, refs)))
    }
}

impl<Q: ComponentSet> Iterator for View<'_, Q> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        while let Some(&entity) = self.driver.get(self.cursor) {
            self.cursor += 1;
            if self.others.iter().all(|s| s.contains_entity(entity)) {
                return Some(entity);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.driver.len() - self.cursor))
    }
}
