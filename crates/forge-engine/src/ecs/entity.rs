use std::fmt;

/// Opaque entity id: slot index plus the slot's generation at creation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    #[inline]
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.index
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Entity slots with a free list.
///
/// A released index is only handed out again with a bumped generation, so
/// an `Entity` captured before destruction never matches the new occupant.
#[derive(Debug, Default)]
pub(crate) struct EntityAllocator {
    slots: Vec<(u32, bool)>,
    free: Vec<u32>,
    alive: usize,
}

impl EntityAllocator {
    pub(crate) fn allocate(&mut self) -> Entity {
        self.alive += 1;
        if let Some(index) = self.free.pop() {
            let (generation, live) = &mut self.slots[index as usize];
            *live = true;
            return Entity::new(index, *generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push((0, true));
        Entity::new(index, 0)
    }

    pub(crate) fn is_alive(&self, entity: Entity) -> bool {
        matches!(
            self.slots.get(entity.index as usize),
            Some(&(generation, true)) if generation == entity.generation
        )
    }

    /// Frees the slot. Caller guarantees no storage still holds `entity`.
    pub(crate) fn release(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let (generation, live) = &mut self.slots[entity.index as usize];
        *live = false;
        self.alive -= 1;
        match generation.checked_add(1) {
            Some(next) => {
                *generation = next;
                self.free.push(entity.index);
            }
            None => log::warn!("entity slot {} exhausted its generations; retiring it", entity.index),
        }
        true
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, (_, live))| *live)
            .map(|(i, (generation, _))| Entity::new(i as u32, *generation))
    }

    pub(crate) fn len(&self) -> usize {
        self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recycled_slot_gets_new_generation() {
        let mut alloc = EntityAllocator::default();
        let a = alloc.allocate();
        assert!(alloc.release(a));
        let b = alloc.allocate();

        assert_eq!(a.index(), b.index());
        assert_ne!(a, b);
        assert!(!alloc.is_alive(a));
        assert!(alloc.is_alive(b));
    }

    #[test]
    fn release_is_idempotent() {
        let mut alloc = EntityAllocator::default();
        let a = alloc.allocate();
        assert!(alloc.release(a));
        assert!(!alloc.release(a));
        assert_eq!(alloc.len(), 0);
    }

    #[test]
    fn iter_skips_dead_slots() {
        let mut alloc = EntityAllocator::default();
        let a = alloc.allocate();
        let b = alloc.allocate();
        let c = alloc.allocate();
        alloc.release(b);
        assert_eq!(alloc.iter().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn exhausted_slot_is_never_reused() {
        let mut alloc = EntityAllocator::default();
        let a = alloc.allocate();
        alloc.slots[0].0 = u32::MAX;
        let a = Entity::new(a.index(), u32::MAX);
        assert!(alloc.release(a));
        let b = alloc.allocate();
        assert_ne!(b.index(), a.index());
    }
}
