use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::Handle;

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    generation: u32,
    occupied: bool,
}

/// Issues generation-checked handles over a dense slot array.
///
/// Freed slots are reused lowest-index first. A slot whose generation would
/// wrap is retired instead of being recycled, so generations never repeat.
#[derive(Debug, Default)]
pub struct HandleAllocator {
    slots: Vec<Slot>,
    free: BinaryHeap<Reverse<u32>>,
    live: usize,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a slot and returns a handle carrying its current generation.
    pub fn allocate<T>(&mut self) -> Handle<T> {
        self.live += 1;

        if let Some(Reverse(index)) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.occupied = true;
            return Handle::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            occupied: true,
        });
        Handle::new(index, 0)
    }

    /// Returns true if `handle` refers to an occupied slot at the same generation.
    pub fn is_live<T>(&self, handle: Handle<T>) -> bool {
        self.slots
            .get(handle.index() as usize)
            .is_some_and(|s| s.occupied && s.generation == handle.generation())
    }

    /// Releases the slot behind `handle`, invalidating every handle to it.
    ///
    /// Returns `false` (and changes nothing) if the handle is already stale.
    pub fn release<T>(&mut self, handle: Handle<T>) -> bool {
        if !self.is_live(handle) {
            return false;
        }

        let index = handle.index();
        let slot = &mut self.slots[index as usize];
        slot.occupied = false;
        self.live -= 1;

        match slot.generation.checked_add(1) {
            Some(next) => {
                slot.generation = next;
                self.free.push(Reverse(index));
            }
            None => log::warn!("handle slot {index} exhausted its generations; retiring it"),
        }
        true
    }

    /// Current generation of the slot at `index`, if that slot exists.
    pub fn generation_of(&self, index: u32) -> Option<u32> {
        self.slots.get(index as usize).map(|s| s.generation)
    }

    /// Handles for every occupied slot, in index order.
    pub fn live_handles<T>(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.occupied)
            .map(|(i, s)| Handle::new(i as u32, s.generation))
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots ever created (live, free or retired).
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag;

    #[test]
    fn allocate_assigns_sequential_slots() {
        let mut a = HandleAllocator::new();
        let h0: Handle<Tag> = a.allocate();
        let h1: Handle<Tag> = a.allocate();
        assert_eq!((h0.index(), h0.generation()), (0, 0));
        assert_eq!((h1.index(), h1.generation()), (1, 0));
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn release_invalidates_and_bumps_generation() {
        let mut a = HandleAllocator::new();
        let h: Handle<Tag> = a.allocate();
        assert!(a.release(h));
        assert!(!a.is_live(h));
        assert_eq!(a.generation_of(0), Some(1));
        assert!(a.is_empty());
    }

    #[test]
    fn double_release_is_rejected() {
        let mut a = HandleAllocator::new();
        let h: Handle<Tag> = a.allocate();
        assert!(a.release(h));
        assert!(!a.release(h));
        assert_eq!(a.generation_of(0), Some(1));
    }

    #[test]
    fn reuses_lowest_freed_index_first() {
        let mut a = HandleAllocator::new();
        let hs: Vec<Handle<Tag>> = (0..4).map(|_| a.allocate()).collect();
        a.release(hs[3]);
        a.release(hs[1]);
        a.release(hs[2]);

        let r: Handle<Tag> = a.allocate();
        assert_eq!(r.index(), 1);
        assert_eq!(r.generation(), 1);
        let r: Handle<Tag> = a.allocate();
        assert_eq!(r.index(), 2);
    }

    #[test]
    fn generations_strictly_increase_across_reuse() {
        let mut a = HandleAllocator::new();
        let mut last: Option<Handle<Tag>> = None;
        for _ in 0..5 {
            let h: Handle<Tag> = a.allocate();
            assert_eq!(h.index(), 0);
            if let Some(prev) = last {
                assert!(h.generation() > prev.generation());
                // Only one of two handles to the same slot can be live.
                assert!(!a.is_live(prev));
            }
            assert!(a.is_live(h));
            a.release(h);
            last = Some(h);
        }
    }

    #[test]
    fn exhausted_slot_is_retired() {
        let mut a = HandleAllocator::new();
        let h: Handle<Tag> = a.allocate();
        a.slots[0].generation = u32::MAX;
        let h = Handle::<Tag>::new(h.index(), u32::MAX);
        assert!(a.release(h));

        let next: Handle<Tag> = a.allocate();
        assert_eq!(next.index(), 1);
        assert_eq!(a.slot_count(), 2);
    }

    #[test]
    fn live_handles_lists_occupied_slots() {
        let mut a = HandleAllocator::new();
        let h0: Handle<Tag> = a.allocate();
        let h1: Handle<Tag> = a.allocate();
        a.release(h0);
        let live: Vec<Handle<Tag>> = a.live_handles().collect();
        assert_eq!(live, vec![h1]);
    }
}
