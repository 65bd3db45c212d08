use parking_lot::RwLock;

use crate::handle::{Handle, HandleAllocator};

struct Slots<T> {
    allocator: HandleAllocator,
    values: Vec<Option<T>>,
}

impl<T> Slots<T> {
    fn get(&self, handle: Handle<T>) -> Option<&T> {
        if !self.allocator.is_live(handle) {
            return None;
        }
        self.values.get(handle.index() as usize)?.as_ref()
    }

    fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if !self.allocator.is_live(handle) {
            return None;
        }
        self.values.get_mut(handle.index() as usize)?.as_mut()
    }
}

/// Concurrency-safe mapping from `Handle<T>` to an owned `T`.
///
/// Reads run under a shared lock, `create`/`update`/`destroy` under an
/// exclusive one, so no reader ever observes a half-applied update. Every
/// operation on a stale handle is a no-op that reports absence.
///
/// Access is always through these operations; the table never hands out a
/// reference that outlives the lock.
pub struct ResourceTable<T> {
    label: &'static str,
    slots: RwLock<Slots<T>>,
}

impl<T> ResourceTable<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            slots: RwLock::new(Slots {
                allocator: HandleAllocator::new(),
                values: Vec::new(),
            }),
        }
    }

    /// Name used in diagnostics.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Stores `value` and returns a fresh handle to it.
    pub fn create(&self, value: T) -> Handle<T> {
        let mut slots = self.slots.write();
        let handle: Handle<T> = slots.allocator.allocate();

        let index = handle.index() as usize;
        if index == slots.values.len() {
            slots.values.push(Some(value));
        } else {
            slots.values[index] = Some(value);
        }

        log::trace!("{}: created {handle:?}", self.label);
        handle
    }

    /// Returns true if `handle` still resolves to a resource.
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.slots.read().get(handle).is_some()
    }

    /// Runs `f` against the resource under the shared lock.
    pub fn read<R>(&self, handle: Handle<T>, f: impl FnOnce(&T) -> R) -> Option<R> {
        let slots = self.slots.read();
        slots.get(handle).map(f)
    }

    /// Returns a copy of the resource.
    pub fn get(&self, handle: Handle<T>) -> Option<T>
    where
        T: Clone,
    {
        self.read(handle, T::clone)
    }

    /// Mutates the resource in place under the exclusive lock.
    ///
    /// Returns `None` without calling `f` if the handle is stale.
    pub fn update<R>(&self, handle: Handle<T>, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut slots = self.slots.write();
        slots.get_mut(handle).map(f)
    }

    /// Removes the resource and invalidates every handle to its slot.
    pub fn destroy(&self, handle: Handle<T>) -> Option<T> {
        let mut slots = self.slots.write();
        if !slots.allocator.release(handle) {
            return None;
        }
        log::trace!("{}: destroyed {handle:?}", self.label);
        slots.values[handle.index() as usize].take()
    }

    /// Destroys every live resource. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut slots = self.slots.write();
        let live: Vec<Handle<T>> = slots.allocator.live_handles().collect();
        for handle in &live {
            slots.allocator.release(*handle);
            slots.values[handle.index() as usize] = None;
        }
        if !live.is_empty() {
            log::debug!("{}: cleared {} resources", self.label, live.len());
        }
        live.len()
    }

    /// Handles of every live resource, in slot order.
    pub fn handles(&self) -> Vec<Handle<T>> {
        self.slots.read().allocator.live_handles().collect()
    }

    pub fn len(&self) -> usize {
        self.slots.read().allocator.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
