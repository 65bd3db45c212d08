//! Generation-tagged handles.
//!
//! A `Handle<T>` is an `(index, generation)` pair issued by a `HandleAllocator`.
//! Releasing a slot bumps its generation, so every handle issued before the
//! release fails all later lookups instead of resolving to whatever reuses the slot.

mod allocator;
mod typed;

pub use allocator::HandleAllocator;
pub use typed::Handle;
