//! Per-frame participants.
//!
//! A [`Module`] is updated once per frame and may draw; modules that also
//! implement [`EventHandler`](crate::event::EventHandler) are subscribed to
//! the dispatcher separately, so the two pipelines stay independent.

mod ctx;
mod stack;

pub use ctx::{DrawCtx, UpdateCtx};
pub use stack::{Module, ModuleStack};
