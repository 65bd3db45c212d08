//! Input and lifecycle events plus the non-owning dispatcher that fans them
//! out to subscribed handlers.
//!
//! Delivery is sequential: each handler's future completes before the next
//! handler is called, and delivery stops once a handler marks the event
//! handled.

mod dispatcher;
mod handler;
mod types;

pub use dispatcher::EventDispatcher;
pub use handler::EventHandler;
pub use types::{Event, EventKind, Lifecycle, TouchEvent, TouchKind, TouchPoint};
