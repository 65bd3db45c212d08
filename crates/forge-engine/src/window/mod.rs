//! winit event loop driving an [`Engine`](crate::Engine).
//!
//! The runtime owns the window and the GPU surface, forwards translated
//! input to the engine and runs one tick + draw per redraw.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
