//! Composition root.
//!
//! [`Engine`] owns the scene, the resource tables, the event dispatcher and
//! the module stack, and is the only thing the window runtime talks to.

mod config;
mod error;
mod root;

pub use config::EngineConfig;
pub use error::EngineError;
pub use root::Engine;
