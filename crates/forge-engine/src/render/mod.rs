//! Per-frame GPU handles passed to [`Module::draw`](crate::module::Module::draw).
//!
//! Modules own their pipelines and buffers; the runtime only provides the
//! device, the current surface view and an encoder to record into.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
