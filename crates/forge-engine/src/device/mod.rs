//! wgpu device and surface.
//!
//! [`Gpu`] owns the adapter, device, queue and the window surface. It is
//! created by the runtime before the engine sees its first frame; failure
//! here is the only fatal engine error.

mod context;
mod error;
mod frame;
mod init;
mod surface;

pub use context::Gpu;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
