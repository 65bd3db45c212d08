//! Screen-space value types.
//!
//! Logical pixels, origin top-left, +X right, +Y down. Input positions and
//! gesture deltas use this space; world-space math uses `glam`.

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
