//! Color values shared by the runtime and render modules.

mod color;

pub use color::Color;
