//! Handle-keyed resource tables.
//!
//! `ResourceTable<T>` is the only engine structure shared across threads: a
//! background loader and the render path may both create, read and destroy
//! resources. Each table serializes writers behind its own lock; there is no
//! lock spanning two tables.

mod resources;
mod table;

pub use resources::Resources;
pub use table::ResourceTable;
