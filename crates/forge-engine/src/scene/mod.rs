//! Named entities on top of the ECS registry.

mod named;

pub use named::Scene;
