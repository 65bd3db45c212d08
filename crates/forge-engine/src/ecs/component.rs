/// Marker for types that can be attached to an entity.
///
/// At most one value of each component type exists per entity. The registry
/// is mutated from the frame thread only, so components need not be `Send`.
pub trait Component: 'static {}
