use crate::input::GestureConfig;
use crate::paint::Color;

/// Engine-level settings, passed by value to [`Engine::new`](super::Engine::new).
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Color the surface is cleared to before modules draw.
    pub clear_color: Color,
    pub gesture: GestureConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::from_srgb(0.08, 0.09, 0.11, 1.0),
            gesture: GestureConfig::default(),
        }
    }
}
