use crate::render::{RenderCtx, RenderTarget};
use crate::resource::Resources;
use crate::scene::Scene;
use crate::time::FrameTime;

/// Passed to [`Module::update`](super::Module::update) once per frame.
pub struct UpdateCtx<'a> {
    pub time: FrameTime,
    pub scene: &'a mut Scene,
    pub resources: &'a Resources,
}

impl UpdateCtx<'_> {
    /// Seconds since the previous frame.
    #[inline]
    pub fn dt(&self) -> f32 {
        self.time.dt
    }
}

/// Passed to [`Module::draw`](super::Module::draw) once per presented frame.
pub struct DrawCtx<'a, 'r> {
    pub scene: &'a Scene,
    pub resources: &'a Resources,
    pub render: &'a RenderCtx<'r>,
    pub target: &'a mut RenderTarget<'r>,
}
