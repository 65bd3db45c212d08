use thiserror::Error;

/// Failures that stop the engine from starting.
///
/// Everything after startup degrades instead of failing: stale handles,
/// missing components and dropped frames are logged and skipped.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No adapter, device or surface could be acquired, or the setup
    /// callback failed.
    #[error("engine setup failed: {0}")]
    Setup(String),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl EngineError {
    /// Wraps an `anyhow` chain, keeping every context layer in the message.
    pub fn setup(err: anyhow::Error) -> Self {
        Self::Setup(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn setup_keeps_context_chain() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("no adapter")).context("gpu init");
        let e = EngineError::setup(err.unwrap_err());
        assert_eq!(e.to_string(), "engine setup failed: gpu init: no adapter");
    }
}
