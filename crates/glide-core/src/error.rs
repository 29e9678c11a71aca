use thiserror::Error;

/// Identifier of a host element bound by an engine component.
pub type ElementId = u64;

/// Failures the engine recovers from locally.
///
/// Nothing here is surfaced to end users: a failing frame handler stops its
/// loop, and operations on a detached element degrade to no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A frame handler reported a failure; its loop has been stopped.
    #[error("frame handler failed: {0}")]
    FrameHandler(String),
    /// The host element is no longer attached.
    #[error("target element {0} is detached")]
    TargetDetached(ElementId),
}

impl EngineError {
    pub fn frame_handler(message: impl Into<String>) -> Self {
        EngineError::FrameHandler(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            EngineError::frame_handler("boom").to_string(),
            "frame handler failed: boom"
        );
        assert_eq!(
            EngineError::TargetDetached(7).to_string(),
            "target element 7 is detached"
        );
    }
}
