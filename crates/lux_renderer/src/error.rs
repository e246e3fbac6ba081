//! Error types for camera setup and rendering.

use thiserror::Error;

/// Errors raised while building a sampler.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerError {
    #[error("Sampler needs at least one sample per pattern set")]
    NoSamples,

    #[error("Sampler needs at least one pattern set")]
    NoSets,
}

/// Errors raised by the camera and the render scheduler.
///
/// All of these are reported before or instead of rendering; none are
/// retried. A render that fails part way leaves already-written pixels in
/// the target.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("No render target bound to the camera")]
    NoRenderTarget,

    #[error("No scene given to render")]
    MissingScene,

    #[error("No sampler configured; call set_sampler before a full-quality render")]
    NoSampler,

    #[error("Render cancelled")]
    Cancelled,

    #[error("Render worker disconnected before reporting completion")]
    WorkerDisconnected,

    #[error("Invalid sampler settings: {0}")]
    Sampler(#[from] SamplerError),

    #[error("Invalid render config: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
