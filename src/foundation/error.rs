/// Convenience result type used across promptreel.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Acquisition and caption failures are recovered inside [`crate::VideoGenerator`] and audio
/// failures become report warnings, so callers of `generate` only see validation, render and
/// IO errors.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Invalid user-provided request or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A background image strategy failed (network, timeout, status, undecodable body).
    #[error("acquisition error: {0}")]
    Acquisition(String),

    /// The caption layer could not be built (no usable font, empty layout).
    #[error("caption error: {0}")]
    Caption(String),

    /// Audio materialization, decode or shaping failed.
    #[error("audio error: {0}")]
    Audio(String),

    /// Rasterizing or muxing the output failed.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ReelError::Acquisition`] value.
    pub fn acquisition(msg: impl Into<String>) -> Self {
        Self::Acquisition(msg.into())
    }

    /// Build a [`ReelError::Caption`] value.
    pub fn caption(msg: impl Into<String>) -> Self {
        Self::Caption(msg.into())
    }

    /// Build a [`ReelError::Audio`] value.
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Build a [`ReelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ReelError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
