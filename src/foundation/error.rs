pub type SynthResult<T> = Result<T, SynthError>;

/// Two-tier error taxonomy: `Retryable` means the job's sampled parameters
/// were unusable and the whole style/geometry must be resampled; every other
/// variant is fatal for the current job only.
#[derive(thiserror::Error, Debug)]
pub enum SynthError {
    #[error("retryable geometry error: {0}")]
    Retryable(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("retry budget exhausted: {0}")]
    Exhausted(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SynthError {
    pub fn retryable(msg: impl Into<String>) -> Self {
        Self::Retryable(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn exhausted(msg: impl Into<String>) -> Self {
        Self::Exhausted(msg.into())
    }

    /// True only for degenerate-geometry failures. The job driver resamples
    /// the entire style on `true` and abandons the job on `false`.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }
}
