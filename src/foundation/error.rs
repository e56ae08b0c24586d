/// Convenience result type used across the harness.
pub type TesterResult<T> = Result<T, TesterError>;

/// Top-level error taxonomy used by pipeline APIs.
#[derive(thiserror::Error, Debug)]
pub enum TesterError {
    /// A required configuration key is absent, unreadable or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid caller-provided data (patterns, version strings, ranges).
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while walking or synthesizing the asset tree.
    #[error("discovery error: {0}")]
    Discovery(String),

    /// Errors while preparing or running the external renderer.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while comparing two image sequences.
    #[error("comparison error: {0}")]
    Compare(String),

    /// Errors while building or writing the comparison report.
    #[error("report error: {0}")]
    Report(String),

    /// A job whose inputs were not in a runnable state.
    #[error("skipped: {0}")]
    Skipped(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TesterError {
    /// Build a [`TesterError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`TesterError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TesterError::Discovery`] value.
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Build a [`TesterError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`TesterError::Compare`] value.
    pub fn compare(msg: impl Into<String>) -> Self {
        Self::Compare(msg.into())
    }

    /// Build a [`TesterError::Report`] value.
    pub fn report(msg: impl Into<String>) -> Self {
        Self::Report(msg.into())
    }

    /// Build a [`TesterError::Skipped`] value.
    pub fn skipped(msg: impl Into<String>) -> Self {
        Self::Skipped(msg.into())
    }

    /// Return `true` for [`TesterError::Skipped`].
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
