use thiserror::Error;

/// Canonical result for the engine.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A malformed join request: mismatched key arity, unknown stages,
    /// non-positive distribution factors, and the like. Always raised
    /// before any backend work is issued.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A column or field could not be resolved against a schema.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A failure surfaced by the execution backend. Propagated opaque to
    /// the caller; the planner never retries.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Prefix an error message with where it happened, keeping the variant.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let ctx = context.into();
        match self {
            Error::Config(msg) => Error::Config(format!("{ctx}: {msg}")),
            Error::Schema(msg) => Error::Schema(format!("{ctx}: {msg}")),
            Error::Backend(msg) => Error::Backend(format!("{ctx}: {msg}")),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
