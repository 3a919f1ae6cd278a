use thiserror::Error;

/// Application-level error type.
///
/// The web layer (an external collaborator) maps these to HTTP responses via
/// [`EngineError::status_code`]. A malformed entry inside a section's content
/// list is deliberately NOT represented here: it is swallowed at the
/// per-entry validation step with a `tracing::warn!` so one bad record never
/// aborts a whole document.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A non-empty branding selector has no logo file on disk.
    /// Fails the whole render; surfaced as a 404-equivalent.
    #[error("No logo asset found for company '{company}'")]
    MissingAsset { company: String },

    /// The structured resume is unusable at the top level (not an object,
    /// missing every section, etc.). Per-entry problems are skipped instead.
    #[error("Invalid structured resume: {0}")]
    InvalidResume(String),

    /// Any non-recoverable failure while drawing a document. Partial output
    /// cannot be safely returned, so the whole render aborts.
    #[error("Failed to render {format} output: {message}")]
    Render {
        format: &'static str,
        message: String,
    },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Text extraction error: {0}")]
    Extract(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    /// The HTTP status the external web layer should respond with.
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::MissingAsset { .. } => 404,
            EngineError::InvalidResume(_) => 422,
            EngineError::Extract(_) => 400,
            EngineError::Render { format, message } => {
                tracing::error!("Render error ({format}): {message}");
                500
            }
            EngineError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                500
            }
            EngineError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                500
            }
        }
    }
}
