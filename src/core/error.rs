use thiserror::Error;

/// Fatal failures of a report run. Image generation is deliberately absent:
/// image failures are data (`ImageResult`), never errors.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(
        "No API credential configured. Set one with `quill key set` or export QUILL_API_KEY."
    )]
    MissingCredential,

    #[error("backend request failed: {0}")]
    Backend(#[from] BackendError),

    #[error("The model could not produce a valid outline for this topic.")]
    EmptyOutline,

    #[error("failed to persist report history: {0}")]
    Storage(String),
}

/// A failed call to the generation backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. The body is kept verbatim so callers can
    /// classify provider-specific failures (billing, invalid key).
    #[error("backend returned {status}: {body}")]
    Api { status: u16, body: String },
}
