pub mod gemini;

use async_trait::async_trait;

pub use crate::core::error::BackendError;

/// Raw image bytes as returned by the backend, before any data-URL encoding.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// The generation capability the report pipeline is built on. Concrete
/// implementations own an already-resolved credential; resolution failures
/// happen before an implementation ever exists.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Request a structured outline for a topic. A response that is not a
    /// JSON string array resolves to an empty list, never an error - the
    /// pipeline decides what an empty outline means.
    async fn outline(&self, topic: &str) -> Result<Vec<String>, BackendError>;

    /// Free-form prose generation.
    async fn text(&self, prompt: &str) -> Result<String, BackendError>;

    /// Illustration generation. `Ok(None)` means the backend answered but
    /// produced no usable image payload.
    async fn image(
        &self,
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<Option<ImagePayload>, BackendError>;
}
