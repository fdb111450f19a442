use base64::Engine;
use tracing::warn;

use super::placeholder::placeholder_image_url;
use super::prompts::image_prompt;
use crate::core::backend::GenerationBackend;

const SECTION_IMAGE_ASPECT: &str = "16:9";

/// Outcome of one image generation attempt. This is a plain value, never an
/// error: the pipeline's failure-isolation boundary lives here.
#[derive(Debug, Clone)]
pub struct ImageResult {
    pub image_url: String,
    pub image_error: Option<String>,
    pub image_prompt: String,
    pub is_placeholder: bool,
}

impl ImageResult {
    fn placeholder(section_title: &str, prompt: String, error: String) -> Self {
        Self {
            image_url: placeholder_image_url(section_title, &prompt),
            image_error: Some(error),
            image_prompt: prompt,
            is_placeholder: true,
        }
    }
}

/// Generate an illustration for one section. Any backend failure, empty
/// result, or missing payload degrades to a placeholder carrying the
/// diagnostic; the returned future cannot fail.
pub async fn generate_section_image(
    backend: &dyn GenerationBackend,
    topic: &str,
    section_title: &str,
) -> ImageResult {
    let prompt = image_prompt(topic, section_title);

    match backend.image(&prompt, SECTION_IMAGE_ASPECT).await {
        Ok(Some(payload)) => {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&payload.bytes);
            ImageResult {
                image_url: format!("data:{};base64,{}", payload.mime_type, encoded),
                image_error: None,
                image_prompt: prompt,
                is_placeholder: false,
            }
        }
        Ok(None) => {
            warn!(
                "No image generated for section '{}', using placeholder",
                section_title
            );
            ImageResult::placeholder(
                section_title,
                prompt,
                "the model returned no image data".to_string(),
            )
        }
        Err(e) => {
            warn!(
                "Image generation failed for section '{}': {}",
                section_title, e
            );
            let detail = match &e {
                crate::core::backend::BackendError::Api { body, .. } if !body.is_empty() => {
                    body.clone()
                }
                other => other.to_string(),
            };
            ImageResult::placeholder(section_title, prompt, detail)
        }
    }
}
