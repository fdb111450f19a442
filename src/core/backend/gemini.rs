use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{BackendError, GenerationBackend, ImagePayload};
use crate::core::report::prompts::outline_prompt;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const TEXT_MODEL: &str = "gemini-2.5-flash";
const IMAGE_MODEL: &str = "imagen-3.0-generate-002";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResContent,
}

#[derive(Deserialize)]
struct ResContent {
    #[serde(default)]
    parts: Vec<ResPart>,
}

#[derive(Deserialize)]
struct ResPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: String,
    output_mime_type: String,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    bytes_base64_encoded: String,
    #[serde(default)]
    mime_type: Option<String>,
}

/// Gemini wire client. Text and outlines go through `generateContent`,
/// illustrations through the Imagen `predict` endpoint.
pub struct GeminiBackend {
    api_key: String,
    client: Client,
}

impl GeminiBackend {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: Client::new(),
        }
    }

    async fn generate_content(&self, req: &GenerateRequest) -> Result<String, BackendError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            API_BASE, TEXT_MODEL, self.api_key
        );
        let res = self.client.post(&url).json(req).send().await?;
        if !res.status().is_success() {
            return Err(BackendError::Api {
                status: res.status().as_u16(),
                body: res.text().await.unwrap_or_default(),
            });
        }
        let parsed: GenerateResponse = res.json().await?;
        Ok(parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default())
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn outline(&self, topic: &str) -> Result<Vec<String>, BackendError> {
        let req = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: outline_prompt(topic),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: serde_json::json!({
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                }),
            }),
        };
        let text = self.generate_content(&req).await?;
        Ok(parse_outline(&text))
    }

    async fn text(&self, prompt: &str) -> Result<String, BackendError> {
        let req = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: None,
        };
        self.generate_content(&req).await
    }

    async fn image(
        &self,
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<Option<ImagePayload>, BackendError> {
        let url = format!(
            "{}/{}:predict?key={}",
            API_BASE, IMAGE_MODEL, self.api_key
        );
        let req = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: aspect_ratio.to_string(),
                output_mime_type: "image/jpeg".to_string(),
            },
        };
        let res = self.client.post(&url).json(&req).send().await?;
        if !res.status().is_success() {
            return Err(BackendError::Api {
                status: res.status().as_u16(),
                body: res.text().await.unwrap_or_default(),
            });
        }
        let parsed: PredictResponse = res.json().await?;
        let Some(prediction) = parsed.predictions.into_iter().next() else {
            return Ok(None);
        };
        if prediction.bytes_base64_encoded.is_empty() {
            return Ok(None);
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&prediction.bytes_base64_encoded)
            .map_err(|e| {
                warn!("Imagen returned undecodable image data: {}", e);
                BackendError::Api {
                    status: 200,
                    body: format!("invalid base64 image payload: {}", e),
                }
            })?;
        Ok(Some(ImagePayload {
            bytes,
            mime_type: prediction
                .mime_type
                .unwrap_or_else(|| "image/jpeg".to_string()),
        }))
    }
}

/// A structured outline response is a JSON string array; anything else
/// degrades to an empty outline for the pipeline to reject.
fn parse_outline(text: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(text.trim()).unwrap_or_default()
}
