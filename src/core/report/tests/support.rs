//! Scripted backend for pipeline scenarios.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::core::backend::{BackendError, GenerationBackend, ImagePayload};

pub struct MockBackend {
    pub outline: Result<Vec<String>, String>,
    pub failing_content_titles: HashSet<String>,
    pub failing_image_titles: HashSet<String>,
    pub image_error_body: String,
}

impl MockBackend {
    pub fn with_outline(titles: &[&str]) -> Self {
        Self {
            outline: Ok(titles.iter().map(|t| t.to_string()).collect()),
            failing_content_titles: HashSet::new(),
            failing_image_titles: HashSet::new(),
            image_error_body: "image backend unavailable".to_string(),
        }
    }

    pub fn with_failing_outline(message: &str) -> Self {
        Self {
            outline: Err(message.to_string()),
            failing_content_titles: HashSet::new(),
            failing_image_titles: HashSet::new(),
            image_error_body: "image backend unavailable".to_string(),
        }
    }

    pub fn failing_image(mut self, title: &str) -> Self {
        self.failing_image_titles.insert(title.to_string());
        self
    }

    pub fn failing_content(mut self, title: &str) -> Self {
        self.failing_content_titles.insert(title.to_string());
        self
    }

    pub fn image_error_body(mut self, body: &str) -> Self {
        self.image_error_body = body.to_string();
        self
    }

    fn title_matches(prompt: &str, titles: &HashSet<String>) -> bool {
        titles.iter().any(|t| prompt.contains(t.as_str()))
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn outline(&self, _topic: &str) -> Result<Vec<String>, BackendError> {
        match &self.outline {
            Ok(titles) => Ok(titles.clone()),
            Err(message) => Err(BackendError::Api {
                status: 500,
                body: message.clone(),
            }),
        }
    }

    async fn text(&self, prompt: &str) -> Result<String, BackendError> {
        if Self::title_matches(prompt, &self.failing_content_titles) {
            return Err(BackendError::Api {
                status: 500,
                body: "content generation failed".to_string(),
            });
        }
        Ok(format!("Generated prose. [{}]", &prompt[..32.min(prompt.len())]))
    }

    async fn image(
        &self,
        prompt: &str,
        _aspect_ratio: &str,
    ) -> Result<Option<ImagePayload>, BackendError> {
        if Self::title_matches(prompt, &self.failing_image_titles) {
            return Err(BackendError::Api {
                status: 400,
                body: self.image_error_body.clone(),
            });
        }
        Ok(Some(ImagePayload {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
            mime_type: "image/jpeg".to_string(),
        }))
    }
}
