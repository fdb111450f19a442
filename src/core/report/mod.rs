mod assembler;
mod image;
pub mod pipeline;
pub mod placeholder;
pub mod prompts;

#[cfg(test)]
mod tests;

pub use assembler::assemble_section;
pub use image::{ImageResult, generate_section_image};
pub use prompts::image_prompt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSection {
    pub title: String,
    pub content: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    #[serde(default)]
    pub is_placeholder: bool,
}

/// A generated report. `id` is the creation timestamp in unix milliseconds
/// and doubles as the history key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub topic: String,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(topic: &str) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis(),
            created_at: now,
            topic: topic.to_string(),
            sections: Vec::new(),
        }
    }

    /// Replace one section's text. The only mutation a report supports
    /// after the pipeline hands it over.
    pub fn replace_section_content(&mut self, index: usize, content: &str) -> bool {
        match self.sections.get_mut(index) {
            Some(section) => {
                section.content = content.to_string();
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLength {
    Short,
    #[default]
    Normal,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Word,
}

/// Immutable for the duration of one pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
    pub include_contributors: bool,
    pub length: ReportLength,
    pub output_format: OutputFormat,
}

