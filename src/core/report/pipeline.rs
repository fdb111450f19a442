use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::{GenerationOptions, Report, assemble_section};
use crate::core::backend::GenerationBackend;
use crate::core::error::ReportError;
use crate::core::history::HistoryStore;

/// Progress notification published while a run is in flight. Section
/// completion carries the full partial-report snapshot so a consumer can
/// render the growing document without tracking state of its own.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    OutlineReady {
        topic: String,
        titles: Vec<String>,
    },
    SectionStarted {
        index: usize,
        total: usize,
        title: String,
    },
    SectionCompleted {
        index: usize,
        total: usize,
        report: Report,
    },
    Completed {
        report: Report,
        advisory: Option<Advisory>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    Billing,
    InvalidCredential,
    Other,
}

/// The single non-fatal notification a completed run may carry. Built from
/// the first recorded image error; the rest are logged only.
#[derive(Debug, Clone, Serialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub message: String,
    pub detail: String,
    pub failed_sections: usize,
}

/// Outcome of a successful run. The report is already persisted to history.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub report: Report,
    pub advisory: Option<Advisory>,
}

pub struct ReportPipeline<'a> {
    backend: &'a dyn GenerationBackend,
    history: &'a HistoryStore,
}

async fn emit(tx: &Option<mpsc::Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = tx {
        // A dropped receiver never fails the run.
        let _ = tx.send(event).await;
    }
}

impl<'a> ReportPipeline<'a> {
    pub fn new(backend: &'a dyn GenerationBackend, history: &'a HistoryStore) -> Self {
        Self { backend, history }
    }

    /// Run the full generation pipeline for one topic: outline, then one
    /// section at a time in outline order, content and image concurrently
    /// within each section. The finished report is appended to history
    /// before this returns. Fatal failures abort the run and persist
    /// nothing.
    pub async fn run(
        &self,
        topic: &str,
        options: &GenerationOptions,
        progress: Option<mpsc::Sender<PipelineEvent>>,
    ) -> Result<PipelineOutcome, ReportError> {
        let run_id = uuid::Uuid::new_v4();
        info!("Report run {} started for topic: {}", run_id, topic);

        let titles = self.backend.outline(topic).await?;
        if titles.is_empty() {
            warn!("Report run {} aborted: empty outline", run_id);
            return Err(ReportError::EmptyOutline);
        }
        emit(&progress, PipelineEvent::OutlineReady {
            topic: topic.to_string(),
            titles: titles.clone(),
        })
        .await;

        let mut report = Report::new(topic);
        let total = titles.len();
        let mut image_errors: Vec<String> = Vec::new();

        for (index, title) in titles.iter().enumerate() {
            emit(&progress, PipelineEvent::SectionStarted {
                index,
                total,
                title: title.clone(),
            })
            .await;

            let (section, image_error) =
                assemble_section(self.backend, topic, title, options).await?;
            report.sections.push(section);

            if let Some(image_error) = image_error {
                warn!(
                    "Run {}: image failed for section {}/{} '{}': {}",
                    run_id,
                    index + 1,
                    total,
                    title,
                    image_error
                );
                image_errors.push(image_error);
            }

            emit(&progress, PipelineEvent::SectionCompleted {
                index,
                total,
                report: report.clone(),
            })
            .await;
        }

        self.history
            .save(&mut report)
            .await
            .map_err(|e| ReportError::Storage(e.to_string()))?;
        let advisory = build_advisory(&image_errors);
        info!(
            "Report run {} completed: {} sections, {} image failures",
            run_id,
            report.sections.len(),
            image_errors.len()
        );

        emit(&progress, PipelineEvent::Completed {
            report: report.clone(),
            advisory: advisory.clone(),
        })
        .await;

        Ok(PipelineOutcome { report, advisory })
    }
}

/// Collapse the run's image failures into at most one advisory, specialized
/// for the failure classes a user can act on.
fn build_advisory(image_errors: &[String]) -> Option<Advisory> {
    let first = image_errors.first()?;
    let detail = extract_error_message(first);
    let lowered = detail.to_lowercase();

    let (kind, message) = if lowered.contains("billing") {
        (
            AdvisoryKind::Billing,
            "Images could not be generated: make sure billing is enabled for your \
             API credential. Placeholders were used."
                .to_string(),
        )
    } else if lowered.contains("api key not valid") {
        (
            AdvisoryKind::InvalidCredential,
            "Images could not be generated: your API credential appears to be \
             invalid. Please check your settings."
                .to_string(),
        )
    } else {
        (
            AdvisoryKind::Other,
            format!("Images could not be generated. Error: {}", detail),
        )
    };

    Some(Advisory {
        kind,
        message,
        detail,
        failed_sections: image_errors.len(),
    })
}

/// Provider errors often arrive as a JSON body; prefer its `error.message`
/// over the raw text when present.
fn extract_error_message(raw: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw)
        && let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
    {
        return message.to_string();
    }
    raw.to_string()
}
