use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::sse::{Event, Sse},
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use super::super::AppState;
use crate::core::backend::gemini::GeminiBackend;
use crate::core::export::encode_report;
use crate::core::report::pipeline::{PipelineEvent, ReportPipeline};
use crate::core::report::{GenerationOptions, OutputFormat};

#[derive(serde::Deserialize)]
pub struct GenerateRequest {
    topic: String,
    #[serde(default)]
    options: GenerationOptions,
}

/// Start a report run and stream its progress as SSE. Every event is one
/// serialized `PipelineEvent`; a fatal error becomes a terminal
/// `{"type":"failed"}` event instead of breaking the stream mid-flight.
pub async fn generate_stream(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Response {
    let topic = payload.topic.trim().to_string();
    if topic.is_empty() {
        return Json(serde_json::json!({ "success": false, "error": "Topic must not be empty" }))
            .into_response();
    }

    let (event_tx, event_rx) = tokio::sync::mpsc::channel::<PipelineEvent>(32);
    let (out_tx, out_rx) = tokio::sync::mpsc::channel::<String>(32);

    let forward_tx = out_tx.clone();
    tokio::spawn(async move {
        let mut event_rx = event_rx;
        while let Some(event) = event_rx.recv().await {
            if let Ok(json) = serde_json::to_string(&event) {
                let _ = forward_tx.send(json).await;
            }
        }
    });

    let options = payload.options;
    tokio::spawn(async move {
        info!("API generation request for topic: {}", topic);
        let result = async {
            let api_key = state.resolver.resolve().await?;
            let backend = GeminiBackend::new(api_key);
            ReportPipeline::new(&backend, &state.history)
                .run(&topic, &options, Some(event_tx))
                .await
        }
        .await;

        if let Err(e) = result {
            let failed = serde_json::json!({ "type": "failed", "message": e.to_string() });
            let _ = out_tx.send(failed.to_string()).await;
        }
    });

    let stream = ReceiverStream::new(out_rx)
        .map(|data| Ok::<Event, Infallible>(Event::default().data(data)));
    Sse::new(stream).into_response()
}

pub async fn list_reports(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.history.summaries().await {
        Ok(reports) => Json(serde_json::json!({ "success": true, "reports": reports })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    }
}

pub async fn get_report(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Json<serde_json::Value> {
    match state.history.load_by_id(id).await {
        Ok(Some(report)) => Json(serde_json::json!({ "success": true, "report": report })),
        Ok(None) => Json(serde_json::json!({ "success": false, "error": "Report not found" })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    }
}

pub async fn delete_report(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Json<serde_json::Value> {
    match state.history.delete_by_id(id).await {
        Ok(true) => Json(serde_json::json!({ "success": true })),
        Ok(false) => Json(serde_json::json!({ "success": false, "error": "Report not found" })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    }
}

pub async fn clear_history(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.history.clear().await {
        Ok(removed) => Json(serde_json::json!({ "success": true, "removed": removed })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    }
}

#[derive(serde::Deserialize)]
pub struct EditSectionRequest {
    content: String,
}

pub async fn edit_section(
    Path((id, index)): Path<(i64, usize)>,
    State(state): State<AppState>,
    Json(payload): Json<EditSectionRequest>,
) -> Json<serde_json::Value> {
    match state
        .history
        .update_section_content(id, index, &payload.content)
        .await
    {
        Ok(true) => Json(serde_json::json!({ "success": true })),
        Ok(false) => {
            Json(serde_json::json!({ "success": false, "error": "Report or section not found" }))
        }
        Err(e) => Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    }
}

#[derive(serde::Deserialize)]
pub struct ExportQuery {
    format: OutputFormat,
}

pub async fn export_report(
    Path(id): Path<i64>,
    Query(query): Query<ExportQuery>,
    State(state): State<AppState>,
) -> Response {
    let report = match state.history.load_by_id(id).await {
        Ok(Some(report)) => report,
        Ok(None) => {
            return Json(serde_json::json!({ "success": false, "error": "Report not found" }))
                .into_response();
        }
        Err(e) => {
            return Json(serde_json::json!({ "success": false, "error": e.to_string() }))
                .into_response();
        }
    };

    match encode_report(&report, query.format) {
        Ok(doc) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, doc.mime_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", doc.file_name),
                ),
            ],
            doc.bytes,
        )
            .into_response(),
        Err(e) => {
            Json(serde_json::json!({ "success": false, "error": e.to_string() })).into_response()
        }
    }
}
