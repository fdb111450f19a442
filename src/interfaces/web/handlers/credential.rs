use axum::{Json, extract::State};

use super::super::AppState;

/// Mask a secret for display: only the last four characters survive.
fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        "••••".to_string()
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("••••{}", tail)
    }
}

pub async fn credential_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.vault.get_override().await {
        Ok(Some(value)) => Json(serde_json::json!({
            "success": true,
            "configured": true,
            "source": "override",
            "masked": mask(&value)
        })),
        Ok(None) => {
            let configured = state.resolver.is_configured().await;
            Json(serde_json::json!({
                "success": true,
                "configured": configured,
                "source": if configured { "default" } else { "none" }
            }))
        }
        Err(e) => Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    }
}

#[derive(serde::Deserialize)]
pub struct SetCredentialRequest {
    value: String,
}

pub async fn set_credential(
    State(state): State<AppState>,
    Json(payload): Json<SetCredentialRequest>,
) -> Json<serde_json::Value> {
    if payload.value.trim().is_empty() {
        return Json(
            serde_json::json!({ "success": false, "error": "Credential must not be empty" }),
        );
    }
    match state.vault.set_override(payload.value.trim()).await {
        Ok(()) => Json(serde_json::json!({ "success": true, "message": "Credential updated" })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    }
}

pub async fn clear_credential(State(state): State<AppState>) -> Json<serde_json::Value> {
    match state.vault.clear_override().await {
        Ok(removed) => Json(serde_json::json!({ "success": true, "removed": removed })),
        Err(e) => Json(serde_json::json!({ "success": false, "error": e.to_string() })),
    }
}
