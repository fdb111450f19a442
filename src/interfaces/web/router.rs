use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::AppState;
use super::handlers::{credential, reports};

fn build_localhost_cors(api_port: u16) -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        format!("http://127.0.0.1:{}", api_port),
        format!("http://localhost:{}", api_port),
    ]
    .iter()
    .filter_map(|o| o.parse().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
}

pub fn build_api_router(state: AppState, api_port: u16) -> Router {
    Router::new()
        .route("/api/reports/generate", post(reports::generate_stream))
        .route(
            "/api/reports",
            get(reports::list_reports).delete(reports::clear_history),
        )
        .route(
            "/api/reports/{id}",
            get(reports::get_report).delete(reports::delete_report),
        )
        .route(
            "/api/reports/{id}/sections/{index}",
            post(reports::edit_section),
        )
        .route("/api/reports/{id}/export", get(reports::export_report))
        .route(
            "/api/credential",
            get(credential::credential_status)
                .post(credential::set_credential)
                .delete(credential::clear_credential),
        )
        .route("/api/health", get(|| async { "ok" }))
        .layer(build_localhost_cors(api_port))
        .with_state(state)
}
