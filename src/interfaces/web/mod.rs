mod handlers;
mod router;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::core::context::AppContext;
use crate::core::credentials::CredentialResolver;
use crate::core::history::HistoryStore;
use crate::core::vault::CredentialVault;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) history: HistoryStore,
    pub(crate) vault: CredentialVault,
    pub(crate) resolver: Arc<CredentialResolver>,
}

/// Localhost HTTP API: report generation over SSE, history CRUD, credential
/// override management, and word export.
pub struct ApiServer {
    state: AppState,
    api_host: String,
    api_port: u16,
}

impl ApiServer {
    pub fn new(ctx: &AppContext, api_host: String, api_port: u16) -> Self {
        Self {
            state: AppState {
                history: ctx.history.clone(),
                vault: ctx.vault.clone(),
                resolver: ctx.resolver.clone(),
            },
            api_host,
            api_port,
        }
    }

    pub async fn serve(self) -> Result<()> {
        let app = router::build_api_router(self.state, self.api_port);
        let addr = format!("{}:{}", self.api_host, self.api_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("API server listening on http://{}", addr);
        axum::serve(listener, app).await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::core::context::test_context;

    pub(crate) async fn test_router() -> axum::Router {
        let ctx = test_context().await;
        let state = AppState {
            history: ctx.history.clone(),
            vault: ctx.vault.clone(),
            resolver: ctx.resolver.clone(),
        };
        super::router::build_api_router(state, 0)
    }

    pub(crate) async fn seeded_router() -> (axum::Router, crate::core::report::Report) {
        let ctx = test_context().await;
        let mut report = crate::core::report::Report::new("Seeded Topic");
        report.sections.push(crate::core::report::ReportSection {
            title: "Intro".into(),
            content: "seeded content".into(),
            image_url: "data:image/jpeg;base64,abc".into(),
            image_prompt: Some("seed prompt".into()),
            is_placeholder: false,
        });
        ctx.history.save(&mut report).await.unwrap();
        let state = AppState {
            history: ctx.history.clone(),
            vault: ctx.vault.clone(),
            resolver: ctx.resolver.clone(),
        };
        (super::router::build_api_router(state, 0), report)
    }
}
