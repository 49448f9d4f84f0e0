use axum::Json;
use axum::extract::State;
use serde::Serialize;

use threadchat_core::backend::ChatBackend;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub backend_healthy: bool,
}

/// GET /up - Liveness. The service is up even when the backend is not.
///
/// The backend check is capped well below the chat timeout.
pub async fn up(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        backend_healthy: state.exchange.backend().health().await,
    })
}
