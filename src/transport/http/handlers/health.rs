use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (store and ledger reachable)", body = ApiResponse),
        (status = 503, description = "Store or ledger unreachable", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.ping().await;
    let ledger = state.ledger.verification_count().await;

    let data = serde_json::json!({
        "store": if store.is_ok() { "ok" } else { "unreachable" },
        "ledger": if ledger.is_ok() { "ok" } else { "unreachable" },
    });

    match (store, ledger) {
        (Ok(_), Ok(_)) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(data),
                error: None,
            }),
        ),
        (store, ledger) => {
            let mut errors = Vec::new();
            if let Err(e) = store {
                errors.push(format!("store: {}", e));
            }
            if let Err(e) = ledger {
                errors.push(format!("ledger: {}", e));
            }
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    success: false,
                    data: Some(data),
                    error: Some(errors.join("; ")),
                }),
            )
        }
    }
}
