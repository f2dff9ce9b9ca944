use crate::transport::http::handlers::common::{error_response, ok};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::response::Response;

#[utoipa::path(
    post,
    path = "/api/notifications/sweep",
    responses(
        (status = 200, description = "Sweep finished; per-record failures are counted, not fatal", body = ApiResponse),
        (status = 502, description = "Store query failed", body = ApiResponse)
    )
)]
pub async fn run_sweep_handler(State(state): State<AppState>) -> Response {
    let _guard = state.sweep_lock.lock().await;
    match state.sweep.run().await {
        Ok(report) => ok(report),
        Err(e) => error_response(&e),
    }
}
