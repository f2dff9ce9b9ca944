use crate::crypto::hashing::{parse_prefixed_hex, to_prefixed_hex};
use crate::transport::http::handlers::common::{error_response, fail, ok};
use crate::transport::http::types::{ApiResponse, AppState, LedgerEntryView};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;

#[utoipa::path(
    get,
    path = "/api/ledger/count",
    responses(
        (status = 200, description = "Number of verification results on the ledger", body = ApiResponse),
        (status = 502, description = "Ledger unreachable", body = ApiResponse)
    )
)]
pub async fn verification_count_handler(State(state): State<AppState>) -> Response {
    match state.ledger.verification_count().await {
        Ok(count) => ok(serde_json::json!({ "count": count })),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/ledger/verifications/{hash}",
    params(("hash" = String, Path, description = "0x-prefixed content hash")),
    responses(
        (status = 200, description = "Stored verification result", body = ApiResponse),
        (status = 400, description = "Malformed hash", body = ApiResponse),
        (status = 404, description = "No result for this hash", body = ApiResponse)
    )
)]
pub async fn get_verification_handler(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Response {
    let hash = match parse_prefixed_hex(&hash) {
        Ok(h) => h,
        Err(e) => return error_response(&e.into()),
    };

    match state.ledger.verification(&hash).await {
        Ok(Some(entry)) => ok(LedgerEntryView {
            content_hash: to_prefixed_hex(&entry.content_hash),
            is_verified: entry.is_verified,
            verification_type: entry.verification_type.to_string(),
            remark: entry.remark,
            verifier: entry.verifier,
            recorded_at: entry.recorded_at.to_rfc3339(),
        }),
        Ok(None) => fail(
            StatusCode::NOT_FOUND,
            format!("No verification recorded for {}", to_prefixed_hex(&hash)),
        ),
        Err(e) => error_response(&e),
    }
}
