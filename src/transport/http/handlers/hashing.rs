use crate::crypto::hashing::{canonical_json, content_hash, to_prefixed_hex};
use crate::domain::record::VerificationType;
use crate::transport::http::handlers::common::{error_response, ok, rejection_response};
use crate::transport::http::types::{ApiResponse, HashQuery};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::response::Response;
use axum::Json;
use serde_json::Value as JsonValue;

#[utoipa::path(
    post,
    path = "/api/hash",
    params(HashQuery),
    request_body(content = Object, description = "Payload to hash, hashed over its key-sorted JSON form"),
    responses(
        (status = 200, description = "Content hash of the payload", body = ApiResponse),
        (status = 400, description = "Malformed body or payload does not match the verification type", body = ApiResponse)
    )
)]
pub async fn hash_payload_handler(
    query: Result<Query<HashQuery>, QueryRejection>,
    payload: Result<Json<JsonValue>, JsonRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return rejection_response(rejection),
    };
    let Json(payload) = match payload {
        Ok(p) => p,
        Err(rejection) => return rejection_response(rejection),
    };

    if let Some(raw) = query.verification_type.as_deref() {
        let checked = raw
            .parse::<VerificationType>()
            .and_then(|t| t.validate_payload(&payload));
        if let Err(e) = checked {
            return error_response(&e.into());
        }
    }

    ok(serde_json::json!({
        "content_hash": to_prefixed_hex(&content_hash(&payload)),
        "canonical": canonical_json(&payload),
    }))
}
