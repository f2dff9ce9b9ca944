use crate::error::VerificationError;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub fn ok<T: Serialize>(data: T) -> Response {
    match serde_json::to_value(data) {
        Ok(v) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(v),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => fail(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to encode response: {}", e)),
    }
}

pub fn fail(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }),
    )
        .into_response()
}

/// Wraps an extractor rejection (bad JSON body, bad query string) in the envelope.
pub fn rejection_response(rejection: impl std::fmt::Display) -> Response {
    fail(StatusCode::BAD_REQUEST, format!("Invalid request: {}", rejection))
}

/// Maps an operation error to an HTTP status by its failure class.
pub fn error_response(err: &anyhow::Error) -> Response {
    let status = match err.downcast_ref::<VerificationError>() {
        Some(VerificationError::InvalidPayload(_)) => StatusCode::BAD_REQUEST,
        Some(VerificationError::AlreadyRecorded(_)) => StatusCode::CONFLICT,
        Some(VerificationError::ExternalCall { .. }) => StatusCode::BAD_GATEWAY,
        Some(VerificationError::MissingConfig(_)) | Some(VerificationError::InvalidConfig(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        None => StatusCode::INTERNAL_SERVER_ERROR,
    };
    fail(status, err.to_string())
}
