use crate::domain::notification::NewEnrollment;
use crate::transport::http::handlers::common::{error_response, fail, ok, rejection_response};
use crate::transport::http::types::{
    ApiResponse, AppState, ListRecordsQuery, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/records",
    params(ListRecordsQuery),
    responses(
        (status = 200, description = "Newest records first", body = ApiResponse),
        (status = 400, description = "Malformed query string", body = ApiResponse),
        (status = 502, description = "Store unreachable", body = ApiResponse)
    )
)]
pub async fn list_records_handler(
    State(state): State<AppState>,
    query: Result<Query<ListRecordsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(rejection) => return rejection_response(rejection),
    };
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
    match state.store.list(limit).await {
        Ok(records) => ok(records),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/records",
    request_body = NewEnrollment,
    responses(
        (status = 200, description = "Record enrolled (not yet notified)", body = ApiResponse),
        (status = 400, description = "Malformed body, missing name or email", body = ApiResponse)
    )
)]
pub async fn enroll_record_handler(
    State(state): State<AppState>,
    enrollment: Result<Json<NewEnrollment>, JsonRejection>,
) -> Response {
    let Json(enrollment) = match enrollment {
        Ok(e) => e,
        Err(rejection) => return rejection_response(rejection),
    };
    if enrollment.name.trim().is_empty() {
        return fail(StatusCode::BAD_REQUEST, "name must not be empty");
    }
    if !enrollment.email.contains('@') {
        return fail(StatusCode::BAD_REQUEST, "email must be an email address");
    }
    match state.store.enroll(enrollment).await {
        Ok(record) => ok(record),
        Err(e) => error_response(&e),
    }
}
