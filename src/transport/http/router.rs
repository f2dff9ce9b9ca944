use crate::app::notification_service::SweepReport;
use crate::domain::notification::{NewEnrollment, NotificationRecord};
use crate::transport::http::handlers::{hashing, health, ledger, notifications, records};
use crate::transport::http::types::{ApiResponse, LedgerEntryView};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        hashing::hash_payload_handler,
        ledger::verification_count_handler,
        ledger::get_verification_handler,
        records::list_records_handler,
        records::enroll_record_handler,
        notifications::run_sweep_handler
    ),
    components(schemas(
        ApiResponse,
        LedgerEntryView,
        NewEnrollment,
        NotificationRecord,
        SweepReport
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/hash", post(hashing::hash_payload_handler))
        .route("/api/ledger/count", get(ledger::verification_count_handler))
        .route("/api/ledger/verifications/:hash", get(ledger::get_verification_handler))
        .route(
            "/api/records",
            get(records::list_records_handler).post(records::enroll_record_handler),
        )
        .route("/api/notifications/sweep", post(notifications::run_sweep_handler))
        .with_state(app_state)
}
