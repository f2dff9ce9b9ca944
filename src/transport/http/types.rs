use crate::app::notification_service::NotificationSweep;
use crate::domain::ledger::Ledger;
use crate::storage::records::RecordStore;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn Ledger>,
    pub store: Arc<dyn RecordStore>,
    pub sweep: Arc<NotificationSweep>,
    /// Serializes sweeps so two requests can't send the same email twice.
    pub sweep_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(ledger: Arc<dyn Ledger>, store: Arc<dyn RecordStore>, sweep: NotificationSweep) -> Self {
        Self {
            ledger,
            store,
            sweep: Arc::new(sweep),
            sweep_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HashQuery {
    /// Optional `GPA` / `Employment` / `Degree`; when given the payload is validated.
    #[serde(rename = "type")]
    pub verification_type: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct LedgerEntryView {
    pub content_hash: String,
    pub is_verified: bool,
    pub verification_type: String,
    pub remark: String,
    pub verifier: String,
    pub recorded_at: String,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRecordsQuery {
    /// Maximum rows to return (default 50, capped at 500).
    pub limit: Option<u32>,
}

pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const MAX_LIST_LIMIT: u32 = 500;
