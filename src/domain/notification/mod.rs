//! Candidate-facing status notifications.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

pub mod templates;

pub use templates::{RenderedTemplate, TemplateBook, TemplateBuilder};

/// Application status as stored in the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationStatus {
    Accepted,
    Rejected,
    /// Covers both "in progress" and "saved".
    InProgress,
    Other(String),
}

impl ApplicationStatus {
    /// Maps a stored status string; unknown values fall through to `Other`.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        match normalized.as_str() {
            "accepted" => ApplicationStatus::Accepted,
            "rejected" => ApplicationStatus::Rejected,
            "in progress" | "saved" => ApplicationStatus::InProgress,
            _ => ApplicationStatus::Other(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationStatus::Accepted => f.write_str("accepted"),
            ApplicationStatus::Rejected => f.write_str("rejected"),
            ApplicationStatus::InProgress => f.write_str("in progress"),
            ApplicationStatus::Other(s) => f.write_str(s),
        }
    }
}

/// The document-store view of a record, as seen by the notification sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NotificationRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub status: String,
    /// Flips false -> true once per successful send; never reverts.
    pub notified: bool,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn application_status(&self) -> ApplicationStatus {
        ApplicationStatus::parse(&self.status)
    }
}

/// Input for enrolling a new candidate record.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct NewEnrollment {
    pub name: String,
    pub email: String,
    /// Absent or blank means `saved`.
    #[serde(default = "default_status", deserialize_with = "status_or_default")]
    pub status: String,
}

fn default_status() -> String {
    "saved".to_string()
}

fn status_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::trim) {
        None | Some("") => default_status(),
        Some(status) => status.to_string(),
    })
}

/// What the mail relay accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_map_to_variants() {
        assert_eq!(ApplicationStatus::parse("accepted"), ApplicationStatus::Accepted);
        assert_eq!(ApplicationStatus::parse(" Rejected "), ApplicationStatus::Rejected);
        assert_eq!(ApplicationStatus::parse("In  Progress"), ApplicationStatus::InProgress);
        assert_eq!(ApplicationStatus::parse("saved"), ApplicationStatus::InProgress);
        assert_eq!(
            ApplicationStatus::parse("on hold"),
            ApplicationStatus::Other("on hold".to_string())
        );
    }

    #[test]
    fn blank_or_missing_enrollment_status_is_saved() {
        for body in [
            r#"{"name":"A","email":"a@x.test"}"#,
            r#"{"name":"A","email":"a@x.test","status":""}"#,
            r#"{"name":"A","email":"a@x.test","status":"   "}"#,
            r#"{"name":"A","email":"a@x.test","status":null}"#,
        ] {
            let e: NewEnrollment = serde_json::from_str(body).unwrap();
            assert_eq!(e.status, "saved", "body: {}", body);
        }
        let e: NewEnrollment =
            serde_json::from_str(r#"{"name":"A","email":"a@x.test","status":" accepted "}"#).unwrap();
        assert_eq!(e.status, "accepted");
    }
}
