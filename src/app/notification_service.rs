//! The notification sweep.
//!
//! One pass over every record with `notified = false`: render the template for
//! its status, send it, then mark the record notified. A failed send is logged
//! and skipped, so the record is picked up again by the next sweep. A crash
//! between a successful send and the status update re-sends on the next run.

use crate::domain::notification::{EmailMessage, Mailer, NotificationRecord, TemplateBook};
use crate::infra::config;
use crate::storage::records::RecordStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SweepReport {
    /// Unnotified records found by the query.
    pub examined: usize,
    /// Sent and marked notified.
    pub sent: usize,
    /// Send failed; still `notified = false`.
    pub failed: usize,
    /// Sent, but the status update failed (will be re-sent next sweep).
    pub unpersisted: usize,
}

#[derive(Clone)]
pub struct NotificationSweep {
    store: Arc<dyn RecordStore>,
    mailer: Arc<dyn Mailer>,
    templates: TemplateBook,
    from: String,
}

impl NotificationSweep {
    pub fn new(
        store: Arc<dyn RecordStore>,
        mailer: Arc<dyn Mailer>,
        templates: TemplateBook,
        from: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mailer,
            templates,
            from: from.into(),
        }
    }

    /// Standard templates, sender from `MAIL_FROM`.
    pub fn from_env(store: Arc<dyn RecordStore>, mailer: Arc<dyn Mailer>) -> anyhow::Result<Self> {
        Ok(Self::new(store, mailer, TemplateBook::standard(), config::mail_from()?))
    }

    pub fn compose(&self, record: &NotificationRecord) -> EmailMessage {
        let rendered = self.templates.render(&record.name, &record.status);
        EmailMessage {
            from: self.from.clone(),
            to: record.email.clone(),
            subject: rendered.subject,
            html: rendered.html,
        }
    }

    /// Runs one sweep. Only the initial query can fail the whole run.
    pub async fn run(&self) -> anyhow::Result<SweepReport> {
        let pending = self.store.find_unnotified().await?;
        let mut report = SweepReport {
            examined: pending.len(),
            ..SweepReport::default()
        };
        info!(count = pending.len(), "notification sweep started");

        for record in &pending {
            let message = self.compose(record);

            if let Err(e) = self.mailer.send(&message).await {
                error!(record_id = record.id, to = %record.email, error = %e, "failed to send notification");
                report.failed += 1;
                continue;
            }

            match self.store.mark_notified(record.id).await {
                Ok(()) => {
                    info!(
                        record_id = record.id,
                        to = %record.email,
                        status = %record.application_status(),
                        "notification sent"
                    );
                    report.sent += 1;
                }
                Err(e) => {
                    warn!(record_id = record.id, error = %e, "notification sent but status update failed");
                    report.unpersisted += 1;
                }
            }
        }

        info!(
            examined = report.examined,
            sent = report.sent,
            failed = report.failed,
            unpersisted = report.unpersisted,
            "notification sweep finished"
        );
        Ok(report)
    }
}
