pub mod app;
pub mod crypto;
pub mod domain;
pub mod error;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::notification_service::{NotificationSweep, SweepReport};
pub use app::submission_service::{submit_records, SubmissionReport};
pub use crypto::hashing::{content_hash, to_prefixed_hex};
pub use domain::ledger::{Ledger, LedgerEntry, LedgerReceipt};
pub use domain::notification::{ApplicationStatus, EmailMessage, Mailer, NotificationRecord, TemplateBook};
pub use domain::record::{LedgerSubmission, VerificationRecord, VerificationType};
pub use error::VerificationError;
pub use infra::solana;
pub use infra::solana::SolanaLedger;
pub use storage::records::RecordStore;
