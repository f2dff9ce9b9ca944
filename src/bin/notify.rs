// src/bin/notify.rs
//
// Runs one notification sweep over unnotified records.

use std::sync::Arc;
use verification_ledger::infra::config;
use verification_ledger::infra::mail::HttpMailRelay;
use verification_ledger::storage::records::PostgresRecordStore;
use verification_ledger::NotificationSweep;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    config::load_env();
    config::init_tracing();

    let store = Arc::new(PostgresRecordStore::connect().await?);
    let mailer = Arc::new(HttpMailRelay::from_env()?);
    let sweep = NotificationSweep::from_env(store.clone(), mailer)?;

    let report = sweep.run().await?;
    println!(
        "> Sweep done: examined={} sent={} failed={} unpersisted={}",
        report.examined, report.sent, report.failed, report.unpersisted
    );

    store.pool().close().await;
    Ok(())
}
