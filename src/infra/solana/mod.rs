pub mod client;
pub mod deployment;
pub mod instruction;
pub mod ledger;

pub use client::SolanaConnection;
pub use ledger::SolanaLedger;
