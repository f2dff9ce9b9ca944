pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod hashing;
    pub mod health;
    pub mod ledger;
    pub mod notifications;
    pub mod records;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
