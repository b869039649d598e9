//! User directory subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handler (http/users.rs)
//!     → UserStore trait (store.rs)
//!         → MongoUserStore (mongo.rs): one datastore call per operation
//!         → InMemoryUserStore (memory.rs): same semantics, process-local
//! ```
//!
//! # Design Decisions
//! - Handlers pass request values straight through; no schema checks
//! - Bulk update/delete are single datastore operations, atomic per call only
//! - Store failures surface as `StoreError` and become 500 responses

pub mod memory;
pub mod mongo;
pub mod store;
pub mod types;

use std::sync::Arc;

use crate::config::{DatabaseConfig, StoreBackend};

pub use memory::InMemoryUserStore;
pub use mongo::MongoUserStore;
pub use store::UserStore;
pub use types::{DeleteSummary, StoreError, StoreResult, UpdateSummary, User, UserFilter};

/// Build the configured store and confirm it is reachable.
pub async fn open_store(config: &DatabaseConfig) -> StoreResult<Arc<dyn UserStore>> {
    let store: Arc<dyn UserStore> = match config.backend {
        StoreBackend::Mongo => Arc::new(MongoUserStore::connect(config).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory user store; users are not persisted");
            Arc::new(InMemoryUserStore::new())
        }
    };
    store
        .ping()
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
    Ok(store)
}
