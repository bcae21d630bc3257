use std::sync::Arc;

use crate::store::PersistenceGateway;

/// Shared application state: the dependency-injected persistence gateway.
/// Handlers never reach for a global pool; tests swap in `MemoryGateway`.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn PersistenceGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }
}
