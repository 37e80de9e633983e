//! Shared application state for all routes.

use crate::gateway::DbGateway;
use crate::registry::TableRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub gateway: DbGateway,
    pub registry: Arc<TableRegistry>,
}

impl AppState {
    pub fn new(gateway: DbGateway, registry: TableRegistry) -> Self {
        AppState {
            gateway,
            registry: Arc::new(registry),
        }
    }
}
