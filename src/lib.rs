//! Farmacia API: registry-driven pharmacy inventory REST backend.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod registry;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;

pub use client::{ApiClient, TableController};
pub use config::Settings;
pub use error::{AppError, RegistryError};
pub use gateway::DbGateway;
pub use registry::{pharmacy_registry, TableRegistry, TableSchema};
pub use routes::{common_routes, record_routes};
pub use service::CrudService;
pub use state::AppState;
