//! Client-side data layer for the dashboard: an HTTP transport and a
//! per-table controller holding a cached record list.

mod api;
mod controller;

pub use api::{ApiClient, ClientError, RecordTransport};
pub use controller::{ControllerError, TableController};
