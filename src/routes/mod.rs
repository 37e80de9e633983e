pub mod common;
pub mod records;

pub use common::common_routes;
pub use records::record_routes;
