//! Safe SQL builder: identifiers from the registry only, values as parameters.

mod builder;
pub mod params;

pub use builder::{delete, insert, select_all, update, updatable_fields, QueryBuf};
pub use params::BindValue;
