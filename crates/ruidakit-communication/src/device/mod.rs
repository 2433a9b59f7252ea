//! Controller session and device queries

pub mod query;
pub mod session;

pub use query::{parse_dimension_mm, parse_model_name, DeviceQuery};
pub use session::{Session, PSEUDO_COLORS};
