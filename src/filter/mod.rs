pub mod types;
pub mod filter;
pub mod filter_where;
pub mod filter_order;
pub mod list_query;
pub mod error;

pub use types::*;
pub use filter::Filter;
pub use error::FilterError;
pub use list_query::{FieldKind, FieldSpec, ListQuery, ListSpec, RESERVED_PARAMS};
