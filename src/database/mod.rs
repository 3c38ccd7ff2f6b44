pub mod manager;
pub mod models;
pub mod pagination;
pub mod query_builder;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use pagination::{paginate, Collection, Page};
pub use repository::Repository;
