// No authentication: read-only blog, author and comment endpoints
pub mod blog;
pub mod comment;
pub mod user;
