// Admin role required
pub mod admin;
