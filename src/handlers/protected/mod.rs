// Bearer token required; the loaded user is available as `CurrentUser`
pub mod blog;
pub mod comment;
pub mod like;
pub mod user;
