pub mod auth;
pub mod response;

pub use auth::{authorize_roles, jwt_auth_middleware, require_verified, CurrentUser, DbPool};
pub use response::{ApiResponse, ApiResult};
