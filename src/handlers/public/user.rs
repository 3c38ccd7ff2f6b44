use axum::extract::{Extension, Path};
use serde_json::{json, Value};

use crate::database::models::User;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, DbPool};
use crate::services::UserService;

/// GET /api/v1/user/author/all
pub async fn authors(Extension(DbPool(pool)): Extension<DbPool>) -> ApiResult<Value> {
    let authors = UserService::new(pool).authors().await?;
    Ok(ApiResponse::success(json!({ "count": authors.len(), "authors": authors })))
}

/// GET /api/v1/user/author/:id
pub async fn author(Extension(DbPool(pool)): Extension<DbPool>, Path(id): Path<String>) -> ApiResult<User> {
    let author = UserService::new(pool).author(parse_id(&id)?).await?;
    Ok(ApiResponse::success(author))
}
