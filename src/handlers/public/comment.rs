use axum::extract::{Extension, Path};
use serde_json::{json, Value};

use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, DbPool};
use crate::services::CommentService;

/// GET /api/v1/comment/post/:id
pub async fn for_post(Extension(DbPool(pool)): Extension<DbPool>, Path(id): Path<String>) -> ApiResult<Value> {
    let comments = CommentService::new(pool).for_post(parse_id(&id)?).await?;
    Ok(ApiResponse::success(json!({ "count": comments.len(), "comments": comments })))
}
