use axum::extract::{Extension, Path};
use serde_json::{json, Value};

use crate::database::models::{Blog, LikeView};
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, DbPool};
use crate::services::LikeService;

/// GET /api/v1/like/do/:id
pub async fn like(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Blog> {
    let blog = LikeService::new(pool).like(&user, parse_id(&id)?).await?;
    Ok(ApiResponse::success(blog))
}

/// GET /api/v1/like/undo/:id
pub async fn unlike(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Blog> {
    let blog = LikeService::new(pool).unlike(&user, parse_id(&id)?).await?;
    Ok(ApiResponse::success(blog))
}

/// GET /api/v1/like/fetch/:id
pub async fn fetch(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let liked = LikeService::new(pool).has_liked(&user, parse_id(&id)?).await?;
    Ok(ApiResponse::success(json!({ "like": liked })))
}

/// GET /api/v1/like/fetch/all/:id - admins and the post's creator
pub async fn for_post(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Vec<LikeView>> {
    let likes = LikeService::new(pool).for_post(&user, parse_id(&id)?).await?;
    Ok(ApiResponse::success(likes))
}
