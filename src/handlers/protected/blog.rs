use axum::{
    extract::{Extension, Path},
    Json,
};
use serde_json::{json, Value};

use crate::database::models::Blog;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, DbPool};
use crate::services::{BlogService, BlogUpdate, NewBlog};

/// GET /api/v1/blog/user/all - the caller's own blogs
pub async fn mine(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Value> {
    let blogs = BlogService::new(pool).mine(&user).await?;
    Ok(ApiResponse::success(json!({ "count": blogs.len(), "blogs": blogs })))
}

/// POST /api/v1/blog/create
pub async fn create(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<NewBlog>,
) -> ApiResult<Blog> {
    let blog = BlogService::new(pool).create(&user, body).await?;
    Ok(ApiResponse::created(blog).with_message("Blog created successfully"))
}

/// PUT /api/v1/blog/edit/:id
pub async fn update(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<BlogUpdate>,
) -> ApiResult<Blog> {
    let blog = BlogService::new(pool).update(&user, parse_id(&id)?, body).await?;
    Ok(ApiResponse::success(blog).with_message("Blog updated successfully"))
}

/// DELETE /api/v1/blog/edit/:id
pub async fn delete(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    BlogService::new(pool).delete(&user, id).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Blog deleted successfully"))
}
