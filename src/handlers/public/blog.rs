use std::collections::HashMap;

use axum::extract::{Extension, Path, Query};
use serde_json::{json, Value};

use crate::database::models::{Blog, BlogView};
use crate::database::Page;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, DbPool};
use crate::services::BlogService;

/// GET /api/v1/blog/all - searchable, filterable, paginated blogs
pub async fn list(Extension(DbPool(pool)): Extension<DbPool>, Query(params): Query<HashMap<String, String>>) -> ApiResult<Page<BlogView>> {
    let page = BlogService::new(pool).list(&params).await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/v1/blog/cate/all
pub async fn categories(Extension(DbPool(pool)): Extension<DbPool>) -> ApiResult<Value> {
    let categories = BlogService::new(pool).categories().await?;
    Ok(ApiResponse::success(json!({ "count": categories.len(), "categories": categories })))
}

/// GET /api/v1/blog/byId/:id
pub async fn get(Extension(DbPool(pool)): Extension<DbPool>, Path(id): Path<String>) -> ApiResult<BlogView> {
    let blog = BlogService::new(pool).get(parse_id(&id)?).await?;
    Ok(ApiResponse::success(blog))
}

/// GET /api/v1/blog/author/:id - public blogs of one author
pub async fn by_author(Extension(DbPool(pool)): Extension<DbPool>, Path(id): Path<String>) -> ApiResult<Value> {
    let blogs = BlogService::new(pool).by_author(parse_id(&id)?).await?;
    Ok(ApiResponse::success(json!({ "count": blogs.len(), "blogs": blogs })))
}

/// PATCH /api/v1/blog/update/view/:id
pub async fn view(Extension(DbPool(pool)): Extension<DbPool>, Path(id): Path<String>) -> ApiResult<Blog> {
    let blog = BlogService::new(pool).increment_views(parse_id(&id)?).await?;
    Ok(ApiResponse::success(blog))
}
