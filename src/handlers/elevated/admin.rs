use std::collections::HashMap;

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{CommentView, User};
use crate::database::Page;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, DbPool};
use crate::services::{AdminService, CommentService, Stats, UserService};

#[derive(Debug, Deserialize)]
pub struct RoleChange {
    pub role: Option<String>,
}

/// GET /api/v1/admin/all - searchable, filterable, paginated users
pub async fn users(Extension(DbPool(pool)): Extension<DbPool>, Query(params): Query<HashMap<String, String>>) -> ApiResult<Page<User>> {
    let page = UserService::new(pool).list(&params).await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/v1/comment/all - searchable, filterable, paginated comments
pub async fn comments(
    Extension(DbPool(pool)): Extension<DbPool>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Page<CommentView>> {
    let page = CommentService::new(pool).list(&params).await?;
    Ok(ApiResponse::success(page))
}

/// GET /api/v1/admin/stats/all
pub async fn stats(Extension(DbPool(pool)): Extension<DbPool>) -> ApiResult<Stats> {
    Ok(ApiResponse::success(AdminService::new(pool).stats().await?))
}

/// GET /api/v1/admin/byId/:id
pub async fn user(Extension(DbPool(pool)): Extension<DbPool>, Path(id): Path<String>) -> ApiResult<User> {
    Ok(ApiResponse::success(AdminService::new(pool).user(parse_id(&id)?).await?))
}

/// PUT /api/v1/admin/byId/:id
pub async fn change_role(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<RoleChange>,
) -> ApiResult<User> {
    let user = AdminService::new(pool).change_role(&admin, parse_id(&id)?, body.role).await?;
    Ok(ApiResponse::success(user).with_message("User role updated successfully"))
}

/// DELETE /api/v1/admin/byId/:id
pub async fn delete_user(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    AdminService::new(pool).delete_user(&admin, id).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_message("User Deleted"))
}

/// GET /api/v1/admin/block/:id - toggles the block flag
pub async fn toggle_block(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(admin)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<User> {
    let user = AdminService::new(pool).toggle_block(&admin, parse_id(&id)?).await?;
    let message = if user.is_blocked { "User blocked successfully" } else { "User unblocked successfully" };
    Ok(ApiResponse::success(user).with_message(message))
}

/// GET /api/v1/admin/request/accept/:id
pub async fn accept_request(Extension(DbPool(pool)): Extension<DbPool>, Path(id): Path<String>) -> ApiResult<User> {
    let user = AdminService::new(pool).accept_request(parse_id(&id)?).await?;
    Ok(ApiResponse::success(user).with_message("Creator request accepted"))
}

/// GET /api/v1/admin/request/reject/:id
pub async fn reject_request(Extension(DbPool(pool)): Extension<DbPool>, Path(id): Path<String>) -> ApiResult<User> {
    let user = AdminService::new(pool).reject_request(parse_id(&id)?).await?;
    Ok(ApiResponse::success(user).with_message("Creator request rejected"))
}

/// GET /api/v1/admin/request/rejectAll/all
pub async fn reject_all_requests(Extension(DbPool(pool)): Extension<DbPool>) -> ApiResult<Value> {
    let rejected = AdminService::new(pool).reject_all_requests().await?;
    Ok(ApiResponse::success(json!({ "rejected": rejected })).with_message("All creator requests rejected"))
}

/// DELETE /api/v1/admin/del/blog/:id
pub async fn delete_blog(Extension(DbPool(pool)): Extension<DbPool>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    AdminService::new(pool).delete_blog(id).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Blog deleted successfully"))
}

/// DELETE /api/v1/admin/del/comment/:id
pub async fn delete_comment(Extension(DbPool(pool)): Extension<DbPool>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    AdminService::new(pool).delete_comment(id).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Comment Deleted"))
}
