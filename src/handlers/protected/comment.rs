use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::Comment;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, DbPool};
use crate::services::CommentService;

#[derive(Debug, Deserialize)]
pub struct NewComment {
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditComment {
    pub new_comment: Option<String>,
}

/// POST /api/v1/comment/create/:id
pub async fn create(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<NewComment>,
) -> ApiResult<Comment> {
    let comment = CommentService::new(pool).create(&user, parse_id(&id)?, body.comment).await?;
    Ok(ApiResponse::created(comment).with_message("Comment added"))
}

/// PUT /api/v1/comment/edit/:id
pub async fn update(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<EditComment>,
) -> ApiResult<Comment> {
    let comment = CommentService::new(pool).edit(&user, parse_id(&id)?, body.new_comment).await?;
    Ok(ApiResponse::success(comment).with_message("Comment updated"))
}

/// DELETE /api/v1/comment/edit/:id
pub async fn delete(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id)?;
    CommentService::new(pool).delete(&user, id).await?;
    Ok(ApiResponse::success(json!({ "id": id })).with_message("Comment Deleted"))
}
