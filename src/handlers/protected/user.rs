use axum::{extract::Extension, Json};
use serde::Deserialize;

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser, DbPool};
use crate::services::UserService;

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
}

/// GET /api/v1/user/me
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> ApiResult<User> {
    Ok(ApiResponse::success(user))
}

/// PUT /api/v1/user/update/profile
pub async fn update_profile(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<ProfileUpdate>,
) -> ApiResult<User> {
    let user = UserService::new(pool).update_profile(&user, body.name, body.bio).await?;
    Ok(ApiResponse::success(user).with_message("Profile updated successfully"))
}

/// GET /api/v1/user/request/creator
pub async fn request_creator(
    Extension(DbPool(pool)): Extension<DbPool>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<User> {
    let user = UserService::new(pool).request_creator(&user).await?;
    Ok(ApiResponse::success(user).with_message("Creator request sent"))
}
