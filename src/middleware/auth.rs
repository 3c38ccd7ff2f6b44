use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sqlx::PgPool;

use crate::auth::{validate_jwt, AuthError};
use crate::database::models::{Role, User, USERS};
use crate::database::Repository;
use crate::error::ApiError;

/// Shared pool injected into every request
#[derive(Clone, Debug)]
pub struct DbPool(pub PgPool);

/// The user behind the bearer token, reloaded from the database per request
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Validates the bearer token, loads the user and rejects blocked accounts
pub async fn jwt_auth_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(request.headers())?;
    let claims = validate_jwt(&token)?;

    let DbPool(pool) = request
        .extensions()
        .get::<DbPool>()
        .cloned()
        .ok_or_else(|| ApiError::internal_server_error("Database pool not configured"))?;

    let user = Repository::<User>::new(&USERS, pool)
        .select_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Token subject {} no longer exists", claims.sub);
            ApiError::not_found("User not found")
        })?;

    if user.is_blocked {
        tracing::warn!("Blocked user {} rejected", user.id);
        return Err(ApiError::forbidden("Your account has been blocked"));
    }

    tracing::debug!("Authenticated {} ({}) as {}", user.name, user.id, user.role);
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

/// Rejects accounts that have not verified their email
pub async fn require_verified(request: Request, next: Next) -> Response {
    let verified = request.extensions().get::<CurrentUser>().map(|current| current.0.is_verified);
    match verified {
        Some(true) => next.run(request).await,
        Some(false) => ApiError::forbidden("Please verify your email to access this resource").into_response(),
        None => ApiError::from(AuthError::MissingToken).into_response(),
    }
}

/// Only lets the listed roles through
pub async fn authorize_roles(roles: &'static [Role], request: Request, next: Next) -> Response {
    let role = request.extensions().get::<CurrentUser>().map(|current| current.0.role.clone());
    match role {
        Some(role) if role.parse::<Role>().is_ok_and(|r| roles.contains(&r)) => next.run(request).await,
        Some(role) => {
            ApiError::forbidden(format!("Role: {} is not allowed to access this resource", role)).into_response()
        }
        None => ApiError::from(AuthError::MissingToken).into_response(),
    }
}

pub(crate) fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, AuthError> {
    let auth_header = headers.get("authorization").ok_or(AuthError::MissingToken)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::MalformedHeader)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        Some(_) => Err(AuthError::MissingToken),
        None => Err(AuthError::MalformedHeader),
    }
}
