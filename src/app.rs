use axum::{
    extract::{DefaultBodyLimit, Extension, Request},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json},
    routing::{delete, get, patch, post, put},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config;
use crate::database::models::Role;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{authorize_roles, jwt_auth_middleware, require_verified, DbPool};

const ADMIN: &[Role] = &[Role::Admin];
const PUBLISHERS: &[Role] = &[Role::Creator, Role::Admin];

/// The complete HTTP application over one shared pool
pub fn router(pool: PgPool) -> Router {
    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api/v1", api_routes())
        .fallback(not_found)
        .layer(Extension(DbPool(pool)))
        .layer(DefaultBodyLimit::max(config::config().api.max_request_size_bytes))
        .layer(cors_layer());

    if config::config().api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn api_routes() -> Router {
    Router::new()
        .merge(public_routes())
        .merge(authenticated_routes())
        .merge(verified_routes())
        .merge(publisher_routes())
        .merge(admin_routes())
}

fn public_routes() -> Router {
    Router::new()
        .route("/blog/all", get(public::blog::list))
        .route("/blog/cate/all", get(public::blog::categories))
        .route("/blog/byId/:id", get(public::blog::get))
        .route("/blog/author/:id", get(public::blog::by_author))
        .route("/blog/update/view/:id", patch(public::blog::view))
        .route("/user/author/all", get(public::user::authors))
        .route("/user/author/:id", get(public::user::author))
        .route("/comment/post/:id", get(public::comment::for_post))
}

fn authenticated_routes() -> Router {
    Router::new()
        .route("/user/me", get(protected::user::me))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn verified_routes() -> Router {
    Router::new()
        .route("/user/update/profile", put(protected::user::update_profile))
        .route("/user/request/creator", get(protected::user::request_creator))
        .route("/blog/user/all", get(protected::blog::mine))
        .route("/comment/create/:id", post(protected::comment::create))
        .route("/comment/edit/:id", put(protected::comment::update).delete(protected::comment::delete))
        .route("/like/do/:id", get(protected::like::like))
        .route("/like/undo/:id", get(protected::like::unlike))
        .route("/like/fetch/:id", get(protected::like::fetch))
        .route_layer(middleware::from_fn(require_verified))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn publisher_routes() -> Router {
    Router::new()
        .route("/blog/create", post(protected::blog::create))
        .route("/blog/edit/:id", put(protected::blog::update).delete(protected::blog::delete))
        .route("/like/fetch/all/:id", get(protected::like::for_post))
        .route_layer(middleware::from_fn(|req: Request, next: Next| authorize_roles(PUBLISHERS, req, next)))
        .route_layer(middleware::from_fn(require_verified))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn admin_routes() -> Router {
    Router::new()
        .route("/admin/all", get(elevated::admin::users))
        .route("/admin/stats/all", get(elevated::admin::stats))
        .route(
            "/admin/byId/:id",
            get(elevated::admin::user)
                .put(elevated::admin::change_role)
                .delete(elevated::admin::delete_user),
        )
        .route("/admin/block/:id", get(elevated::admin::toggle_block))
        .route("/admin/request/accept/:id", get(elevated::admin::accept_request))
        .route("/admin/request/reject/:id", get(elevated::admin::reject_request))
        .route("/admin/request/rejectAll/all", get(elevated::admin::reject_all_requests))
        .route("/admin/del/blog/:id", delete(elevated::admin::delete_blog))
        .route("/admin/del/comment/:id", delete(elevated::admin::delete_comment))
        .route("/comment/all", get(elevated::admin::comments))
        .route_layer(middleware::from_fn(|req: Request, next: Next| authorize_roles(ADMIN, req, next)))
        .route_layer(middleware::from_fn(require_verified))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = config::config()
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Blog API (Rust)",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "user": "/api/v1/user/*",
                "blog": "/api/v1/blog/*",
                "comment": "/api/v1/comment/*",
                "like": "/api/v1/like/*",
                "admin": "/api/v1/admin/* (admin only)",
            }
        }
    }))
}

async fn health(Extension(DbPool(pool)): Extension<DbPool>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "database": "ok" }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "message": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": { "status": "degraded", "timestamp": now }
                })),
            )
        }
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
