use std::collections::HashMap;

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::database::models::{CreatorRequest, Role, User, USERS};
use crate::database::{paginate, Page, Repository};
use crate::filter::FilterData;

pub struct UserService {
    pool: PgPool,
    users: Repository<User>,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: Repository::new(&USERS, pool.clone()),
            pool,
        }
    }

    pub async fn find(&self, id: Uuid) -> ServiceResult<User> {
        self.users
            .select_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Inserts an account directly; registration itself happens elsewhere
    pub async fn create(&self, name: &str, email: &str, role: Role, verified: bool) -> ServiceResult<User> {
        let name = name.trim();
        if !(4..=30).contains(&name.chars().count()) {
            return Err(ServiceError::BadRequest("Name should be between 4 and 30 characters".to_string()));
        }
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(ServiceError::BadRequest("Please enter a valid email".to_string()));
        }

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email, role, is_verified) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(name)
        .bind(&email)
        .bind(role.as_str())
        .bind(verified)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Created {} account {} ({})", role, user.id, email);
        Ok(user)
    }

    /// Paginated users for the admin list
    pub async fn list(&self, params: &HashMap<String, String>) -> ServiceResult<Page<User>> {
        Ok(paginate(&self.users, params).await?)
    }

    pub async fn update_profile(&self, user: &User, name: Option<String>, bio: Option<String>) -> ServiceResult<User> {
        let name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        if let Some(ref name) = name {
            let len = name.chars().count();
            if !(4..=30).contains(&len) {
                return Err(ServiceError::BadRequest("Name should be between 4 and 30 characters".to_string()));
            }
        }

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name), bio = COALESCE($3, bio), updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(name)
        .bind(bio)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Profile updated for user {}", user.id);
        Ok(updated)
    }

    /// Files a request to become a creator
    pub async fn request_creator(&self, user: &User) -> ServiceResult<User> {
        if matches!(user.role(), Role::Creator | Role::Admin) {
            return Err(ServiceError::BadRequest(format!("You are already a {}", user.role)));
        }
        if user.request.as_deref() == Some(CreatorRequest::Pending.as_str()) {
            return Err(ServiceError::BadRequest("Your request is already pending".to_string()));
        }

        let updated = sqlx::query_as::<_, User>(
            "UPDATE users SET request = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(user.id)
        .bind(CreatorRequest::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("User {} requested creator access", user.id);
        Ok(updated)
    }

    pub async fn authors(&self) -> ServiceResult<Vec<User>> {
        Ok(self
            .users
            .select_any(FilterData {
                where_clause: Some(json!({ "role": Role::Creator.as_str() })),
                order: Some(json!(USERS.order)),
                ..Default::default()
            })
            .await?)
    }

    pub async fn author(&self, id: Uuid) -> ServiceResult<User> {
        self.users
            .select_one(FilterData {
                where_clause: Some(json!({ "id": id.to_string(), "role": Role::Creator.as_str() })),
                ..Default::default()
            })
            .await?
            .ok_or_else(|| ServiceError::NotFound("Author not found".to_string()))
    }
}
