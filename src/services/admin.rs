use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{BlogService, CommentService, ServiceError, ServiceResult, UserService};
use crate::database::models::{CreatorRequest, Role, User};

/// Site-wide totals for the admin dashboard
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct Stats {
    pub users: i64,
    pub creators: i64,
    pub admins: i64,
    pub blogs: i64,
    pub comments: i64,
    pub likes: i64,
    pub views: i64,
    pub pending_requests: i64,
}

pub struct AdminService {
    pool: PgPool,
    users: UserService,
}

impl AdminService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserService::new(pool.clone()),
            pool,
        }
    }

    pub async fn stats(&self) -> ServiceResult<Stats> {
        let stats = sqlx::query_as::<_, Stats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM users WHERE role = 'creator') AS creators,
                (SELECT COUNT(*) FROM users WHERE role = 'admin') AS admins,
                (SELECT COUNT(*) FROM blogs) AS blogs,
                (SELECT COUNT(*) FROM comments) AS comments,
                (SELECT COUNT(*) FROM likes) AS likes,
                (SELECT COALESCE(SUM(views), 0)::BIGINT FROM blogs) AS views,
                (SELECT COUNT(*) FROM users WHERE request = 'pending') AS pending_requests
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    pub async fn user(&self, id: Uuid) -> ServiceResult<User> {
        self.users.find(id).await
    }

    pub async fn change_role(&self, admin: &User, id: Uuid, role: Option<String>) -> ServiceResult<User> {
        let user = self.users.find(id).await?;
        if user.id == admin.id {
            return Err(ServiceError::BadRequest("Changing self role is prohibited".to_string()));
        }
        let role = role
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| ServiceError::BadRequest("Please provide a role".to_string()))?;
        let role: Role = role
            .trim()
            .parse()
            .map_err(|_| ServiceError::BadRequest("Invalid role".to_string()))?;
        if user.role() == role {
            return Err(ServiceError::BadRequest(format!("User is already set to {} role", role)));
        }

        let updated = sqlx::query_as::<_, User>("UPDATE users SET role = $2, updated_at = now() WHERE id = $1 RETURNING *")
            .bind(user.id)
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Admin {} changed role of {} to {}", admin.id, user.id, role);
        Ok(updated)
    }

    pub async fn toggle_block(&self, admin: &User, id: Uuid) -> ServiceResult<User> {
        let user = self.users.find(id).await?;
        if user.id == admin.id {
            return Err(ServiceError::BadRequest("Self blocking is prohibited".to_string()));
        }

        let updated = sqlx::query_as::<_, User>(
            "UPDATE users SET is_blocked = NOT is_blocked, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(user.id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Admin {} set blocked={} on {}", admin.id, updated.is_blocked, user.id);
        Ok(updated)
    }

    /// Accepting also promotes a plain user to creator
    pub async fn accept_request(&self, id: Uuid) -> ServiceResult<User> {
        let user = self.users.find(id).await?;
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET request = $2,
                role = CASE WHEN role = 'user' THEN 'creator' ELSE role END,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(CreatorRequest::Accepted.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    pub async fn reject_request(&self, id: Uuid) -> ServiceResult<User> {
        let user = self.users.find(id).await?;
        let updated = sqlx::query_as::<_, User>("UPDATE users SET request = $2, updated_at = now() WHERE id = $1 RETURNING *")
            .bind(user.id)
            .bind(CreatorRequest::Rejected.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(updated)
    }

    /// Rejects every pending request, returning how many changed
    pub async fn reject_all_requests(&self) -> ServiceResult<u64> {
        let result = sqlx::query("UPDATE users SET request = $1, updated_at = now() WHERE request = $2")
            .bind(CreatorRequest::Rejected.as_str())
            .bind(CreatorRequest::Pending.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Deletes a user with their blogs, comments and likes, then recounts
    /// the counters of other blogs they had touched.
    pub async fn delete_user(&self, admin: &User, id: Uuid) -> ServiceResult<()> {
        let user = self.users.find(id).await?;
        if user.id == admin.id {
            return Err(ServiceError::BadRequest("Self deleting is prohibited".to_string()));
        }

        let mut tx = self.pool.begin().await?;

        let touched: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT post_id FROM likes WHERE user_id = $1
            UNION
            SELECT post_id FROM comments WHERE user_id = $1
            "#,
        )
        .bind(user.id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM likes WHERE user_id = $1 OR post_id IN (SELECT id FROM blogs WHERE author_id = $1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM comments WHERE user_id = $1 OR post_id IN (SELECT id FROM blogs WHERE author_id = $1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;
        let blogs = sqlx::query("DELETE FROM blogs WHERE author_id = $1")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE blogs b SET
                likes = (SELECT COUNT(*) FROM likes l WHERE l.post_id = b.id),
                comments = (SELECT COUNT(*) FROM comments c WHERE c.post_id = b.id)
            WHERE b.id = ANY($1)
            "#,
        )
        .bind(&touched)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(
            "Admin {} deleted user {} with {} blogs; recounted {} posts",
            admin.id,
            user.id,
            blogs.rows_affected(),
            touched.len()
        );
        Ok(())
    }

    pub async fn delete_blog(&self, id: Uuid) -> ServiceResult<()> {
        BlogService::new(self.pool.clone()).delete_cascade(id).await
    }

    pub async fn delete_comment(&self, id: Uuid) -> ServiceResult<()> {
        CommentService::new(self.pool.clone()).admin_delete(id).await
    }
}
