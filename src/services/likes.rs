use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{user_summaries, ServiceError, ServiceResult};
use crate::database::models::{Blog, Like, LikeView, Role, User, BLOGS, LIKES};
use crate::database::Repository;
use crate::filter::FilterData;

pub struct LikeService {
    pool: PgPool,
    blogs: Repository<Blog>,
    likes: Repository<Like>,
}

impl LikeService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            blogs: Repository::new(&BLOGS, pool.clone()),
            likes: Repository::new(&LIKES, pool.clone()),
            pool,
        }
    }

    async fn post(&self, post_id: Uuid) -> ServiceResult<Blog> {
        self.blogs
            .select_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Post not found".to_string()))
    }

    /// Likes a post once; repeating is a no-op for the counter
    pub async fn like(&self, user: &User, post_id: Uuid) -> ServiceResult<Blog> {
        let post = self.post(post_id).await?;

        let mut tx = self.pool.begin().await?;
        let inserted = sqlx::query(
            "INSERT INTO likes (user_id, post_id) VALUES ($1, $2) ON CONFLICT (user_id, post_id) DO NOTHING",
        )
        .bind(user.id)
        .bind(post.id)
        .execute(&mut *tx)
        .await?;

        let blog = if inserted.rows_affected() > 0 {
            sqlx::query_as::<_, Blog>("UPDATE blogs SET likes = likes + 1 WHERE id = $1 RETURNING *")
                .bind(post.id)
                .fetch_one(&mut *tx)
                .await?
        } else {
            post
        };
        tx.commit().await?;
        Ok(blog)
    }

    pub async fn unlike(&self, user: &User, post_id: Uuid) -> ServiceResult<Blog> {
        let post = self.post(post_id).await?;

        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
            .bind(user.id)
            .bind(post.id)
            .execute(&mut *tx)
            .await?;

        let blog = if removed.rows_affected() > 0 {
            sqlx::query_as::<_, Blog>("UPDATE blogs SET likes = GREATEST(likes - 1, 0) WHERE id = $1 RETURNING *")
                .bind(post.id)
                .fetch_one(&mut *tx)
                .await?
        } else {
            post
        };
        tx.commit().await?;
        Ok(blog)
    }

    pub async fn has_liked(&self, user: &User, post_id: Uuid) -> ServiceResult<bool> {
        let post = self.post(post_id).await?;
        let count = self
            .likes
            .count(FilterData {
                where_clause: Some(json!({ "user_id": user.id.to_string(), "post_id": post.id.to_string() })),
                ..Default::default()
            })
            .await?;
        Ok(count > 0)
    }

    /// Likes of a post with their users; creators only see their own posts
    pub async fn for_post(&self, user: &User, post_id: Uuid) -> ServiceResult<Vec<LikeView>> {
        let post = self.post(post_id).await?;
        if user.role() == Role::Creator && post.author_id != user.id {
            return Err(ServiceError::NotFound("Post not found".to_string()));
        }

        let likes = self
            .likes
            .select_any(FilterData {
                where_clause: Some(json!({ "post_id": post.id.to_string() })),
                order: Some(json!(LIKES.order)),
                ..Default::default()
            })
            .await?;
        let users = user_summaries(&self.pool, &likes.iter().map(|l| l.user_id).collect::<Vec<_>>()).await?;
        Ok(likes
            .into_iter()
            .map(|like| LikeView {
                user: users.get(&like.user_id).cloned(),
                like,
            })
            .collect())
    }
}
