use std::collections::HashMap;

use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{user_summaries, ServiceError, ServiceResult};
use crate::database::models::{Blog, Comment, CommentView, User, BLOGS, COMMENTS};
use crate::database::{paginate, Page, Repository};
use crate::filter::FilterData;

pub struct CommentService {
    pool: PgPool,
    comments: Repository<Comment>,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            comments: Repository::new(&COMMENTS, pool.clone()),
            pool,
        }
    }

    async fn find(&self, id: Uuid) -> ServiceResult<Comment> {
        self.comments
            .select_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Comment not found".to_string()))
    }

    async fn post(&self, post_id: Uuid) -> ServiceResult<Blog> {
        Repository::<Blog>::new(&BLOGS, self.pool.clone())
            .select_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Post not found".to_string()))
    }

    /// Adds a comment and bumps the post's comment counter atomically
    pub async fn create(&self, user: &User, post_id: Uuid, text: Option<String>) -> ServiceResult<Comment> {
        let text = text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServiceError::BadRequest("Please provide a comment".to_string()))?;

        let post = self.post(post_id).await?;
        if post.disable_comments {
            return Err(ServiceError::Forbidden("Comments are disabled for this post".to_string()));
        }

        let mut tx = self.pool.begin().await?;
        let comment = sqlx::query_as::<_, Comment>(
            "INSERT INTO comments (comment, user_id, post_id) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&text)
        .bind(user.id)
        .bind(post.id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE blogs SET comments = comments + 1 WHERE id = $1")
            .bind(post.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::debug!("Comment {} added to post {}", comment.id, post.id);
        Ok(comment)
    }

    /// Comments of a post; empty when the post has comments disabled
    pub async fn for_post(&self, post_id: Uuid) -> ServiceResult<Vec<CommentView>> {
        let post = self.post(post_id).await?;
        if post.disable_comments {
            return Ok(vec![]);
        }

        let comments = self
            .comments
            .select_any(FilterData {
                where_clause: Some(json!({ "post_id": post.id.to_string() })),
                order: Some(json!(COMMENTS.order)),
                ..Default::default()
            })
            .await?;
        self.with_users(comments).await
    }

    pub async fn list(&self, params: &HashMap<String, String>) -> ServiceResult<Page<CommentView>> {
        let page = paginate(&self.comments, params).await?;
        let users = user_summaries(&self.pool, &page.records.iter().map(|c| c.user_id).collect::<Vec<_>>()).await?;
        Ok(page.map(|comment| CommentView {
            user: users.get(&comment.user_id).cloned(),
            comment,
        }))
    }

    pub async fn edit(&self, user: &User, id: Uuid, new_comment: Option<String>) -> ServiceResult<Comment> {
        let comment = self.find(id).await?;
        if comment.user_id != user.id {
            return Err(ServiceError::Forbidden("You are not authorized to edit this comment".to_string()));
        }
        let text = new_comment
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServiceError::BadRequest("Please provide a comment".to_string()))?;

        let updated = sqlx::query_as::<_, Comment>(
            "UPDATE comments SET comment = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(comment.id)
        .bind(text)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated)
    }

    /// Owner or admin may delete
    pub async fn delete(&self, user: &User, id: Uuid) -> ServiceResult<()> {
        let comment = self.find(id).await?;
        if comment.user_id != user.id && !user.is_admin() {
            return Err(ServiceError::Forbidden("You are not authorized to delete this comment".to_string()));
        }
        self.remove(comment).await
    }

    pub async fn admin_delete(&self, id: Uuid) -> ServiceResult<()> {
        let comment = self.find(id).await?;
        self.remove(comment).await
    }

    async fn remove(&self, comment: Comment) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE blogs SET comments = GREATEST(comments - 1, 0) WHERE id = $1")
            .bind(comment.post_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::debug!("Comment {} removed from post {}", comment.id, comment.post_id);
        Ok(())
    }

    async fn with_users(&self, comments: Vec<Comment>) -> ServiceResult<Vec<CommentView>> {
        let users = user_summaries(&self.pool, &comments.iter().map(|c| c.user_id).collect::<Vec<_>>()).await?;
        Ok(comments
            .into_iter()
            .map(|comment| CommentView {
                user: users.get(&comment.user_id).cloned(),
                comment,
            })
            .collect())
    }
}
