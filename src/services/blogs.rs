use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{user_summaries, ServiceError, ServiceResult};
use crate::database::models::{Blog, BlogView, Category, CategoryView, User, BLOGS, CATEGORIES};
use crate::database::{paginate, Page, Repository};
use crate::filter::FilterData;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBlog {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub is_private: Option<bool>,
}

/// Partial blog update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub is_private: Option<bool>,
    pub disable_comments: Option<bool>,
    pub category: Option<String>,
}

pub struct BlogService {
    pool: PgPool,
    blogs: Repository<Blog>,
}

impl BlogService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            blogs: Repository::new(&BLOGS, pool.clone()),
            pool,
        }
    }

    pub async fn find(&self, id: Uuid) -> ServiceResult<Blog> {
        self.blogs
            .select_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Blog not found".to_string()))
    }

    pub async fn get(&self, id: Uuid) -> ServiceResult<BlogView> {
        let blog = self.find(id).await?;
        let mut views = self.with_authors(vec![blog]).await?;
        views.pop().ok_or_else(|| ServiceError::NotFound("Blog not found".to_string()))
    }

    pub async fn list(&self, params: &HashMap<String, String>) -> ServiceResult<Page<BlogView>> {
        let page = paginate(&self.blogs, params).await?;
        let authors = user_summaries(&self.pool, &page.records.iter().map(|b| b.author_id).collect::<Vec<_>>()).await?;
        Ok(page.map(|blog| BlogView {
            author: authors.get(&blog.author_id).cloned(),
            blog,
        }))
    }

    /// Public blogs of one author, newest first
    pub async fn by_author(&self, author_id: Uuid) -> ServiceResult<Vec<BlogView>> {
        let blogs = self
            .blogs
            .select_any(FilterData {
                where_clause: Some(json!({ "author_id": author_id.to_string(), "is_private": false })),
                order: Some(json!(BLOGS.order)),
                ..Default::default()
            })
            .await?;
        self.with_authors(blogs).await
    }

    /// Every blog of the caller, private ones included
    pub async fn mine(&self, user: &User) -> ServiceResult<Vec<BlogView>> {
        let blogs = self
            .blogs
            .select_any(FilterData {
                where_clause: Some(json!({ "author_id": user.id.to_string() })),
                order: Some(json!(BLOGS.order)),
                ..Default::default()
            })
            .await?;
        self.with_authors(blogs).await
    }

    pub async fn create(&self, author: &User, input: NewBlog) -> ServiceResult<Blog> {
        let required = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let (title, description, content) = match (
            required(input.title),
            required(input.description),
            required(input.content),
        ) {
            (Some(t), Some(d), Some(c)) => (t, d, c),
            _ => return Err(ServiceError::BadRequest("All fields are required".to_string())),
        };

        let blog = sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (title, description, content, is_private, author_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(content)
        .bind(input.is_private.unwrap_or(true))
        .bind(author.id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Blog {} created by {}", blog.id, author.id);
        Ok(blog)
    }

    pub async fn update(&self, user: &User, id: Uuid, input: BlogUpdate) -> ServiceResult<Blog> {
        let blog = self.find(id).await?;
        ensure_can_modify(user, &blog)?;

        let mut tx = self.pool.begin().await?;

        let category_id = match input.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(name) => {
                let category = sqlx::query_as::<_, Category>(
                    r#"
                    INSERT INTO categories (name) VALUES ($1)
                    ON CONFLICT ((lower(name))) DO UPDATE SET updated_at = now()
                    RETURNING *
                    "#,
                )
                .bind(name)
                .fetch_one(&mut *tx)
                .await?;
                Some(category.id)
            }
            None => None,
        };

        let updated = sqlx::query_as::<_, Blog>(
            r#"
            UPDATE blogs SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                content = COALESCE($4, content),
                is_private = COALESCE($5, is_private),
                disable_comments = COALESCE($6, disable_comments),
                category_id = COALESCE($7, category_id),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(non_blank(input.title))
        .bind(non_blank(input.description))
        .bind(non_blank(input.content))
        .bind(input.is_private)
        .bind(input.disable_comments)
        .bind(category_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!("Blog {} updated by {}", id, user.id);
        Ok(updated)
    }

    pub async fn delete(&self, user: &User, id: Uuid) -> ServiceResult<()> {
        let blog = self.find(id).await?;
        ensure_can_modify(user, &blog)?;
        self.delete_cascade(id).await
    }

    /// Removes a blog together with its comments and likes
    pub async fn delete_cascade(&self, id: Uuid) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        let likes = sqlx::query("DELETE FROM likes WHERE post_id = $1").bind(id).execute(&mut *tx).await?;
        let comments = sqlx::query("DELETE FROM comments WHERE post_id = $1").bind(id).execute(&mut *tx).await?;
        let deleted = sqlx::query("DELETE FROM blogs WHERE id = $1").bind(id).execute(&mut *tx).await?;

        if deleted.rows_affected() == 0 {
            return Err(ServiceError::NotFound("Blog not found".to_string()));
        }

        tx.commit().await?;
        tracing::info!(
            "Blog {} deleted with {} comments and {} likes",
            id,
            comments.rows_affected(),
            likes.rows_affected()
        );
        Ok(())
    }

    pub async fn increment_views(&self, id: Uuid) -> ServiceResult<Blog> {
        sqlx::query_as::<_, Blog>("UPDATE blogs SET views = views + 1 WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Post not found".to_string()))
    }

    /// All categories with the ids of their posts
    pub async fn categories(&self) -> ServiceResult<Vec<CategoryView>> {
        let categories = Repository::<Category>::new(&CATEGORIES, self.pool.clone())
            .select_any(FilterData {
                order: Some(json!(CATEGORIES.order)),
                ..Default::default()
            })
            .await?;

        let links: Vec<(Uuid, Uuid)> =
            sqlx::query_as("SELECT category_id, id FROM blogs WHERE category_id IS NOT NULL ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;

        let mut posts: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for (category_id, blog_id) in links {
            posts.entry(category_id).or_default().push(blog_id);
        }

        Ok(categories
            .into_iter()
            .map(|category| CategoryView {
                posts: posts.remove(&category.id).unwrap_or_default(),
                category,
            })
            .collect())
    }

    async fn with_authors(&self, blogs: Vec<Blog>) -> ServiceResult<Vec<BlogView>> {
        let authors = user_summaries(&self.pool, &blogs.iter().map(|b| b.author_id).collect::<Vec<_>>()).await?;
        Ok(blogs
            .into_iter()
            .map(|blog| BlogView {
                author: authors.get(&blog.author_id).cloned(),
                blog,
            })
            .collect())
    }
}

/// Only the author or an admin may change a blog
fn ensure_can_modify(user: &User, blog: &Blog) -> ServiceResult<()> {
    if blog.author_id == user.id || user.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden("You are not allowed to modify this blog".to_string()))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: &str) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            name: "Writer".to_string(),
            email: "writer@example.com".to_string(),
            password_hash: None,
            avatar: None,
            bio: None,
            role: role.to_string(),
            request: None,
            is_verified: true,
            is_blocked: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn blog_by(author_id: Uuid) -> Blog {
        let now = Utc::now();
        Blog {
            id: Uuid::new_v4(),
            title: "Title".to_string(),
            description: "Desc".to_string(),
            content: "<p>Body</p>".to_string(),
            image: String::new(),
            blog_images: vec![],
            category_id: None,
            author_id,
            likes: 0,
            comments: 0,
            views: 0,
            is_private: true,
            disable_comments: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn author_and_admin_may_modify() {
        let author = user("creator");
        let blog = blog_by(author.id);
        assert!(ensure_can_modify(&author, &blog).is_ok());
        assert!(ensure_can_modify(&user("admin"), &blog).is_ok());
        assert!(matches!(ensure_can_modify(&user("creator"), &blog), Err(ServiceError::Forbidden(_))));
    }

    #[test]
    fn blank_updates_keep_existing_values() {
        assert_eq!(non_blank(Some("  ".to_string())), None);
        assert_eq!(non_blank(Some("New".to_string())), Some("New".to_string()));
    }

    #[test]
    fn blog_view_flattens_author() {
        let author = user("creator");
        let view = BlogView {
            blog: blog_by(author.id),
            author: Some(author.summary()),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["title"], "Title");
        assert_eq!(json["author"]["name"], "Writer");
        assert!(json["author"].get("email").is_none());
    }
}
