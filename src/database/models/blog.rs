use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserSummary;
use crate::filter::{FieldKind, FieldSpec, ListSpec};

pub const BLOGS: ListSpec = ListSpec {
    table: "blogs",
    search_fields: &["title"],
    filter_fields: &[
        FieldSpec::new("id", FieldKind::Uuid),
        FieldSpec::new("title", FieldKind::Text),
        FieldSpec::new("category_id", FieldKind::Uuid),
        FieldSpec::new("author_id", FieldKind::Uuid),
        FieldSpec::new("likes", FieldKind::Integer),
        FieldSpec::new("comments", FieldKind::Integer),
        FieldSpec::new("views", FieldKind::Integer),
        FieldSpec::new("is_private", FieldKind::Bool),
        FieldSpec::new("disable_comments", FieldKind::Bool),
        FieldSpec::new("created_at", FieldKind::Timestamp),
        FieldSpec::new("updated_at", FieldKind::Timestamp),
    ],
    order: "created_at desc, id desc",
    result_per_page: 10,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Blog {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content: String,
    pub image: String,
    pub blog_images: Vec<String>,
    pub category_id: Option<Uuid>,
    pub author_id: Uuid,
    pub likes: i64,
    pub comments: i64,
    pub views: i64,
    pub is_private: bool,
    pub disable_comments: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A blog with its author populated
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BlogView {
    #[serde(flatten)]
    pub blog: Blog,
    pub author: Option<UserSummary>,
}
