use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserSummary;
use crate::filter::{FieldKind, FieldSpec, ListSpec};

pub const COMMENTS: ListSpec = ListSpec {
    table: "comments",
    search_fields: &["comment"],
    filter_fields: &[
        FieldSpec::new("id", FieldKind::Uuid),
        FieldSpec::new("user_id", FieldKind::Uuid),
        FieldSpec::new("post_id", FieldKind::Uuid),
        FieldSpec::new("created_at", FieldKind::Timestamp),
        FieldSpec::new("updated_at", FieldKind::Timestamp),
    ],
    order: "created_at desc, id desc",
    result_per_page: 10,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub comment: String,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: Option<UserSummary>,
}
