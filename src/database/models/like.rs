use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::user::UserSummary;
use crate::filter::{FieldKind, FieldSpec, ListSpec};

pub const LIKES: ListSpec = ListSpec {
    table: "likes",
    search_fields: &[],
    filter_fields: &[
        FieldSpec::new("id", FieldKind::Uuid),
        FieldSpec::new("user_id", FieldKind::Uuid),
        FieldSpec::new("post_id", FieldKind::Uuid),
        FieldSpec::new("created_at", FieldKind::Timestamp),
    ],
    order: "created_at desc, id desc",
    result_per_page: 10,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Like {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LikeView {
    #[serde(flatten)]
    pub like: Like,
    pub user: Option<UserSummary>,
}
