use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::{FieldKind, FieldSpec, ListSpec};

pub const CATEGORIES: ListSpec = ListSpec {
    table: "categories",
    search_fields: &["name"],
    filter_fields: &[
        FieldSpec::new("id", FieldKind::Uuid),
        FieldSpec::new("name", FieldKind::Text),
        FieldSpec::new("created_at", FieldKind::Timestamp),
    ],
    order: "name asc",
    result_per_page: 10,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category with the ids of the blogs filed under it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: Category,
    pub posts: Vec<Uuid>,
}
