use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::filter::{FieldKind, FieldSpec, ListSpec};

pub const USERS: ListSpec = ListSpec {
    table: "users",
    search_fields: &["email"],
    filter_fields: &[
        FieldSpec::new("id", FieldKind::Uuid),
        FieldSpec::new("name", FieldKind::Text),
        FieldSpec::new("email", FieldKind::Text),
        FieldSpec::new("role", FieldKind::Text),
        FieldSpec::new("request", FieldKind::Text),
        FieldSpec::new("is_verified", FieldKind::Bool),
        FieldSpec::new("is_blocked", FieldKind::Bool),
        FieldSpec::new("created_at", FieldKind::Timestamp),
        FieldSpec::new("updated_at", FieldKind::Timestamp),
    ],
    order: "created_at desc, id desc",
    result_per_page: 10,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub request: Option<String>,
    pub is_verified: bool,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Unknown role strings fall back to the least privileged role
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::User)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// The public face of a user attached to blogs, comments and likes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Creator,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Creator => "creator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "creator" => Ok(Role::Creator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Invalid role '{}'", other)),
        }
    }
}

/// State of a user's request to become a creator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatorRequest {
    Pending,
    Accepted,
    Rejected,
}

impl CreatorRequest {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreatorRequest::Pending => "pending",
            CreatorRequest::Accepted => "accepted",
            CreatorRequest::Rejected => "rejected",
        }
    }
}
