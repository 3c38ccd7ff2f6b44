pub mod admin;
pub mod blogs;
pub mod comments;
pub mod likes;
pub mod users;

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{User, UserSummary, USERS};
use crate::database::{DatabaseError, Repository};

pub use admin::{AdminService, Stats};
pub use blogs::{BlogService, BlogUpdate, NewBlog};
pub use comments::CommentService;
pub use likes::LikeService;
pub use users::UserService;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        ServiceError::Database(DatabaseError::Sqlx(err))
    }
}

impl From<crate::filter::FilterError> for ServiceError {
    fn from(err: crate::filter::FilterError) -> Self {
        ServiceError::Database(DatabaseError::Filter(err))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Public summaries for a set of user ids, fetched in one query
pub(crate) async fn user_summaries(pool: &PgPool, ids: &[Uuid]) -> ServiceResult<HashMap<Uuid, UserSummary>> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();
    let users = Repository::<User>::new(&USERS, pool.clone()).select_ids(&ids).await?;
    Ok(users.into_iter().map(|u| (u.id, u.summary())).collect())
}
