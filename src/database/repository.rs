use async_trait::async_trait;
use serde_json::json;
use sqlx::{postgres::PgRow, FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::pagination::Collection;
use crate::database::query_builder::QueryBuilder;
use crate::filter::{FilterData, FilterWhereOptions, ListSpec};

/// Typed access to one table through the filter compiler
pub struct Repository<T> {
    spec: &'static ListSpec,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec,
            pool: self.pool.clone(),
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(spec: &'static ListSpec, pool: PgPool) -> Self {
        Self {
            spec,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    fn options(&self) -> FilterWhereOptions {
        let mut options = self.spec.options();
        options.casts.insert("id".to_string(), "uuid");
        options
    }

    fn builder(&self) -> Result<QueryBuilder<T>, DatabaseError> {
        QueryBuilder::<T>::new(self.spec.table, self.options())
    }

    pub async fn select_any(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        self.builder()?.filter(filter_data)?.select_all(&self.pool).await
    }

    pub async fn select_one(&self, filter_data: FilterData) -> Result<Option<T>, DatabaseError> {
        self.builder()?.filter(filter_data)?.select_optional(&self.pool).await
    }

    pub async fn select_by_id(&self, id: Uuid) -> Result<Option<T>, DatabaseError> {
        self.select_one(FilterData {
            where_clause: Some(json!({ "id": id.to_string() })),
            ..Default::default()
        })
        .await
    }

    pub async fn count(&self, filter_data: FilterData) -> Result<i64, DatabaseError> {
        self.builder()?.filter(filter_data)?.count(&self.pool).await
    }

    pub async fn select_ids(&self, ids: &[Uuid]) -> Result<Vec<T>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        self.select_any(FilterData {
            where_clause: Some(json!({ "id": { "$in": ids } })),
            ..Default::default()
        })
        .await
    }
}

#[async_trait]
impl<T> Collection for Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin,
{
    type Record = T;

    fn spec(&self) -> &ListSpec {
        self.spec
    }

    async fn select(&self, filter_data: FilterData) -> Result<Vec<T>, DatabaseError> {
        self.select_any(filter_data).await
    }

    async fn count(&self, filter_data: FilterData) -> Result<i64, DatabaseError> {
        Repository::count(self, filter_data).await
    }
}
