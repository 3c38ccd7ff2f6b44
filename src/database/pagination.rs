//! The search, filter and paginate pipeline shared by the list endpoints.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::database::manager::DatabaseError;
use crate::filter::{FilterData, ListQuery, ListSpec};

/// A sorted, filterable record source
#[async_trait]
pub trait Collection: Send + Sync {
    type Record: Send;

    fn spec(&self) -> &ListSpec;

    async fn select(&self, filter_data: FilterData) -> Result<Vec<Self::Record>, DatabaseError>;

    async fn count(&self, filter_data: FilterData) -> Result<i64, DatabaseError>;
}

/// One page of a list endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    /// Size of the whole collection
    pub count: i64,
    /// Matches for the search and filters, ignoring the page window
    pub filtered_count: i64,
    pub result_per_page: i32,
    pub page: u32,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            count: self.count,
            filtered_count: self.filtered_count,
            result_per_page: self.result_per_page,
            page: self.page,
        }
    }
}

pub async fn paginate<C>(collection: &C, params: &HashMap<String, String>) -> Result<Page<C::Record>, DatabaseError>
where
    C: Collection + ?Sized,
{
    let query = ListQuery::parse(collection.spec(), params)?;

    let (count, filtered_count) = futures::try_join!(
        collection.count(FilterData::default()),
        collection.count(query.filtered()),
    )?;

    let records = collection.select(query.paginated()).await?;

    tracing::debug!(
        table = collection.spec().table,
        page = query.page,
        count,
        filtered_count,
        returned = records.len(),
        "Paginated list"
    );

    Ok(Page {
        records,
        count,
        filtered_count,
        result_per_page: query.result_per_page,
        page: query.page,
    })
}
