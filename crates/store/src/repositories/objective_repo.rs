//! Repository for objectives, stored in the `items` table.

use voyage_core::filter::{Condition, Filter};
use voyage_core::paging::Page;
use voyage_core::query::ListQuery;
use voyage_core::types::{Record, RecordId};

use super::native_options;
use crate::client::RecordClient;
use crate::config::tables;
use crate::error::StoreError;
use crate::models::objective::ObjectiveInput;

pub struct ObjectiveRepo;

impl ObjectiveRepo {
    /// `search` matches the name; `type` must match exactly.
    pub fn filter(query: &ListQuery) -> Filter {
        Filter::new()
            .and_if_present(&query.search, |v| Condition::like("name", v))
            .and_if_present(query.filter("type"), |v| Condition::eq("type", v))
    }

    pub async fn list(client: &RecordClient, query: &ListQuery) -> Result<Page<Record>, StoreError> {
        let options = native_options(query, Self::filter(query).build());
        client.list(tables::ITEMS, &options).await
    }

    pub async fn find_by_id(client: &RecordClient, id: RecordId) -> Result<Option<Record>, StoreError> {
        client.get_by_id(tables::ITEMS, id).await
    }

    pub async fn create(client: &RecordClient, input: ObjectiveInput) -> Result<Record, StoreError> {
        let record = input.into_create_record()?;
        client.create(tables::ITEMS, record).await
    }

    pub async fn update(
        client: &RecordClient,
        id: RecordId,
        input: ObjectiveInput,
    ) -> Result<Record, StoreError> {
        client.update(tables::ITEMS, id, input.into_update_record()).await
    }

    pub async fn delete(client: &RecordClient, id: RecordId) -> Result<(), StoreError> {
        client.delete(tables::ITEMS, id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn type_filter_is_exact() {
        let query = ListQuery {
            search: "lotus".into(),
            filters: BTreeMap::from([("type".to_string(), "flower".to_string())]),
            ..ListQuery::default()
        };
        assert_eq!(
            ObjectiveRepo::filter(&query).build().as_deref(),
            Some("(name,like,%lotus%)~and(type,eq,flower)")
        );
    }
}
