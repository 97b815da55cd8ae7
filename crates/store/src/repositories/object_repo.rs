//! Repository for the `objects` table.

use voyage_core::filter::{Condition, Filter};
use voyage_core::paging::Page;
use voyage_core::query::ListQuery;
use voyage_core::types::{Record, RecordId};

use super::native_options;
use crate::client::RecordClient;
use crate::config::tables;
use crate::error::StoreError;
use crate::models::object::ObjectInput;

pub struct ObjectRepo;

impl ObjectRepo {
    /// `search` matches title or content.
    pub fn filter(query: &ListQuery) -> Filter {
        if query.search.is_empty() {
            return Filter::new();
        }
        Filter::new().and_any(vec![
            Condition::like("title", &query.search),
            Condition::like("content", &query.search),
        ])
    }

    pub async fn list(client: &RecordClient, query: &ListQuery) -> Result<Page<Record>, StoreError> {
        let options = native_options(query, Self::filter(query).build());
        client.list(tables::OBJECTS, &options).await
    }

    pub async fn find_by_id(client: &RecordClient, id: RecordId) -> Result<Option<Record>, StoreError> {
        client.get_by_id(tables::OBJECTS, id).await
    }

    pub async fn create(client: &RecordClient, input: ObjectInput) -> Result<Record, StoreError> {
        let record = input.into_create_record()?;
        client.create(tables::OBJECTS, record).await
    }

    pub async fn update(
        client: &RecordClient,
        id: RecordId,
        input: ObjectInput,
    ) -> Result<Record, StoreError> {
        client
            .update(tables::OBJECTS, id, input.into_update_record())
            .await
    }

    pub async fn delete(client: &RecordClient, id: RecordId) -> Result<(), StoreError> {
        client.delete(tables::OBJECTS, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_matches_title_or_content() {
        let query = ListQuery {
            search: "lotus".into(),
            ..ListQuery::default()
        };
        assert_eq!(
            ObjectRepo::filter(&query).build().as_deref(),
            Some("(title,like,%lotus%)~or(content,like,%lotus%)")
        );
    }
}
