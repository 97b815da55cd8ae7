//! Repository for the `festivals` table.

use voyage_core::filter::{Condition, Filter};
use voyage_core::paging::Page;
use voyage_core::query::ListQuery;
use voyage_core::stats::distinct_types;
use voyage_core::types::{Record, RecordId};
use voyage_core::virtual_field::VirtualFieldRegistry;

use crate::client::RecordClient;
use crate::config::tables;
use crate::error::StoreError;
use crate::models::festival::{decorate_festival, FestivalInput};
use crate::pagination::{list_sorted, ListPlan, SUPERSET_CEILING};

pub struct FestivalRepo;

impl FestivalRepo {
    pub fn filter(query: &ListQuery) -> Filter {
        Filter::new()
            .and_if_present(&query.search, |v| Condition::like("name", v))
            .and_if_present(query.filter("types"), |v| Condition::like("types", v))
    }

    pub async fn list(client: &RecordClient, query: &ListQuery) -> Result<Page<Record>, StoreError> {
        let plan = ListPlan {
            table: tables::FESTIVALS,
            query,
            filter: Self::filter(query).build(),
        };
        list_sorted(client, &plan, &VirtualFieldRegistry::ratings(), &decorate_festival).await
    }

    pub async fn find_by_id(client: &RecordClient, id: RecordId) -> Result<Option<Record>, StoreError> {
        Ok(client
            .get_by_id(tables::FESTIVALS, id)
            .await?
            .map(decorate_festival))
    }

    pub async fn create(client: &RecordClient, input: FestivalInput) -> Result<Record, StoreError> {
        let record = input.into_create_record()?;
        client.create(tables::FESTIVALS, record).await
    }

    pub async fn update(
        client: &RecordClient,
        id: RecordId,
        input: FestivalInput,
    ) -> Result<Record, StoreError> {
        client
            .update(tables::FESTIVALS, id, input.into_update_record())
            .await
    }

    pub async fn delete(client: &RecordClient, id: RecordId) -> Result<(), StoreError> {
        client.delete(tables::FESTIVALS, id).await
    }

    /// Distinct type names. Legacy rows store `types` as comma text.
    pub async fn types(client: &RecordClient) -> Result<Vec<String>, StoreError> {
        let all = client
            .list_all(tables::FESTIVALS, None, None, Some("Id,types"), SUPERSET_CEILING)
            .await?;
        Ok(distinct_types(&all.list, "types", true))
    }
}
