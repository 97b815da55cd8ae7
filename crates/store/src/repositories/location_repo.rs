//! Repository for the `locations` table.

use voyage_core::filter::{Condition, Filter};
use voyage_core::paging::Page;
use voyage_core::query::ListQuery;
use voyage_core::stats::distinct_types;
use voyage_core::types::{Record, RecordId};
use voyage_core::virtual_field::VirtualFieldRegistry;

use crate::client::RecordClient;
use crate::config::tables;
use crate::error::StoreError;
use crate::models::location::{decorate_location, LocationInput};
use crate::pagination::{list_sorted, ListPlan, SUPERSET_CEILING};

pub struct LocationRepo;

impl LocationRepo {
    /// Filter expression for a list query.
    ///
    /// `search` matches the name, `types` matches inside the encoded type
    /// list, and `hasMarker` accepts only `true` or `false`.
    pub fn filter(query: &ListQuery) -> Filter {
        let marker = match query.filter("hasMarker") {
            flag @ ("true" | "false") => Some(Condition::eq("marker", flag)),
            _ => None,
        };
        let filter = Filter::new()
            .and_if_present(&query.search, |v| Condition::like("name", v))
            .and_if_present(query.filter("types"), |v| Condition::like("types", v));
        match marker {
            Some(condition) => filter.and(condition),
            None => filter,
        }
    }

    /// List locations. Sorting by `rating` or `calculated_rating` sorts
    /// in memory over the filtered superset.
    pub async fn list(client: &RecordClient, query: &ListQuery) -> Result<Page<Record>, StoreError> {
        let plan = ListPlan {
            table: tables::LOCATIONS,
            query,
            filter: Self::filter(query).build(),
        };
        list_sorted(client, &plan, &VirtualFieldRegistry::ratings(), &decorate_location).await
    }

    pub async fn find_by_id(client: &RecordClient, id: RecordId) -> Result<Option<Record>, StoreError> {
        Ok(client
            .get_by_id(tables::LOCATIONS, id)
            .await?
            .map(decorate_location))
    }

    pub async fn create(client: &RecordClient, input: LocationInput) -> Result<Record, StoreError> {
        let record = input.into_create_record()?;
        client.create(tables::LOCATIONS, record).await
    }

    pub async fn update(
        client: &RecordClient,
        id: RecordId,
        input: LocationInput,
    ) -> Result<Record, StoreError> {
        client
            .update(tables::LOCATIONS, id, input.into_update_record())
            .await
    }

    /// Show or hide the location's map marker.
    pub async fn set_marker(
        client: &RecordClient,
        id: RecordId,
        marker: bool,
    ) -> Result<Record, StoreError> {
        let mut data = Record::new();
        data.insert("marker".into(), marker.into());
        client.update(tables::LOCATIONS, id, data).await
    }

    pub async fn delete(client: &RecordClient, id: RecordId) -> Result<(), StoreError> {
        client.delete(tables::LOCATIONS, id).await
    }

    /// Distinct type names across all locations.
    pub async fn types(client: &RecordClient) -> Result<Vec<String>, StoreError> {
        let all = client
            .list_all(tables::LOCATIONS, None, None, Some("Id,types"), SUPERSET_CEILING)
            .await?;
        Ok(distinct_types(&all.list, "types", false))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use serde_json::json;
    use voyage_core::error::CoreError;

    use super::*;
    use crate::memory::{identity_tables, MemoryTransport};
    use crate::retry::RetryPolicy;

    fn query(pairs: &[(&str, &str)]) -> ListQuery {
        ListQuery {
            search: "hoi an".into(),
            filters: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            ..ListQuery::default()
        }
    }

    #[test]
    fn filter_combines_search_types_and_marker() {
        let q = query(&[("types", "beach"), ("hasMarker", "false")]);
        assert_eq!(
            LocationRepo::filter(&q).build().as_deref(),
            Some("(name,like,%hoi an%)~and(types,like,%beach%)~and(marker,eq,false)")
        );
    }

    #[test]
    fn unknown_marker_value_is_ignored() {
        let q = query(&[("hasMarker", "maybe")]);
        assert_eq!(
            LocationRepo::filter(&q).build().as_deref(),
            Some("(name,like,%hoi an%)")
        );
    }

    fn client(transport: &Arc<MemoryTransport>) -> RecordClient {
        RecordClient::with_transport(identity_tables(), RetryPolicy::none(), transport.clone())
    }

    #[tokio::test]
    async fn create_without_name_never_reaches_the_store() {
        let transport = Arc::new(MemoryTransport::new().with_table(tables::LOCATIONS, vec![]));
        let result = LocationRepo::create(&client(&transport), LocationInput::default()).await;
        assert_matches!(result, Err(StoreError::Core(CoreError::Validation(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn set_marker_touches_only_the_marker() {
        let transport = Arc::new(MemoryTransport::new().with_table(
            tables::LOCATIONS,
            vec![json!({ "Id": 3, "name": "Hue", "marker": true })],
        ));
        LocationRepo::set_marker(&client(&transport), 3, false).await.unwrap();
        let sent = transport.requests().pop().unwrap();
        assert_eq!(sent.body, Some(json!({ "Id": 3, "marker": false })));
    }

    #[tokio::test]
    async fn find_by_id_decorates() {
        let transport = Arc::new(MemoryTransport::new().with_table(
            tables::LOCATIONS,
            vec![json!({ "Id": 3, "types": r#"["temple"]"#, "reviews": r#"[{"start":3}]"# })],
        ));
        let found = LocationRepo::find_by_id(&client(&transport), 3).await.unwrap().unwrap();
        assert_eq!(found["types_display"], json!("temple"));
        assert_eq!(found["calculated_rating"], json!(3.0));
        assert!(LocationRepo::find_by_id(&client(&transport), 4).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn types_are_distinct_and_sorted() {
        let transport = Arc::new(MemoryTransport::new().with_table(
            tables::LOCATIONS,
            vec![
                json!({ "Id": 1, "types": r#"["Temple","food"]"# }),
                json!({ "Id": 2, "types": r#"["food"]"# }),
            ],
        ));
        let types = LocationRepo::types(&client(&transport)).await.unwrap();
        assert_eq!(types, vec!["food", "temple"]);
    }
}
