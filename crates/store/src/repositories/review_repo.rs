//! Reviews embedded in locations and festivals.
//!
//! There is no reviews table. Reads fetch the `reviews` column of both
//! parent tables and merge them; deletion rewrites one parent's column.

use serde::Serialize;
use serde_json::Value;
use voyage_core::error::CoreError;
use voyage_core::paging::{paginate, Page};
use voyage_core::query::ListQuery;
use voyage_core::reviews::{merge_reviews, remove_review_at, MergedReview, ReviewScope, ReviewSource, ReviewStats};
use voyage_core::transform::parse_json_array_value;
use voyage_core::types::{record_id, str_field, Record, RecordId};
use voyage_core::virtual_field::REVIEWS_FIELD;

use crate::client::RecordClient;
use crate::error::StoreError;
use crate::pagination::SUPERSET_CEILING;

/// `{ id, name }` entry for the review filter dropdowns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceName {
    pub id: Option<RecordId>,
    pub name: String,
}

pub struct ReviewRepo;

impl ReviewRepo {
    /// Fetch the given columns of every location and festival, concurrently.
    /// Either failure fails the whole read.
    async fn fetch_parents(
        client: &RecordClient,
        fields: &str,
    ) -> Result<(Vec<Record>, Vec<Record>), StoreError> {
        let (locations, festivals) = tokio::try_join!(
            client.list_all(
                ReviewSource::Location.table(),
                None,
                None,
                Some(fields),
                SUPERSET_CEILING
            ),
            client.list_all(
                ReviewSource::Festival.table(),
                None,
                None,
                Some(fields),
                SUPERSET_CEILING
            ),
        )?;
        Ok((locations.list, festivals.list))
    }

    /// Merged, filtered, rating-sorted page of reviews.
    ///
    /// Honors the `locationId` and `festivalId` filters and `search`.
    pub async fn list(
        client: &RecordClient,
        query: &ListQuery,
    ) -> Result<Page<MergedReview>, StoreError> {
        let (locations, festivals) = Self::fetch_parents(client, "Id,name,reviews").await?;
        let scope = ReviewScope::new(query.filter("locationId"), query.filter("festivalId"));

        let merged = merge_reviews(
            [
                (ReviewSource::Location, locations.as_slice()),
                (ReviewSource::Festival, festivals.as_slice()),
            ],
            &scope,
            &query.search,
        );
        Ok(paginate(merged, query.page, query.limit))
    }

    pub async fn stats(client: &RecordClient) -> Result<ReviewStats, StoreError> {
        let (locations, festivals) = Self::fetch_parents(client, "reviews").await?;
        Ok(ReviewStats::collect(&locations, &festivals))
    }

    /// Ids and names of every record of one source table.
    pub async fn source_names(
        client: &RecordClient,
        source: ReviewSource,
    ) -> Result<Vec<SourceName>, StoreError> {
        let all = client
            .list_all(source.table(), None, None, Some("Id,name"), SUPERSET_CEILING)
            .await?;
        Ok(all
            .list
            .iter()
            .map(|r| SourceName {
                id: record_id(r),
                name: str_field(r, "name").to_string(),
            })
            .collect())
    }

    /// Remove the review at `index` from one parent record.
    ///
    /// This is an unguarded read-modify-write: the parent is read, one
    /// element is removed, and the whole column is written back. Two
    /// concurrent deletions on the same parent can both read the same list,
    /// and the later write drops the earlier one's change. The store offers
    /// no conditional update to detect this, and an in-process lock would
    /// not cover other instances.
    pub async fn delete_at(
        client: &RecordClient,
        source: ReviewSource,
        source_id: RecordId,
        index: i64,
    ) -> Result<ReviewRemoval, StoreError> {
        let table = source.table();
        let parent = client
            .get_by_id(table, source_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: source.entity(),
                id: source_id,
            })?;

        let mut reviews = parse_json_array_value(parent.get(REVIEWS_FIELD));
        let removed = remove_review_at(&mut reviews, index)?;
        let remaining = reviews.len();

        let mut data = Record::new();
        data.insert(
            REVIEWS_FIELD.to_string(),
            Value::String(Value::Array(reviews).to_string()),
        );
        client.update(table, source_id, data).await?;

        Ok(ReviewRemoval { removed, remaining })
    }
}

/// Outcome of [`ReviewRepo::delete_at`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRemoval {
    pub removed: Value,
    pub remaining: usize,
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::config::tables;
    use crate::memory::{identity_tables, MemoryTransport};
    use crate::retry::RetryPolicy;
    use crate::transport::Method;

    fn seeded() -> Arc<MemoryTransport> {
        Arc::new(
            MemoryTransport::new()
                .with_table(
                    tables::LOCATIONS,
                    vec![
                        json!({
                            "Id": 1,
                            "name": "Hoi An",
                            "reviews": r#"[{"name_user_review":"Mai","start":4},{"user":"Tom","rating":2}]"#,
                        }),
                        json!({ "Id": 2, "name": "Sapa", "reviews": "[]" }),
                    ],
                )
                .with_table(
                    tables::FESTIVALS,
                    vec![json!({
                        "Id": 5,
                        "name": "Hue Festival",
                        "reviews": r#"[{"start":5,"content":"Wonderful"}]"#,
                    })],
                ),
        )
    }

    fn client(transport: &Arc<MemoryTransport>) -> RecordClient {
        RecordClient::with_transport(identity_tables(), RetryPolicy::none(), transport.clone())
    }

    fn query(filters: &[(&str, &str)], page: u32, limit: u32) -> ListQuery {
        ListQuery {
            page,
            limit,
            filters: filters
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            ..ListQuery::default()
        }
    }

    #[tokio::test]
    async fn list_merges_both_sources() {
        let transport = seeded();
        let page = ReviewRepo::list(&client(&transport), &query(&[], 1, 2)).await.unwrap();

        let ids: Vec<_> = page.list.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["fest-5-0", "loc-1-0"]);
        assert_eq!(page.page_info.total_rows, 3);
        assert!(!page.page_info.is_last_page);
    }

    #[tokio::test]
    async fn location_filter_drops_festivals() {
        let transport = seeded();
        let page = ReviewRepo::list(&client(&transport), &query(&[("locationId", "1")], 1, 10))
            .await
            .unwrap();
        assert_eq!(page.page_info.total_rows, 2);
        assert!(page.list.iter().all(|r| r.source == "Location"));
    }

    #[tokio::test]
    async fn stats_count_both_sources() {
        let transport = seeded();
        let stats = ReviewRepo::stats(&client(&transport)).await.unwrap();
        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.location_reviews, 2);
        assert_eq!(stats.festival_reviews, 1);
        assert_eq!(stats.average_rating, 3.7);
    }

    #[tokio::test]
    async fn delete_at_rewrites_the_reviews_column() {
        let transport = seeded();
        let removal = ReviewRepo::delete_at(&client(&transport), ReviewSource::Location, 1, 0)
            .await
            .unwrap();
        assert_eq!(removal.remaining, 1);
        assert_eq!(removal.removed["name_user_review"], json!("Mai"));

        let stored = &transport.records(tables::LOCATIONS)[0];
        let reviews = parse_json_array_value(stored.get("reviews"));
        assert_eq!(reviews, vec![json!({ "user": "Tom", "rating": 2 })]);
    }

    #[tokio::test]
    async fn delete_at_out_of_range_leaves_the_record_unmodified() {
        let transport = seeded();
        let before = transport.records(tables::LOCATIONS);

        let result = ReviewRepo::delete_at(&client(&transport), ReviewSource::Location, 1, 2).await;

        assert_matches!(
            result,
            Err(StoreError::Core(CoreError::IndexOutOfRange { index: 2, len: 2 }))
        );
        assert_eq!(transport.records(tables::LOCATIONS), before);
        assert!(transport.requests().iter().all(|r| r.method == Method::Get));
    }

    #[tokio::test]
    async fn delete_at_missing_parent_is_not_found() {
        let transport = seeded();
        let result = ReviewRepo::delete_at(&client(&transport), ReviewSource::Festival, 42, 0).await;
        assert_matches!(
            result,
            Err(StoreError::Core(CoreError::NotFound { entity: "Festival", id: 42 }))
        );
    }

    #[tokio::test]
    async fn source_names_for_dropdowns() {
        let transport = seeded();
        let names = ReviewRepo::source_names(&client(&transport), ReviewSource::Location)
            .await
            .unwrap();
        assert_eq!(
            names,
            vec![
                SourceName { id: Some(1), name: "Hoi An".into() },
                SourceName { id: Some(2), name: "Sapa".into() },
            ]
        );
    }
}
