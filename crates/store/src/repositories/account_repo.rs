//! Repository for the `accounts` table.

use voyage_core::filter::{Condition, Filter};
use voyage_core::paging::Page;
use voyage_core::query::ListQuery;
use voyage_core::types::{Record, RecordId};

use super::native_options;
use crate::client::RecordClient;
use crate::config::tables;
use crate::error::StoreError;
use crate::models::account::{AccountInput, AccountView};

pub struct AccountRepo;

impl AccountRepo {
    /// `search` matches full name, email, or username.
    pub fn filter(query: &ListQuery) -> Filter {
        if query.search.is_empty() {
            return Filter::new();
        }
        Filter::new().and_any(
            ["fullName", "email", "userName"]
                .into_iter()
                .map(|field| Condition::like(field, &query.search))
                .collect(),
        )
    }

    pub async fn list(client: &RecordClient, query: &ListQuery) -> Result<Page<AccountView>, StoreError> {
        let options = native_options(query, Self::filter(query).build());
        let page = client.list(tables::ACCOUNTS, &options).await?;
        Ok(page.map(|r| AccountView::from(&r)))
    }

    pub async fn find_by_id(
        client: &RecordClient,
        id: RecordId,
    ) -> Result<Option<AccountView>, StoreError> {
        Ok(client
            .get_by_id(tables::ACCOUNTS, id)
            .await?
            .map(|r| AccountView::from(&r)))
    }

    pub async fn create(
        client: &RecordClient,
        input: AccountInput,
        hash: impl Fn(&str) -> String,
    ) -> Result<Record, StoreError> {
        let record = input.into_create_record(hash)?;
        client.create(tables::ACCOUNTS, record).await
    }

    pub async fn update(
        client: &RecordClient,
        id: RecordId,
        input: AccountInput,
        hash: impl Fn(&str) -> String,
    ) -> Result<Record, StoreError> {
        client
            .update(tables::ACCOUNTS, id, input.into_update_record(hash))
            .await
    }

    pub async fn delete(client: &RecordClient, id: RecordId) -> Result<(), StoreError> {
        client.delete(tables::ACCOUNTS, id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::memory::{identity_tables, MemoryTransport};
    use crate::retry::RetryPolicy;

    #[test]
    fn search_spans_three_columns() {
        let query = ListQuery {
            search: "lan".into(),
            ..ListQuery::default()
        };
        assert_eq!(
            AccountRepo::filter(&query).build().as_deref(),
            Some("(fullName,like,%lan%)~or(email,like,%lan%)~or(userName,like,%lan%)")
        );
        assert!(AccountRepo::filter(&ListQuery::default()).is_empty());
    }

    #[tokio::test]
    async fn list_projects_safe_fields() {
        let transport = Arc::new(MemoryTransport::new().with_table(
            tables::ACCOUNTS,
            vec![json!({ "Id": 1, "email": "lan@travel.vn", "password": "abc123" })],
        ));
        let client =
            RecordClient::with_transport(identity_tables(), RetryPolicy::none(), transport.clone());

        let page = AccountRepo::list(&client, &ListQuery::default()).await.unwrap();
        let json = serde_json::to_value(&page).unwrap();
        assert!(json["list"][0].get("password").is_none());
        assert_eq!(json["list"][0]["email"], json!("lan@travel.vn"));
        assert_eq!(json["pageInfo"]["totalRows"], json!(1));
    }
}
