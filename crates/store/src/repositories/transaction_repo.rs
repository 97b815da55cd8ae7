//! Read-only access to the `transactions` table.

use std::collections::{BTreeSet, HashMap};

use voyage_core::filter::{Condition, Filter};
use voyage_core::paging::Page;
use voyage_core::query::ListQuery;
use voyage_core::stats::TransactionStats;
use voyage_core::types::str_field;

use crate::client::{ListOptions, RecordClient};
use crate::config::tables;
use crate::error::StoreError;
use crate::models::transaction::TransactionView;
use crate::pagination::SUPERSET_CEILING;

/// Transactions always list newest first.
const TRANSACTION_SORT: &str = "-Id";

pub struct TransactionRepo;

impl TransactionRepo {
    /// `search` matches order code, full name, or username; `status` is exact.
    pub fn filter(query: &ListQuery) -> Filter {
        let search = if query.search.is_empty() {
            Vec::new()
        } else {
            ["orderCode", "fullName", "username"]
                .into_iter()
                .map(|field| Condition::like(field, &query.search))
                .collect()
        };
        Filter::new()
            .and_any(search)
            .and_if_present(query.filter("status"), |v| Condition::eq("status", v))
    }

    /// A page of transactions with full names resolved from `accounts`.
    ///
    /// The name lookup is best effort: if it fails the page is still
    /// returned, with usernames standing in for missing names.
    pub async fn list(
        client: &RecordClient,
        query: &ListQuery,
    ) -> Result<Page<TransactionView>, StoreError> {
        let options = ListOptions::page(query.page, query.limit)
            .filter(Self::filter(query).build())
            .sort(TRANSACTION_SORT);
        let page = client.list(tables::TRANSACTIONS, &options).await?;

        let usernames: BTreeSet<&str> = page
            .list
            .iter()
            .map(|tx| str_field(tx, "username"))
            .filter(|u| !u.is_empty())
            .collect();

        let names = if usernames.is_empty() {
            HashMap::new()
        } else {
            match Self::full_names(client, &usernames).await {
                Ok(names) => names,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to resolve transaction user names");
                    HashMap::new()
                }
            }
        };

        let views = page
            .list
            .iter()
            .map(|tx| TransactionView::from_record(tx, &names))
            .collect();
        Ok(Page {
            list: views,
            page_info: page.page_info,
        })
    }

    async fn full_names(
        client: &RecordClient,
        usernames: &BTreeSet<&str>,
    ) -> Result<HashMap<String, String>, StoreError> {
        let filter = Filter::new()
            .and_any(
                usernames
                    .iter()
                    .map(|u| Condition::eq("userName", u))
                    .collect(),
            )
            .build();
        let accounts = client
            .list_all(
                tables::ACCOUNTS,
                filter.as_deref(),
                None,
                Some("userName,fullName"),
                SUPERSET_CEILING,
            )
            .await?;

        Ok(accounts
            .list
            .iter()
            .filter_map(|account| {
                let user = str_field(account, "userName");
                if user.is_empty() {
                    return None;
                }
                let full = Some(str_field(account, "fullName"))
                    .filter(|n| !n.is_empty())
                    .unwrap_or(user);
                Some((user.to_string(), full.to_string()))
            })
            .collect())
    }

    pub async fn stats(client: &RecordClient) -> Result<TransactionStats, StoreError> {
        let all = client
            .list_all(
                tables::TRANSACTIONS,
                None,
                None,
                Some("Id,amount,status"),
                SUPERSET_CEILING,
            )
            .await?;
        Ok(TransactionStats::collect(&all.list))
    }
}
