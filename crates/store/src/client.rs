//! Generic CRUD against the record store's v2 table API.
//!
//! ```text
//! GET    /api/v2/tables/{table}/records?offset&limit&where&sort&fields
//! GET    /api/v2/tables/{table}/records/{id}
//! POST   /api/v2/tables/{table}/records
//! PATCH  /api/v2/tables/{table}/records          body: {"Id": id, ...}
//! DELETE /api/v2/tables/{table}/records          body: [{"Id": id}]
//! GET    /api/v2/tables/{table}/records/count?where
//! ```

use std::sync::Arc;

use serde_json::Value;
use voyage_core::paging::{Page, PageInfo};
use voyage_core::types::{Record, RecordId, ID_FIELD};

use crate::config::{StoreConfig, TableMap};
use crate::error::StoreError;
use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, Method, StoreRequest, Transport};

/// Largest page the store returns for a single list request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when a caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Options for a single-page list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub page: u32,
    pub limit: u32,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub fields: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            filter: None,
            sort: None,
            fields: None,
        }
    }
}

impl ListOptions {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            ..Self::default()
        }
    }

    pub fn filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.limit)
    }
}

/// Client for the record store.
///
/// Holds only immutable state, so one instance is shared across handlers
/// behind an `Arc`.
pub struct RecordClient {
    tables: TableMap,
    retry: RetryPolicy,
    transport: Arc<dyn Transport>,
}

impl RecordClient {
    /// Build a client speaking HTTP to the configured store.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let transport = HttpTransport::new(&config.base_url, &config.api_token)
            .map_err(|e| StoreError::Setup(e.to_string()))?;
        Ok(Self::with_transport(
            config.tables,
            config.retry,
            Arc::new(transport),
        ))
    }

    /// Build a client over an arbitrary transport.
    pub fn with_transport(
        tables: TableMap,
        retry: RetryPolicy,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            tables,
            retry,
            transport,
        }
    }

    fn records_path(&self, table: &str) -> Result<String, StoreError> {
        let table_id = self.tables.resolve(table)?;
        Ok(format!("/api/v2/tables/{table_id}/records"))
    }

    /// Send one request with retry and return the 2xx body.
    async fn execute(&self, table: &str, request: StoreRequest) -> Result<Value, StoreError> {
        let label = format!("{} {}", request.method, request.path);
        tracing::debug!(method = %request.method, table, path = %request.path, "Record store request");

        let transport = &self.transport;
        let request = &request;
        self.retry
            .run(&label, move || async move {
                let response = transport.send(request.clone()).await.map_err(|e| {
                    StoreError::Transient {
                        status: None,
                        message: e.to_string(),
                    }
                })?;
                if response.is_success() {
                    Ok(response.body)
                } else {
                    Err(StoreError::from_status(
                        response.status,
                        error_message(&response.body),
                    ))
                }
            })
            .await
    }

    /// Fetch one page. The store's `pageInfo` is returned as-is.
    pub async fn list(&self, table: &str, options: &ListOptions) -> Result<Page<Record>, StoreError> {
        let request = StoreRequest::new(Method::Get, self.records_path(table)?)
            .query("offset", options.offset())
            .query("limit", options.limit)
            .query_opt("where", options.filter.as_deref())
            .query_opt("sort", options.sort.as_deref())
            .query_opt("fields", options.fields.as_deref());

        let body = self.execute(table, request).await?;
        serde_json::from_value(body).map_err(|e| StoreError::Decode(format!("list {table}: {e}")))
    }

    /// Fetch every matching record, up to `ceiling`.
    ///
    /// Pages through the table at the store's maximum page size until the
    /// store reports the last page, returns a short page, or `ceiling`
    /// records are collected. The result is not exhaustive for larger
    /// tables. Its `pageInfo` describes the collected rows as one page.
    pub async fn list_all(
        &self,
        table: &str,
        filter: Option<&str>,
        sort: Option<&str>,
        fields: Option<&str>,
        ceiling: usize,
    ) -> Result<Page<Record>, StoreError> {
        let path = self.records_path(table)?;
        let mut records: Vec<Record> = Vec::new();

        while records.len() < ceiling {
            let chunk = (ceiling - records.len()).min(MAX_PAGE_SIZE as usize);
            let request = StoreRequest::new(Method::Get, path.clone())
                .query("offset", records.len())
                .query("limit", chunk)
                .query_opt("where", filter)
                .query_opt("sort", sort)
                .query_opt("fields", fields);

            let body = self.execute(table, request).await?;
            let page: Page<Record> = serde_json::from_value(body)
                .map_err(|e| StoreError::Decode(format!("list {table}: {e}")))?;

            let received = page.list.len();
            records.extend(page.list);
            if page.page_info.is_last_page || received < chunk {
                break;
            }
        }

        if records.len() >= ceiling {
            tracing::debug!(table, ceiling, "Superset fetch reached its ceiling");
        }
        records.truncate(ceiling);

        Ok(Page {
            page_info: PageInfo::single(records.len()),
            list: records,
        })
    }

    /// Fetch one record. A 404 or an empty object means "no such record".
    pub async fn get_by_id(&self, table: &str, id: RecordId) -> Result<Option<Record>, StoreError> {
        let path = format!("{}/{id}", self.records_path(table)?);
        match self.execute(table, StoreRequest::new(Method::Get, path)).await {
            Ok(Value::Object(record)) if record.is_empty() => Ok(None),
            Ok(Value::Object(record)) => Ok(Some(record)),
            Ok(other) => Err(StoreError::Decode(format!(
                "get {table}/{id}: expected an object, got {other}"
            ))),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Insert a record and return the store's reply (at least the new `Id`).
    pub async fn create(&self, table: &str, data: Record) -> Result<Record, StoreError> {
        let request =
            StoreRequest::new(Method::Post, self.records_path(table)?).body(Value::Object(data));
        let body = self.execute(table, request).await?;
        into_record(table, body)
    }

    /// Partially update a record. Fields absent from `data` are untouched.
    pub async fn update(
        &self,
        table: &str,
        id: RecordId,
        data: Record,
    ) -> Result<Record, StoreError> {
        let mut body = Record::new();
        body.insert(ID_FIELD.to_string(), Value::from(id));
        body.extend(data.into_iter().filter(|(k, _)| k != ID_FIELD));

        let request =
            StoreRequest::new(Method::Patch, self.records_path(table)?).body(Value::Object(body));
        let reply = self.execute(table, request).await?;
        into_record(table, reply)
    }

    pub async fn delete(&self, table: &str, id: RecordId) -> Result<(), StoreError> {
        let request = StoreRequest::new(Method::Delete, self.records_path(table)?)
            .body(serde_json::json!([{ ID_FIELD: id }]));
        self.execute(table, request).await?;
        Ok(())
    }

    /// Count records matching an optional filter expression.
    pub async fn count(&self, table: &str, filter: Option<&str>) -> Result<u64, StoreError> {
        let path = format!("{}/count", self.records_path(table)?);
        let request = StoreRequest::new(Method::Get, path).query_opt("where", filter);
        let body = self.execute(table, request).await?;
        body.get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| StoreError::Decode(format!("count {table}: missing count in {body}")))
    }
}

fn into_record(table: &str, body: Value) -> Result<Record, StoreError> {
    match body {
        Value::Object(record) => Ok(record),
        other => Err(StoreError::Decode(format!(
            "{table}: expected an object, got {other}"
        ))),
    }
}

/// Best-effort message from a store error body.
fn error_message(body: &Value) -> String {
    ["msg", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| match body {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use serde_json::json;
    use tokio::time::Instant;

    use super::*;
    use crate::config::tables;
    use crate::memory::{identity_tables, MemoryTransport};

    fn client(transport: &Arc<MemoryTransport>) -> RecordClient {
        RecordClient::with_transport(identity_tables(), RetryPolicy::default(), transport.clone())
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn locations(n: i64) -> Vec<Value> {
        (1..=n).map(|id| json!({ "Id": id, "name": format!("Place {id}") })).collect()
    }

    #[tokio::test]
    async fn update_merges_id_into_partial_body() {
        let transport = Arc::new(MemoryTransport::new().with_table(
            tables::LOCATIONS,
            vec![json!({ "Id": 7, "name": "Hoi An", "marker": true, "lat": 15.88 })],
        ));
        let client = client(&transport);

        client
            .update(tables::LOCATIONS, 7, record(json!({ "marker": false })))
            .await
            .unwrap();

        let sent = transport.requests().pop().unwrap();
        assert_eq!(sent.method, Method::Patch);
        assert_eq!(sent.path, "/api/v2/tables/locations/records");
        assert_eq!(sent.body, Some(json!({ "Id": 7, "marker": false })));

        let stored = transport.records(tables::LOCATIONS);
        assert_eq!(
            Value::Object(stored[0].clone()),
            json!({ "Id": 7, "name": "Hoi An", "marker": false, "lat": 15.88 })
        );
    }

    #[tokio::test]
    async fn unknown_table_fails_before_any_request() {
        let transport = Arc::new(MemoryTransport::new());
        let result = client(&transport).list("planets", &ListOptions::default()).await;

        assert_matches!(result, Err(StoreError::UnknownTable(name)) if name == "planets");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn service_unavailable_is_attempted_three_times() {
        let transport = Arc::new(MemoryTransport::new().with_table(tables::ITEMS, vec![]));
        for _ in 0..3 {
            transport.fail_next(503);
        }
        let started = Instant::now();

        let result = client(&transport).count(tables::ITEMS, None).await;

        assert_matches!(result, Err(StoreError::Transient { status: Some(503), .. }));
        assert_eq!(transport.requests().len(), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_is_attempted_once() {
        let transport = Arc::new(MemoryTransport::new().with_table(tables::ITEMS, vec![]));
        transport.fail_next(404);

        let result = client(&transport).count(tables::ITEMS, None).await;

        assert_matches!(result, Err(StoreError::Permanent { status: 404, .. }));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_connection_is_retried() {
        let transport = Arc::new(MemoryTransport::new().with_table(tables::ITEMS, locations(2)));
        transport.drop_next();

        let count = client(&transport).count(tables::ITEMS, None).await.unwrap();

        assert_eq!(count, 2);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn list_sends_offset_and_returns_store_page_info() {
        let transport = Arc::new(MemoryTransport::new().with_table(tables::LOCATIONS, locations(12)));
        let page = client(&transport)
            .list(
                tables::LOCATIONS,
                &ListOptions::page(2, 5)
                    .filter(Some("(name,like,%Place%)".into()))
                    .sort("-Id"),
            )
            .await
            .unwrap();

        let sent = transport.requests().pop().unwrap();
        assert_eq!(sent.query_value("offset"), Some("5"));
        assert_eq!(sent.query_value("limit"), Some("5"));
        assert_eq!(sent.query_value("sort"), Some("-Id"));

        let ids: Vec<_> = page.list.iter().filter_map(voyage_core::types::record_id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
        assert_eq!(page.page_info.total_rows, 12);
        assert!(!page.page_info.is_first_page);
        assert!(!page.page_info.is_last_page);
    }

    #[tokio::test]
    async fn list_all_pages_in_chunks_up_to_the_ceiling() {
        let transport = Arc::new(MemoryTransport::new().with_table(tables::LOCATIONS, locations(250)));
        let client = client(&transport);

        let all = client
            .list_all(tables::LOCATIONS, None, Some("Id"), None, 1000)
            .await
            .unwrap();
        assert_eq!(all.list.len(), 250);
        assert_eq!(all.page_info, PageInfo::single(250));
        let offsets: Vec<_> = transport
            .requests()
            .iter()
            .map(|r| r.query_value("offset").unwrap_or("").to_string())
            .collect();
        assert_eq!(offsets, vec!["0", "100", "200"]);

        let capped = client
            .list_all(tables::LOCATIONS, None, Some("Id"), None, 150)
            .await
            .unwrap();
        assert_eq!(capped.list.len(), 150);
        assert_eq!(capped.page_info.total_rows, 150);
    }

    #[tokio::test]
    async fn get_by_id_maps_missing_to_none() {
        let transport = Arc::new(MemoryTransport::new().with_table(tables::LOCATIONS, locations(1)));
        let client = client(&transport);

        assert!(client.get_by_id(tables::LOCATIONS, 1).await.unwrap().is_some());
        assert!(client.get_by_id(tables::LOCATIONS, 99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_delete_and_count() {
        let transport = Arc::new(MemoryTransport::new().with_table(tables::OBJECTS, vec![]));
        let client = client(&transport);

        let created = client
            .create(tables::OBJECTS, record(json!({ "title": "Lantern" })))
            .await
            .unwrap();
        let id = voyage_core::types::record_id(&created).unwrap();
        assert_eq!(client.count(tables::OBJECTS, None).await.unwrap(), 1);

        client.delete(tables::OBJECTS, id).await.unwrap();
        let sent = transport.requests().pop().unwrap();
        assert_eq!(sent.method, Method::Delete);
        assert_eq!(sent.body, Some(json!([{ "Id": id }])));
        assert_eq!(client.count(tables::OBJECTS, None).await.unwrap(), 0);
    }

    #[test]
    fn error_message_prefers_store_msg() {
        assert_eq!(error_message(&json!({ "msg": "Invalid field" })), "Invalid field");
        assert_eq!(error_message(&json!("Bad Gateway")), "Bad Gateway");
        assert_eq!(error_message(&Value::Null), "");
    }
}
