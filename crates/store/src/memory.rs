//! In-memory [`Transport`] for tests.
//!
//! [`MemoryTransport`] keeps tables as vectors of records and answers the
//! same URL layout as the hosted store, including `where`, `sort`,
//! `offset`/`limit`, and `fields`. Failures can be queued ahead of time and
//! every request is recorded for inspection.

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};
use voyage_core::paging::{Page, PageInfo};
use voyage_core::types::{record_id, Record, RecordId, ID_FIELD};

use crate::client::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::config::{tables, TableMap};
use crate::transport::{Method, StoreRequest, StoreResponse, Transport, TransportError};

const TABLES_PREFIX: &str = "/api/v2/tables/";

/// A table map where each logical name is also its table id.
pub fn identity_tables() -> TableMap {
    [
        tables::ACCOUNTS,
        tables::LOCATIONS,
        tables::FESTIVALS,
        tables::ITEMS,
        tables::OBJECTS,
        tables::TRANSACTIONS,
    ]
    .into_iter()
    .map(|name| (name, name))
    .collect()
}

#[derive(Debug, Clone, Copy)]
enum Scripted {
    Status(u16),
    NoResponse,
}

#[derive(Default)]
struct State {
    tables: HashMap<String, Vec<Record>>,
    script: VecDeque<Scripted>,
    failing_tables: HashMap<String, u16>,
    requests: Vec<StoreRequest>,
}

#[derive(Default)]
pub struct MemoryTransport {
    state: Mutex<State>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a table. Non-object values are ignored.
    pub fn with_table(self, table_id: &str, records: Vec<Value>) -> Self {
        let rows = records
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(m) => Some(m),
                _ => None,
            })
            .collect();
        self.lock().tables.insert(table_id.to_string(), rows);
        self
    }

    /// Answer the next request with `status` instead of serving it.
    pub fn fail_next(&self, status: u16) {
        self.lock().script.push_back(Scripted::Status(status));
    }

    /// Answer the next request with no response at all.
    pub fn drop_next(&self) {
        self.lock().script.push_back(Scripted::NoResponse);
    }

    /// Answer every request for `table_id` with `status`.
    pub fn fail_table(&self, table_id: &str, status: u16) {
        self.lock().failing_tables.insert(table_id.to_string(), status);
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<StoreRequest> {
        self.lock().requests.clone()
    }

    /// Current rows of a table.
    pub fn records(&self, table_id: &str) -> Vec<Record> {
        self.lock().tables.get(table_id).cloned().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, request: StoreRequest) -> Result<StoreResponse, TransportError> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        match state.script.pop_front() {
            Some(Scripted::NoResponse) => {
                return Err(TransportError::Network("connection reset".into()))
            }
            Some(Scripted::Status(status)) => {
                return Ok(StoreResponse::new(status, json!({ "msg": "scripted failure" })))
            }
            None => {}
        }

        let failing = state
            .failing_tables
            .iter()
            .find(|(table_id, _)| request.path.starts_with(&format!("{TABLES_PREFIX}{table_id}/")))
            .map(|(_, status)| *status);
        if let Some(status) = failing {
            return Ok(StoreResponse::new(status, json!({ "msg": "table unavailable" })));
        }

        Ok(serve(&mut state.tables, &request))
    }
}

// ---------------------------------------------------------------------------
// Request handling
// ---------------------------------------------------------------------------

fn not_found(msg: impl Into<String>) -> StoreResponse {
    StoreResponse::new(404, json!({ "msg": msg.into() }))
}

fn bad_request(msg: impl Into<String>) -> StoreResponse {
    StoreResponse::new(400, json!({ "msg": msg.into() }))
}

fn serve(tables: &mut HashMap<String, Vec<Record>>, request: &StoreRequest) -> StoreResponse {
    let Some(rest) = request.path.strip_prefix(TABLES_PREFIX) else {
        return not_found("Unknown route");
    };
    let mut segments = rest.split('/');
    let (Some(table_id), Some("records")) = (segments.next(), segments.next()) else {
        return not_found("Unknown route");
    };
    let tail = segments.next();
    let Some(rows) = tables.get_mut(table_id) else {
        return not_found(format!("Table '{table_id}' not found"));
    };

    match (request.method, tail) {
        (Method::Get, None) => list(rows, request),
        (Method::Get, Some("count")) => match matching(rows, request.query_value("where")) {
            Ok(found) => StoreResponse::new(200, json!({ "count": found.len() })),
            Err(msg) => bad_request(msg),
        },
        (Method::Get, Some(id)) => match id.parse::<RecordId>() {
            Ok(id) => match rows.iter().find(|r| record_id(r) == Some(id)) {
                Some(row) => StoreResponse::new(200, Value::Object(row.clone())),
                None => not_found(format!("Record '{id}' not found")),
            },
            Err(_) => bad_request(format!("Invalid id '{id}'")),
        },
        (Method::Post, None) => insert(rows, request.body.as_ref()),
        (Method::Patch, None) => patch(rows, request.body.as_ref()),
        (Method::Delete, None) => remove(rows, request.body.as_ref()),
        _ => not_found("Unknown route"),
    }
}

fn list(rows: &[Record], request: &StoreRequest) -> StoreResponse {
    let mut found = match matching(rows, request.query_value("where")) {
        Ok(found) => found,
        Err(msg) => return bad_request(msg),
    };
    if let Some(sort) = request.query_value("sort") {
        sort_rows(&mut found, sort);
    }

    let offset: usize = request
        .query_value("offset")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let limit: usize = request
        .query_value("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PAGE_SIZE as usize)
        .clamp(1, MAX_PAGE_SIZE as usize);
    let fields: Option<Vec<&str>> = request
        .query_value("fields")
        .map(|f| f.split(',').map(str::trim).collect());

    let total = found.len();
    let list = found
        .into_iter()
        .skip(offset)
        .take(limit)
        .map(|row| match &fields {
            Some(keep) => row
                .into_iter()
                .filter(|(k, _)| keep.contains(&k.as_str()))
                .collect(),
            None => row,
        })
        .collect();

    let page = Page {
        list,
        page_info: PageInfo {
            total_rows: total as u64,
            page: (offset / limit + 1) as u64,
            page_size: limit as u64,
            is_first_page: offset == 0,
            is_last_page: offset + limit >= total,
        },
    };
    StoreResponse::new(200, serde_json::to_value(page).unwrap_or(Value::Null))
}

fn insert(rows: &mut Vec<Record>, body: Option<&Value>) -> StoreResponse {
    let Some(Value::Object(data)) = body else {
        return bad_request("Expected a record object");
    };
    let id = rows.iter().filter_map(record_id).max().unwrap_or(0) + 1;
    let mut row = data.clone();
    row.insert(ID_FIELD.to_string(), Value::from(id));
    rows.push(row);
    StoreResponse::new(200, json!({ ID_FIELD: id }))
}

fn patch(rows: &mut [Record], body: Option<&Value>) -> StoreResponse {
    let Some(Value::Object(data)) = body else {
        return bad_request("Expected a record object");
    };
    let Some(id) = record_id(data) else {
        return bad_request("Missing Id");
    };
    match rows.iter_mut().find(|r| record_id(r) == Some(id)) {
        Some(row) => {
            row.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));
            StoreResponse::new(200, json!({ ID_FIELD: id }))
        }
        None => not_found(format!("Record '{id}' not found")),
    }
}

fn remove(rows: &mut Vec<Record>, body: Option<&Value>) -> StoreResponse {
    let Some(Value::Array(items)) = body else {
        return bad_request("Expected an array of ids");
    };
    let ids: Vec<RecordId> = items
        .iter()
        .filter_map(|item| item.as_object().and_then(record_id))
        .collect();
    if let Some(missing) = ids
        .iter()
        .find(|id| !rows.iter().any(|r| record_id(r) == Some(**id)))
    {
        return not_found(format!("Record '{missing}' not found"));
    }
    rows.retain(|r| !record_id(r).is_some_and(|id| ids.contains(&id)));
    StoreResponse::new(
        200,
        Value::Array(ids.into_iter().map(|id| json!({ ID_FIELD: id })).collect()),
    )
}

// ---------------------------------------------------------------------------
// Filtering and sorting
// ---------------------------------------------------------------------------

fn field_text(row: &Record, field: &str) -> String {
    match row.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

type Clause<'a> = (&'a str, &'a str, &'a str);

fn parse_clause(text: &str) -> Result<Clause<'_>, String> {
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(|| format!("Malformed condition '{text}'"))?;
    let mut parts = inner.splitn(3, ',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(field), Some(op), Some(value)) => Ok((field, op, value)),
        _ => Err(format!("Malformed condition '{text}'")),
    }
}

fn clause_matches(row: &Record, (field, op, value): Clause<'_>) -> Result<bool, String> {
    let actual = field_text(row, field);
    match op {
        "eq" => Ok(actual == value),
        "like" => {
            let needle = value.trim_matches('%').to_lowercase();
            Ok(actual.to_lowercase().contains(&needle))
        }
        other => Err(format!("Unsupported operator '{other}'")),
    }
}

fn matching(rows: &[Record], filter: Option<&str>) -> Result<Vec<Record>, String> {
    let Some(filter) = filter.filter(|f| !f.is_empty()) else {
        return Ok(rows.to_vec());
    };
    let groups = filter
        .split("~and")
        .map(|group| group.split("~or").map(parse_clause).collect::<Result<Vec<_>, _>>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut found = Vec::new();
    for row in rows {
        let mut keep = true;
        for group in &groups {
            let mut any = false;
            for clause in group {
                if clause_matches(row, *clause)? {
                    any = true;
                    break;
                }
            }
            if !any {
                keep = false;
                break;
            }
        }
        if keep {
            found.push(row.clone());
        }
    }
    Ok(found)
}

fn compare_field(a: &Record, b: &Record, field: &str) -> Ordering {
    let number = |row: &Record| match row.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    match (number(a), number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => field_text(a, field).cmp(&field_text(b, field)),
    }
}

fn sort_rows(rows: &mut [Record], sort: &str) {
    let keys: Vec<(&str, bool)> = sort
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(|k| match k.strip_prefix('-') {
            Some(field) => (field, true),
            None => (k, false),
        })
        .collect();
    rows.sort_by(|a, b| {
        keys.iter()
            .map(|(field, desc)| {
                let ord = compare_field(a, b, field);
                if *desc {
                    ord.reverse()
                } else {
                    ord
                }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });
}
