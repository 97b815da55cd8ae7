//! Typed list-request parameters.
//!
//! Query strings arrive as loose text. [`ListParams`] captures them verbatim
//! and [`ListQuery::from_params`] turns them into a validated [`ListQuery`]
//! once, before anything downstream sees them.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::CoreError;

/// Default page number when `page` is omitted.
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size when `limit` is omitted.
pub const DEFAULT_LIMIT: u32 = 10;

/// Default sort column when `sort` is omitted.
pub const DEFAULT_SORT: &str = "Id";

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parse a direction. Anything other than `desc` (case-insensitive) is ascending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn is_desc(self) -> bool {
        self == SortOrder::Desc
    }
}

/// Raw list parameters as received in the query string.
///
/// Every key that is not one of the common ones lands in `filters`, so each
/// entity can pick out the filters it understands.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    #[serde(flatten)]
    pub filters: BTreeMap<String, String>,
}

/// A validated list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size, at least 1.
    pub limit: u32,
    /// Free-text search; empty means no search.
    pub search: String,
    /// Sort column or virtual field name.
    pub sort: String,
    pub order: SortOrder,
    /// Entity-specific filters keyed by query parameter name.
    pub filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
            sort: DEFAULT_SORT.to_string(),
            order: SortOrder::Asc,
            filters: BTreeMap::new(),
        }
    }
}

impl ListQuery {
    /// Validate raw parameters.
    ///
    /// `page` and `limit` must be positive integers when present. Blank
    /// values count as absent.
    pub fn from_params(params: ListParams) -> Result<Self, CoreError> {
        let page = parse_positive("page", params.page.as_deref(), DEFAULT_PAGE)?;
        let limit = parse_positive("limit", params.limit.as_deref(), DEFAULT_LIMIT)?;

        let sort = params
            .sort
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SORT.to_string());

        Ok(Self {
            page,
            limit,
            search: params.search.unwrap_or_default().trim().to_string(),
            sort,
            order: params.order.as_deref().map(SortOrder::parse).unwrap_or_default(),
            filters: params.filters,
        })
    }

    /// Zero-based row offset of the first record on the requested page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }

    /// A filter value, trimmed, or `""` when absent.
    pub fn filter(&self, key: &str) -> &str {
        self.filters.get(key).map(|v| v.trim()).unwrap_or("")
    }

    /// The store's sort expression for native sorting: `field` or `-field`.
    pub fn sort_expression(&self) -> String {
        if self.order.is_desc() {
            format!("-{}", self.sort)
        } else {
            self.sort.clone()
        }
    }
}

fn parse_positive(name: &str, raw: Option<&str>, default: u32) -> Result<u32, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => match text.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(CoreError::Validation(format!(
                "{name} must be a positive integer"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_validation(result: Result<ListQuery, CoreError>) {
        assert!(
            matches!(result, Err(CoreError::Validation(_))),
            "expected validation error, got {result:?}"
        );
    }

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut p = ListParams::default();
        for (k, v) in pairs {
            let v = v.to_string();
            match *k {
                "page" => p.page = Some(v),
                "limit" => p.limit = Some(v),
                "search" => p.search = Some(v),
                "sort" => p.sort = Some(v),
                "order" => p.order = Some(v),
                other => {
                    p.filters.insert(other.to_string(), v);
                }
            }
        }
        p
    }

    #[test]
    fn defaults_apply_when_params_absent() {
        let q = ListQuery::from_params(ListParams::default()).unwrap();
        assert_eq!(q, ListQuery::default());
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn parses_all_common_fields() {
        let q = ListQuery::from_params(params(&[
            ("page", "3"),
            ("limit", "20"),
            ("search", "  hue "),
            ("sort", "name"),
            ("order", "DESC"),
            ("types", "temple"),
        ]))
        .unwrap();
        assert_eq!(q.page, 3);
        assert_eq!(q.limit, 20);
        assert_eq!(q.search, "hue");
        assert_eq!(q.order, SortOrder::Desc);
        assert_eq!(q.offset(), 40);
        assert_eq!(q.filter("types"), "temple");
        assert_eq!(q.filter("hasMarker"), "");
        assert_eq!(q.sort_expression(), "-name");
    }

    #[test]
    fn rejects_zero_and_non_numeric_paging() {
        assert_validation(ListQuery::from_params(params(&[("page", "0")])));
        assert_validation(ListQuery::from_params(params(&[("limit", "0")])));
        assert_validation(ListQuery::from_params(params(&[("limit", "ten")])));
        assert_validation(ListQuery::from_params(params(&[("page", "-1")])));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let q = ListQuery::from_params(params(&[("page", ""), ("sort", " ")])).unwrap();
        assert_eq!(q.page, DEFAULT_PAGE);
        assert_eq!(q.sort, DEFAULT_SORT);
    }

    #[test]
    fn unknown_order_is_ascending() {
        assert_eq!(SortOrder::parse("sideways"), SortOrder::Asc);
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
    }
}
