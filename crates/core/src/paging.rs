//! Page envelopes and in-memory pagination.

use serde::{Deserialize, Serialize};

/// Pagination metadata, in the store's wire shape.
///
/// Fields default when the store omits them so a store page can always be
/// passed through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    pub total_rows: u64,
    pub page: u64,
    pub page_size: u64,
    pub is_first_page: bool,
    pub is_last_page: bool,
}

impl PageInfo {
    /// Build page info for a locally paginated list of `total_rows` items.
    ///
    /// The last page is the one whose end reaches or passes `total_rows`,
    /// which also covers a final partial page and requests beyond the end.
    pub fn synthesize(total_rows: usize, page: u32, limit: u32) -> Self {
        let start = (page.max(1) as usize - 1) * limit as usize;
        Self {
            total_rows: total_rows as u64,
            page: u64::from(page),
            page_size: u64::from(limit),
            is_first_page: page == 1,
            is_last_page: start + limit as usize >= total_rows,
        }
    }

    /// Page info describing a whole collection returned as one page.
    pub fn single(total_rows: usize) -> Self {
        Self {
            total_rows: total_rows as u64,
            page: 1,
            page_size: total_rows as u64,
            is_first_page: true,
            is_last_page: true,
        }
    }
}

/// A page of items plus its metadata: `{ list, pageInfo }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default)]
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            list: self.list.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}

/// Slice `items` to the requested page and synthesize its page info.
///
/// `items` must already be filtered and sorted; `total_rows` is their count.
pub fn paginate<T>(items: Vec<T>, page: u32, limit: u32) -> Page<T> {
    let page_info = PageInfo::synthesize(items.len(), page, limit);
    let start = (page.max(1) as usize - 1) * limit as usize;
    let list = items
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .collect();
    Page { list, page_info }
}
