//! List parameters and page results

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::model::Record;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Sort direction for the active sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

impl SortDirection {
    /// Wire form (`ASC` / `DESC`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    /// Returns the opposite direction.
    pub fn reversed(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Parameters handed to a [`ListLoader`](super::ListLoader).
///
/// `page` is 1-indexed. Filter keys are the query-parameter names the
/// backend expects.
///
/// # Example
///
/// ```
/// use soundcms_lib::api::{ListParams, SortDirection};
///
/// let params = ListParams::new()
///     .search("rain")
///     .filter("status", vec!["ENABLED".into()])
///     .sort("createTime", SortDirection::Descending)
///     .page(2);
///
/// assert_eq!(params.offset(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Free-text search.
    pub search: String,
    /// Active filters: filter key -> selected values.
    pub filters: BTreeMap<String, Vec<String>>,
    /// Page index (1-indexed).
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Field to sort by.
    pub sort_field: Option<String>,
    /// Direction for `sort_field`.
    pub sort_direction: Option<SortDirection>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: BTreeMap::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: None,
            sort_direction: None,
        }
    }
}

impl ListParams {
    /// Creates parameters for the first page with default size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Sets the selected values of one filter.
    pub fn filter(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.filters.insert(key.into(), values);
        self
    }

    /// Sets the sort field and direction.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_field = Some(field.into());
        self.sort_direction = Some(direction);
        self
    }

    /// Sets the page index (clamped to at least 1).
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Sets the page size (clamped to at least 1).
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Row offset of the first row on this page.
    pub fn offset(&self) -> u64 {
        (self.page.max(1) as u64 - 1) * self.page_size as u64
    }

    /// Applies caller overrides on top of these parameters.
    pub fn merge(&self, overrides: &ParamOverrides) -> ListParams {
        let mut merged = self.clone();
        if let Some(search) = &overrides.search {
            merged.search = search.clone();
        }
        if let Some(filters) = &overrides.filters {
            merged.filters = filters.clone();
        }
        if let Some(page) = overrides.page {
            merged.page = page.max(1);
        }
        if let Some(size) = overrides.page_size {
            merged.page_size = size.max(1);
        }
        if let Some(field) = &overrides.sort_field {
            merged.sort_field = field.clone();
        }
        if let Some(direction) = overrides.sort_direction {
            merged.sort_direction = direction;
        }
        merged
    }

    /// Query-string pairs for the `GET /{module}/page` endpoint.
    ///
    /// Empty search and empty filters are omitted; multi-valued filters are
    /// comma-joined.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("pageIndex".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if !self.search.is_empty() {
            query.push(("keyword".to_string(), self.search.clone()));
        }
        if let Some(field) = &self.sort_field {
            query.push(("orderBy".to_string(), field.clone()));
            let direction = self.sort_direction.unwrap_or(SortDirection::Ascending);
            query.push(("orderDirection".to_string(), direction.as_str().to_string()));
        }
        for (key, values) in &self.filters {
            if !values.is_empty() {
                query.push((key.clone(), values.join(",")));
            }
        }
        query
    }
}

/// Partial parameters supplied on top of the current table state.
///
/// `None` keeps the current value. For the sort fields, `Some(None)` clears.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamOverrides {
    pub search: Option<String>,
    pub filters: Option<BTreeMap<String, Vec<String>>>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_field: Option<Option<String>>,
    pub sort_direction: Option<Option<SortDirection>>,
}

impl ParamOverrides {
    /// No overrides.
    pub fn none() -> Self {
        Self::default()
    }

    /// Overrides only the page index.
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }
}

/// One page of rows plus the total row count across all pages.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageResult<T = Record> {
    /// Rows on this page.
    #[serde(alias = "data", alias = "list")]
    pub rows: Vec<T>,
    /// Total rows matching the query.
    #[serde(default)]
    pub total: u64,
}

impl<T> PageResult<T> {
    /// Creates a page result.
    pub fn new(rows: Vec<T>, total: u64) -> Self {
        Self { rows, total }
    }

    /// Number of pages for the given page size.
    pub fn total_pages(&self, page_size: u32) -> u64 {
        let size = page_size.max(1) as u64;
        self.total.div_ceil(size)
    }
}
