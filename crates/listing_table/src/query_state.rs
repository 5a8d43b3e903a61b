//! Canonical description of the requested table view and its pure transitions.

use std::collections::BTreeMap;

use shared::domain::{ColumnKey, SortDirection};
use tracing::warn;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sort column and direction, always committed as a pair.
///
/// A sorter either has both a column and a non-`None` direction, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sorter {
    column: Option<ColumnKey>,
    direction: SortDirection,
}

impl Sorter {
    pub fn new(column: Option<ColumnKey>, direction: SortDirection) -> Self {
        match column {
            Some(column) if direction != SortDirection::None => Self {
                column: Some(column),
                direction,
            },
            _ => Self::unsorted(),
        }
    }

    pub const fn unsorted() -> Self {
        Self {
            column: None,
            direction: SortDirection::None,
        }
    }

    pub fn ascending(column: ColumnKey) -> Self {
        Self::new(Some(column), SortDirection::Ascending)
    }

    pub fn descending(column: ColumnKey) -> Self {
        Self::new(Some(column), SortDirection::Descending)
    }

    pub fn column(&self) -> Option<ColumnKey> {
        self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn is_active(&self) -> bool {
        self.column.is_some()
    }
}

/// Per-column filter values. Empty values are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnFilters(BTreeMap<ColumnKey, String>);

impl ColumnFilters {
    pub fn get(&self, column: ColumnKey) -> Option<&str> {
        self.0.get(&column).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnKey, &str)> {
        self.0.iter().map(|(column, value)| (*column, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set(&mut self, column: ColumnKey, value: String) {
        if value.is_empty() {
            self.0.remove(&column);
        } else {
            self.0.insert(column, value);
        }
    }
}

impl FromIterator<(ColumnKey, String)> for ColumnFilters {
    fn from_iter<I: IntoIterator<Item = (ColumnKey, String)>>(iter: I) -> Self {
        let mut filters = ColumnFilters::default();
        for (column, value) in iter {
            filters.set(column, value);
        }
        filters
    }
}

/// Values a freshly mounted view falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDefaults {
    pub page_size: u32,
    pub sorter: Sorter,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            sorter: Sorter::descending(ColumnKey::PublishedDate),
        }
    }
}

/// A single user-level change to the requested view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Page(u32),
    PageSize(u32),
    ColumnFilter { column: ColumnKey, value: String },
    ColumnFilters(ColumnFilters),
    GlobalFilter(String),
    Sorter(Sorter),
}

/// What the user currently wants to see.
///
/// Values are never edited in place: every transition returns a new state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: u32,
    page_size: u32,
    column_filters: ColumnFilters,
    global_filter: String,
    sorter: Sorter,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::from_defaults(&QueryDefaults::default())
    }
}

impl QueryState {
    pub fn from_defaults(defaults: &QueryDefaults) -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: defaults.page_size.max(1),
            column_filters: ColumnFilters::default(),
            global_filter: String::new(),
            sorter: defaults.sorter,
        }
    }

    pub(crate) fn from_parts(
        page: u32,
        page_size: u32,
        column_filters: ColumnFilters,
        global_filter: String,
        sorter: Sorter,
    ) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            column_filters,
            global_filter,
            sorter,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn column_filters(&self) -> &ColumnFilters {
        &self.column_filters
    }

    pub fn global_filter(&self) -> &str {
        &self.global_filter
    }

    pub fn sorter(&self) -> Sorter {
        self.sorter
    }

    /// Moves to page `page` (clamped to 1). The only transition that keeps
    /// the current page semantics instead of resetting to the first page.
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_page_size(&self, page_size: u32) -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: page_size.max(1),
            ..self.clone()
        }
    }

    /// Sets or, for an empty `value`, removes the filter on `column`.
    #[must_use]
    pub fn with_column_filter(&self, column: ColumnKey, value: impl Into<String>) -> Self {
        let mut column_filters = self.column_filters.clone();
        column_filters.set(column, value.into());
        Self {
            page: DEFAULT_PAGE,
            column_filters,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_column_filters(&self, column_filters: ColumnFilters) -> Self {
        Self {
            page: DEFAULT_PAGE,
            column_filters,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_global_filter(&self, text: impl Into<String>) -> Self {
        Self {
            page: DEFAULT_PAGE,
            global_filter: text.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_sorter(&self, sorter: Sorter) -> Self {
        Self {
            page: DEFAULT_PAGE,
            sorter,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn apply(&self, transition: Transition) -> Self {
        match transition {
            Transition::Page(page) => self.with_page(page),
            Transition::PageSize(page_size) => self.with_page_size(page_size),
            Transition::ColumnFilter { column, value } => self.with_column_filter(column, value),
            Transition::ColumnFilters(filters) => self.with_column_filters(filters),
            Transition::GlobalFilter(text) => self.with_global_filter(text),
            Transition::Sorter(sorter) => self.with_sorter(sorter),
        }
    }
}

/// Splits a comma-joined multi-select filter value into its selected options.
pub fn split_selection(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins selected options into the comma-joined multi-select filter value.
///
/// Options that contain a comma cannot be represented and are skipped.
pub fn join_selection<I, S>(options: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut selected = Vec::new();
    for option in options {
        let option = option.as_ref().trim();
        if option.is_empty() {
            continue;
        }
        if option.contains(',') {
            warn!(option, "skipping multi-select option containing a comma");
            continue;
        }
        selected.push(option.to_string());
    }
    selected.join(",")
}

#[cfg(test)]
#[path = "tests/query_state_tests.rs"]
mod tests;
