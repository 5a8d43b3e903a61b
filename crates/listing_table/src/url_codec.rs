//! Address-bar representation of a [`QueryState`].

use std::collections::HashMap;

use shared::domain::{ColumnKey, SortDirection};
use tracing::debug;
use url::{form_urlencoded, Url};

use crate::query_state::{ColumnFilters, QueryDefaults, QueryState, Sorter, DEFAULT_PAGE};

pub const PAGE_PARAM: &str = "page";
pub const PAGE_SIZE_PARAM: &str = "pageSize";
pub const GLOBAL_FILTER_PARAM: &str = "globalFilter";
pub const SORT_COLUMN_PARAM: &str = "sortColumn";
pub const SORT_ORDER_PARAM: &str = "sortOrder";
pub const FILTER_PARAM_PREFIX: &str = "filter_";

#[derive(Debug, Clone, Default)]
pub struct UrlCodec {
    defaults: QueryDefaults,
}

impl UrlCodec {
    pub fn new(defaults: QueryDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &QueryDefaults {
        &self.defaults
    }

    /// Serializes `state` into a query string without the leading `?`.
    ///
    /// Pagination and sort parameters are always written, even when empty, so
    /// a shared link pins the exact view; `globalFilter` and column filters
    /// are only written when set.
    pub fn encode(&self, state: &QueryState) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair(PAGE_PARAM, &state.page().to_string());
        query.append_pair(PAGE_SIZE_PARAM, &state.page_size().to_string());
        if !state.global_filter().is_empty() {
            query.append_pair(GLOBAL_FILTER_PARAM, state.global_filter());
        }

        let sorter = state.sorter();
        query.append_pair(
            SORT_COLUMN_PARAM,
            sorter.column().map(ColumnKey::as_str).unwrap_or_default(),
        );
        query.append_pair(SORT_ORDER_PARAM, sorter.direction().token());

        for (column, value) in state.column_filters().iter() {
            query.append_pair(&format!("{FILTER_PARAM_PREFIX}{column}"), value);
        }
        query.finish()
    }

    /// Parses a query string (with or without the leading `?`).
    ///
    /// Never fails: malformed values fall back to defaults and unknown
    /// parameters are ignored. When a parameter repeats, the first one wins.
    pub fn decode(&self, query: &str) -> QueryState {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params: HashMap<String, String> = HashMap::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }

        let page = match params.get(PAGE_PARAM) {
            Some(raw) => parse_positive(PAGE_PARAM, raw).unwrap_or(DEFAULT_PAGE),
            None => DEFAULT_PAGE,
        };
        let page_size = match params.get(PAGE_SIZE_PARAM) {
            Some(raw) => {
                parse_positive(PAGE_SIZE_PARAM, raw).unwrap_or(self.defaults.page_size)
            }
            None => self.defaults.page_size,
        };
        let global_filter = params.remove(GLOBAL_FILTER_PARAM).unwrap_or_default();
        let sorter = self.decode_sorter(
            params.get(SORT_COLUMN_PARAM).map(String::as_str),
            params.get(SORT_ORDER_PARAM).map(String::as_str),
        );

        let column_filters: ColumnFilters = params
            .into_iter()
            .filter_map(|(key, value)| {
                let column = key.strip_prefix(FILTER_PARAM_PREFIX)?;
                match column.parse::<ColumnKey>() {
                    Ok(column) => Some((column, value)),
                    Err(err) => {
                        debug!(%err, "ignoring unknown filter parameter");
                        None
                    }
                }
            })
            .collect();

        QueryState::from_parts(page, page_size, column_filters, global_filter, sorter)
    }

    /// Like [`UrlCodec::decode`] but accepts a full URL as well as a bare
    /// query string.
    pub fn decode_url(&self, raw: &str) -> QueryState {
        match Url::parse(raw) {
            Ok(url) => self.decode(url.query().unwrap_or_default()),
            Err(_) => {
                let query = raw.split_once('?').map_or(raw, |(_, query)| query);
                self.decode(query)
            }
        }
    }

    // An absent parameter falls back to the configured default; an explicitly
    // empty one means "unsorted".
    fn decode_sorter(&self, column: Option<&str>, order: Option<&str>) -> Sorter {
        if column.is_none() && order.is_none() {
            return self.defaults.sorter;
        }

        let column = match column {
            None => self.defaults.sorter.column(),
            Some("") => None,
            Some(raw) => match raw.parse::<ColumnKey>() {
                Ok(column) => Some(column),
                Err(err) => {
                    debug!(%err, "ignoring unknown sort column");
                    None
                }
            },
        };
        let direction = match order {
            None => self.defaults.sorter.direction(),
            Some(raw) => SortDirection::from_token(raw).unwrap_or_else(|| {
                debug!(order = raw, "ignoring unknown sort order");
                SortDirection::None
            }),
        };
        Sorter::new(column, direction)
    }
}

fn parse_positive(param: &str, raw: &str) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            debug!(param, value = raw, "falling back to default for malformed value");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/url_codec_tests.rs"]
mod tests;
