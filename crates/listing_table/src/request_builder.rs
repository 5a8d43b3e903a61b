//! Maps a [`QueryState`] onto the query parameters of the list endpoint.

use shared::domain::ColumnKey;
use url::form_urlencoded;

use crate::query_state::QueryState;

const WIRE_PAGE: &str = "page";
const WIRE_PAGE_SIZE: &str = "page_size";
const WIRE_GLOBAL_FILTER: &str = "global_filter";
const WIRE_SORT_BY: &str = "sort_by";
const WIRE_SORT_ORDER: &str = "sort_order";

/// Wire parameter carrying the filter for `column`.
///
/// Only columns listed here are ever forwarded to the server.
pub fn filter_param(column: ColumnKey) -> &'static str {
    match column {
        ColumnKey::Title => "title_like",
        ColumnKey::Pricetype => "col_pricetype",
        ColumnKey::Price => "col_price",
        ColumnKey::ChatMinimaleWaarde => "col_chat_minimale_waarde",
        ColumnKey::Particulier => "col_particulier",
        ColumnKey::PublishedDate => "col_published_date",
    }
}

/// Ordered query parameters for one list request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListRequest {
    params: Vec<(&'static str, String)>,
}

impl ListRequest {
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter().map(|(key, value)| (*key, value.as_str())))
            .finish()
    }

    fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.params.push((name, value.into()));
    }
}

pub fn build_list_request(state: &QueryState) -> ListRequest {
    let mut request = ListRequest::default();
    request.push(WIRE_PAGE, state.page().to_string());
    request.push(WIRE_PAGE_SIZE, state.page_size().to_string());

    if !state.global_filter().is_empty() {
        request.push(WIRE_GLOBAL_FILTER, state.global_filter());
    }

    for (column, value) in state.column_filters().iter() {
        request.push(filter_param(column), value);
    }

    let sorter = state.sorter();
    if let Some(column) = sorter.column() {
        request.push(WIRE_SORT_BY, column.as_str());
        request.push(WIRE_SORT_ORDER, sorter.direction().token());
    }

    request
}

#[cfg(test)]
#[path = "tests/request_builder_tests.rs"]
mod tests;
