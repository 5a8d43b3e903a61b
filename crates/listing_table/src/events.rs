//! Notifications published to the presentation layer.

use shared::domain::ColumnKey;

use crate::query_state::QueryState;

#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    QueryChanged {
        query: QueryState,
        url_query: String,
    },
    FetchStarted {
        seq: u64,
    },
    PageCommitted {
        seq: u64,
        total_count: u64,
    },
    FetchFailed {
        seq: u64,
        message: String,
    },
    OptionsLoaded {
        column: ColumnKey,
        count: usize,
    },
    NavigationRequested {
        path: String,
    },
}
