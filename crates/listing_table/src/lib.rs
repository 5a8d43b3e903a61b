//! Remote-synchronized listing table: a canonical query state kept in step
//! with the address bar and a paginated REST backend.

pub mod backend;
pub mod columns;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod navigator;
pub mod orchestrator;
pub mod query_state;
pub mod request_builder;
pub mod url_codec;

pub use backend::{HttpListingsBackend, ListingsBackend, ResultPage, SimilarRecords};
pub use columns::{ColumnSpec, FilterKind, RemoteOptionSet, COLUMNS};
pub use config::{load_settings, TableSettings};
pub use controller::{TableAction, TableController, TableView};
pub use error::FetchError;
pub use events::TableEvent;
pub use navigator::{MemoryNavigator, Navigator};
pub use orchestrator::{FetchOrchestrator, FetchOutcome, FetchStatus, FetchTicket};
pub use query_state::{
    join_selection, split_selection, ColumnFilters, QueryDefaults, QueryState, Sorter, Transition,
};
pub use request_builder::{build_list_request, ListRequest};
pub use url_codec::UrlCodec;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
