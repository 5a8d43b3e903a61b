use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use serde_json::json;
use shared::{domain::RecordId, protocol::Record};
use tokio::sync::oneshot;

use crate::{
    backend::{ListingsBackend, ResultPage, SimilarRecords},
    error::FetchError,
    query_state::QueryState,
    request_builder::{build_list_request, ListRequest},
};

type PageResult = Result<ResultPage, FetchError>;

/// In-memory backend whose list responses can be held back per request and
/// released in any order.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    held: Mutex<HashMap<String, oneshot::Receiver<PageResult>>>,
    immediate: Mutex<Option<PageResult>>,
    options: Mutex<HashMap<String, Result<Vec<String>, FetchError>>>,
    options_never_answer: AtomicBool,
    requests: Mutex<Vec<ListRequest>>,
}

impl ScriptedBackend {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// The next request built from `state` waits until the returned sender fires.
    pub(crate) fn hold(&self, state: &QueryState) -> oneshot::Sender<PageResult> {
        let (tx, rx) = oneshot::channel();
        self.held
            .lock()
            .unwrap()
            .insert(build_list_request(state).to_query_string(), rx);
        tx
    }

    /// Answer for requests that are not held.
    pub(crate) fn respond_with(&self, result: PageResult) {
        *self.immediate.lock().unwrap() = Some(result);
    }

    pub(crate) fn set_options(&self, field: &str, result: Result<Vec<String>, FetchError>) {
        self.options
            .lock()
            .unwrap()
            .insert(field.to_string(), result);
    }

    /// Option endpoints stop answering; their futures stay pending forever.
    pub(crate) fn stall_options(&self) {
        self.options_never_answer.store(true, Ordering::SeqCst);
    }

    pub(crate) fn requests(&self) -> Vec<ListRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingsBackend for ScriptedBackend {
    async fn fetch_page(&self, request: &ListRequest) -> Result<ResultPage, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        let held = self
            .held
            .lock()
            .unwrap()
            .remove(&request.to_query_string());
        match held {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Network("gate dropped".into()))),
            None => self
                .immediate
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Ok(ResultPage::default())),
        }
    }

    async fn fetch_options(&self, field: &str) -> Result<Vec<String>, FetchError> {
        if self.options_never_answer.load(Ordering::SeqCst) {
            return std::future::pending().await;
        }
        self.options
            .lock()
            .unwrap()
            .get(field)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn fetch_record(&self, id: &RecordId) -> Result<Record, FetchError> {
        Ok(record(id.clone(), "scripted"))
    }

    async fn fetch_similar(&self, record: &Record) -> Result<SimilarRecords, FetchError> {
        record.id.as_ref().ok_or(FetchError::MissingId)?;
        Ok(SimilarRecords::default())
    }
}

pub(crate) fn record(id: impl Into<RecordId>, title: &str) -> Record {
    let id: RecordId = id.into();
    let value = json!({ "id": id, "title": title });
    serde_json::from_value(value).expect("record")
}

pub(crate) fn page(titles: &[&str], total_count: u64) -> ResultPage {
    ResultPage {
        rows: titles
            .iter()
            .enumerate()
            .map(|(index, title)| record(index as i64 + 1, title))
            .collect(),
        total_count,
    }
}
