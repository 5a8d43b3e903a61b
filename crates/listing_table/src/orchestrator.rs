//! Request lifecycle of the list endpoint.
//!
//! Every issued request gets a strictly increasing sequence number. A response
//! is only committed when its number is still the highest one issued, so a
//! slow answer to an older query can never overwrite a newer one. Superseded
//! requests are left to finish and are discarded on arrival.

use std::{collections::HashMap, sync::Arc};

use tokio::{
    sync::{broadcast, Mutex},
    task::{AbortHandle, JoinHandle},
};
use tracing::{debug, info, warn};

use crate::{
    backend::{ListingsBackend, ResultPage},
    error::FetchError,
    events::TableEvent,
    request_builder::ListRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// How a single issued request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Committed { seq: u64, total_count: u64 },
    Failed { seq: u64, error: FetchError },
    /// A newer request was issued before this one resolved.
    Stale { seq: u64, current: u64 },
    /// The view was unmounted before the response could be applied.
    Disposed { seq: u64 },
}

impl FetchOutcome {
    pub fn seq(&self) -> u64 {
        match self {
            FetchOutcome::Committed { seq, .. }
            | FetchOutcome::Failed { seq, .. }
            | FetchOutcome::Stale { seq, .. }
            | FetchOutcome::Disposed { seq } => *seq,
        }
    }
}

/// Handle to one issued request.
#[derive(Debug)]
pub struct FetchTicket {
    seq: u64,
    handle: Option<JoinHandle<FetchOutcome>>,
}

impl FetchTicket {
    pub(crate) fn disposed(seq: u64) -> Self {
        Self { seq, handle: None }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Waits until the request has been committed, rejected or discarded.
    pub async fn settled(self) -> FetchOutcome {
        let seq = self.seq;
        match self.handle {
            Some(handle) => handle.await.unwrap_or(FetchOutcome::Disposed { seq }),
            None => FetchOutcome::Disposed { seq },
        }
    }
}

/// Read-only view of the orchestrator, safe to hand to the renderer.
#[derive(Debug, Clone, Default)]
pub struct FetchSnapshot {
    pub status: FetchStatus,
    pub error: Option<String>,
    pub page: Arc<ResultPage>,
    pub latest_seq: u64,
}

impl FetchSnapshot {
    pub fn loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }
}

#[derive(Default)]
struct OrchestratorState {
    issued: u64,
    status: FetchStatus,
    error: Option<String>,
    committed: Arc<ResultPage>,
    disposed: bool,
    in_flight: HashMap<u64, AbortHandle>,
}

pub struct FetchOrchestrator {
    backend: Arc<dyn ListingsBackend>,
    state: Arc<Mutex<OrchestratorState>>,
    events: broadcast::Sender<TableEvent>,
}

impl FetchOrchestrator {
    pub fn new(backend: Arc<dyn ListingsBackend>, events: broadcast::Sender<TableEvent>) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(OrchestratorState::default())),
            events,
        }
    }

    /// Issues `request` as the newest request and enters `Loading`.
    ///
    /// Does not wait for or cancel earlier requests.
    pub async fn issue(&self, request: ListRequest) -> FetchTicket {
        let mut guard = self.state.lock().await;
        if guard.disposed {
            debug!("ignoring fetch request on disposed view");
            return FetchTicket::disposed(guard.issued);
        }

        guard.issued += 1;
        guard.status = FetchStatus::Loading;
        let seq = guard.issued;
        let _ = self.events.send(TableEvent::FetchStarted { seq });

        let backend = Arc::clone(&self.backend);
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        // Spawned while the lock is held so the task cannot settle before its
        // abort handle is registered.
        let handle = tokio::spawn(async move {
            let result = backend.fetch_page(&request).await;
            settle(&state, &events, seq, result).await
        });
        guard.in_flight.insert(seq, handle.abort_handle());
        drop(guard);

        debug!(seq, "issued listing fetch");
        FetchTicket {
            seq,
            handle: Some(handle),
        }
    }

    pub async fn snapshot(&self) -> FetchSnapshot {
        let guard = self.state.lock().await;
        FetchSnapshot {
            status: guard.status,
            error: guard.error.clone(),
            page: Arc::clone(&guard.committed),
            latest_seq: guard.issued,
        }
    }

    /// Neutralizes every pending request. Later calls to [`issue`] are no-ops.
    ///
    /// [`issue`]: FetchOrchestrator::issue
    pub async fn dispose(&self) {
        let mut guard = self.state.lock().await;
        guard.disposed = true;
        let pending = guard.in_flight.len();
        for (_, handle) in guard.in_flight.drain() {
            handle.abort();
        }
        info!(pending, "disposed listing fetch orchestrator");
    }
}

async fn settle(
    state: &Mutex<OrchestratorState>,
    events: &broadcast::Sender<TableEvent>,
    seq: u64,
    result: Result<ResultPage, FetchError>,
) -> FetchOutcome {
    let mut guard = state.lock().await;
    guard.in_flight.remove(&seq);

    if guard.disposed {
        debug!(seq, "dropping response for disposed view");
        return FetchOutcome::Disposed { seq };
    }
    if seq != guard.issued {
        let current = guard.issued;
        debug!(seq, current, "discarding stale listing response");
        return FetchOutcome::Stale { seq, current };
    }

    match result {
        Ok(page) => {
            let total_count = page.total_count;
            guard.committed = Arc::new(page);
            guard.status = FetchStatus::Succeeded;
            guard.error = None;

            info!(seq, total = total_count, "committed listing page");
            let _ = events.send(TableEvent::PageCommitted { seq, total_count });
            FetchOutcome::Committed { seq, total_count }
        }
        Err(error) => {
            // The committed page stays in place; only the message changes.
            let message = error.user_message();
            guard.status = FetchStatus::Failed;
            guard.error = Some(message.clone());

            warn!(seq, %error, "listing fetch failed");
            let _ = events.send(TableEvent::FetchFailed { seq, message });
            FetchOutcome::Failed { seq, error }
        }
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
