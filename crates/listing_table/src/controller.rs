//! Wires UI events to [`QueryState`] transitions, the address bar and the
//! fetch orchestrator.

use std::{collections::HashMap, sync::Arc};

use futures::future::join_all;
use shared::{domain::ColumnKey, protocol::Record};
use tokio::{
    sync::{broadcast, Mutex, RwLock},
    task::AbortHandle,
};
use tracing::{debug, info, warn};

use crate::{
    backend::ListingsBackend,
    columns::{multi_select_columns, ColumnSpec, RemoteOptionSet, COLUMNS},
    config::TableSettings,
    events::TableEvent,
    navigator::Navigator,
    orchestrator::{FetchOrchestrator, FetchTicket},
    query_state::{ColumnFilters, QueryState, Sorter, Transition},
    request_builder::build_list_request,
    url_codec::UrlCodec,
};

/// UI events the table can raise.
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    PageClicked(u32),
    PageSizeChanged(u32),
    ColumnFilterEdited { column: ColumnKey, value: String },
    ColumnFiltersReplaced(ColumnFilters),
    GlobalSearchEdited(String),
    SorterClicked(Sorter),
    RowClicked(Record),
    /// The address bar changed underneath the view (back/forward, manual edit).
    UrlChanged(String),
    Refresh,
}

impl TableAction {
    fn name(&self) -> &'static str {
        match self {
            TableAction::PageClicked(_) => "page_clicked",
            TableAction::PageSizeChanged(_) => "page_size_changed",
            TableAction::ColumnFilterEdited { .. } => "column_filter_edited",
            TableAction::ColumnFiltersReplaced(_) => "column_filters_replaced",
            TableAction::GlobalSearchEdited(_) => "global_search_edited",
            TableAction::SorterClicked(_) => "sorter_clicked",
            TableAction::RowClicked(_) => "row_clicked",
            TableAction::UrlChanged(_) => "url_changed",
            TableAction::Refresh => "refresh",
        }
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct TableView {
    pub query: QueryState,
    pub rows: Vec<Record>,
    pub total_count: u64,
    pub total_pages: u64,
    pub loading: bool,
    pub error: Option<String>,
    pub columns: &'static [ColumnSpec],
    pub options: HashMap<ColumnKey, RemoteOptionSet>,
}

pub fn total_pages(total_count: u64, page_size: u32) -> u64 {
    if page_size > 0 {
        total_count.div_ceil(u64::from(page_size))
    } else {
        1
    }
}

struct ViewState {
    query: QueryState,
    disposed: bool,
    options_task: Option<AbortHandle>,
}

pub struct TableController {
    settings: TableSettings,
    codec: UrlCodec,
    backend: Arc<dyn ListingsBackend>,
    navigator: Arc<dyn Navigator>,
    orchestrator: FetchOrchestrator,
    state: Mutex<ViewState>,
    options: RwLock<HashMap<ColumnKey, RemoteOptionSet>>,
    events: broadcast::Sender<TableEvent>,
}

impl TableController {
    pub fn new(
        settings: TableSettings,
        backend: Arc<dyn ListingsBackend>,
        navigator: Arc<dyn Navigator>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        let codec = UrlCodec::new(settings.query_defaults());
        let query = QueryState::from_defaults(codec.defaults());
        Arc::new(Self {
            orchestrator: FetchOrchestrator::new(Arc::clone(&backend), events.clone()),
            settings,
            codec,
            backend,
            navigator,
            state: Mutex::new(ViewState {
                query,
                disposed: false,
                options_task: None,
            }),
            options: RwLock::new(HashMap::new()),
            events,
        })
    }

    pub fn codec(&self) -> &UrlCodec {
        &self.codec
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TableEvent> {
        self.events.subscribe()
    }

    /// Adopts the initial address-bar query and issues the first fetch. The
    /// multi-select option sets load in the background.
    pub async fn mount(self: &Arc<Self>, initial_query: &str) -> FetchTicket {
        let initial = self.codec.decode_url(initial_query);
        let mut guard = self.state.lock().await;
        if guard.disposed {
            debug!("ignoring mount of unmounted listing table");
            return FetchTicket::disposed(self.orchestrator.snapshot().await.latest_seq);
        }
        info!(
            page = initial.page(),
            page_size = initial.page_size(),
            "mounting listing table"
        );
        let ticket = self.commit(&mut guard, initial).await;

        let controller = Arc::clone(self);
        let task = tokio::spawn(async move { controller.load_options().await });
        if let Some(previous) = guard.options_task.replace(task.abort_handle()) {
            previous.abort();
        }
        ticket
    }

    /// Applies one UI event. Returns the ticket of the fetch it triggered, if any.
    ///
    /// Does nothing once the table is unmounted.
    pub async fn dispatch(&self, action: TableAction) -> Option<FetchTicket> {
        debug!(action = action.name(), "table action");
        let transition = match action {
            TableAction::PageClicked(page) => Transition::Page(page),
            TableAction::PageSizeChanged(page_size) => Transition::PageSize(page_size),
            TableAction::ColumnFilterEdited { column, value } => {
                Transition::ColumnFilter { column, value }
            }
            TableAction::ColumnFiltersReplaced(filters) => Transition::ColumnFilters(filters),
            TableAction::GlobalSearchEdited(text) => Transition::GlobalFilter(text),
            TableAction::SorterClicked(sorter) => Transition::Sorter(sorter),
            TableAction::RowClicked(record) => {
                if !self.state.lock().await.disposed {
                    self.open_record(&record);
                }
                return None;
            }
            TableAction::UrlChanged(raw) => return self.follow_url(&raw).await,
            TableAction::Refresh => {
                let guard = self.state.lock().await;
                if guard.disposed {
                    return None;
                }
                return Some(self.orchestrator.issue(build_list_request(&guard.query)).await);
            }
        };

        let mut guard = self.state.lock().await;
        if guard.disposed {
            debug!("ignoring action on unmounted listing table");
            return None;
        }
        let next = guard.query.apply(transition);
        Some(self.commit(&mut guard, next).await)
    }

    pub async fn query(&self) -> QueryState {
        self.state.lock().await.query.clone()
    }

    pub async fn option_set(&self, column: ColumnKey) -> Option<RemoteOptionSet> {
        self.options.read().await.get(&column).cloned()
    }

    pub async fn view(&self) -> TableView {
        let query = self.query().await;
        let snapshot = self.orchestrator.snapshot().await;
        let options = self.options.read().await.clone();
        TableView {
            total_pages: total_pages(snapshot.page.total_count, query.page_size()),
            total_count: snapshot.page.total_count,
            rows: snapshot.page.rows.clone(),
            loading: snapshot.loading(),
            error: snapshot.error,
            columns: &COLUMNS,
            options,
            query,
        }
    }

    /// Neutralizes pending fetches and option loads. Later actions, responses
    /// and option sets are ignored.
    pub async fn unmount(&self) {
        let mut guard = self.state.lock().await;
        guard.disposed = true;
        if let Some(task) = guard.options_task.take() {
            task.abort();
        }
        self.orchestrator.dispose().await;
        info!("unmounted listing table");
    }

    /// Fetches every multi-select option set concurrently. A failing endpoint
    /// leaves its column without options.
    pub async fn load_options(&self) {
        if self.state.lock().await.disposed {
            return;
        }
        let fetches = multi_select_columns().map(|(column, field)| {
            let backend = Arc::clone(&self.backend);
            async move { (column, field, backend.fetch_options(field).await) }
        });

        let results = join_all(fetches).await;

        let guard = self.state.lock().await;
        if guard.disposed {
            debug!("dropping filter options for unmounted listing table");
            return;
        }
        for (column, field, result) in results {
            match result {
                Ok(values) => {
                    let set = RemoteOptionSet::from_values(column, values);
                    let count = set.values().len();
                    self.options.write().await.insert(column, set);
                    debug!(%column, count, "loaded filter options");
                    let _ = self.events.send(TableEvent::OptionsLoaded { column, count });
                }
                Err(err) => {
                    warn!(%column, options_field = field, %err, "failed to load filter options");
                }
            }
        }
    }

    async fn follow_url(&self, raw: &str) -> Option<FetchTicket> {
        let decoded = self.codec.decode_url(raw);
        let mut guard = self.state.lock().await;
        if guard.disposed {
            return None;
        }
        if decoded == guard.query {
            debug!("address bar already matches table state");
            return None;
        }
        Some(self.commit(&mut guard, decoded).await)
    }

    fn open_record(&self, record: &Record) {
        let Some(id) = &record.id else {
            debug!("ignoring click on row without id");
            return;
        };
        let path = format!("{}/{id}", self.settings.detail_route_prefix);
        self.navigator.navigate(&path);
        let _ = self.events.send(TableEvent::NavigationRequested { path });
    }

    // Callers hold the state lock for the whole commit so that sequence
    // numbers are issued in the same order as state revisions.
    async fn commit(&self, current: &mut ViewState, next: QueryState) -> FetchTicket {
        let url_query = self.codec.encode(&next);
        debug!(query = %url_query, "writing table state to address bar");
        self.navigator.replace_query(&url_query);

        let request = build_list_request(&next);
        current.query = next.clone();
        let _ = self.events.send(TableEvent::QueryChanged {
            query: next,
            url_query,
        });
        self.orchestrator.issue(request).await
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
