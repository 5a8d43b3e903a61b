use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use listing_table::{
    config::{load_settings_from, normalize_api_root},
    load_settings, FetchOutcome, HttpListingsBackend, ListingsBackend, MemoryNavigator, Navigator,
    Sorter, TableAction, TableController, TableSettings,
};
use serde_json::json;
use shared::domain::{ColumnKey, RecordId, SortDirection};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Cli {
    /// Settings file; defaults to `listings.toml` in the working directory.
    #[arg(long)]
    settings: Option<PathBuf>,
    #[arg(long)]
    api_root: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mounts the table on an address-bar query and applies the given edits.
    List {
        /// Initial query string, e.g. `?page=2&sortColumn=price&sortOrder=asc`.
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long)]
        page_size: Option<u32>,
        /// Column filter as `column=value`; repeatable.
        #[arg(long = "filter")]
        filters: Vec<String>,
        #[arg(long)]
        search: Option<String>,
        /// `column:asc`, `column:desc` or `none`.
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        page: Option<u32>,
        /// Clicks the row at this zero-based index after loading.
        #[arg(long)]
        open: Option<usize>,
    },
    /// Fetches one record and its related records.
    Detail { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();

    let settings = resolve_settings(cli.settings.as_deref(), cli.api_root.as_deref())?;
    let backend = Arc::new(HttpListingsBackend::new(&settings)?);

    match cli.command {
        Command::List {
            url,
            page_size,
            filters,
            search,
            sort,
            page,
            open,
        } => {
            let mut actions = Vec::new();
            if let Some(page_size) = page_size {
                actions.push(TableAction::PageSizeChanged(page_size));
            }
            for raw in &filters {
                let (column, value) = parse_filter(raw)?;
                actions.push(TableAction::ColumnFilterEdited { column, value });
            }
            if let Some(text) = search {
                actions.push(TableAction::GlobalSearchEdited(text));
            }
            if let Some(raw) = sort {
                actions.push(TableAction::SorterClicked(parse_sorter(&raw)?));
            }
            // Last, since every other edit returns to the first page.
            if let Some(page) = page {
                actions.push(TableAction::PageClicked(page));
            }

            let navigator = Arc::new(MemoryNavigator::new(url.clone()));
            let controller = TableController::new(
                settings,
                backend,
                Arc::clone(&navigator) as Arc<dyn Navigator>,
            );
            list(&controller, &navigator, &url, actions, open).await?;
            controller.unmount().await;
        }
        Command::Detail { id } => {
            let id = parse_record_id(&id);
            let record = backend.fetch_record(&id).await?;
            println!("{}", serde_json::to_string(&record)?);
            let similar = backend.fetch_similar(&record).await?;
            if let Some(message) = &similar.message {
                println!("{}", json!({ "message": message }));
            }
            for related in &similar.records {
                println!("{}", serde_json::to_string(related)?);
            }
        }
    }

    Ok(())
}

async fn list(
    controller: &Arc<TableController>,
    navigator: &MemoryNavigator,
    url: &str,
    actions: Vec<TableAction>,
    open: Option<usize>,
) -> Result<()> {
    let mut ticket = controller.mount(url).await;
    for action in actions {
        if let Some(next) = controller.dispatch(action).await {
            ticket = next;
        }
    }

    if let FetchOutcome::Failed { error, .. } = ticket.settled().await {
        bail!(error.user_message());
    }

    let view = controller.view().await;
    println!(
        "{}",
        json!({
            "url": navigator.query(),
            "page": view.query.page(),
            "page_size": view.query.page_size(),
            "total_count": view.total_count,
            "total_pages": view.total_pages,
        })
    );
    for row in &view.rows {
        println!("{}", serde_json::to_string(row)?);
    }

    if let Some(index) = open {
        let row = view
            .rows
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow!("no row at index {index}"))?;
        controller.dispatch(TableAction::RowClicked(row)).await;
        if let Some(path) = navigator.visited().last() {
            println!("{}", json!({ "navigate": path }));
        }
    }
    Ok(())
}

/// Settings file (or the layered defaults), then the `--api-root` flag.
fn resolve_settings(
    settings_file: Option<&Path>,
    api_root: Option<&str>,
) -> Result<TableSettings> {
    let mut settings = match settings_file {
        Some(path) => load_settings_from(path)?,
        None => load_settings(),
    };
    if let Some(api_root) = api_root {
        settings.api_root = normalize_api_root(api_root);
    }
    Ok(settings)
}

fn parse_filter(raw: &str) -> Result<(ColumnKey, String)> {
    let (column, value) = raw
        .split_once('=')
        .with_context(|| format!("filter '{raw}' must look like column=value"))?;
    Ok((column.trim().parse()?, value.to_string()))
}

fn parse_sorter(raw: &str) -> Result<Sorter> {
    if raw.eq_ignore_ascii_case("none") {
        return Ok(Sorter::unsorted());
    }
    let (column, order) = raw.split_once(':').unwrap_or((raw, "asc"));
    let direction = SortDirection::from_token(order)
        .with_context(|| format!("unknown sort order '{order}'"))?;
    Ok(Sorter::new(Some(column.trim().parse()?), direction))
}

fn parse_record_id(raw: &str) -> RecordId {
    raw.parse::<i64>()
        .map(RecordId::Int)
        .unwrap_or_else(|_| RecordId::Text(raw.to_string()))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
