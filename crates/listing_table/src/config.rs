use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use shared::domain::{ColumnKey, SortDirection};
use tracing::debug;

use crate::query_state::{QueryDefaults, Sorter, DEFAULT_PAGE_SIZE};

pub const SETTINGS_FILE: &str = "listings.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSettings {
    pub api_root: String,
    pub resource: String,
    pub detail_route_prefix: String,
    pub default_page_size: u32,
    pub default_sort_column: Option<ColumnKey>,
    pub default_sort_order: SortDirection,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            api_root: "http://127.0.0.1:8000/listings/api".into(),
            resource: "vacancies".into(),
            detail_route_prefix: "/vacancies".into(),
            default_page_size: DEFAULT_PAGE_SIZE,
            default_sort_column: Some(ColumnKey::PublishedDate),
            default_sort_order: SortDirection::Descending,
        }
    }
}

impl TableSettings {
    pub fn query_defaults(&self) -> QueryDefaults {
        QueryDefaults {
            page_size: self.default_page_size.max(1),
            sorter: Sorter::new(self.default_sort_column, self.default_sort_order),
        }
    }
}

/// Defaults, then `listings.toml` in the working directory, then environment.
pub fn load_settings() -> TableSettings {
    let mut settings = TableSettings::default();

    if let Ok(raw) = fs::read_to_string(SETTINGS_FILE) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file_values(&mut settings, &file_cfg);
        }
    }
    apply_env_values(&mut settings, |key| std::env::var(key).ok());

    settings
}

/// Loads an explicit settings file. Unlike [`load_settings`], a missing or
/// malformed file is an error.
pub fn load_settings_from(path: &Path) -> anyhow::Result<TableSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    let file_cfg = toml::from_str::<HashMap<String, String>>(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))?;

    let mut settings = TableSettings::default();
    apply_file_values(&mut settings, &file_cfg);
    apply_env_values(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file_values(settings: &mut TableSettings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("api_root") {
        settings.api_root = normalize_api_root(v);
    }
    if let Some(v) = file_cfg.get("resource") {
        settings.resource = v.trim().trim_matches('/').to_string();
    }
    if let Some(v) = file_cfg.get("detail_route_prefix") {
        settings.detail_route_prefix = v.trim().trim_end_matches('/').to_string();
    }
    if let Some(v) = file_cfg.get("default_page_size") {
        apply_page_size(settings, v);
    }
    if let Some(v) = file_cfg.get("default_sort_column") {
        apply_sort_column(settings, v);
    }
    if let Some(v) = file_cfg.get("default_sort_order") {
        if let Some(order) = SortDirection::from_token(v.trim()) {
            settings.default_sort_order = order;
        }
    }
}

fn apply_env_values(settings: &mut TableSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("LISTINGS_API_ROOT") {
        settings.api_root = normalize_api_root(&v);
    }
    if let Some(v) = lookup("APP__API_ROOT") {
        settings.api_root = normalize_api_root(&v);
    }

    if let Some(v) = lookup("LISTINGS_RESOURCE") {
        settings.resource = v.trim().trim_matches('/').to_string();
    }

    if let Some(v) = lookup("APP__DETAIL_ROUTE_PREFIX") {
        settings.detail_route_prefix = v.trim().trim_end_matches('/').to_string();
    }

    if let Some(v) = lookup("APP__DEFAULT_PAGE_SIZE") {
        apply_page_size(settings, &v);
    }
}

fn apply_page_size(settings: &mut TableSettings, raw: &str) {
    match raw.trim().parse::<u32>() {
        Ok(parsed) if parsed > 0 => settings.default_page_size = parsed,
        _ => debug!(value = raw, "ignoring invalid default page size"),
    }
}

fn apply_sort_column(settings: &mut TableSettings, raw: &str) {
    let raw = raw.trim();
    if raw.is_empty() {
        settings.default_sort_column = None;
        return;
    }
    match raw.parse::<ColumnKey>() {
        Ok(column) => settings.default_sort_column = Some(column),
        Err(err) => debug!(%err, "ignoring invalid default sort column"),
    }
}

pub fn normalize_api_root(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return TableSettings::default().api_root;
    }
    trimmed.to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
