//! Column catalogue of the listing table and multi-select reference data.

use shared::domain::ColumnKey;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Text,
    /// Filter value is a comma-joined selection of [`RemoteOptionSet`] values.
    MultiSelect { options_field: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub key: ColumnKey,
    pub label: &'static str,
    pub sortable: bool,
    pub filter: FilterKind,
}

pub const COLUMNS: [ColumnSpec; 6] = [
    ColumnSpec {
        key: ColumnKey::Title,
        label: "Titel",
        sortable: true,
        filter: FilterKind::Text,
    },
    ColumnSpec {
        key: ColumnKey::Pricetype,
        label: "Pricetype",
        sortable: true,
        filter: FilterKind::MultiSelect {
            options_field: "pricetypes",
        },
    },
    ColumnSpec {
        key: ColumnKey::Price,
        label: "Prijs",
        sortable: true,
        filter: FilterKind::Text,
    },
    ColumnSpec {
        key: ColumnKey::ChatMinimaleWaarde,
        label: "Min. Prijs",
        sortable: true,
        filter: FilterKind::Text,
    },
    ColumnSpec {
        key: ColumnKey::Particulier,
        label: "Particulier",
        sortable: true,
        filter: FilterKind::MultiSelect {
            options_field: "particuliers",
        },
    },
    ColumnSpec {
        key: ColumnKey::PublishedDate,
        label: "Publicatiedatum",
        sortable: true,
        filter: FilterKind::Text,
    },
];

pub fn column_spec(key: ColumnKey) -> &'static ColumnSpec {
    // COLUMNS holds exactly one entry per key, in declaration order.
    &COLUMNS[key as usize]
}

/// Columns whose filter input is populated from a distinct-options endpoint.
pub fn multi_select_columns() -> impl Iterator<Item = (ColumnKey, &'static str)> {
    COLUMNS.iter().filter_map(|spec| match spec.filter {
        FilterKind::MultiSelect { options_field } => Some((spec.key, options_field)),
        FilterKind::Text => None,
    })
}

/// Distinct allowed values for one multi-select column. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteOptionSet {
    values: Vec<String>,
}

impl RemoteOptionSet {
    /// Builds the set from server-provided values, dropping blanks, duplicates
    /// and values that the comma-joined filter encoding cannot represent.
    pub fn from_values(column: ColumnKey, raw: Vec<String>) -> Self {
        let mut values: Vec<String> = Vec::with_capacity(raw.len());
        for value in raw {
            if value.trim().is_empty() || values.contains(&value) {
                continue;
            }
            if value.contains(',') {
                warn!(%column, option = %value, "dropping option containing a comma");
                continue;
            }
            values.push(value);
        }
        Self { values }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|candidate| candidate == value)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pairs every option with whether it is part of `filter_value`.
    pub fn selection_state<'a>(&'a self, filter_value: Option<&str>) -> Vec<(&'a str, bool)> {
        let selected = filter_value
            .map(crate::query_state::split_selection)
            .unwrap_or_default();
        self.values
            .iter()
            .map(|value| (value.as_str(), selected.iter().any(|s| s == value)))
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/columns_tests.rs"]
mod tests;
