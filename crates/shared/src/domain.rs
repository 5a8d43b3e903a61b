use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Columns of the listing table. Every column is sortable and filterable;
/// the declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKey {
    Title,
    Pricetype,
    Price,
    ChatMinimaleWaarde,
    Particulier,
    PublishedDate,
}

impl ColumnKey {
    pub const ALL: [ColumnKey; 6] = [
        ColumnKey::Title,
        ColumnKey::Pricetype,
        ColumnKey::Price,
        ColumnKey::ChatMinimaleWaarde,
        ColumnKey::Particulier,
        ColumnKey::PublishedDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKey::Title => "title",
            ColumnKey::Pricetype => "pricetype",
            ColumnKey::Price => "price",
            ColumnKey::ChatMinimaleWaarde => "chat_minimale_waarde",
            ColumnKey::Particulier => "particulier",
            ColumnKey::PublishedDate => "published_date",
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown column key: {0}")]
pub struct UnknownColumn(pub String);

impl FromStr for ColumnKey {
    type Err = UnknownColumn;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ColumnKey::ALL
            .into_iter()
            .find(|column| column.as_str() == raw)
            .ok_or_else(|| UnknownColumn(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
    #[default]
    None,
}

impl SortDirection {
    /// Token used both in the address bar and on the wire. `None` has no token.
    pub fn token(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
            SortDirection::None => "",
        }
    }

    pub fn from_token(raw: &str) -> Option<Self> {
        match raw {
            "asc" => Some(SortDirection::Ascending),
            "desc" => Some(SortDirection::Descending),
            "" => Some(SortDirection::None),
            _ => None,
        }
    }
}

/// Record identifier as delivered by the backend: either numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Int(value)
    }
}
