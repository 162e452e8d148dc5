//! Grouping and ordering of the book list for display.
//!
//! # Invariants
//! - Every input book lands in exactly one group.
//! - The `Unknown` group, when present, comes first; other groups follow
//!   in ascending lexicographic order of their key text. Numeric fields are
//!   compared as text too, so rating "10" sorts before "2".
//! - Books inside a group are in ascending lexicographic `name` order; equal
//!   names keep their input order.

use crate::model::book::Book;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Label shown for books missing the grouped field.
pub const UNKNOWN_GROUP_LABEL: &str = "Unknown";

/// Field the book list is partitioned by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupCriterion {
    #[default]
    Year,
    Rating,
    Authors,
}

impl GroupCriterion {
    /// Selector order used by the UI.
    pub const ALL: [GroupCriterion; 3] = [Self::Year, Self::Rating, Self::Authors];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Rating => "rating",
            Self::Authors => "authors",
        }
    }

    /// Text of the grouping selector option.
    pub fn selector_label(self) -> &'static str {
        match self {
            Self::Year => "Group by Year",
            Self::Rating => "Group by Rating",
            Self::Authors => "Group by Author",
        }
    }

    /// Heading printed above a group, e.g. `Year 2021` or `Unknown Rating`.
    pub fn heading(self, key: &GroupKey) -> String {
        let noun = match self {
            Self::Year => "Year",
            Self::Rating => "Rating",
            Self::Authors => "Author",
        };
        match key {
            GroupKey::Unknown => format!("{UNKNOWN_GROUP_LABEL} {noun}"),
            GroupKey::Value(value) => format!("{noun} {value}"),
        }
    }

    fn key_for(self, book: &Book) -> GroupKey {
        let raw = match self {
            Self::Year => book.year.map(|year| year.to_string()),
            Self::Rating => book.rating.map(|rating| rating.to_string()),
            Self::Authors => Some(book.authors.clone()).filter(|authors| !authors.is_empty()),
        };
        raw.map_or(GroupKey::Unknown, GroupKey::Value)
    }
}

impl Display for GroupCriterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unsupported grouping criterion name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCriterionError(String);

impl Display for ParseCriterionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported group criterion `{}`; expected year|rating|authors",
            self.0
        )
    }
}

impl Error for ParseCriterionError {}

impl FromStr for GroupCriterion {
    type Err = ParseCriterionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "year" => Ok(Self::Year),
            "rating" => Ok(Self::Rating),
            "authors" | "author" => Ok(Self::Authors),
            other => Err(ParseCriterionError(other.to_string())),
        }
    }
}

/// Group identity. `Unknown` orders before every value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Unknown,
    Value(String),
}

impl GroupKey {
    /// Raw key text; the sentinel renders as `Unknown`.
    pub fn label(&self) -> &str {
        match self {
            Self::Unknown => UNKNOWN_GROUP_LABEL,
            Self::Value(value) => value,
        }
    }
}

/// One display group and its ordered members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookGroup {
    pub key: GroupKey,
    pub books: Vec<Book>,
}

/// Partitions `books` by `criterion` and orders groups and members.
pub fn group_and_sort(books: &[Book], criterion: GroupCriterion) -> Vec<BookGroup> {
    let mut groups: BTreeMap<GroupKey, Vec<Book>> = BTreeMap::new();
    for book in books {
        groups
            .entry(criterion.key_for(book))
            .or_default()
            .push(book.clone());
    }

    groups
        .into_iter()
        .map(|(key, mut books)| {
            books.sort_by(|left, right| left.name.cmp(&right.name));
            BookGroup { key, books }
        })
        .collect()
}
