//! Text rendering of catalogue views and user notices.

use booklog_core::{Book, BookGroup, CatalogueError, GroupCriterion};
use std::fmt::{Display, Formatter, Write as _};

const NO_RECOMMENDATION: &str = "No books available that meet the criteria.";

/// One-line user notice: a title plus a description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: String,
}

impl Notice {
    pub fn new(title: &'static str, description: impl Into<String>) -> Self {
        Self {
            title,
            description: description.into(),
        }
    }

    /// Maps a failed intent to what the user sees.
    ///
    /// Validation failures show the violated rule; store failures show a
    /// generic retry message for `action` (e.g. "update").
    pub fn from_catalogue_error(action: &str, err: &CatalogueError) -> Self {
        match err {
            CatalogueError::Validation(reason) => {
                Self::new("Validation Error", reason.to_string())
            }
            CatalogueError::Store(_) => Self::new(
                "Error",
                format!("Failed to {action} the book. Please try again later."),
            ),
        }
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Card-style block for one book.
pub fn book_card(book: &Book) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  [{}★]", book.name, book.effective_rating());
    let _ = writeln!(out, "  by {}", book.authors);
    let _ = writeln!(out, "  Pub. Year: {}", optional(book.year));
    let _ = writeln!(out, "  ISBN: {}", book.isbn.as_deref().unwrap_or("-"));
    let _ = write!(out, "  id: {}", book.id);
    out
}

/// Grouped list with one heading per group.
pub fn grouped_list(criterion: GroupCriterion, groups: &[BookGroup]) -> String {
    if groups.is_empty() {
        return format!("{}\n\nNo books yet.", criterion.selector_label());
    }

    let mut out = criterion.selector_label().to_string();
    for group in groups {
        let _ = write!(out, "\n\n== {} ==", criterion.heading(&group.key));
        for book in &group.books {
            let _ = write!(out, "\n{}", book_card(book));
        }
    }
    out
}

/// Recommendation panel, or the empty-state message.
pub fn recommendation(book: Option<&Book>) -> String {
    match book {
        Some(book) => format!(
            "Recommended Book\n  Title: {}\n  Rating: {}\n  Publication Year: {}",
            book.name,
            book.effective_rating(),
            optional(book.year)
        ),
        None => format!("Recommended Book\n  {NO_RECOMMENDATION}"),
    }
}

/// Question shown before a delete is confirmed.
pub fn delete_confirmation(book: &Book) -> String {
    format!(
        "You're going to delete the \"{}\" book. Are you sure? Re-run with --yes to delete.",
        book.name
    )
}

fn optional(value: Option<i32>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}
