//! Add/edit form validation.
//!
//! # Responsibility
//! - Turn raw form text into validated `BookFields`.
//! - Report only the first violated rule, with a user-facing message.
//!
//! # Invariants
//! - Rules are checked in a fixed order: name required, name length,
//!   authors required, year, rating, ISBN.
//! - Blank optional fields count as not provided.
//! - The ISBN rule is skipped under `IsbnCheck::Skip` (add flow) and
//!   enforced under `IsbnCheck::Enforce` (edit flow).

use crate::model::book::{Book, BookFields, MAX_NAME_CHARS, MIN_PUBLICATION_YEAR, RATING_RANGE};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static ISBN_DIGITS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid isbn digits regex"));

/// First violated validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookValidationError {
    NameRequired,
    NameTooLong,
    AuthorsRequired,
    InvalidYear,
    InvalidRating,
    InvalidIsbn,
    /// Only produced by persisted-record checks.
    NilId,
}

impl BookValidationError {
    /// Stable machine-readable code for logs.
    pub fn code(self) -> &'static str {
        match self {
            Self::NameRequired => "name_required",
            Self::NameTooLong => "name_too_long",
            Self::AuthorsRequired => "authors_required",
            Self::InvalidYear => "invalid_year",
            Self::InvalidRating => "invalid_rating",
            Self::InvalidIsbn => "invalid_isbn",
            Self::NilId => "nil_id",
        }
    }
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameRequired => write!(f, "Book name is required."),
            Self::NameTooLong => write!(
                f,
                "Book name must be no longer than {MAX_NAME_CHARS} characters."
            ),
            Self::AuthorsRequired => write!(f, "List of authors is required."),
            Self::InvalidYear => write!(
                f,
                "Publication year must be greater than {MIN_PUBLICATION_YEAR}."
            ),
            Self::InvalidRating => write!(
                f,
                "Rating must be an integer value from {} to {}.",
                RATING_RANGE.start(),
                RATING_RANGE.end()
            ),
            Self::InvalidIsbn => write!(f, "Invalid ISBN."),
            Self::NilId => write!(f, "book id must not be nil"),
        }
    }
}

impl Error for BookValidationError {}

/// Whether the ISBN rule blocks submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsbnCheck {
    Enforce,
    Skip,
}

/// Raw add/edit form values, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookInput {
    pub name: String,
    pub authors: String,
    pub year: Option<String>,
    pub rating: Option<String>,
    pub isbn: Option<String>,
}

impl BookInput {
    /// Pre-populates an edit form from a stored record.
    pub fn from_book(book: &Book) -> Self {
        Self {
            name: book.name.clone(),
            authors: book.authors.clone(),
            year: book.year.map(|value| value.to_string()),
            rating: book.rating.map(|value| value.to_string()),
            isbn: book.isbn.clone(),
        }
    }
}

/// Validates form input with every rule enforced.
pub fn validate_book_input(input: &BookInput) -> Result<BookFields, BookValidationError> {
    validate_book_input_with(input, IsbnCheck::Enforce)
}

/// Validates form input under the given ISBN policy.
///
/// # Errors
/// - Returns the first violated rule only.
pub fn validate_book_input_with(
    input: &BookInput,
    isbn_check: IsbnCheck,
) -> Result<BookFields, BookValidationError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(BookValidationError::NameRequired);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(BookValidationError::NameTooLong);
    }

    let authors = input.authors.trim();
    if authors.is_empty() {
        return Err(BookValidationError::AuthorsRequired);
    }

    let year = match provided(input.year.as_deref()) {
        Some(raw) => match raw.parse::<i32>() {
            Ok(value) if value > MIN_PUBLICATION_YEAR => Some(value),
            _ => return Err(BookValidationError::InvalidYear),
        },
        None => None,
    };

    let rating = match provided(input.rating.as_deref()) {
        Some(raw) => match raw.parse::<i32>() {
            Ok(value) if RATING_RANGE.contains(&value) => Some(value),
            _ => return Err(BookValidationError::InvalidRating),
        },
        None => None,
    };

    let isbn = provided(input.isbn.as_deref());
    if let (Some(value), IsbnCheck::Enforce) = (isbn, isbn_check) {
        if !is_valid_isbn(value) {
            return Err(BookValidationError::InvalidIsbn);
        }
    }

    Ok(BookFields {
        name: name.to_string(),
        authors: authors.to_string(),
        year,
        rating,
        isbn: isbn.map(str::to_string),
    })
}

/// Returns whether `isbn` is 10 or 13 digits once hyphens are removed.
pub fn is_valid_isbn(isbn: &str) -> bool {
    let cleaned = isbn.replace('-', "");
    (cleaned.len() == 10 || cleaned.len() == 13) && ISBN_DIGITS_RE.is_match(&cleaned)
}

/// Live field-level feedback for an ISBN input box.
///
/// Blank input is not an error.
pub fn isbn_field_error(isbn: &str) -> Option<BookValidationError> {
    match provided(Some(isbn)) {
        Some(value) if !is_valid_isbn(value) => Some(BookValidationError::InvalidIsbn),
        _ => None,
    }
}

fn provided(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{is_valid_isbn, provided};

    #[test]
    fn isbn_rejects_non_ascii_digits() {
        assert!(!is_valid_isbn("١٢٣٤٥٦٧٨٩٠"));
    }

    #[test]
    fn isbn_ignores_hyphen_positions() {
        assert!(is_valid_isbn("978-0-306-40615-7"));
        assert!(is_valid_isbn("----0306406152"));
    }

    #[test]
    fn blank_values_are_not_provided() {
        assert_eq!(provided(Some("   ")), None);
        assert_eq!(provided(Some(" 7 ")), Some("7"));
        assert_eq!(provided(None), None);
    }
}
