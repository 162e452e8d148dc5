//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical book record and its editable field set.
//! - Re-check persisted invariants on store read/write paths.
//!
//! # Invariants
//! - `id` is assigned once by the store and never changes.
//! - `year`, when set, is greater than `MIN_PUBLICATION_YEAR`.
//! - `rating`, when set, lies in `RATING_RANGE`.
//! - ISBN shape is not a persisted invariant: the add flow may store an
//!   unchecked ISBN.

use crate::model::validation::BookValidationError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Stable identifier assigned by the store when a book is created.
pub type BookId = Uuid;

/// Maximum number of characters allowed in a book name.
pub const MAX_NAME_CHARS: usize = 100;
/// Publication years must be strictly greater than this value.
pub const MIN_PUBLICATION_YEAR: i32 = 1800;
/// Accepted rating values.
pub const RATING_RANGE: RangeInclusive<i32> = 0..=10;

/// Canonical book record as delivered by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub name: String,
    /// Free text, comma-separated by convention. Never split.
    pub authors: String,
    pub year: Option<i32>,
    pub rating: Option<i32>,
    pub isbn: Option<String>,
}

impl Book {
    /// Builds a record from store-assigned id and validated fields.
    pub fn from_fields(id: BookId, fields: BookFields) -> Self {
        Self {
            id,
            name: fields.name,
            authors: fields.authors,
            year: fields.year,
            rating: fields.rating,
            isbn: fields.isbn,
        }
    }

    /// Returns the editable part of this record.
    pub fn fields(&self) -> BookFields {
        BookFields {
            name: self.name.clone(),
            authors: self.authors.clone(),
            year: self.year,
            rating: self.rating,
            isbn: self.isbn.clone(),
        }
    }

    /// Rating used for ranking; unrated books rank as 0.
    pub fn effective_rating(&self) -> i32 {
        self.rating.unwrap_or(0)
    }

    /// Checks the invariants every persisted book must satisfy.
    ///
    /// # Errors
    /// - Returns the first violated rule, in form-validation order.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.id.is_nil() {
            return Err(BookValidationError::NilId);
        }
        check_persisted_fields(&self.name, &self.authors, self.year, self.rating)
    }
}

/// Editable fields of a book, produced by successful form validation.
///
/// Edits overwrite all of these at once; `id` is never part of the set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    pub name: String,
    pub authors: String,
    pub year: Option<i32>,
    pub rating: Option<i32>,
    pub isbn: Option<String>,
}

impl BookFields {
    /// Checks persisted invariants without an id.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        check_persisted_fields(&self.name, &self.authors, self.year, self.rating)
    }
}

fn check_persisted_fields(
    name: &str,
    authors: &str,
    year: Option<i32>,
    rating: Option<i32>,
) -> Result<(), BookValidationError> {
    if name.trim().is_empty() {
        return Err(BookValidationError::NameRequired);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(BookValidationError::NameTooLong);
    }
    if authors.trim().is_empty() {
        return Err(BookValidationError::AuthorsRequired);
    }
    if matches!(year, Some(value) if value <= MIN_PUBLICATION_YEAR) {
        return Err(BookValidationError::InvalidYear);
    }
    if matches!(rating, Some(value) if !RATING_RANGE.contains(&value)) {
        return Err(BookValidationError::InvalidRating);
    }
    Ok(())
}
