//! Core domain logic for Booklog, a book catalogue.
//! This crate is the single source of truth for catalogue invariants.

pub mod catalogue;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use catalogue::group::{
    group_and_sort, BookGroup, GroupCriterion, GroupKey, ParseCriterionError, UNKNOWN_GROUP_LABEL,
};
pub use catalogue::recommend::{
    is_recent, recommendation_candidates, select_recommendation, RECOMMENDATION_WINDOW_YEARS,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{Book, BookFields, BookId, MAX_NAME_CHARS, MIN_PUBLICATION_YEAR};
pub use model::validation::{
    is_valid_isbn, isbn_field_error, validate_book_input, validate_book_input_with, BookInput,
    BookValidationError, IsbnCheck,
};
pub use repo::book_store::{BookStore, SqliteBookStore, StoreError, StoreResult, BOOKS_COLLECTION};
pub use repo::feed::{BookSubscription, FeedEvent, SnapshotFeed};
pub use service::catalogue_service::{current_year, Catalogue, CatalogueError, CatalogueState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
