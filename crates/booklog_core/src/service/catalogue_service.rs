//! Catalogue state container and user-intent handling.
//!
//! # Responsibility
//! - Own the in-memory book list, loading flag and feed health.
//! - Validate add/edit intents before any store call.
//! - Keep the list in step with the store's subscription feed.
//!
//! # Invariants
//! - State changes only through feed events and post-success patches.
//! - A failed store call leaves the local list untouched.
//! - The subscription is held for the catalogue's lifetime and released on
//!   close or drop.
//! - Add skips the ISBN rule; edit enforces it.

use crate::catalogue::group::{group_and_sort, BookGroup, GroupCriterion};
use crate::catalogue::recommend::select_recommendation;
use crate::model::book::{Book, BookFields, BookId};
use crate::model::validation::{
    validate_book_input_with, BookInput, BookValidationError, IsbnCheck,
};
use crate::repo::book_store::{BookStore, StoreError, StoreResult};
use crate::repo::feed::{BookSubscription, FeedEvent};
use chrono::Datelike;
use log::{error, info, warn};
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error returned to the presentation layer for a failed intent.
#[derive(Debug)]
pub enum CatalogueError {
    /// Input rejected before reaching the store.
    Validation(BookValidationError),
    /// The store call failed; nothing changed locally.
    Store(StoreError),
}

impl Display for CatalogueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogueError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<BookValidationError> for CatalogueError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for CatalogueError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Snapshot of what the UI renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueState {
    /// Cached collection; the store stays authoritative.
    pub books: Vec<Book>,
    /// `true` until the first snapshot arrives.
    pub loading: bool,
    /// Set while the feed is failing; cleared by the next snapshot.
    pub feed_error: Option<String>,
}

impl Default for CatalogueState {
    fn default() -> Self {
        Self {
            books: Vec::new(),
            loading: true,
            feed_error: None,
        }
    }
}

impl CatalogueState {
    /// Applies one subscription push.
    pub fn apply_feed_event(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Snapshot(books) => {
                self.books = books;
                self.loading = false;
                self.feed_error = None;
            }
            FeedEvent::Failed(message) => {
                self.feed_error = Some(message);
            }
        }
    }

    fn patch_updated(&mut self, id: BookId, fields: BookFields) {
        if let Some(slot) = self.books.iter_mut().find(|book| book.id == id) {
            *slot = Book::from_fields(id, fields);
        }
    }

    fn remove(&mut self, id: BookId) {
        self.books.retain(|book| book.id != id);
    }
}

/// Top-level catalogue: store handle, standing subscription and view state.
pub struct Catalogue<S: BookStore> {
    store: S,
    subscription: BookSubscription,
    state: CatalogueState,
    group_by: GroupCriterion,
}

impl<S: BookStore> Catalogue<S> {
    /// Subscribes to the store and applies whatever the feed has delivered.
    pub fn open(store: S) -> StoreResult<Self> {
        let subscription = store.subscribe()?;
        let mut catalogue = Self {
            store,
            subscription,
            state: CatalogueState::default(),
            group_by: GroupCriterion::default(),
        };
        catalogue.sync();
        info!(
            "event=catalogue_open module=catalogue status=ok loading={} books={}",
            catalogue.state.loading,
            catalogue.state.books.len()
        );
        Ok(catalogue)
    }

    /// Applies every pending feed event and returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let events = self.subscription.drain();
        let applied = events.len();
        for event in events {
            if let FeedEvent::Failed(message) = &event {
                error!("event=feed_receive module=catalogue status=error error={message}");
            }
            self.state.apply_feed_event(event);
        }
        applied
    }

    pub fn state(&self) -> &CatalogueState {
        &self.state
    }

    pub fn books(&self) -> &[Book] {
        &self.state.books
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn feed_error(&self) -> Option<&str> {
        self.state.feed_error.as_deref()
    }

    pub fn book(&self, id: BookId) -> Option<&Book> {
        self.state.books.iter().find(|book| book.id == id)
    }

    pub fn group_by(&self) -> GroupCriterion {
        self.group_by
    }

    pub fn set_group_by(&mut self, criterion: GroupCriterion) {
        self.group_by = criterion;
    }

    /// Current list grouped by the selected criterion.
    pub fn groups(&self) -> Vec<BookGroup> {
        group_and_sort(&self.state.books, self.group_by)
    }

    /// Picks the highlighted book for `current_year`.
    pub fn recommendation<R: Rng + ?Sized>(
        &self,
        current_year: i32,
        rng: &mut R,
    ) -> Option<&Book> {
        select_recommendation(&self.state.books, current_year, rng)
    }

    /// Add flow: validates (ISBN unchecked) and creates the book.
    ///
    /// The new record shows up through the feed, not through a local patch.
    pub fn add_book(&mut self, input: &BookInput) -> Result<BookId, CatalogueError> {
        let fields = self.validate("add", input, IsbnCheck::Skip)?;
        let id = self.store.create(&fields).map_err(|err| {
            error!("event=book_add module=catalogue status=error error={err}");
            CatalogueError::Store(err)
        })?;
        info!("event=book_add module=catalogue status=ok book_id={id}");
        self.sync();
        Ok(id)
    }

    /// Edit flow: validates (ISBN enforced), overwrites all editable fields,
    /// then patches the local copy.
    pub fn edit_book(&mut self, id: BookId, input: &BookInput) -> Result<(), CatalogueError> {
        let fields = self.validate("edit", input, IsbnCheck::Enforce)?;
        if let Err(err) = self.store.update(id, &fields) {
            error!("event=book_edit module=catalogue status=error book_id={id} error={err}");
            return Err(CatalogueError::Store(err));
        }
        self.state.patch_updated(id, fields);
        info!("event=book_edit module=catalogue status=ok book_id={id}");
        self.sync();
        Ok(())
    }

    /// Delete flow: removes the book and drops the local copy.
    pub fn delete_book(&mut self, id: BookId) -> Result<(), CatalogueError> {
        if let Err(err) = self.store.delete(id) {
            error!("event=book_delete module=catalogue status=error book_id={id} error={err}");
            return Err(CatalogueError::Store(err));
        }
        self.state.remove(id);
        info!("event=book_delete module=catalogue status=ok book_id={id}");
        self.sync();
        Ok(())
    }

    /// Releases the subscription and hands the store back.
    pub fn close(self) -> S {
        let Self {
            store,
            subscription,
            ..
        } = self;
        subscription.unsubscribe();
        info!("event=catalogue_close module=catalogue status=ok");
        store
    }

    fn validate(
        &self,
        flow: &'static str,
        input: &BookInput,
        isbn_check: IsbnCheck,
    ) -> Result<BookFields, CatalogueError> {
        validate_book_input_with(input, isbn_check).map_err(|err| {
            warn!(
                "event=book_{flow} module=catalogue status=rejected error_code={}",
                err.code()
            );
            CatalogueError::Validation(err)
        })
    }
}

/// Calendar year on the local clock, used as the recommendation reference.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
