//! Book store contract and SQLite implementation.
//!
//! # Responsibility
//! - Expose the `books` collection through subscribe/create/update/delete.
//! - Push a full snapshot to every subscriber after each successful write.
//!
//! # Invariants
//! - Write paths call `BookFields::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Snapshots list books in insertion order.

use crate::db::DbError;
use crate::model::book::{Book, BookFields, BookId};
use crate::model::validation::BookValidationError;
use crate::repo::feed::{BookSubscription, FeedEvent, SnapshotFeed};
use log::{error, info, warn};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Logical collection name shared by every store implementation.
pub const BOOKS_COLLECTION: &str = "books";

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    name,
    authors,
    year,
    rating,
    isbn
FROM books";

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure reported by a store call.
#[derive(Debug)]
pub enum StoreError {
    Validation(BookValidationError),
    Db(DbError),
    NotFound(BookId),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<BookValidationError> for StoreError {
    fn from(value: BookValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Document-store operations the catalogue depends on.
pub trait BookStore {
    /// Opens a standing subscription; the first event is the current collection.
    fn subscribe(&self) -> StoreResult<BookSubscription>;
    /// Persists a new book and returns its store-assigned id.
    fn create(&self, fields: &BookFields) -> StoreResult<BookId>;
    /// Overwrites every editable field of an existing book.
    fn update(&self, id: BookId, fields: &BookFields) -> StoreResult<()>;
    /// Removes a book permanently.
    fn delete(&self, id: BookId) -> StoreResult<()>;
}

impl<T: BookStore + ?Sized> BookStore for &T {
    fn subscribe(&self) -> StoreResult<BookSubscription> {
        (**self).subscribe()
    }

    fn create(&self, fields: &BookFields) -> StoreResult<BookId> {
        (**self).create(fields)
    }

    fn update(&self, id: BookId, fields: &BookFields) -> StoreResult<()> {
        (**self).update(id, fields)
    }

    fn delete(&self, id: BookId) -> StoreResult<()> {
        (**self).delete(id)
    }
}

/// SQLite-backed `books` collection with an in-process change feed.
pub struct SqliteBookStore<'conn> {
    conn: &'conn Connection,
    feed: SnapshotFeed,
}

impl<'conn> SqliteBookStore<'conn> {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            feed: SnapshotFeed::new(),
        }
    }

    /// Reads the whole collection in insertion order.
    pub fn list_books(&self) -> StoreResult<Vec<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    /// Reads one book by id.
    pub fn get_book(&self, id: BookId) -> StoreResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_book_row(row)?));
        }

        Ok(None)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.feed.subscriber_count()
    }

    fn publish_snapshot(&self, trigger: &'static str) {
        let event = match self.list_books() {
            Ok(books) => FeedEvent::Snapshot(books),
            Err(err) => {
                error!(
                    "event=feed_publish module=store status=error trigger={trigger} error={err}"
                );
                FeedEvent::Failed(err.to_string())
            }
        };
        let delivered = self.feed.publish(&event);
        info!(
            "event=feed_publish module=store status=ok collection={BOOKS_COLLECTION} trigger={trigger} delivered={delivered}"
        );
    }
}

impl BookStore for SqliteBookStore<'_> {
    fn subscribe(&self) -> StoreResult<BookSubscription> {
        let books = self.list_books()?;
        Ok(self.feed.subscribe(FeedEvent::Snapshot(books)))
    }

    fn create(&self, fields: &BookFields) -> StoreResult<BookId> {
        fields.validate()?;

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO books (
                id,
                name,
                authors,
                year,
                rating,
                isbn
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id.to_string(),
                fields.name.as_str(),
                fields.authors.as_str(),
                fields.year,
                fields.rating,
                fields.isbn.as_deref(),
            ],
        )?;
        info!("event=book_create module=store status=ok book_id={id}");

        self.publish_snapshot("create");
        Ok(id)
    }

    fn update(&self, id: BookId, fields: &BookFields) -> StoreResult<()> {
        fields.validate()?;

        let changed = self.conn.execute(
            "UPDATE books
             SET
                name = ?1,
                authors = ?2,
                year = ?3,
                rating = ?4,
                isbn = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?6;",
            params![
                fields.name.as_str(),
                fields.authors.as_str(),
                fields.year,
                fields.rating,
                fields.isbn.as_deref(),
                id.to_string(),
            ],
        )?;
        if changed == 0 {
            warn!("event=book_update module=store status=error book_id={id} error_code=not_found");
            return Err(StoreError::NotFound(id));
        }
        info!("event=book_update module=store status=ok book_id={id}");

        self.publish_snapshot("update");
        Ok(())
    }

    fn delete(&self, id: BookId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM books WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            warn!("event=book_delete module=store status=error book_id={id} error_code=not_found");
            return Err(StoreError::NotFound(id));
        }
        info!("event=book_delete module=store status=ok book_id={id}");

        self.publish_snapshot("delete");
        Ok(())
    }
}

fn parse_book_row(row: &Row<'_>) -> StoreResult<Book> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{id_text}` in books.id"))
    })?;

    let book = Book {
        id,
        name: row.get("name")?,
        authors: row.get("authors")?,
        year: row.get("year")?,
        rating: row.get("rating")?,
        isbn: row.get("isbn")?,
    };
    book.validate()
        .map_err(|err| StoreError::InvalidData(format!("book {id}: {err}")))?;
    Ok(book)
}
