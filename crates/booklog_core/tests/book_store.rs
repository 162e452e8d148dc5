use booklog_core::db::open_db_in_memory;
use booklog_core::{
    BookFields, BookStore, BookValidationError, FeedEvent, SqliteBookStore, StoreError,
};
use uuid::Uuid;

fn fields(name: &str) -> BookFields {
    BookFields {
        name: name.to_string(),
        authors: "Ursula K. Le Guin".to_string(),
        year: Some(1969),
        rating: Some(9),
        isbn: Some("978-0-441-47812-5".to_string()),
    }
}

fn snapshot_names(event: FeedEvent) -> Vec<String> {
    match event {
        FeedEvent::Snapshot(books) => books.into_iter().map(|book| book.name).collect(),
        FeedEvent::Failed(message) => panic!("unexpected feed failure: {message}"),
    }
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::new(&conn);

    let id = store.create(&fields("The Left Hand of Darkness")).unwrap();
    let loaded = store.get_book(id).unwrap().unwrap();

    assert_eq!(loaded.id, id);
    assert_eq!(loaded.fields(), fields("The Left Hand of Darkness"));
}

#[test]
fn subscribe_delivers_current_collection_immediately() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::new(&conn);
    store.create(&fields("first")).unwrap();

    let subscription = store.subscribe().unwrap();
    assert_eq!(snapshot_names(subscription.try_next().unwrap()), vec!["first"]);
    assert!(subscription.try_next().is_none());
}

#[test]
fn every_mutation_pushes_full_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::new(&conn);
    let subscription = store.subscribe().unwrap();

    let first = store.create(&fields("first")).unwrap();
    store.create(&fields("second")).unwrap();
    store.update(first, &fields("first, revised")).unwrap();
    store.delete(first).unwrap();

    let events: Vec<Vec<String>> = subscription.drain().into_iter().map(snapshot_names).collect();
    assert_eq!(
        events,
        vec![
            vec![],
            vec!["first".to_string()],
            vec!["first".to_string(), "second".to_string()],
            vec!["first, revised".to_string(), "second".to_string()],
            vec!["second".to_string()],
        ]
    );
}

#[test]
fn update_overwrites_every_editable_field() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::new(&conn);
    let id = store.create(&fields("draft")).unwrap();

    let replacement = BookFields {
        name: "final".to_string(),
        authors: "Someone Else".to_string(),
        year: None,
        rating: None,
        isbn: None,
    };
    store.update(id, &replacement).unwrap();

    let loaded = store.get_book(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.fields(), replacement);
}

#[test]
fn update_and_delete_of_missing_book_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::new(&conn);
    let missing = Uuid::new_v4();

    let err = store.update(missing, &fields("ghost")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
    let err = store.delete(missing).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
}

#[test]
fn failed_mutation_pushes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::new(&conn);
    let subscription = store.subscribe().unwrap();
    subscription.drain();

    assert!(store.delete(Uuid::new_v4()).is_err());
    assert!(subscription.try_next().is_none());
}

#[test]
fn writes_enforce_persisted_invariants() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::new(&conn);

    let mut bad = fields("x");
    bad.rating = Some(11);
    let err = store.create(&bad).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(BookValidationError::InvalidRating)
    ));
    assert!(store.list_books().unwrap().is_empty());

    let mut early = fields("y");
    early.year = Some(1800);
    let err = store.create(&early).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(BookValidationError::InvalidYear)
    ));

    let id = store.create(&fields("z")).unwrap();
    let err = store.update(id, &early).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(BookValidationError::InvalidYear)
    ));
    assert_eq!(store.get_book(id).unwrap().unwrap().year, Some(1969));
}

#[test]
fn unchecked_isbn_is_accepted_by_the_store() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::new(&conn);

    let mut loose = fields("x");
    loose.isbn = Some("pending".to_string());
    let id = store.create(&loose).unwrap();
    assert_eq!(
        store.get_book(id).unwrap().unwrap().isbn.as_deref(),
        Some("pending")
    );
}

#[test]
fn invalid_persisted_rows_are_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO books (id, name, authors, year) VALUES (?1, 'x', 'y', 1700);",
        [Uuid::new_v4().to_string()],
    )
    .unwrap();
    let store = SqliteBookStore::new(&conn);

    let err = store.list_books().unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
    assert!(store.subscribe().is_err());
}

#[test]
fn dropped_subscription_is_released() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::new(&conn);

    let kept = store.subscribe().unwrap();
    let released = store.subscribe().unwrap();
    assert_eq!(store.subscriber_count(), 2);

    drop(released);
    assert_eq!(store.subscriber_count(), 1);
    assert!(kept.is_active());

    kept.unsubscribe();
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn snapshots_serialize_with_document_field_names() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteBookStore::new(&conn);
    let id = store.create(&fields("Dune")).unwrap();

    let book = store.get_book(id).unwrap().unwrap();
    let json = serde_json::to_value(&book).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["name"], "Dune");
    assert_eq!(json["authors"], "Ursula K. Le Guin");
    assert_eq!(json["year"], 1969);
    assert_eq!(json["rating"], 9);
    assert_eq!(json["isbn"], "978-0-441-47812-5");
}
