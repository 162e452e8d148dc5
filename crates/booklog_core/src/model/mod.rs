//! Book catalogue domain model.
//!
//! # Responsibility
//! - Define the canonical book record shared by store, catalogue and UI.
//! - Own field-level input validation for add/edit forms.
//!
//! # Invariants
//! - Every persisted book is identified by a stable `BookId`.
//! - `name` and `authors` are never empty for a persisted book.
//! - Deletion is a hard delete; there are no tombstones.

pub mod book;
pub mod validation;
