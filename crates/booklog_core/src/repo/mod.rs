//! Store adapter layer.
//!
//! # Responsibility
//! - Define the narrow document-store contract the catalogue consumes.
//! - Keep SQL and change-feed plumbing out of catalogue/UI code.
//!
//! # Invariants
//! - The subscription feed, not a mutating call's return, is authoritative
//!   for what the UI displays.
//! - Store APIs return semantic errors (`NotFound`) alongside DB errors.

pub mod book_store;
pub mod feed;
