//! Catalogue use-case services.
//!
//! # Responsibility
//! - Turn user intents (add/edit/delete, change grouping) into store calls.
//! - Keep the presentation layer decoupled from storage and feed details.

pub mod catalogue_service;
