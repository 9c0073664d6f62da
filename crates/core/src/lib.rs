#![warn(clippy::all, missing_docs)]

//! Core domain logic for the bookshelf catalog manager.
//!
//! This crate hosts the book model, the in-memory catalog, configuration
//! handling, and the flat-file persistence layer used by the command-line
//! frontend.

pub mod catalog;
pub mod config;
pub mod models;
pub mod store;

pub use catalog::{AddOutcome, Catalog, IssueOutcome, Lookup, RemoveOutcome, ReturnOutcome};
pub use crate::config::AppConfig;
pub use models::Book;
pub use store::{CatalogStore, RecordError};
