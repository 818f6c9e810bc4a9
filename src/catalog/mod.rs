//! Gutendex catalog access.
//!
//! - `model` - wire types for the book metadata API, fallback accessors,
//!   and the client-side filter engine
//! - `client` - HTTP client for the paginated listing and single-book
//!   endpoints

mod client;
mod model;

pub use client::{CatalogClient, CatalogError};
pub use model::{filter_books, Author, Book, BookPage, UNKNOWN};
