//! folio, a terminal book catalog viewer for the Gutendex API.
//!
//! Fetches paginated book metadata, renders it as a card list, supports
//! client-side text/genre filtering, and persists a wishlist of favorited
//! book IDs in a local SQLite database.

pub mod app;
pub mod catalog;
pub mod config;
pub mod storage;
pub mod ui;
pub mod util;
