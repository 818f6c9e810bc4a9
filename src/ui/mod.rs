//! Terminal User Interface module.
//!
//! This module provides the TUI for the catalog viewer, including:
//! - Main event loop (`run`)
//! - Input handling for catalog, wishlist, and detail views
//! - Rendering for book lists and the detail pane
//! - Background fetch event processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop, terminal management, fetch spawning
//! - `input` - Keyboard input handling
//! - `events` - Background fetch event processing
//! - `render` - View rendering dispatch
//! - `catalog` - Catalog list widget
//! - `wishlist` - Wishlist widget
//! - `detail` - Book detail widget
//! - `status` - Status bar widget

mod catalog;
mod detail;
mod events;
mod input;
mod loop_runner;
mod render;
mod status;
mod wishlist;

// Re-export the public API
pub use loop_runner::{
    run, spawn_book_fetch, spawn_default_fetch, spawn_page_fetch, Action,
};
