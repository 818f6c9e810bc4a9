//! Application event handling.
//!
//! This module processes background fetch completion events and applies
//! their results to application state.

use crate::app::{App, AppEvent, DetailState};
use std::sync::Arc;

/// Handle application events from background fetch tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::CatalogLoaded {
            page,
            generation,
            result,
        } => {
            handle_catalog_loaded(app, page, generation, result);
        }
        AppEvent::BookLoaded {
            book_id,
            generation,
            result,
        } => {
            handle_book_loaded(app, book_id, generation, result);
        }
    }
}

/// Apply a catalog fetch result.
///
/// Stale responses are identified by generation mismatch and dropped
/// without touching `loading`: a mismatch means a newer fetch is already
/// in flight and owns that flag.
fn handle_catalog_loaded(
    app: &mut App,
    page: Option<u32>,
    generation: u64,
    result: Result<Vec<crate::catalog::Book>, crate::catalog::CatalogError>,
) {
    if generation != app.fetch_generation {
        tracing::debug!(
            expected = app.fetch_generation,
            got = generation,
            "Ignoring stale catalog response (generation mismatch)"
        );
        return;
    }

    app.loading = false;

    match result {
        Ok(books) => {
            tracing::debug!(count = books.len(), ?page, "Catalog page loaded");
            app.books = Arc::new(books);
            if let Some(page) = page {
                app.page = page;
            }
            app.clamp_selection();
        }
        Err(e) => {
            // The previous page stays on screen; the failure is only logged.
            tracing::error!(error = %e, ?page, "Catalog fetch failed");
        }
    }
}

/// Apply a book detail fetch result.
fn handle_book_loaded(
    app: &mut App,
    book_id: i64,
    generation: u64,
    result: Result<crate::catalog::Book, crate::catalog::CatalogError>,
) {
    if generation != app.detail_generation {
        tracing::debug!(
            expected = app.detail_generation,
            got = generation,
            book_id,
            "Ignoring stale detail response (generation mismatch)"
        );
        return;
    }

    // Only apply if the detail view is still waiting on this book
    match app.detail {
        DetailState::Loading { book_id: waiting } if waiting == book_id => {}
        _ => {
            tracing::debug!(book_id, "Detail response arrived after view change");
            return;
        }
    }

    match result {
        Ok(book) => {
            tracing::debug!(book_id, title = %book.title, "Book detail loaded");
            app.detail = DetailState::Loaded(book);
        }
        Err(e) => {
            tracing::error!(book_id, error = %e, "Book detail fetch failed");
            app.detail = DetailState::Idle;
        }
    }
}
