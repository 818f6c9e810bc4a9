//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on current view and mode.

use crate::app::{App, AppEvent, DetailState, InputMode, View};
use crate::util::validate_url_for_open;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::loop_runner::{spawn_book_fetch, spawn_default_fetch, spawn_page_fetch};
use super::Action;

/// Maximum allowed filter input length (UI layer validation)
const MAX_FILTER_LENGTH: usize = 256;

/// Main input dispatch function.
///
/// Routes input to the appropriate handler based on current mode and view.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    _modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Filter editing captures all keys
    if app.input_mode != InputMode::Normal {
        return Ok(handle_filter_input(app, code));
    }

    match app.view {
        View::Catalog => handle_catalog_input(app, code, event_tx).await,
        View::Wishlist => handle_wishlist_input(app, code, event_tx).await,
        View::Detail => Ok(handle_detail_input(app, code)),
    }
}

/// Handle a keystroke while editing the search or genre filter.
///
/// The visible list narrows on every keystroke. Search input is lowercased
/// as it is typed so title matching stays case-insensitive; genre input is
/// kept as-is and matched against subject strings verbatim.
fn handle_filter_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            match app.input_mode {
                InputMode::Search => {
                    app.search_query.pop();
                }
                InputMode::Genre => {
                    app.genre_filter.pop();
                }
                InputMode::Normal => {}
            }
            app.clamp_selection();
        }
        KeyCode::Char(c) => {
            let target = match app.input_mode {
                InputMode::Search => &mut app.search_query,
                InputMode::Genre => &mut app.genre_filter,
                InputMode::Normal => return Action::Continue,
            };
            if target.len() >= MAX_FILTER_LENGTH {
                return Action::Continue;
            }
            if app.input_mode == InputMode::Search {
                target.extend(c.to_lowercase());
            } else {
                target.push(c);
            }
            app.clamp_selection();
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input in the catalog view.
async fn handle_catalog_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Char('n') | KeyCode::Right => {
            app.next_page();
            spawn_page_fetch(app, app.page, event_tx);
        }
        KeyCode::Char('p') | KeyCode::Left => {
            // No fetch at page 1, there is nothing before it
            if app.prev_page() {
                spawn_page_fetch(app, app.page, event_tx);
            }
        }
        KeyCode::Char('r') => {
            spawn_page_fetch(app, app.page, event_tx);
            app.set_status("Reloading page...");
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.search_query.clear();
            app.clamp_selection();
        }
        KeyCode::Char('g') => {
            app.input_mode = InputMode::Genre;
            app.genre_filter.clear();
            app.clamp_selection();
        }
        KeyCode::Char(' ') | KeyCode::Char('f') => {
            toggle_wishlist(app).await?;
            // Toggling returns to the unfiltered list
            app.clear_filters();
        }
        KeyCode::Char('w') => {
            app.view = View::Wishlist;
            app.selected = 0;
            // A cold start straight into the wishlist has no books to match
            // IDs against yet; fetch the default list to resolve them.
            if app.books.is_empty() {
                spawn_default_fetch(app, event_tx);
            }
        }
        KeyCode::Enter => {
            if let Some(book) = app.selected_book() {
                let book_id = book.id;
                app.enter_detail(book_id);
                spawn_book_fetch(app, book_id, event_tx);
            }
        }
        _ => {}
    }
    Ok(Action::Continue)
}

/// Handle input in the wishlist view.
async fn handle_wishlist_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    match code {
        KeyCode::Char('q') => return Ok(Action::Quit),
        KeyCode::Esc | KeyCode::Char('w') => {
            app.view = View::Catalog;
            app.selected = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Char(' ') | KeyCode::Char('f') => {
            toggle_wishlist(app).await?;
            app.clamp_selection();
        }
        KeyCode::Enter => {
            if let Some(book) = app.selected_book() {
                let book_id = book.id;
                app.enter_detail(book_id);
                spawn_book_fetch(app, book_id, event_tx);
            }
        }
        _ => {}
    }
    Ok(Action::Continue)
}

/// Handle input in the detail view.
fn handle_detail_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Esc | KeyCode::Char('b') => app.exit_detail(),
        KeyCode::Char('o') => {
            if let DetailState::Loaded(ref book) = app.detail {
                match book.download_url() {
                    Some(url) => open_external(app, url.to_string()),
                    None => app.set_status("No download link for this book"),
                }
            }
        }
        KeyCode::Char('c') => {
            if let DetailState::Loaded(ref book) = app.detail {
                match book.cover_url() {
                    Some(url) => open_external(app, url.to_string()),
                    None => app.set_status("No cover image for this book"),
                }
            }
        }
        _ => {}
    }
    Action::Continue
}

/// Toggle the selected book's wishlist membership and persist the list.
async fn toggle_wishlist(app: &mut App) -> Result<()> {
    let Some(book) = app.selected_book() else {
        return Ok(());
    };
    let book_id = book.id;

    let added = app.wishlist.toggle(book_id);
    app.db.save_wishlist(&app.wishlist).await?;

    if added {
        app.set_status("Added to wishlist");
    } else {
        app.set_status("Removed from wishlist");
    }
    tracing::debug!(book_id, added, "Wishlist toggled");
    Ok(())
}

/// Open a URL in the system browser after scheme validation.
fn open_external(app: &mut App, url: String) {
    // Validate before open::that() to prevent command injection
    if let Err(e) = validate_url_for_open(&url) {
        app.set_status(e);
    } else if let Err(e) = open::that(&url) {
        app.set_status(format!("Failed to open browser: {}", e));
    } else {
        app.set_status("Opening in browser...");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Author, Book, CatalogClient};
    use crate::storage::{Database, Wishlist};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let http = reqwest::Client::new();
        let catalog = CatalogClient::new(http, "https://gutendex.com", Duration::from_secs(30));
        App::new(db, catalog, Wishlist::default())
    }

    fn test_book(id: i64, title: &str) -> Book {
        Book {
            id,
            title: title.to_string(),
            authors: vec![Author {
                name: "Stoker, Bram".to_string(),
            }],
            subjects: vec!["Horror tales".to_string()],
            formats: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn test_search_input_lowercases_chars() {
        let mut app = test_app().await;
        app.input_mode = InputMode::Search;

        handle_filter_input(&mut app, KeyCode::Char('D'));
        handle_filter_input(&mut app, KeyCode::Char('r'));
        handle_filter_input(&mut app, KeyCode::Char('A'));

        assert_eq!(app.search_query, "dra");
    }

    #[tokio::test]
    async fn test_genre_input_preserves_case() {
        let mut app = test_app().await;
        app.input_mode = InputMode::Genre;

        for c in "Horror".chars() {
            handle_filter_input(&mut app, KeyCode::Char(c));
        }

        assert_eq!(app.genre_filter, "Horror");
    }

    #[tokio::test]
    async fn test_backspace_edits_filter() {
        let mut app = test_app().await;
        app.input_mode = InputMode::Search;
        app.search_query = "drac".to_string();

        handle_filter_input(&mut app, KeyCode::Backspace);

        assert_eq!(app.search_query, "dra");
    }

    #[tokio::test]
    async fn test_esc_leaves_filter_mode_keeping_query() {
        let mut app = test_app().await;
        app.input_mode = InputMode::Search;
        app.search_query = "dra".to_string();

        handle_filter_input(&mut app, KeyCode::Esc);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.search_query, "dra");
    }

    #[tokio::test]
    async fn test_filter_length_capped() {
        let mut app = test_app().await;
        app.input_mode = InputMode::Search;
        app.search_query = "a".repeat(MAX_FILTER_LENGTH);

        handle_filter_input(&mut app, KeyCode::Char('b'));

        assert_eq!(app.search_query.len(), MAX_FILTER_LENGTH);
    }

    #[tokio::test]
    async fn test_toggle_persists_and_clears_filters() {
        let mut app = test_app().await;
        app.books = Arc::new(vec![test_book(345, "Dracula")]);
        app.search_query = "dra".to_string();

        let (tx, _rx) = mpsc::channel(8);
        handle_catalog_input(&mut app, KeyCode::Char(' '), &tx)
            .await
            .unwrap();

        assert!(app.wishlist.contains(345));
        assert!(!app.has_active_filters());

        let stored = app.db.load_wishlist().await.unwrap();
        assert!(stored.contains(345));
    }

    #[tokio::test]
    async fn test_wishlist_remove_clamps_selection() {
        let mut app = test_app().await;
        app.books = Arc::new(vec![test_book(1, "Emma"), test_book(2, "Dracula")]);
        app.wishlist.toggle(1);
        app.wishlist.toggle(2);
        app.view = View::Wishlist;
        app.selected = 1;

        let (tx, _rx) = mpsc::channel(8);
        handle_wishlist_input(&mut app, KeyCode::Char(' '), &tx)
            .await
            .unwrap();

        assert!(!app.wishlist.contains(2));
        assert_eq!(app.selected, 0);
    }

    #[tokio::test]
    async fn test_prev_at_page_one_spawns_nothing() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(8);

        handle_catalog_input(&mut app, KeyCode::Char('p'), &tx)
            .await
            .unwrap();

        assert_eq!(app.page, 1);
        assert!(app.fetch_handle.is_none());
        assert!(!app.loading);
    }

    #[tokio::test]
    async fn test_quit_from_any_view() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(8);

        let action = handle_catalog_input(&mut app, KeyCode::Char('q'), &tx)
            .await
            .unwrap();
        assert!(matches!(action, Action::Quit));

        let action = handle_wishlist_input(&mut app, KeyCode::Char('q'), &tx)
            .await
            .unwrap();
        assert!(matches!(action, Action::Quit));

        assert!(matches!(
            handle_detail_input(&mut app, KeyCode::Char('q')),
            Action::Quit
        ));
    }
}
