//! Main event loop for the TUI.
//!
//! This module contains the core event loop that multiplexes terminal input,
//! background fetch events, and periodic ticks. It also owns the fetch
//! spawner functions so the generation/abort discipline lives in one place.

use crate::app::{App, AppEvent, DetailState};
use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::input::handle_input;
use super::render::render;

/// Result of handling a key press event.
///
/// Returned by input handlers to signal whether the application should
/// continue running or terminate gracefully.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex three event sources:
/// - **Terminal input**: Key presses from crossterm's async event stream
/// - **Background tasks**: Catalog and detail fetches via the `AppEvent` channel
/// - **Periodic tick**: 250ms timer for status expiry and the spinner
///
/// # Panic Safety
///
/// Installs a panic hook that restores terminal state before unwinding,
/// ensuring the terminal is not left in raw mode on panic.
///
/// # Returns
///
/// Returns `Ok(())` on graceful exit (user quit), or an error if terminal
/// setup fails.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();

    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    // Signal handlers for graceful shutdown (Unix only)
    // On non-Unix platforms, these become pending futures that never complete
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        // Only render when state has changed
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        // Clear expired status messages and trigger redraw if cleared
        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain all pending app events before handling more input so fetch
        // results are processed promptly even during rapid typing.
        while let Ok(event) = event_rx.try_recv() {
            app.needs_redraw = true;
            handle_app_event(app, event);
        }

        // Platform-specific signal futures
        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;  // Process in order listed for predictable behavior

            // Signal handlers for graceful shutdown (highest priority)
            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            // Terminal input events
            maybe_event = event_stream.next() => {
                if let Some(Ok(Event::Key(key))) = maybe_event {
                    app.needs_redraw = true;
                    match handle_input(app, key.code, key.modifiers, &event_tx).await {
                        Ok(Action::Quit) => break,
                        Ok(Action::Continue) => {}
                        Err(e) => app.set_status(format!("Error: {}", e)),
                    }
                }
            }

            // Background fetch events (blocking recv for when queue was empty)
            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                handle_app_event(app, event);
            }

            // Periodic tick for status expiry and spinner animation
            _ = tick_interval.tick() => {
                handle_tick(app);
            }
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Number of frames in the loading spinner animation.
const SPINNER_FRAMES: usize = 10;

/// Animate the spinner while a fetch is in flight.
fn handle_tick(app: &mut App) {
    let detail_loading = matches!(app.detail, DetailState::Loading { .. });
    if app.loading || detail_loading {
        app.spinner_frame = (app.spinner_frame + 1) % SPINNER_FRAMES;
        app.needs_redraw = true;
    }
}

/// Spawn a background fetch for a numbered catalog page.
///
/// Aborts any in-flight catalog fetch first, then bumps the generation
/// counter so a stale response from the aborted task (already queued on the
/// channel) is discarded by the event handler.
pub fn spawn_page_fetch(app: &mut App, page: u32, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(handle) = app.fetch_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous catalog fetch");
    }

    app.fetch_generation = app.fetch_generation.wrapping_add(1);
    let generation = app.fetch_generation;
    app.loading = true;

    let catalog = app.catalog.clone();
    let tx = event_tx.clone();

    tracing::debug!(page, generation, "Spawning catalog page fetch");

    app.fetch_handle = Some(tokio::spawn(async move {
        let result = catalog.fetch_page(page).await;
        let event = AppEvent::CatalogLoaded {
            page: Some(page),
            generation,
            result,
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send catalog page (receiver dropped)");
        }
    }));
}

/// Spawn a background fetch for the unpaged default book list.
///
/// Used to populate the wishlist view when the app starts there and no
/// catalog page has been loaded yet. The resulting event carries
/// `page: None` so the page counter is left alone.
pub fn spawn_default_fetch(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(handle) = app.fetch_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous catalog fetch");
    }

    app.fetch_generation = app.fetch_generation.wrapping_add(1);
    let generation = app.fetch_generation;
    app.loading = true;

    let catalog = app.catalog.clone();
    let tx = event_tx.clone();

    tracing::debug!(generation, "Spawning default book list fetch");

    app.fetch_handle = Some(tokio::spawn(async move {
        let result = catalog.fetch_default_page().await;
        let event = AppEvent::CatalogLoaded {
            page: None,
            generation,
            result,
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send book list (receiver dropped)");
        }
    }));
}

/// Spawn a background fetch for a single book's details.
pub fn spawn_book_fetch(app: &mut App, book_id: i64, event_tx: &mpsc::Sender<AppEvent>) {
    if let Some(handle) = app.detail_handle.take() {
        handle.abort();
        tracing::debug!("Aborted previous detail fetch");
    }

    app.detail_generation = app.detail_generation.wrapping_add(1);
    let generation = app.detail_generation;

    let catalog = app.catalog.clone();
    let tx = event_tx.clone();

    tracing::debug!(book_id, generation, "Spawning book detail fetch");

    app.detail_handle = Some(tokio::spawn(async move {
        let result = catalog.fetch_book(book_id).await;
        let event = AppEvent::BookLoaded {
            book_id,
            generation,
            result,
        };

        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, "Failed to send book detail (receiver dropped)");
        }
    }));
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
