use crate::catalog::{filter_books, Book, CatalogClient, CatalogError};
use crate::storage::{Database, Wishlist};
use anyhow::Result;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::time::Instant;

// ============================================================================
// View and Input Enums
// ============================================================================

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Catalog,  // Paginated catalog with search and genre filters
    Wishlist, // Wishlisted books only
    Detail,   // Full-screen single book view
}

/// Where keyboard input is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the title search box.
    Search,
    /// Typing into the genre filter box.
    Genre,
}

// ============================================================================
// Detail State and Event Types
// ============================================================================

/// Loading state for the book detail view.
#[derive(Debug, Clone)]
pub enum DetailState {
    Idle,
    Loading { book_id: i64 },
    Loaded(Book),
}

/// Events from background fetch tasks.
pub enum AppEvent {
    /// A page of books arrived.
    ///
    /// Fields:
    /// - `page`: The page number requested, or None for the unpaged default
    ///   fetch used to populate the wishlist view
    /// - `generation`: The generation counter when this fetch was spawned
    /// - `result`: The books or error from fetching
    CatalogLoaded {
        page: Option<u32>,
        generation: u64,
        result: Result<Vec<Book>, CatalogError>,
    },
    /// A single book arrived for the detail view.
    BookLoaded {
        book_id: i64,
        generation: u64,
        result: Result<Book, CatalogError>,
    },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub db: Database,
    pub catalog: CatalogClient,

    /// Book list wrapped in Arc for O(1) cloning into background tasks.
    /// Replaced wholesale when a new page arrives.
    pub books: Arc<Vec<Book>>,
    pub wishlist: Wishlist,

    // UI State
    pub view: View,
    /// View to return to when leaving the detail view.
    pub return_view: View,
    pub input_mode: InputMode,
    /// Current catalog page, 1-based.
    pub page: u32,
    pub selected: usize,

    /// Title search query, stored lowercased so filtering never re-lowers it.
    pub search_query: String,
    /// Genre filter, matched case-sensitively against subject strings.
    pub genre_filter: String,

    pub detail: DetailState,

    /// True while a catalog fetch is in flight.
    pub loading: bool,

    /// Current frame of the loading spinner animation (0-9).
    pub spinner_frame: usize,

    // Status message with expiry. Cow avoids allocation for static literals.
    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,

    /// Generation counter for catalog fetches.
    ///
    /// Incremented each time a fetch is spawned. The spawned task includes
    /// this generation in its response. When handling CatalogLoaded we
    /// reject responses where the generation doesn't match, so a slow page
    /// 2 response can never overwrite a faster page 3 response.
    pub fetch_generation: u64,

    /// Handle to the current catalog fetch for cancellation.
    ///
    /// When a new fetch is spawned, any previous fetch is aborted via this
    /// handle.
    pub fetch_handle: Option<tokio::task::JoinHandle<()>>,

    /// Generation counter for detail fetches, same discipline as above.
    pub detail_generation: u64,

    /// Handle to the current detail fetch for cancellation.
    pub detail_handle: Option<tokio::task::JoinHandle<()>>,
}

impl App {
    pub fn new(db: Database, catalog: CatalogClient, wishlist: Wishlist) -> Self {
        Self {
            db,
            catalog,
            books: Arc::new(Vec::new()),
            wishlist,
            view: View::Catalog,
            return_view: View::Catalog,
            input_mode: InputMode::Normal,
            page: 1,
            selected: 0,
            search_query: String::new(),
            genre_filter: String::new(),
            detail: DetailState::Idle,
            loading: false,
            spinner_frame: 0,
            status_message: None,
            needs_redraw: true,
            fetch_generation: 0,
            fetch_handle: None,
            detail_generation: 0,
            detail_handle: None,
        }
    }

    /// Books visible in the current view after filtering.
    ///
    /// The catalog view applies both active filters; the wishlist view
    /// ignores them and filters by membership instead.
    pub fn visible_books(&self) -> Vec<&Book> {
        match self.view {
            View::Wishlist => self
                .books
                .iter()
                .filter(|b| self.wishlist.contains(b.id))
                .collect(),
            _ => filter_books(&self.books, &self.search_query, &self.genre_filter),
        }
    }

    /// Get the currently selected visible book (bounds-checked).
    pub fn selected_book(&self) -> Option<&Book> {
        self.visible_books().get(self.selected).copied()
    }

    /// Whether either filter is active.
    pub fn has_active_filters(&self) -> bool {
        !self.search_query.is_empty() || !self.genre_filter.is_empty()
    }

    /// Clear both filters and reset the selection.
    pub fn clear_filters(&mut self) {
        self.search_query.clear();
        self.genre_filter.clear();
        self.selected = 0;
    }

    /// Advance to the next page. The API reports how many pages exist but
    /// paging past the end just yields an error page, so the counter is
    /// unbounded here and the fetch reports the failure.
    pub fn next_page(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    /// Step back one page. Returns false when already at page 1, in which
    /// case no fetch should be spawned.
    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Clamp the selection to the visible list.
    ///
    /// Call this after any operation that may shrink the visible set, such
    /// as a filter keystroke, a page replacing the book list, or a wishlist
    /// removal in the wishlist view.
    pub fn clamp_selection(&mut self) {
        let len = self.visible_books().len();
        self.selected = if len == 0 {
            0
        } else {
            self.selected.min(len - 1)
        };
    }

    /// Navigate up in the visible list
    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Navigate down in the visible list
    pub fn nav_down(&mut self) {
        let len = self.visible_books().len();
        if len > 0 {
            self.selected = self.selected.saturating_add(1).min(len - 1);
        }
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Enter the detail view for a book, remembering where to return.
    pub fn enter_detail(&mut self, book_id: i64) {
        if self.view != View::Detail {
            self.return_view = self.view;
        }
        self.view = View::Detail;
        self.detail = DetailState::Loading { book_id };
        self.needs_redraw = true;
    }

    /// Leave the detail view back to the originating list.
    pub fn exit_detail(&mut self) {
        // Abort any in-flight detail fetch to prevent orphaned tasks
        if let Some(handle) = self.detail_handle.take() {
            handle.abort();
            tracing::debug!("Aborted detail fetch on view exit");
        }

        self.view = self.return_view;
        self.detail = DetailState::Idle;
        self.needs_redraw = true;
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Abort all in-flight async tasks on App drop.
///
/// Ensures proper cleanup when the application exits, preventing orphaned
/// tokio tasks from continuing to run after the main event loop terminates.
impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted catalog fetch on App drop");
        }
        if let Some(handle) = self.detail_handle.take() {
            handle.abort();
            tracing::debug!("Aborted detail fetch on App drop");
        }
    }
}

// ============================================================================
// HTTP Client Configuration
// ============================================================================

/// Build the shared HTTP client with connection pooling and keepalive.
pub fn build_http_client(timeout: std::time::Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(2)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .tcp_keepalive(std::time::Duration::from_secs(60))
        .timeout(timeout)
        .build()?;
    Ok(client)
}
