use crate::app::{App, InputMode};
use crate::catalog::Book;
use crate::storage::Wishlist;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Hearts marking wishlist membership, filled for members.
const HEART_FILLED: &str = "\u{2665}";
const HEART_EMPTY: &str = "\u{2661}";

/// Build one display row per book, in list order.
///
/// Each row carries a wishlist heart, the truncated title, the first
/// author, and the first subject. Kept free of ratatui state so row
/// content is testable without a terminal.
pub(super) fn book_rows(books: &[&Book], wishlist: &Wishlist, width: u16) -> Vec<String> {
    // Leave room for the heart, padding, and author/genre columns
    let title_width = (width as usize).saturating_sub(6).max(10) / 2;

    books
        .iter()
        .map(|book| {
            let heart = if wishlist.contains(book.id) {
                HEART_FILLED
            } else {
                HEART_EMPTY
            };
            let title = truncate_to_width(&book.title, title_width);
            format!(
                "{} {}  {} | {}",
                heart,
                title,
                book.author_name(),
                book.genre()
            )
        })
        .collect()
}

/// Render the catalog list panel.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let books = app.visible_books();
    let rows = book_rows(&books, &app.wishlist, area.width);

    let items: Vec<ListItem> = if rows.is_empty() {
        let msg = if app.loading {
            "Loading..."
        } else if app.has_active_filters() {
            "No books match the filters"
        } else {
            "No books"
        };
        vec![ListItem::new(msg)]
    } else {
        rows.into_iter()
            .enumerate()
            .map(|(i, row)| {
                let style = if i == app.selected {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(Span::styled(row, style)))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(panel_title(app)),
    );

    f.render_widget(list, area);
}

/// Build the panel title, surfacing the page number and active filters.
fn panel_title(app: &App) -> String {
    let mut title = format!("Books - Page {}", app.page);

    match app.input_mode {
        InputMode::Search => title.push_str(&format!(" | Search: {}_", app.search_query)),
        InputMode::Genre => title.push_str(&format!(" | Genre: {}_", app.genre_filter)),
        InputMode::Normal => {
            if !app.search_query.is_empty() {
                title.push_str(&format!(" | Search: {}", app.search_query));
            }
            if !app.genre_filter.is_empty() {
                title.push_str(&format!(" | Genre: {}", app.genre_filter));
            }
        }
    }
    title
}
