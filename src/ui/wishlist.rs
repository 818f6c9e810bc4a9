use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use super::catalog::book_rows;

/// Render the wishlist panel.
///
/// Reuses the catalog row builder; `App::visible_books` already narrows
/// the list to wishlist members in this view, so every row here carries
/// a filled heart.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let books = app.visible_books();
    let rows = book_rows(&books, &app.wishlist, area.width);

    let items: Vec<ListItem> = if rows.is_empty() {
        let msg = if app.loading {
            "Loading..."
        } else if app.wishlist.is_empty() {
            "Wishlist is empty. Press Space on a book to add it."
        } else {
            // IDs are saved but none of them appear in the loaded page
            "No wishlisted books on the current page"
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
                ListItem::new(ratatui::text::Line::styled(row, style))
            })
            .collect()
    };

    let title = format!("Wishlist ({})", app.wishlist.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(list, area);
}
