use crate::app::{App, InputMode, View};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

use super::detail::spinner_glyph;

/// Render the status bar
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    // Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Use Cow to avoid allocations for static strings and borrowed messages
    let text: Cow<'_, str> = if app.loading {
        Cow::Owned(format!("{} Fetching books...", spinner_glyph(app.spinner_frame)))
    } else if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.input_mode != InputMode::Normal {
        Cow::Borrowed("Type to filter | ESC/ENTER done | Backspace edit")
    } else {
        // Static keybinding hints - zero allocation
        match app.view {
            View::Catalog => Cow::Borrowed(
                "[n/p]page [/]search [g]enre [Space]wishlist [w]ishlist view [Enter]detail [q]uit",
            ),
            View::Wishlist => {
                Cow::Borrowed("[Space]remove [Enter]detail [Esc/w]back [j/k]move [q]uit")
            }
            View::Detail => Cow::Borrowed("[o]pen download [c]over [Esc/b]back [q]uit"),
        }
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);

    let paragraph = Paragraph::new(text).style(style);
    f.render_widget(paragraph, area);
}
