use crate::app::{App, DetailState};
use crate::catalog::Book;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Build the detail body lines for a loaded book.
///
/// Pure so the layout of the detail pane is testable without a terminal.
pub(super) fn detail_lines(book: &Book) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            book.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("by {}", book.author_name())),
        Line::from(""),
        Line::from(format!("Book ID: {}", book.id)),
        Line::from(format!("Genre:   {}", book.genre())),
    ];

    if !book.subjects.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Subjects",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        for subject in &book.subjects {
            lines.push(Line::from(format!("  {}", subject)));
        }
    }

    lines.push(Line::from(""));
    match book.download_url() {
        Some(url) => lines.push(Line::from(format!("Download: {}", url))),
        None => lines.push(Line::from(Span::styled(
            "No download link available",
            Style::default().fg(Color::DarkGray),
        ))),
    }
    match book.cover_url() {
        Some(url) => lines.push(Line::from(format!("Cover:    {}", url))),
        None => {}
    }

    lines
}

/// Render the book detail view.
pub(super) fn render(f: &mut Frame, app: &App, area: Rect) {
    let (title, lines) = match &app.detail {
        DetailState::Idle => (
            " Book ".to_string(),
            vec![Line::from("Nothing loaded. Press Esc to go back.")],
        ),
        DetailState::Loading { book_id } => (
            format!(" Book {} ", book_id),
            vec![Line::from(format!(
                "{} Loading...",
                spinner_glyph(app.spinner_frame)
            ))],
        ),
        DetailState::Loaded(book) => (format!(" Book {} ", book.id), detail_lines(book)),
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

/// Spinner glyph for the current animation frame.
pub(super) fn spinner_glyph(frame: usize) -> char {
    const FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
    FRAMES[frame % FRAMES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Author;
    use std::collections::HashMap;

    fn frankenstein() -> Book {
        let mut formats = HashMap::new();
        formats.insert(
            "image/jpeg".to_string(),
            "https://www.gutenberg.org/cache/epub/84/pg84.cover.jpg".to_string(),
        );
        formats.insert(
            "application/octet-stream".to_string(),
            "https://www.gutenberg.org/files/84/84-0.zip".to_string(),
        );
        Book {
            id: 84,
            title: "Frankenstein; Or, The Modern Prometheus".to_string(),
            authors: vec![Author {
                name: "Shelley, Mary Wollstonecraft".to_string(),
            }],
            subjects: vec!["Horror tales".to_string(), "Science fiction".to_string()],
            formats,
        }
    }

    fn flat(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_detail_lines_include_core_fields() {
        let text = flat(&detail_lines(&frankenstein()));

        assert!(text.contains("Frankenstein"));
        assert!(text.contains("Shelley, Mary Wollstonecraft"));
        assert!(text.contains("Book ID: 84"));
        assert!(text.contains("Horror tales"));
        assert!(text.contains("84-0.zip"));
        assert!(text.contains("pg84.cover.jpg"));
    }

    #[test]
    fn test_detail_lines_without_links() {
        let mut book = frankenstein();
        book.formats.clear();

        let text = flat(&detail_lines(&book));

        assert!(text.contains("No download link available"));
        assert!(!text.contains("Cover:"));
    }

    #[test]
    fn test_missing_author_shows_unknown() {
        let mut book = frankenstein();
        book.authors.clear();

        let text = flat(&detail_lines(&book));

        assert!(text.contains("by Unknown"));
    }

    #[test]
    fn test_spinner_wraps_around() {
        assert_eq!(spinner_glyph(0), spinner_glyph(10));
    }
}
