use serde::Deserialize;
use std::collections::HashMap;

/// Fallback text for missing authors and subjects.
pub const UNKNOWN: &str = "Unknown";

/// Format key for the cover image URL.
const COVER_FORMAT: &str = "image/jpeg";
/// Format key for the plain-text download URL.
const DOWNLOAD_FORMAT: &str = "application/octet-stream";

/// A book author as returned by the catalog API.
///
/// The API also carries birth/death years; only the name is consumed here,
/// and unknown fields are ignored by serde.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Author {
    pub name: String,
}

/// One book record from the catalog API.
///
/// `subjects` doubles as the ad hoc genre list: free-text strings, not a
/// controlled vocabulary. `formats` maps MIME types to URLs; any entry may
/// be absent.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub formats: HashMap<String, String>,
}

impl Book {
    /// First author's name, or "Unknown" when the author list is empty.
    pub fn author_name(&self) -> &str {
        self.authors.first().map(|a| a.name.as_str()).unwrap_or(UNKNOWN)
    }

    /// First subject (displayed as the genre), or "Unknown".
    pub fn genre(&self) -> &str {
        self.subjects.first().map(String::as_str).unwrap_or(UNKNOWN)
    }

    /// Cover image URL, if the API exposed one.
    pub fn cover_url(&self) -> Option<&str> {
        self.formats.get(COVER_FORMAT).map(String::as_str)
    }

    /// Plain-text download URL, if the API exposed one.
    pub fn download_url(&self) -> Option<&str> {
        self.formats.get(DOWNLOAD_FORMAT).map(String::as_str)
    }
}

/// One page of listing results. The API also returns `count`/`next`/
/// `previous`; pagination here is a bare page counter, so those are ignored.
#[derive(Debug, Deserialize)]
pub struct BookPage {
    #[serde(default)]
    pub results: Vec<Book>,
}

/// Client-side filter over the in-memory page cache.
///
/// A book matches when its lowercased title contains `search` (which the
/// caller keeps lowercased) AND either `genre` is empty or any subject
/// contains `genre` as a case-sensitive substring. Never mutates the cache;
/// output preserves input order.
pub fn filter_books<'a>(books: &'a [Book], search: &str, genre: &str) -> Vec<&'a Book> {
    books
        .iter()
        .filter(|book| {
            let matches_search = book.title.to_lowercase().contains(search);
            let matches_genre =
                genre.is_empty() || book.subjects.iter().any(|s| s.contains(genre));
            matches_search && matches_genre
        })
        .collect()
}
