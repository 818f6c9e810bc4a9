use anyhow::Result;
use tracing::warn;

use super::schema::Database;

/// Preference key holding the wishlist as a JSON array of book IDs.
const WISHLIST_KEY: &str = "wishlist";

/// The set of wishlisted book IDs, kept in insertion order.
///
/// Persisted as a JSON array under a single preference key, so the whole
/// list is rewritten on every change. Wishlists are small (tens of books),
/// which keeps that trade-off cheap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wishlist {
    ids: Vec<i64>,
}

impl Wishlist {
    pub fn from_ids(ids: Vec<i64>) -> Self {
        Self { ids }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    /// Toggle a book's membership. Returns `true` if the book was added,
    /// `false` if it was removed.
    ///
    /// Removal clears every occurrence of the ID, so a list that picked up
    /// duplicates (e.g. written by an older build) heals on the next toggle.
    pub fn toggle(&mut self, id: i64) -> bool {
        if self.contains(id) {
            self.ids.retain(|x| *x != id);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Database {
    /// Load the wishlist from the preferences table.
    ///
    /// A missing key or an unparseable value yields an empty wishlist; the
    /// parse failure is logged and the stored value is left untouched until
    /// the next save overwrites it.
    pub async fn load_wishlist(&self) -> Result<Wishlist> {
        let Some(raw) = self.get_preference(WISHLIST_KEY).await? else {
            return Ok(Wishlist::default());
        };

        match serde_json::from_str::<Vec<i64>>(&raw) {
            Ok(ids) => Ok(Wishlist::from_ids(ids)),
            Err(e) => {
                warn!("Stored wishlist is not valid JSON, starting empty: {}", e);
                Ok(Wishlist::default())
            }
        }
    }

    /// Persist the wishlist, replacing the stored value wholesale.
    pub async fn save_wishlist(&self, wishlist: &Wishlist) -> Result<()> {
        let raw = serde_json::to_string(wishlist.ids())?;
        self.set_preference(WISHLIST_KEY, &raw).await
    }
}
