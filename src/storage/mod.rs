mod preferences;
mod schema;
mod types;
mod wishlist;

pub use schema::Database;
pub use types::DatabaseError;
pub use wishlist::Wishlist;
