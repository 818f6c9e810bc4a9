//! Utility functions for common operations.
//!
//! - **Text processing**: Unicode-aware width calculation and truncation for
//!   terminal rendering.
//! - **URL validation**: scheme checks before handing a URL to the system
//!   browser.

mod text;
mod url_validator;

pub use text::{display_width, truncate_to_width};
pub use url_validator::validate_url_for_open;
