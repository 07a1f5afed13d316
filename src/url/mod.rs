//! URL handling module for Stacksight
//!
//! This module turns raw user input into a canonical `https://…` URL and
//! decides whether the result is an acceptable analysis target.

mod normalize;
mod validate;

// Re-export main functions
pub use normalize::normalize_url;
pub use validate::is_valid_url;
