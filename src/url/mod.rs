//! URL handling module for Site-Ripple
//!
//! Scope decisions for discovered links live here. Links are compared as
//! plain strings against the crawl's base URL; no normalization of case,
//! query strings, fragments or dot segments is performed.

mod validate;

pub use validate::{is_in_scope, validate_link};
