//! Scheme extraction from store URIs
//!
//! A store URI is `[scheme ":"] rest`. Only the scheme is interpreted here;
//! everything after it belongs to the loader.

use crate::{Result, StoreError};

const DELIMITER: char = ':';

/// Extract the scheme token from `uri`
///
/// The token runs from the start of the string up to the first `:`. Without
/// a delimiter the whole string is a locator for `default_scheme`.
///
/// # Errors
///
/// Returns [`StoreError::SchemeTooLong`] if the token exceeds `max_len`
/// bytes. Over-long tokens are never truncated.
pub fn scheme_of<'a>(uri: &'a str, default_scheme: &'a str, max_len: usize) -> Result<&'a str> {
    match uri.find(DELIMITER) {
        Some(end) if end > max_len => Err(StoreError::SchemeTooLong { len: end, max: max_len }),
        Some(end) => Ok(&uri[..end]),
        None => Ok(default_scheme),
    }
}

/// Check that `scheme` is a well-formed scheme name
///
/// A scheme starts with an ASCII letter followed by letters, digits, `+`,
/// `-` or `.`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidScheme`] otherwise.
pub fn validate_scheme(scheme: &str) -> Result<()> {
    let mut chars = scheme.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidScheme(scheme.to_string()))
    }
}
