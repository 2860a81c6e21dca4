//! Field identifier checks.
//!
//! Query expressions may only name fields with plain identifiers; anything
//! else (quoted names, paths, operators) is refused before it reaches query
//! translation.

use regex::Regex;
use std::sync::OnceLock;

const PLAIN_IDENTIFIER: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// Compiled identifier pattern, built on first use.
fn plain_identifier() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| match Regex::new(PLAIN_IDENTIFIER) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(
                pattern = PLAIN_IDENTIFIER,
                error = %e,
                "Invalid identifier pattern, treating every name as non-matching"
            );
            None
        }
    })
    .as_ref()
}

/// Check whether `name` is a plain identifier: an ASCII letter or underscore
/// followed by letters, digits or underscores.
///
/// # Examples
///
/// ```
/// use relquery_core::is_plain_identifier;
///
/// assert!(is_plain_identifier("title"));
/// assert!(is_plain_identifier("_private2"));
/// assert!(!is_plain_identifier("2fast"));
/// assert!(!is_plain_identifier("a.b"));
/// ```
#[inline]
pub fn is_plain_identifier(name: &str) -> bool {
    plain_identifier().is_some_and(|re| re.is_match(name))
}
