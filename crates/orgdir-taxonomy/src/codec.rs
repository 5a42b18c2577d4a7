//! Path codec
//!
//! Turns free-text activity names into canonical path segments. The mapping
//! is a pure function: transliterate to ASCII, lowercase, collapse whitespace
//! runs into a single underscore, then drop everything outside `[a-z0-9_]`.

use crate::error::TaxonomyError;
use deunicode::deunicode;

/// Map a name to its slug
///
/// Total and deterministic; may return an empty or degenerate string for
/// names without letters or digits. Use [`encode`] when the result must be a
/// usable segment.
#[must_use]
pub fn slugify(name: &str) -> String {
    let ascii = deunicode(name).to_ascii_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    let mut gap = false;

    for ch in ascii.trim().chars() {
        if ch.is_whitespace() {
            gap = true;
            continue;
        }
        if gap {
            slug.push('_');
            gap = false;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' {
            slug.push(ch);
        }
    }

    slug
}

/// Encode a name into a path segment
///
/// Idempotent on its own output: `encode(&encode(x)?) == encode(x)`.
///
/// # Errors
/// Returns [`TaxonomyError::InvalidInput`] if the slug has no letter or digit
pub fn encode(name: &str) -> Result<String, TaxonomyError> {
    let segment = slugify(name);
    if segment.bytes().any(|b| b.is_ascii_alphanumeric()) {
        Ok(segment)
    } else {
        tracing::debug!(name, "name has no encodable characters");
        Err(TaxonomyError::InvalidInput(format!(
            "name '{name}' has no letters or digits to encode"
        )))
    }
}
