//! Slug derivation for letters and letter types.
//!
//! Slugs are lowercase ASCII words joined by single hyphens. Letter slugs
//! must be unique; collisions get a `-1`, `-2`, ... suffix.

/// Lowercase and hyphenate `input`, dropping everything that is not ASCII
/// alphanumeric. Consecutive separators collapse to one hyphen.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    out
}

/// Find the first free slug derived from `base`, probing `base`, `base-1`,
/// `base-2`, ... against `taken`.
pub fn unique_slug(base: &str, mut taken: impl FnMut(&str) -> bool) -> String {
    let base = if base.is_empty() { "letter" } else { base };
    if !taken(base) {
        return base.to_string();
    }

    let mut counter = 1_u32;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
