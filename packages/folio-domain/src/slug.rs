use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";

/// Derives a URL-safe slug: accents are folded, ASCII alphanumerics are lowercased, and every
/// other run of characters becomes a single `-`. Returns an empty string when nothing survives.
pub fn slugify(input: &str) -> String {
	let mut slug = String::with_capacity(input.len());
	let mut pending_dash = false;

	for ch in input.nfkd().filter(|ch| !is_combining_mark(*ch)) {
		if ch.is_ascii_alphanumeric() {
			if pending_dash && !slug.is_empty() {
				slug.push('-');
			}

			pending_dash = false;

			slug.push(ch.to_ascii_lowercase());
		} else {
			pending_dash = true;
		}
	}

	slug
}

pub fn is_valid_slug(slug: &str) -> bool {
	Regex::new(SLUG_PATTERN).map(|re| re.is_match(slug)).unwrap_or(false)
}
