use regex::Regex;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const HTTP_URL_PATTERN: &str = r"^https?://[^\s/?#]+[^\s]*$";

pub fn is_email(value: &str) -> bool {
	Regex::new(EMAIL_PATTERN).map(|re| re.is_match(value)).unwrap_or(false)
}

pub fn is_http_url(value: &str) -> bool {
	Regex::new(HTTP_URL_PATTERN).map(|re| re.is_match(value)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn email_requires_domain_with_dot() {
		assert!(is_email("prof@university.edu"));
		assert!(!is_email("prof@localhost"));
		assert!(!is_email("not an email"));
	}

	#[test]
	fn url_requires_http_scheme_and_host() {
		assert!(is_http_url("https://doi.org/10.1000/182"));
		assert!(is_http_url("http://example.org"));
		assert!(!is_http_url("ftp://example.org/file"));
		assert!(!is_http_url("https://"));
	}
}
