use folio_domain::{Kind, KindFilter, PublicationType};

/// Filter inputs shared by every kind of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
	pub term: Option<String>,
	pub year: Option<i32>,
	pub tag: Option<String>,
	pub publication_type: Option<PublicationType>,
}

/// Narrows `criteria` to what `kind` understands.
///
/// Blank terms are dropped, tags only reach articles and publications, and the publication type
/// only reaches publications. Never fails.
pub fn build_filter(kind: Kind, criteria: &Criteria) -> KindFilter {
	let term = criteria
		.term
		.as_deref()
		.map(str::trim)
		.filter(|term| !term.is_empty())
		.map(ToString::to_string);
	let tag = criteria.tag.clone().filter(|_| kind.supports_tags());
	let publication_type = criteria.publication_type.filter(|_| kind.supports_type());

	KindFilter { kind, term, year: criteria.year, tag, publication_type }
}
