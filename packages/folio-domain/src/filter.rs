use crate::kind::{Kind, PublicationType, TextField};

/// A predicate over the published records of one kind.
///
/// Every populated field narrows the match; `None` means the filter is absent. Builders only
/// populate fields the kind understands, so a store can translate the filter without checking
/// applicability again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindFilter {
	pub kind: Kind,
	/// Case-insensitive substring, ORed across `kind.text_fields()`.
	pub term: Option<String>,
	pub year: Option<i32>,
	pub tag: Option<String>,
	pub publication_type: Option<PublicationType>,
}
impl KindFilter {
	/// Matches every published record of `kind`.
	pub fn all(kind: Kind) -> Self {
		Self { kind, term: None, year: None, tag: None, publication_type: None }
	}

	pub fn text_fields(&self) -> &'static [TextField] {
		self.kind.text_fields()
	}

	pub fn matches_term(&self, value: &str) -> bool {
		match self.term.as_deref() {
			Some(term) => value.to_lowercase().contains(&term.to_lowercase()),
			None => true,
		}
	}
}
