use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
	Year,
	Title,
	CreatedAt,
}
impl SortField {
	pub const ALLOWED: [Self; 3] = [Self::Year, Self::Title, Self::CreatedAt];

	/// Name accepted in the `sort` query parameter.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Year => "year",
			Self::Title => "title",
			Self::CreatedAt => "createdAt",
		}
	}

	pub fn column(self) -> &'static str {
		match self {
			Self::Year => "year",
			Self::Title => "title",
			Self::CreatedAt => "created_at",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
	Asc,
	Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
	pub field: SortField,
	pub direction: Direction,
}
impl SortKey {
	pub const fn asc(field: SortField) -> Self {
		Self { field, direction: Direction::Asc }
	}

	pub const fn desc(field: SortField) -> Self {
		Self { field, direction: Direction::Desc }
	}
}

pub const DEFAULT_SORT: SortKey = SortKey::desc(SortField::CreatedAt);

/// Parses `"-year,title"` style input into an ordered tie-break chain.
///
/// Items are trimmed, a leading `-` selects descending order, and fields outside
/// [`SortField::ALLOWED`] are dropped. An empty result falls back to newest first.
pub fn parse_sort(raw: Option<&str>) -> Vec<SortKey> {
	let mut keys = Vec::new();

	for item in raw.unwrap_or_default().split(',').map(str::trim).filter(|item| !item.is_empty()) {
		let (name, direction) = match item.strip_prefix('-') {
			Some(name) => (name, Direction::Desc),
			None => (item, Direction::Asc),
		};
		let Some(field) = SortField::ALLOWED.into_iter().find(|field| field.as_str() == name)
		else {
			continue;
		};

		keys.push(SortKey { field, direction });
	}

	if keys.is_empty() {
		keys.push(DEFAULT_SORT);
	}

	keys
}
