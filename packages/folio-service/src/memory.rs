//! A [`RecordStore`] over an in-process list of records.
//!
//! Filtering and ordering follow the Postgres store, including the `id` tie-break, so search
//! behavior can be exercised without a database.

use std::sync::Mutex;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	BoxFuture, Error, RecordStore, Result,
	search::{SortValues, compare},
};
use folio_domain::{Kind, KindFilter, PublicationType, SortKey, TextField, slug};
use folio_storage::models::SearchRow;

#[derive(Debug, Clone)]
pub struct MemoryRecord {
	pub kind: Kind,
	pub row: SearchRow,
	pub published: bool,
	/// Searchable text that is not part of the search projection.
	pub body: Vec<(TextField, String)>,
}
impl MemoryRecord {
	/// A published record with the non-null columns of `kind` set to empty values.
	pub fn new(kind: Kind, title: &str, year: Option<i32>, created_at: OffsetDateTime) -> Self {
		let id = Uuid::new_v4();
		let mut row = SearchRow {
			id,
			slug: format!("{}-{}", slug::slugify(title), id.simple()),
			title: title.to_string(),
			year,
			created_at,
			journal: None,
			tags: None,
			publication_type: None,
			publisher: None,
			amount: None,
			country: None,
			patent_no: None,
			issuer: None,
		};

		match kind {
			Kind::Article => {
				row.journal = Some(String::new());
				row.tags = Some(Vec::new());
			},
			Kind::Publication => {
				row.publication_type = Some(PublicationType::Book.as_str().to_string());
				row.tags = Some(Vec::new());
			},
			Kind::Grant => {},
			Kind::Patent => {
				row.country = Some(String::new());
				row.patent_no = Some(String::new());
			},
			Kind::Certification => row.issuer = Some(String::new()),
		}

		Self { kind, row, published: true, body: Vec::new() }
	}

	pub fn with_text(mut self, field: TextField, value: &str) -> Self {
		let value = value.to_string();

		match field {
			TextField::Title => self.row.title = value,
			TextField::Journal => self.row.journal = Some(value),
			TextField::Publisher => self.row.publisher = Some(value),
			TextField::Country => self.row.country = Some(value),
			TextField::PatentNo => self.row.patent_no = Some(value),
			TextField::Issuer => self.row.issuer = Some(value),
			TextField::Abstract | TextField::Description | TextField::Summary =>
				self.body.push((field, value)),
		}

		self
	}

	pub fn with_tags(mut self, tags: &[&str]) -> Self {
		self.row.tags = Some(tags.iter().map(ToString::to_string).collect());

		self
	}

	pub fn with_publication_type(mut self, publication_type: PublicationType) -> Self {
		self.row.publication_type = Some(publication_type.as_str().to_string());

		self
	}

	pub fn with_amount(mut self, amount: i64) -> Self {
		self.row.amount = Some(amount);

		self
	}

	pub fn unpublished(mut self) -> Self {
		self.published = false;

		self
	}

	fn text(&self, field: TextField) -> Option<&str> {
		match field {
			TextField::Title => Some(self.row.title.as_str()),
			TextField::Journal => self.row.journal.as_deref(),
			TextField::Publisher => self.row.publisher.as_deref(),
			TextField::Country => self.row.country.as_deref(),
			TextField::PatentNo => self.row.patent_no.as_deref(),
			TextField::Issuer => self.row.issuer.as_deref(),
			TextField::Abstract | TextField::Description | TextField::Summary => self
				.body
				.iter()
				.find(|(candidate, _)| *candidate == field)
				.map(|(_, value)| value.as_str()),
		}
	}

	fn matches(&self, filter: &KindFilter) -> bool {
		if self.kind != filter.kind || !self.published {
			return false;
		}
		if filter.term.is_some()
			&& !filter
				.text_fields()
				.iter()
				.filter_map(|field| self.text(*field))
				.any(|value| filter.matches_term(value))
		{
			return false;
		}
		if filter.year.is_some() && self.row.year != filter.year {
			return false;
		}
		if let Some(tag) = filter.tag.as_ref()
			&& !self.row.tags.as_ref().is_some_and(|tags| tags.contains(tag))
		{
			return false;
		}
		if let Some(publication_type) = filter.publication_type
			&& self.row.publication_type.as_deref() != Some(publication_type.as_str())
		{
			return false;
		}

		true
	}

	fn sort_values(&self) -> SortValues<'_> {
		SortValues { year: self.row.year, title: &self.row.title, created_at: self.row.created_at }
	}
}

#[derive(Debug, Default)]
pub struct MemoryStore {
	records: Vec<MemoryRecord>,
	failing: Option<Kind>,
	fetches: Mutex<Vec<(Kind, u64)>>,
}
impl MemoryStore {
	pub fn new(records: Vec<MemoryRecord>) -> Self {
		Self { records, ..Self::default() }
	}

	/// Makes every call for `kind` fail with a storage error.
	pub fn failing_on(mut self, kind: Kind) -> Self {
		self.failing = Some(kind);

		self
	}

	/// `(kind, limit)` of every `find_many` call so far.
	pub fn fetches(&self) -> Vec<(Kind, u64)> {
		self.fetches.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	fn check(&self, kind: Kind) -> Result<()> {
		if self.failing == Some(kind) {
			return Err(Error::Storage { message: format!("{kind} store is unavailable.") });
		}

		Ok(())
	}

	fn matching(&self, filter: &KindFilter) -> impl Iterator<Item = &MemoryRecord> {
		self.records.iter().filter(move |record| record.matches(filter))
	}
}
impl RecordStore for MemoryStore {
	fn count<'a>(&'a self, filter: &'a KindFilter) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			self.check(filter.kind)?;

			Ok(self.matching(filter).count() as u64)
		})
	}

	fn find_many<'a>(
		&'a self,
		filter: &'a KindFilter,
		order: &'a [SortKey],
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<SearchRow>>> {
		Box::pin(async move {
			self.check(filter.kind)?;
			self.fetches.lock().unwrap_or_else(|err| err.into_inner()).push((filter.kind, limit));

			let mut rows = self.matching(filter).collect::<Vec<_>>();

			rows.sort_by(|a, b| {
				compare(order, a.sort_values(), b.sort_values()).then(a.row.id.cmp(&b.row.id))
			});

			Ok(rows
				.into_iter()
				.take(usize::try_from(limit).unwrap_or(usize::MAX))
				.map(|record| record.row.clone())
				.collect())
		})
	}
}
