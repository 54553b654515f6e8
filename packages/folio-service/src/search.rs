//! Unified search across every record kind.
//!
//! Each kind is counted and fetched concurrently, the per-kind results are concatenated in
//! [`Kind::ALL`] order, stably re-sorted by the requested order, and sliced to the requested page.
//! Every kind fetches exactly `offset + pageSize` rows, which always contains every row of that
//! kind that can land on the page, so pages are exact. That window is capped by
//! `search.max_window`; deeper pages are rejected rather than approximated.

pub mod filter;
pub mod shape;

pub use filter::{Criteria, build_filter};
pub use shape::{Extra, SearchItem, shape};

use std::cmp::Ordering;

use futures::future;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
	Error, FolioService, RecordStore, Result,
	validation::{self, INVALID_QUERY, Validator},
};
use folio_domain::{
	Direction, Kind, PageMeta, Pagination, PublicationType, SortField, SortKey, sort,
};

/// Largest `pageSize` the search endpoint accepts.
pub const SEARCH_MAX_PAGE_SIZE: i64 = 50;

/// Raw query parameters as received.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
	pub q: Option<String>,
	pub kind: Option<String>,
	#[serde(rename = "type")]
	pub publication_type: Option<String>,
	pub year: Option<String>,
	pub tag: Option<String>,
	pub page: Option<String>,
	pub page_size: Option<String>,
	pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
	pub kinds: Vec<Kind>,
	pub criteria: Criteria,
	pub order: Vec<SortKey>,
	pub pagination: Pagination,
}
impl SearchQuery {
	/// Validates raw parameters. Every malformed field is reported, and a page reaching past
	/// `max_window` is rejected under `page`.
	pub fn from_params(params: &SearchParams, max_window: u32) -> Result<Self> {
		let mut validator = Validator::default();
		let kind = validator.parsed::<Kind>("kind", params.kind.as_deref());
		let publication_type =
			validator.parsed::<PublicationType>("type", params.publication_type.as_deref());
		let year = validator.integer("year", params.year.as_deref(), 0, i64::from(i32::MAX));
		let page = validator.integer("page", params.page.as_deref(), 1, i64::from(u32::MAX));
		let page_size =
			validator.integer("pageSize", params.page_size.as_deref(), 1, SEARCH_MAX_PAGE_SIZE);

		validator.finish(INVALID_QUERY)?;

		let pagination = Pagination::normalize(page, page_size);

		if pagination.window_end() > u64::from(max_window) {
			return Err(Error::validation(
				INVALID_QUERY,
				"page",
				format!("Only the first {max_window} results can be paged through; refine the query."),
			));
		}

		Ok(Self {
			kinds: kind.map_or_else(|| Kind::ALL.to_vec(), |kind| vec![kind]),
			criteria: Criteria {
				term: validation::optional_text(params.q.as_deref()),
				year: year.and_then(|year| i32::try_from(year).ok()),
				tag: validation::optional_text(params.tag.as_deref()),
				publication_type,
			},
			order: sort::parse_sort(params.sort.as_deref().map(str::trim)),
			pagination,
		})
	}

	/// Rows fetched per kind: everything up to the end of the requested page.
	pub fn take_per_kind(&self) -> u64 {
		self.pagination.window_end()
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
	pub data: Vec<SearchItem>,
	pub meta: PageMeta,
}

/// The fields a result can be ordered by.
#[derive(Debug, Clone, Copy)]
pub struct SortValues<'a> {
	pub year: Option<i32>,
	pub title: &'a str,
	pub created_at: OffsetDateTime,
}

impl SearchItem {
	pub fn sort_values(&self) -> SortValues<'_> {
		SortValues { year: self.year, title: &self.title, created_at: self.created_at }
	}
}

/// Compares by each key in turn. Titles compare bytewise and a missing year ranks below any year.
pub fn compare(order: &[SortKey], a: SortValues<'_>, b: SortValues<'_>) -> Ordering {
	for key in order {
		let ordering = match key.field {
			SortField::Year => a.year.cmp(&b.year),
			SortField::Title => a.title.cmp(b.title),
			SortField::CreatedAt => a.created_at.cmp(&b.created_at),
		};
		let ordering = match key.direction {
			Direction::Asc => ordering,
			Direction::Desc => ordering.reverse(),
		};

		if ordering != Ordering::Equal {
			return ordering;
		}
	}

	Ordering::Equal
}

/// Runs a validated query against `store`. Any store failure fails the whole search.
pub async fn run(store: &dyn RecordStore, query: &SearchQuery) -> Result<SearchResponse> {
	let take = query.take_per_kind();
	let per_kind = future::try_join_all(query.kinds.iter().map(|&kind| {
		let filter = build_filter(kind, &query.criteria);

		async move {
			let (count, rows) =
				tokio::try_join!(store.count(&filter), store.find_many(&filter, &query.order, take))?;
			let items = rows.into_iter().map(|row| shape(kind, row)).collect::<Vec<_>>();

			Ok::<_, Error>((count, items))
		}
	}))
	.await?;
	let total = per_kind.iter().map(|(count, _)| count).sum::<u64>();
	let mut merged = per_kind.into_iter().flat_map(|(_, items)| items).collect::<Vec<_>>();

	// Stable, so equal keys keep kind order and each kind's own store order.
	merged.sort_by(|a, b| compare(&query.order, a.sort_values(), b.sort_values()));

	let kind_label = match query.kinds.as_slice() {
		[kind] => kind.as_str(),
		_ => "all",
	};

	metrics::counter!("search_requests_total", "kind" => kind_label).increment(1);
	metrics::histogram!("search_candidates").record(merged.len() as f64);

	let offset = usize::try_from(query.pagination.offset()).unwrap_or(usize::MAX);
	let page_size = usize::try_from(query.pagination.page_size).unwrap_or(usize::MAX);
	let candidates = merged.len();
	let data = merged.into_iter().skip(offset).take(page_size).collect::<Vec<_>>();

	tracing::debug!(
		kinds = query.kinds.len(),
		take_per_kind = take,
		candidates,
		total,
		returned = data.len(),
		"Search completed."
	);

	Ok(SearchResponse { data, meta: PageMeta::new(query.pagination, total) })
}

impl FolioService {
	pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
		let query = SearchQuery::from_params(params, self.cfg.search.max_window)?;

		run(self.store.as_ref(), &query).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn params(pairs: &[(&str, &str)]) -> SearchParams {
		let mut params = SearchParams::default();

		for (key, value) in pairs {
			let value = Some(value.to_string());

			match *key {
				"q" => params.q = value,
				"kind" => params.kind = value,
				"type" => params.publication_type = value,
				"year" => params.year = value,
				"tag" => params.tag = value,
				"page" => params.page = value,
				"pageSize" => params.page_size = value,
				"sort" => params.sort = value,
				other => panic!("Unknown parameter {other}."),
			}
		}

		params
	}

	#[test]
	fn defaults_cover_every_kind() {
		let query = SearchQuery::from_params(&params(&[]), 1_000).expect("Expected valid query.");

		assert_eq!(query.kinds, Kind::ALL.to_vec());
		assert_eq!(query.order, vec![SortKey::desc(SortField::CreatedAt)]);
		assert_eq!(query.pagination, Pagination { page: 1, page_size: 20 });
		assert_eq!(query.take_per_kind(), 20);
	}

	#[test]
	fn typed_parameters_are_parsed() {
		let query = SearchQuery::from_params(
			&params(&[
				("q", "  quantum "),
				("kind", "publication"),
				("type", "Book"),
				("year", "2021"),
				("tag", " physics "),
				("page", "3"),
				("pageSize", "10"),
				("sort", "-year,title"),
			]),
			1_000,
		)
		.expect("Expected valid query.");

		assert_eq!(query.kinds, vec![Kind::Publication]);
		assert_eq!(
			query.criteria,
			Criteria {
				term: Some("quantum".to_string()),
				year: Some(2021),
				tag: Some("physics".to_string()),
				publication_type: Some(PublicationType::Book),
			}
		);
		assert_eq!(query.take_per_kind(), 30);
	}

	#[test]
	fn every_malformed_field_is_reported() {
		let err = SearchQuery::from_params(
			&params(&[("kind", "poem"), ("year", "-1"), ("pageSize", "51"), ("page", "x")]),
			1_000,
		)
		.expect_err("Expected validation failure.");
		let Error::Validation { message, fields } = err else {
			panic!("Expected validation failure.");
		};

		assert_eq!(message, INVALID_QUERY);
		assert_eq!(
			fields.keys().map(String::as_str).collect::<Vec<_>>(),
			vec!["kind", "page", "pageSize", "year"]
		);
	}

	#[test]
	fn windows_past_the_ceiling_are_rejected() {
		assert!(SearchQuery::from_params(&params(&[("page", "20"), ("pageSize", "50")]), 1_000).is_ok());

		let err = SearchQuery::from_params(&params(&[("page", "21"), ("pageSize", "50")]), 1_000)
			.expect_err("Expected window rejection.");

		assert!(matches!(err, Error::Validation { ref fields, .. } if fields.contains_key("page")));
	}

	#[test]
	fn missing_year_sorts_lowest() {
		let at = OffsetDateTime::UNIX_EPOCH;
		let dated = SortValues { year: Some(1990), title: "a", created_at: at };
		let undated = SortValues { year: None, title: "a", created_at: at };

		assert_eq!(compare(&[SortKey::asc(SortField::Year)], undated, dated), Ordering::Less);
		assert_eq!(compare(&[SortKey::desc(SortField::Year)], undated, dated), Ordering::Greater);
		assert_eq!(compare(&[SortKey::asc(SortField::Year)], undated, undated), Ordering::Equal);
	}

	#[test]
	fn later_keys_break_ties() {
		let at = OffsetDateTime::UNIX_EPOCH;
		let a = SortValues { year: Some(2020), title: "Alpha", created_at: at };
		let b = SortValues { year: Some(2020), title: "Beta", created_at: at };
		let order = [SortKey::desc(SortField::Year), SortKey::desc(SortField::Title)];

		assert_eq!(compare(&order, a, b), Ordering::Greater);
	}
}
