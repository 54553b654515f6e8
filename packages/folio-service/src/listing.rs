use serde::{Deserialize, Serialize};

use crate::{
	FolioService, Resource, Result, not_found,
	search::{Criteria, build_filter},
	validation::{self, INVALID_QUERY, Validator},
};
use folio_domain::{Kind, KindFilter, PageMeta, Pagination, PublicationType, SortKey, pagination, sort};
use folio_storage::{listing, records};

/// Raw query parameters of a per-kind listing. Parameters a kind does not support are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
	pub q: Option<String>,
	pub year: Option<String>,
	pub tag: Option<String>,
	#[serde(rename = "type")]
	pub publication_type: Option<String>,
	pub page: Option<String>,
	pub page_size: Option<String>,
	pub sort: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
	pub filter: KindFilter,
	pub order: Vec<SortKey>,
	pub pagination: Pagination,
}
impl ListQuery {
	pub fn from_params(kind: Kind, params: &ListParams) -> Result<Self> {
		let mut validator = Validator::default();
		let year = validator.integer("year", params.year.as_deref(), 0, i64::from(i32::MAX));
		let page = validator.integer("page", params.page.as_deref(), 1, i64::from(u32::MAX));
		let page_size = validator.integer(
			"pageSize",
			params.page_size.as_deref(),
			1,
			i64::from(pagination::MAX_PAGE_SIZE),
		);
		let publication_type = if kind.supports_type() {
			validator.parsed::<PublicationType>("type", params.publication_type.as_deref())
		} else {
			None
		};

		validator.finish(INVALID_QUERY)?;

		let criteria = Criteria {
			term: validation::optional_text(params.q.as_deref()),
			year: year.and_then(|year| i32::try_from(year).ok()),
			tag: validation::optional_text(params.tag.as_deref()),
			publication_type,
		};

		Ok(Self {
			filter: build_filter(kind, &criteria),
			order: sort::parse_sort(params.sort.as_deref().map(str::trim)),
			pagination: Pagination::normalize(page, page_size),
		})
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
	pub data: Vec<T>,
	pub meta: PageMeta,
}

impl FolioService {
	/// One page of published records of `V`'s kind.
	pub async fn list<V>(&self, params: &ListParams) -> Result<Page<V>>
	where
		V: Resource,
	{
		let query = ListQuery::from_params(V::KIND, params)?;
		let (total, rows) = tokio::try_join!(
			listing::count_matching(&self.db.pool, &query.filter),
			listing::find_matching::<_, V::Row>(
				&self.db.pool,
				&query.filter,
				&query.order,
				u64::from(query.pagination.page_size),
				query.pagination.offset(),
			),
		)?;

		Ok(Page {
			data: rows.into_iter().map(V::from).collect(),
			meta: PageMeta::new(query.pagination, total),
		})
	}

	/// A published record by slug.
	pub async fn get<V>(&self, slug: &str) -> Result<V>
	where
		V: Resource,
	{
		records::find_published_by_slug::<_, V::Row>(&self.db.pool, V::KIND, slug)
			.await?
			.map(V::from)
			.ok_or_else(|| not_found(V::KIND))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use folio_domain::SortField;

	#[test]
	fn grants_ignore_tag_and_type() {
		let params = ListParams {
			tag: Some("ml".to_string()),
			publication_type: Some("Novel".to_string()),
			..ListParams::default()
		};
		let query = ListQuery::from_params(Kind::Grant, &params).expect("Expected valid query.");

		assert_eq!(query.filter, KindFilter::all(Kind::Grant));
	}

	#[test]
	fn publications_validate_type() {
		let params = ListParams { publication_type: Some("Novel".to_string()), ..ListParams::default() };

		assert!(ListQuery::from_params(Kind::Publication, &params).is_err());
	}

	#[test]
	fn listings_allow_larger_pages_than_search() {
		let params = ListParams {
			page_size: Some("100".to_string()),
			sort: Some("title".to_string()),
			..ListParams::default()
		};
		let query = ListQuery::from_params(Kind::Article, &params).expect("Expected valid query.");

		assert_eq!(query.pagination.page_size, 100);
		assert_eq!(query.order, vec![SortKey::asc(SortField::Title)]);

		let params = ListParams { page_size: Some("101".to_string()), ..ListParams::default() };

		assert!(ListQuery::from_params(Kind::Article, &params).is_err());
	}
}
