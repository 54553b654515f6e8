//! Filtered, ordered reads over the published records of one kind.
//!
//! Listing endpoints and the search engine share this translation so that a filter means the
//! same thing everywhere. Ordering mirrors the in-memory comparator used when merging kinds:
//! titles compare bytewise, `NULL` ranks lowest, and `id` breaks remaining ties.

use sqlx::{Executor, FromRow, Postgres, QueryBuilder, postgres::PgRow};

use crate::{Result, models::SearchRow};
use folio_domain::{Direction, Kind, KindFilter, SortField, SortKey};

pub fn table(kind: Kind) -> &'static str {
	match kind {
		Kind::Article => "articles",
		Kind::Publication => "publications",
		Kind::Grant => "grants",
		Kind::Patent => "patents",
		Kind::Certification => "certifications",
	}
}

/// Escapes `LIKE` metacharacters so user input only ever matches literally.
pub fn escape_like(term: &str) -> String {
	let mut escaped = String::with_capacity(term.len());

	for ch in term.chars() {
		if matches!(ch, '\\' | '%' | '_') {
			escaped.push('\\');
		}

		escaped.push(ch);
	}

	escaped
}

pub async fn count_matching<'e, E>(executor: E, filter: &KindFilter) -> Result<u64>
where
	E: Executor<'e, Database = Postgres>,
{
	let mut builder = QueryBuilder::<Postgres>::new("SELECT count(*) FROM ");

	builder.push(table(filter.kind));
	push_filter(&mut builder, filter);

	let count: i64 = builder.build_query_scalar().fetch_one(executor).await?;

	Ok(u64::try_from(count).unwrap_or_default())
}

/// Full rows of one kind, for listing endpoints.
pub async fn find_matching<'e, E, R>(
	executor: E,
	filter: &KindFilter,
	order: &[SortKey],
	limit: u64,
	offset: u64,
) -> Result<Vec<R>>
where
	E: Executor<'e, Database = Postgres>,
	R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
	let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM ");

	builder.push(table(filter.kind));
	push_filter(&mut builder, filter);
	push_order(&mut builder, order);
	push_window(&mut builder, limit, offset);

	Ok(builder.build_query_as::<R>().fetch_all(executor).await?)
}

/// The first `limit` matches of one kind in the common search projection.
pub async fn search_matching<'e, E>(
	executor: E,
	filter: &KindFilter,
	order: &[SortKey],
	limit: u64,
) -> Result<Vec<SearchRow>>
where
	E: Executor<'e, Database = Postgres>,
{
	let mut builder = QueryBuilder::<Postgres>::new("SELECT ");

	builder.push(search_projection(filter.kind));
	builder.push(" FROM ");
	builder.push(table(filter.kind));
	push_filter(&mut builder, filter);
	push_order(&mut builder, order);
	push_window(&mut builder, limit, 0);

	Ok(builder.build_query_as::<SearchRow>().fetch_all(executor).await?)
}

pub(crate) fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &KindFilter) {
	builder.push(" WHERE published = TRUE");

	if let Some(term) = filter.term.as_deref() {
		let pattern = format!("%{}%", escape_like(term));

		builder.push(" AND (");

		for (idx, field) in filter.text_fields().iter().enumerate() {
			if idx > 0 {
				builder.push(" OR ");
			}

			builder.push(field.column());
			builder.push(" ILIKE ");
			builder.push_bind(pattern.clone());
			builder.push(" ESCAPE '\\'");
		}

		builder.push(")");
	}
	if let Some(year) = filter.year {
		builder.push(" AND year = ");
		builder.push_bind(year);
	}
	if let Some(tag) = filter.tag.as_ref() {
		builder.push(" AND ");
		builder.push_bind(tag.clone());
		builder.push(" = ANY(tags)");
	}
	if let Some(publication_type) = filter.publication_type {
		builder.push(" AND type = ");
		builder.push_bind(publication_type.as_str());
	}
}

pub(crate) fn push_order(builder: &mut QueryBuilder<'_, Postgres>, order: &[SortKey]) {
	builder.push(" ORDER BY ");

	for key in order {
		builder.push(order_term(*key));
		builder.push(", ");
	}

	builder.push("id ASC");
}

fn push_window(builder: &mut QueryBuilder<'_, Postgres>, limit: u64, offset: u64) {
	builder.push(" LIMIT ");
	builder.push_bind(i64::try_from(limit).unwrap_or(i64::MAX));

	if offset > 0 {
		builder.push(" OFFSET ");
		builder.push_bind(i64::try_from(offset).unwrap_or(i64::MAX));
	}
}

fn order_term(key: SortKey) -> String {
	let column = match key.field {
		SortField::Title => "title COLLATE \"C\"",
		field => field.column(),
	};
	let direction = match key.direction {
		Direction::Asc => "ASC NULLS FIRST",
		Direction::Desc => "DESC NULLS LAST",
	};

	format!("{column} {direction}")
}

fn search_projection(kind: Kind) -> &'static str {
	match kind {
		Kind::Article => {
			"id, slug, title, year, created_at, journal, tags, NULL::text AS publication_type, \
			 NULL::text AS publisher, NULL::bigint AS amount, NULL::text AS country, \
			 NULL::text AS patent_no, NULL::text AS issuer"
		},
		Kind::Publication => {
			"id, slug, title, year, created_at, NULL::text AS journal, tags, \
			 type AS publication_type, publisher, NULL::bigint AS amount, NULL::text AS country, \
			 NULL::text AS patent_no, NULL::text AS issuer"
		},
		Kind::Grant => {
			"id, slug, title, year, created_at, NULL::text AS journal, NULL::text[] AS tags, \
			 NULL::text AS publication_type, NULL::text AS publisher, amount, \
			 NULL::text AS country, NULL::text AS patent_no, NULL::text AS issuer"
		},
		Kind::Patent => {
			"id, slug, title, year, created_at, NULL::text AS journal, NULL::text[] AS tags, \
			 NULL::text AS publication_type, NULL::text AS publisher, NULL::bigint AS amount, \
			 country, patent_no, NULL::text AS issuer"
		},
		Kind::Certification => {
			"id, slug, title, year, created_at, NULL::text AS journal, NULL::text[] AS tags, \
			 NULL::text AS publication_type, NULL::text AS publisher, NULL::bigint AS amount, \
			 NULL::text AS country, NULL::text AS patent_no, issuer"
		},
	}
}
