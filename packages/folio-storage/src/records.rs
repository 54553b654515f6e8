use sqlx::{Executor, FromRow, PgConnection, Postgres, postgres::PgRow};
use uuid::Uuid;

use crate::{
	Error, Result,
	listing::table,
	models::{Article, Certification, Grant, Patent, Publication},
};
use folio_domain::Kind;

const SLUG_TAKEN: &str = "A record with this slug";

pub async fn find_published_by_slug<'e, E, R>(executor: E, kind: Kind, slug: &str) -> Result<Option<R>>
where
	E: Executor<'e, Database = Postgres>,
	R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
	let sql = format!("SELECT * FROM {} WHERE slug = $1 AND published = TRUE", table(kind));
	let row = sqlx::query_as::<_, R>(&sql).bind(slug).fetch_optional(executor).await?;

	Ok(row)
}

/// Loads a record regardless of its published flag and locks it for the enclosing transaction.
pub async fn find_for_update<R>(conn: &mut PgConnection, kind: Kind, id: Uuid) -> Result<Option<R>>
where
	R: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
	let sql = format!("SELECT * FROM {} WHERE id = $1 FOR UPDATE", table(kind));
	let row = sqlx::query_as::<_, R>(&sql).bind(id).fetch_optional(conn).await?;

	Ok(row)
}

pub async fn delete(conn: &mut PgConnection, kind: Kind, id: Uuid) -> Result<()> {
	let sql = format!("DELETE FROM {} WHERE id = $1", table(kind));
	let result = sqlx::query(&sql).bind(id).execute(conn).await?;

	if result.rows_affected() == 0 {
		return Err(Error::NotFound(format!("{} {id} not found.", kind.entity())));
	}

	Ok(())
}

pub async fn insert_article(conn: &mut PgConnection, article: &Article) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO articles (
	id,
	slug,
	title,
	abstract,
	journal,
	year,
	doi,
	link,
	tags,
	authors,
	legacy_authors,
	published,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
	)
	.bind(article.id)
	.bind(article.slug.as_str())
	.bind(article.title.as_str())
	.bind(article.r#abstract.as_deref())
	.bind(article.journal.as_str())
	.bind(article.year)
	.bind(article.doi.as_deref())
	.bind(article.link.as_deref())
	.bind(&article.tags)
	.bind(&article.authors)
	.bind(article.legacy_authors.as_deref())
	.bind(article.published)
	.bind(article.created_at)
	.bind(article.updated_at)
	.execute(conn)
	.await
	.map_err(|err| Error::from_write(err, SLUG_TAKEN))?;

	Ok(())
}

pub async fn update_article(conn: &mut PgConnection, article: &Article) -> Result<()> {
	sqlx::query(
		"\
UPDATE articles
SET
	slug = $2,
	title = $3,
	abstract = $4,
	journal = $5,
	year = $6,
	doi = $7,
	link = $8,
	tags = $9,
	authors = $10,
	legacy_authors = $11,
	published = $12,
	updated_at = $13
WHERE id = $1",
	)
	.bind(article.id)
	.bind(article.slug.as_str())
	.bind(article.title.as_str())
	.bind(article.r#abstract.as_deref())
	.bind(article.journal.as_str())
	.bind(article.year)
	.bind(article.doi.as_deref())
	.bind(article.link.as_deref())
	.bind(&article.tags)
	.bind(&article.authors)
	.bind(article.legacy_authors.as_deref())
	.bind(article.published)
	.bind(article.updated_at)
	.execute(conn)
	.await
	.map_err(|err| Error::from_write(err, SLUG_TAKEN))?;

	Ok(())
}

pub async fn insert_publication(conn: &mut PgConnection, publication: &Publication) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO publications (
	id,
	slug,
	title,
	description,
	publisher,
	type,
	year,
	link,
	tags,
	published,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
	)
	.bind(publication.id)
	.bind(publication.slug.as_str())
	.bind(publication.title.as_str())
	.bind(publication.description.as_str())
	.bind(publication.publisher.as_deref())
	.bind(publication.r#type.as_str())
	.bind(publication.year)
	.bind(publication.link.as_deref())
	.bind(&publication.tags)
	.bind(publication.published)
	.bind(publication.created_at)
	.bind(publication.updated_at)
	.execute(conn)
	.await
	.map_err(|err| Error::from_write(err, SLUG_TAKEN))?;

	Ok(())
}

pub async fn update_publication(conn: &mut PgConnection, publication: &Publication) -> Result<()> {
	sqlx::query(
		"\
UPDATE publications
SET
	slug = $2,
	title = $3,
	description = $4,
	publisher = $5,
	type = $6,
	year = $7,
	link = $8,
	tags = $9,
	published = $10,
	updated_at = $11
WHERE id = $1",
	)
	.bind(publication.id)
	.bind(publication.slug.as_str())
	.bind(publication.title.as_str())
	.bind(publication.description.as_str())
	.bind(publication.publisher.as_deref())
	.bind(publication.r#type.as_str())
	.bind(publication.year)
	.bind(publication.link.as_deref())
	.bind(&publication.tags)
	.bind(publication.published)
	.bind(publication.updated_at)
	.execute(conn)
	.await
	.map_err(|err| Error::from_write(err, SLUG_TAKEN))?;

	Ok(())
}

pub async fn insert_grant(conn: &mut PgConnection, grant: &Grant) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO grants (id, slug, title, summary, year, amount, link, published, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
	)
	.bind(grant.id)
	.bind(grant.slug.as_str())
	.bind(grant.title.as_str())
	.bind(grant.summary.as_str())
	.bind(grant.year)
	.bind(grant.amount)
	.bind(grant.link.as_deref())
	.bind(grant.published)
	.bind(grant.created_at)
	.bind(grant.updated_at)
	.execute(conn)
	.await
	.map_err(|err| Error::from_write(err, SLUG_TAKEN))?;

	Ok(())
}

pub async fn update_grant(conn: &mut PgConnection, grant: &Grant) -> Result<()> {
	sqlx::query(
		"\
UPDATE grants
SET
	slug = $2,
	title = $3,
	summary = $4,
	year = $5,
	amount = $6,
	link = $7,
	published = $8,
	updated_at = $9
WHERE id = $1",
	)
	.bind(grant.id)
	.bind(grant.slug.as_str())
	.bind(grant.title.as_str())
	.bind(grant.summary.as_str())
	.bind(grant.year)
	.bind(grant.amount)
	.bind(grant.link.as_deref())
	.bind(grant.published)
	.bind(grant.updated_at)
	.execute(conn)
	.await
	.map_err(|err| Error::from_write(err, SLUG_TAKEN))?;

	Ok(())
}

pub async fn insert_patent(conn: &mut PgConnection, patent: &Patent) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO patents (
	id,
	slug,
	title,
	country,
	patent_no,
	year,
	link,
	inventors,
	legacy_inventors,
	published,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
	)
	.bind(patent.id)
	.bind(patent.slug.as_str())
	.bind(patent.title.as_str())
	.bind(patent.country.as_str())
	.bind(patent.patent_no.as_str())
	.bind(patent.year)
	.bind(patent.link.as_deref())
	.bind(&patent.inventors)
	.bind(patent.legacy_inventors.as_deref())
	.bind(patent.published)
	.bind(patent.created_at)
	.bind(patent.updated_at)
	.execute(conn)
	.await
	.map_err(|err| Error::from_write(err, SLUG_TAKEN))?;

	Ok(())
}

pub async fn update_patent(conn: &mut PgConnection, patent: &Patent) -> Result<()> {
	sqlx::query(
		"\
UPDATE patents
SET
	slug = $2,
	title = $3,
	country = $4,
	patent_no = $5,
	year = $6,
	link = $7,
	inventors = $8,
	legacy_inventors = $9,
	published = $10,
	updated_at = $11
WHERE id = $1",
	)
	.bind(patent.id)
	.bind(patent.slug.as_str())
	.bind(patent.title.as_str())
	.bind(patent.country.as_str())
	.bind(patent.patent_no.as_str())
	.bind(patent.year)
	.bind(patent.link.as_deref())
	.bind(&patent.inventors)
	.bind(patent.legacy_inventors.as_deref())
	.bind(patent.published)
	.bind(patent.updated_at)
	.execute(conn)
	.await
	.map_err(|err| Error::from_write(err, SLUG_TAKEN))?;

	Ok(())
}

pub async fn insert_certification(
	conn: &mut PgConnection,
	certification: &Certification,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO certifications (id, slug, title, issuer, year, link, published, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
	)
	.bind(certification.id)
	.bind(certification.slug.as_str())
	.bind(certification.title.as_str())
	.bind(certification.issuer.as_str())
	.bind(certification.year)
	.bind(certification.link.as_deref())
	.bind(certification.published)
	.bind(certification.created_at)
	.bind(certification.updated_at)
	.execute(conn)
	.await
	.map_err(|err| Error::from_write(err, SLUG_TAKEN))?;

	Ok(())
}

pub async fn update_certification(
	conn: &mut PgConnection,
	certification: &Certification,
) -> Result<()> {
	sqlx::query(
		"\
UPDATE certifications
SET
	slug = $2,
	title = $3,
	issuer = $4,
	year = $5,
	link = $6,
	published = $7,
	updated_at = $8
WHERE id = $1",
	)
	.bind(certification.id)
	.bind(certification.slug.as_str())
	.bind(certification.title.as_str())
	.bind(certification.issuer.as_str())
	.bind(certification.year)
	.bind(certification.link.as_deref())
	.bind(certification.published)
	.bind(certification.updated_at)
	.execute(conn)
	.await
	.map_err(|err| Error::from_write(err, SLUG_TAKEN))?;

	Ok(())
}
