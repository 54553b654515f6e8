use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	FolioService, Resource, Result,
	audit::{self, AuditAction, AuditEntry},
	not_found,
	validation::{INVALID_BODY, Validator},
};
use folio_domain::{Kind, Person, people::legacy_names};
use folio_storage::{models::Article, records};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleView {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub r#abstract: Option<String>,
	pub journal: String,
	pub year: i32,
	pub doi: Option<String>,
	pub link: Option<String>,
	pub tags: Vec<String>,
	pub authors_list: Vec<Person>,
	pub legacy_authors: Option<String>,
	pub published: bool,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub created_at: OffsetDateTime,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub updated_at: OffsetDateTime,
}
impl From<Article> for ArticleView {
	fn from(row: Article) -> Self {
		Self {
			id: row.id,
			slug: row.slug,
			title: row.title,
			r#abstract: row.r#abstract,
			journal: row.journal,
			year: row.year,
			doi: row.doi,
			link: row.link,
			tags: row.tags,
			authors_list: row.authors.0,
			legacy_authors: row.legacy_authors,
			published: row.published,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}
impl Resource for ArticleView {
	const KIND: Kind = Kind::Article;

	type Row = Article;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticle {
	pub title: String,
	pub r#abstract: Option<String>,
	pub journal: String,
	pub year: i32,
	pub doi: Option<String>,
	pub link: Option<String>,
	pub tags: Option<Vec<String>>,
	pub published: Option<bool>,
	pub slug: Option<String>,
	pub legacy_authors: Option<String>,
	pub authors_list: Option<Vec<Person>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticle {
	pub title: Option<String>,
	pub r#abstract: Option<String>,
	pub journal: Option<String>,
	pub year: Option<i32>,
	pub doi: Option<String>,
	pub link: Option<String>,
	pub tags: Option<Vec<String>>,
	pub published: Option<bool>,
	pub slug: Option<String>,
	pub legacy_authors: Option<String>,
	pub authors_list: Option<Vec<Person>>,
}

impl FolioService {
	pub async fn create_article(&self, actor: Option<&str>, req: CreateArticle) -> Result<ArticleView> {
		let mut validator = Validator::default();

		validator.non_empty("title", &req.title);
		validator.non_empty("journal", &req.journal);
		validator.year("year", req.year);
		validator.http_url("link", req.link.as_deref());
		validator.people("authorsList", req.authors_list.as_deref());

		let slug = validator.slug(req.slug.as_deref(), &req.title);

		validator.finish(INVALID_BODY)?;

		let now = OffsetDateTime::now_utc();
		let authors = req.authors_list.unwrap_or_default();
		let row = Article {
			id: Uuid::new_v4(),
			slug,
			title: req.title.trim().to_string(),
			r#abstract: req.r#abstract,
			journal: req.journal.trim().to_string(),
			year: req.year,
			doi: req.doi,
			link: req.link,
			tags: req.tags.unwrap_or_default(),
			legacy_authors: req.legacy_authors.or_else(|| legacy_names(&authors)),
			authors: Json(authors),
			published: req.published.unwrap_or(true),
			created_at: now,
			updated_at: now,
		};
		let mut tx = self.db.pool.begin().await?;

		records::insert_article(&mut tx, &row).await?;

		let view = ArticleView::from(row);

		audit::record(
			&mut tx,
			AuditEntry {
				actor,
				action: AuditAction::Create,
				entity: Kind::Article.entity(),
				entity_id: view.id,
				before: None,
				after: Some(serde_json::to_value(&view)?),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(id = %view.id, slug = %view.slug, "Article created.");

		Ok(view)
	}

	pub async fn update_article(
		&self,
		actor: Option<&str>,
		id: Uuid,
		req: UpdateArticle,
	) -> Result<ArticleView> {
		let mut validator = Validator::default();

		if let Some(title) = req.title.as_deref() {
			validator.non_empty("title", title);
		}
		if let Some(journal) = req.journal.as_deref() {
			validator.non_empty("journal", journal);
		}
		if let Some(year) = req.year {
			validator.year("year", year);
		}

		validator.http_url("link", req.link.as_deref());
		validator.people("authorsList", req.authors_list.as_deref());

		let slug = validator.updated_slug(req.slug.as_deref(), req.title.as_deref());

		validator.finish(INVALID_BODY)?;

		let mut tx = self.db.pool.begin().await?;
		let mut row: Article = records::find_for_update(&mut tx, Kind::Article, id)
			.await?
			.ok_or_else(|| not_found(Kind::Article))?;
		let before = serde_json::to_value(ArticleView::from(row.clone()))?;

		if let Some(title) = req.title {
			row.title = title.trim().to_string();
		}
		if let Some(journal) = req.journal {
			row.journal = journal.trim().to_string();
		}
		if let Some(slug) = slug {
			row.slug = slug;
		}

		row.r#abstract = req.r#abstract.or(row.r#abstract);
		row.year = req.year.unwrap_or(row.year);
		row.doi = req.doi.or(row.doi);
		row.link = req.link.or(row.link);
		row.tags = req.tags.unwrap_or(row.tags);
		row.published = req.published.unwrap_or(row.published);

		match (req.legacy_authors, req.authors_list) {
			(Some(legacy), authors) => {
				row.legacy_authors = Some(legacy);

				if let Some(authors) = authors {
					row.authors = Json(authors);
				}
			},
			(None, Some(authors)) => {
				row.legacy_authors = legacy_names(&authors);
				row.authors = Json(authors);
			},
			(None, None) => {},
		}

		row.updated_at = OffsetDateTime::now_utc();

		records::update_article(&mut tx, &row).await?;

		let view = ArticleView::from(row);

		audit::record(
			&mut tx,
			AuditEntry {
				actor,
				action: AuditAction::Update,
				entity: Kind::Article.entity(),
				entity_id: id,
				before: Some(before),
				after: Some(serde_json::to_value(&view)?),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(%id, slug = %view.slug, "Article updated.");

		Ok(view)
	}
}
