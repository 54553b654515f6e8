use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	FolioService, Resource, Result,
	audit::{self, AuditAction, AuditEntry},
	not_found,
	validation::{INVALID_BODY, Validator},
};
use folio_domain::{Kind, PublicationType};
use folio_storage::{models::Publication, records};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationView {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub description: String,
	pub publisher: Option<String>,
	pub r#type: String,
	pub year: i32,
	pub link: Option<String>,
	pub tags: Vec<String>,
	pub published: bool,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub created_at: OffsetDateTime,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub updated_at: OffsetDateTime,
}
impl From<Publication> for PublicationView {
	fn from(row: Publication) -> Self {
		Self {
			id: row.id,
			slug: row.slug,
			title: row.title,
			description: row.description,
			publisher: row.publisher,
			r#type: row.r#type,
			year: row.year,
			link: row.link,
			tags: row.tags,
			published: row.published,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}
impl Resource for PublicationView {
	const KIND: Kind = Kind::Publication;

	type Row = Publication;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePublication {
	pub title: String,
	pub description: String,
	pub publisher: Option<String>,
	pub r#type: PublicationType,
	pub year: i32,
	pub link: Option<String>,
	pub tags: Option<Vec<String>>,
	pub published: Option<bool>,
	pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePublication {
	pub title: Option<String>,
	pub description: Option<String>,
	pub publisher: Option<String>,
	pub r#type: Option<PublicationType>,
	pub year: Option<i32>,
	pub link: Option<String>,
	pub tags: Option<Vec<String>>,
	pub published: Option<bool>,
	pub slug: Option<String>,
}

impl FolioService {
	pub async fn create_publication(
		&self,
		actor: Option<&str>,
		req: CreatePublication,
	) -> Result<PublicationView> {
		let mut validator = Validator::default();

		validator.non_empty("title", &req.title);
		validator.non_empty("description", &req.description);
		validator.year("year", req.year);
		validator.http_url("link", req.link.as_deref());

		let slug = validator.slug(req.slug.as_deref(), &req.title);

		validator.finish(INVALID_BODY)?;

		let now = OffsetDateTime::now_utc();
		let row = Publication {
			id: Uuid::new_v4(),
			slug,
			title: req.title.trim().to_string(),
			description: req.description,
			publisher: req.publisher,
			r#type: req.r#type.as_str().to_string(),
			year: req.year,
			link: req.link,
			tags: req.tags.unwrap_or_default(),
			published: req.published.unwrap_or(true),
			created_at: now,
			updated_at: now,
		};
		let mut tx = self.db.pool.begin().await?;

		records::insert_publication(&mut tx, &row).await?;

		let view = PublicationView::from(row);

		audit::record(
			&mut tx,
			AuditEntry {
				actor,
				action: AuditAction::Create,
				entity: Kind::Publication.entity(),
				entity_id: view.id,
				before: None,
				after: Some(serde_json::to_value(&view)?),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(id = %view.id, slug = %view.slug, "Publication created.");

		Ok(view)
	}

	pub async fn update_publication(
		&self,
		actor: Option<&str>,
		id: Uuid,
		req: UpdatePublication,
	) -> Result<PublicationView> {
		let mut validator = Validator::default();

		if let Some(title) = req.title.as_deref() {
			validator.non_empty("title", title);
		}
		if let Some(description) = req.description.as_deref() {
			validator.non_empty("description", description);
		}
		if let Some(year) = req.year {
			validator.year("year", year);
		}

		validator.http_url("link", req.link.as_deref());

		let slug = validator.updated_slug(req.slug.as_deref(), req.title.as_deref());

		validator.finish(INVALID_BODY)?;

		let mut tx = self.db.pool.begin().await?;
		let mut row: Publication = records::find_for_update(&mut tx, Kind::Publication, id)
			.await?
			.ok_or_else(|| not_found(Kind::Publication))?;
		let before = serde_json::to_value(PublicationView::from(row.clone()))?;

		if let Some(title) = req.title {
			row.title = title.trim().to_string();
		}
		if let Some(slug) = slug {
			row.slug = slug;
		}
		if let Some(publication_type) = req.r#type {
			row.r#type = publication_type.as_str().to_string();
		}

		row.description = req.description.unwrap_or(row.description);
		row.publisher = req.publisher.or(row.publisher);
		row.year = req.year.unwrap_or(row.year);
		row.link = req.link.or(row.link);
		row.tags = req.tags.unwrap_or(row.tags);
		row.published = req.published.unwrap_or(row.published);
		row.updated_at = OffsetDateTime::now_utc();

		records::update_publication(&mut tx, &row).await?;

		let view = PublicationView::from(row);

		audit::record(
			&mut tx,
			AuditEntry {
				actor,
				action: AuditAction::Update,
				entity: Kind::Publication.entity(),
				entity_id: id,
				before: Some(before),
				after: Some(serde_json::to_value(&view)?),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(%id, slug = %view.slug, "Publication updated.");

		Ok(view)
	}
}
