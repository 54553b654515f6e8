use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	FolioService, Resource, Result,
	audit::{self, AuditAction, AuditEntry},
	not_found,
	validation::{INVALID_BODY, Validator},
};
use folio_domain::Kind;
use folio_storage::{models::Certification, records};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationView {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub issuer: String,
	pub year: i32,
	pub link: Option<String>,
	pub published: bool,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub created_at: OffsetDateTime,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub updated_at: OffsetDateTime,
}
impl From<Certification> for CertificationView {
	fn from(row: Certification) -> Self {
		Self {
			id: row.id,
			slug: row.slug,
			title: row.title,
			issuer: row.issuer,
			year: row.year,
			link: row.link,
			published: row.published,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}
impl Resource for CertificationView {
	const KIND: Kind = Kind::Certification;

	type Row = Certification;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCertification {
	pub title: String,
	pub issuer: String,
	pub year: i32,
	pub link: Option<String>,
	pub published: Option<bool>,
	pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCertification {
	pub title: Option<String>,
	pub issuer: Option<String>,
	pub year: Option<i32>,
	pub link: Option<String>,
	pub published: Option<bool>,
	pub slug: Option<String>,
}

impl FolioService {
	pub async fn create_certification(
		&self,
		actor: Option<&str>,
		req: CreateCertification,
	) -> Result<CertificationView> {
		let mut validator = Validator::default();

		validator.non_empty("title", &req.title);
		validator.non_empty("issuer", &req.issuer);
		validator.year("year", req.year);
		validator.http_url("link", req.link.as_deref());

		let slug = validator.slug(req.slug.as_deref(), &req.title);

		validator.finish(INVALID_BODY)?;

		let now = OffsetDateTime::now_utc();
		let row = Certification {
			id: Uuid::new_v4(),
			slug,
			title: req.title.trim().to_string(),
			issuer: req.issuer.trim().to_string(),
			year: req.year,
			link: req.link,
			published: req.published.unwrap_or(true),
			created_at: now,
			updated_at: now,
		};
		let mut tx = self.db.pool.begin().await?;

		records::insert_certification(&mut tx, &row).await?;

		let view = CertificationView::from(row);

		audit::record(
			&mut tx,
			AuditEntry {
				actor,
				action: AuditAction::Create,
				entity: Kind::Certification.entity(),
				entity_id: view.id,
				before: None,
				after: Some(serde_json::to_value(&view)?),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(id = %view.id, slug = %view.slug, "Certification created.");

		Ok(view)
	}

	pub async fn update_certification(
		&self,
		actor: Option<&str>,
		id: Uuid,
		req: UpdateCertification,
	) -> Result<CertificationView> {
		let mut validator = Validator::default();

		if let Some(title) = req.title.as_deref() {
			validator.non_empty("title", title);
		}
		if let Some(issuer) = req.issuer.as_deref() {
			validator.non_empty("issuer", issuer);
		}
		if let Some(year) = req.year {
			validator.year("year", year);
		}

		validator.http_url("link", req.link.as_deref());

		let slug = validator.updated_slug(req.slug.as_deref(), req.title.as_deref());

		validator.finish(INVALID_BODY)?;

		let mut tx = self.db.pool.begin().await?;
		let mut row: Certification = records::find_for_update(&mut tx, Kind::Certification, id)
			.await?
			.ok_or_else(|| not_found(Kind::Certification))?;
		let before = serde_json::to_value(CertificationView::from(row.clone()))?;

		if let Some(title) = req.title {
			row.title = title.trim().to_string();
		}
		if let Some(issuer) = req.issuer {
			row.issuer = issuer.trim().to_string();
		}
		if let Some(slug) = slug {
			row.slug = slug;
		}

		row.year = req.year.unwrap_or(row.year);
		row.link = req.link.or(row.link);
		row.published = req.published.unwrap_or(row.published);
		row.updated_at = OffsetDateTime::now_utc();

		records::update_certification(&mut tx, &row).await?;

		let view = CertificationView::from(row);

		audit::record(
			&mut tx,
			AuditEntry {
				actor,
				action: AuditAction::Update,
				entity: Kind::Certification.entity(),
				entity_id: id,
				before: Some(before),
				after: Some(serde_json::to_value(&view)?),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(%id, slug = %view.slug, "Certification updated.");

		Ok(view)
	}
}
