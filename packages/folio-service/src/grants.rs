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
use folio_storage::{models::Grant, records};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantView {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub summary: String,
	pub year: i32,
	pub amount: Option<i64>,
	pub link: Option<String>,
	pub published: bool,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub created_at: OffsetDateTime,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub updated_at: OffsetDateTime,
}
impl From<Grant> for GrantView {
	fn from(row: Grant) -> Self {
		Self {
			id: row.id,
			slug: row.slug,
			title: row.title,
			summary: row.summary,
			year: row.year,
			amount: row.amount,
			link: row.link,
			published: row.published,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}
impl Resource for GrantView {
	const KIND: Kind = Kind::Grant;

	type Row = Grant;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGrant {
	pub title: String,
	pub summary: String,
	pub year: i32,
	pub amount: Option<i64>,
	pub link: Option<String>,
	pub published: Option<bool>,
	pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGrant {
	pub title: Option<String>,
	pub summary: Option<String>,
	pub year: Option<i32>,
	pub amount: Option<i64>,
	pub link: Option<String>,
	pub published: Option<bool>,
	pub slug: Option<String>,
}

impl FolioService {
	pub async fn create_grant(&self, actor: Option<&str>, req: CreateGrant) -> Result<GrantView> {
		let mut validator = Validator::default();

		validator.non_empty("title", &req.title);
		validator.non_empty("summary", &req.summary);
		validator.year("year", req.year);
		validator.http_url("link", req.link.as_deref());

		let slug = validator.slug(req.slug.as_deref(), &req.title);

		validator.finish(INVALID_BODY)?;

		let now = OffsetDateTime::now_utc();
		let row = Grant {
			id: Uuid::new_v4(),
			slug,
			title: req.title.trim().to_string(),
			summary: req.summary,
			year: req.year,
			amount: req.amount,
			link: req.link,
			published: req.published.unwrap_or(true),
			created_at: now,
			updated_at: now,
		};
		let mut tx = self.db.pool.begin().await?;

		records::insert_grant(&mut tx, &row).await?;

		let view = GrantView::from(row);

		audit::record(
			&mut tx,
			AuditEntry {
				actor,
				action: AuditAction::Create,
				entity: Kind::Grant.entity(),
				entity_id: view.id,
				before: None,
				after: Some(serde_json::to_value(&view)?),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(id = %view.id, slug = %view.slug, "Grant created.");

		Ok(view)
	}

	pub async fn update_grant(
		&self,
		actor: Option<&str>,
		id: Uuid,
		req: UpdateGrant,
	) -> Result<GrantView> {
		let mut validator = Validator::default();

		if let Some(title) = req.title.as_deref() {
			validator.non_empty("title", title);
		}
		if let Some(summary) = req.summary.as_deref() {
			validator.non_empty("summary", summary);
		}
		if let Some(year) = req.year {
			validator.year("year", year);
		}

		validator.http_url("link", req.link.as_deref());

		let slug = validator.updated_slug(req.slug.as_deref(), req.title.as_deref());

		validator.finish(INVALID_BODY)?;

		let mut tx = self.db.pool.begin().await?;
		let mut row: Grant = records::find_for_update(&mut tx, Kind::Grant, id)
			.await?
			.ok_or_else(|| not_found(Kind::Grant))?;
		let before = serde_json::to_value(GrantView::from(row.clone()))?;

		if let Some(title) = req.title {
			row.title = title.trim().to_string();
		}
		if let Some(slug) = slug {
			row.slug = slug;
		}

		row.summary = req.summary.unwrap_or(row.summary);
		row.year = req.year.unwrap_or(row.year);
		row.amount = req.amount.or(row.amount);
		row.link = req.link.or(row.link);
		row.published = req.published.unwrap_or(row.published);
		row.updated_at = OffsetDateTime::now_utc();

		records::update_grant(&mut tx, &row).await?;

		let view = GrantView::from(row);

		audit::record(
			&mut tx,
			AuditEntry {
				actor,
				action: AuditAction::Update,
				entity: Kind::Grant.entity(),
				entity_id: id,
				before: Some(before),
				after: Some(serde_json::to_value(&view)?),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(%id, slug = %view.slug, "Grant updated.");

		Ok(view)
	}
}
