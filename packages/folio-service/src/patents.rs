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
use folio_storage::{models::Patent, records};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatentView {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub country: String,
	pub patent_no: String,
	pub year: i32,
	pub link: Option<String>,
	pub inventors_list: Vec<Person>,
	pub legacy_inventors: Option<String>,
	pub published: bool,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub created_at: OffsetDateTime,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub updated_at: OffsetDateTime,
}
impl From<Patent> for PatentView {
	fn from(row: Patent) -> Self {
		Self {
			id: row.id,
			slug: row.slug,
			title: row.title,
			country: row.country,
			patent_no: row.patent_no,
			year: row.year,
			link: row.link,
			inventors_list: row.inventors.0,
			legacy_inventors: row.legacy_inventors,
			published: row.published,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}
impl Resource for PatentView {
	const KIND: Kind = Kind::Patent;

	type Row = Patent;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatent {
	pub title: String,
	pub country: String,
	pub patent_no: String,
	pub year: i32,
	pub link: Option<String>,
	pub published: Option<bool>,
	pub slug: Option<String>,
	pub legacy_inventors: Option<String>,
	pub inventors_list: Option<Vec<Person>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatent {
	pub title: Option<String>,
	pub country: Option<String>,
	pub patent_no: Option<String>,
	pub year: Option<i32>,
	pub link: Option<String>,
	pub published: Option<bool>,
	pub slug: Option<String>,
	pub legacy_inventors: Option<String>,
	pub inventors_list: Option<Vec<Person>>,
}

impl FolioService {
	pub async fn create_patent(&self, actor: Option<&str>, req: CreatePatent) -> Result<PatentView> {
		let mut validator = Validator::default();

		validator.non_empty("title", &req.title);
		validator.non_empty("country", &req.country);
		validator.non_empty("patentNo", &req.patent_no);
		validator.year("year", req.year);
		validator.http_url("link", req.link.as_deref());
		validator.people("inventorsList", req.inventors_list.as_deref());

		let slug = validator.slug(req.slug.as_deref(), &req.title);

		validator.finish(INVALID_BODY)?;

		let now = OffsetDateTime::now_utc();
		let inventors = req.inventors_list.unwrap_or_default();
		let row = Patent {
			id: Uuid::new_v4(),
			slug,
			title: req.title.trim().to_string(),
			country: req.country.trim().to_string(),
			patent_no: req.patent_no.trim().to_string(),
			year: req.year,
			link: req.link,
			legacy_inventors: req.legacy_inventors.or_else(|| legacy_names(&inventors)),
			inventors: Json(inventors),
			published: req.published.unwrap_or(true),
			created_at: now,
			updated_at: now,
		};
		let mut tx = self.db.pool.begin().await?;

		records::insert_patent(&mut tx, &row).await?;

		let view = PatentView::from(row);

		audit::record(
			&mut tx,
			AuditEntry {
				actor,
				action: AuditAction::Create,
				entity: Kind::Patent.entity(),
				entity_id: view.id,
				before: None,
				after: Some(serde_json::to_value(&view)?),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(id = %view.id, slug = %view.slug, "Patent created.");

		Ok(view)
	}

	pub async fn update_patent(
		&self,
		actor: Option<&str>,
		id: Uuid,
		req: UpdatePatent,
	) -> Result<PatentView> {
		let mut validator = Validator::default();

		if let Some(title) = req.title.as_deref() {
			validator.non_empty("title", title);
		}
		if let Some(country) = req.country.as_deref() {
			validator.non_empty("country", country);
		}
		if let Some(patent_no) = req.patent_no.as_deref() {
			validator.non_empty("patentNo", patent_no);
		}
		if let Some(year) = req.year {
			validator.year("year", year);
		}

		validator.http_url("link", req.link.as_deref());
		validator.people("inventorsList", req.inventors_list.as_deref());

		let slug = validator.updated_slug(req.slug.as_deref(), req.title.as_deref());

		validator.finish(INVALID_BODY)?;

		let mut tx = self.db.pool.begin().await?;
		let mut row: Patent = records::find_for_update(&mut tx, Kind::Patent, id)
			.await?
			.ok_or_else(|| not_found(Kind::Patent))?;
		let before = serde_json::to_value(PatentView::from(row.clone()))?;

		if let Some(title) = req.title {
			row.title = title.trim().to_string();
		}
		if let Some(country) = req.country {
			row.country = country.trim().to_string();
		}
		if let Some(patent_no) = req.patent_no {
			row.patent_no = patent_no.trim().to_string();
		}
		if let Some(slug) = slug {
			row.slug = slug;
		}

		row.year = req.year.unwrap_or(row.year);
		row.link = req.link.or(row.link);
		row.published = req.published.unwrap_or(row.published);

		match (req.legacy_inventors, req.inventors_list) {
			(Some(legacy), inventors) => {
				row.legacy_inventors = Some(legacy);

				if let Some(inventors) = inventors {
					row.inventors = Json(inventors);
				}
			},
			(None, Some(inventors)) => {
				row.legacy_inventors = legacy_names(&inventors);
				row.inventors = Json(inventors);
			},
			(None, None) => {},
		}

		row.updated_at = OffsetDateTime::now_utc();

		records::update_patent(&mut tx, &row).await?;

		let view = PatentView::from(row);

		audit::record(
			&mut tx,
			AuditEntry {
				actor,
				action: AuditAction::Update,
				entity: Kind::Patent.entity(),
				entity_id: id,
				before: Some(before),
				after: Some(serde_json::to_value(&view)?),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(%id, slug = %view.slug, "Patent updated.");

		Ok(view)
	}
}
