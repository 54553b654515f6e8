use std::collections::BTreeMap;

use serde_json::Value;
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use folio_domain::Person;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Article {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub r#abstract: Option<String>,
	pub journal: String,
	pub year: i32,
	pub doi: Option<String>,
	pub link: Option<String>,
	pub tags: Vec<String>,
	pub authors: Json<Vec<Person>>,
	pub legacy_authors: Option<String>,
	pub published: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Publication {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub description: String,
	pub publisher: Option<String>,
	/// One of `Book`, `Conference`, `Chapter`; enforced by a column check.
	pub r#type: String,
	pub year: i32,
	pub link: Option<String>,
	pub tags: Vec<String>,
	pub published: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Grant {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub summary: String,
	pub year: i32,
	pub amount: Option<i64>,
	pub link: Option<String>,
	pub published: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Patent {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub country: String,
	pub patent_no: String,
	pub year: i32,
	pub link: Option<String>,
	pub inventors: Json<Vec<Person>>,
	pub legacy_inventors: Option<String>,
	pub published: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Certification {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub issuer: String,
	pub year: i32,
	pub link: Option<String>,
	pub published: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Profile {
	pub id: Uuid,
	pub name: String,
	pub title: String,
	pub bio: String,
	pub avatar_url: Option<String>,
	pub contact_email: Option<String>,
	pub phone: Option<String>,
	pub socials: Option<Json<BTreeMap<String, String>>>,
	pub published: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuditLog {
	pub id: Uuid,
	pub actor_id: Option<String>,
	pub action: String,
	pub entity: String,
	pub entity_id: Option<Uuid>,
	pub before: Option<Value>,
	pub after: Option<Value>,
	pub created_at: OffsetDateTime,
}

/// The common search projection. Columns a kind does not have are `NULL`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SearchRow {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub year: Option<i32>,
	pub created_at: OffsetDateTime,
	pub journal: Option<String>,
	pub tags: Option<Vec<String>>,
	pub publication_type: Option<String>,
	pub publisher: Option<String>,
	pub amount: Option<i64>,
	pub country: Option<String>,
	pub patent_no: Option<String>,
	pub issuer: Option<String>,
}
