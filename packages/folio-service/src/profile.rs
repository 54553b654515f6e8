use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Error, FolioService, Result,
	audit::{self, AuditAction, AuditEntry},
	validation::{INVALID_BODY, Validator},
};
use folio_storage::{models::Profile, profile};

const ENTITY: &str = "Profile";
const PLACEHOLDER_NAME: &str = "Profile";

/// The public face of the profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
	pub name: String,
	pub title: String,
	pub bio: String,
	pub avatar_url: Option<String>,
	pub contact_email: Option<String>,
	pub phone: Option<String>,
	pub socials: Option<BTreeMap<String, String>>,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub updated_at: OffsetDateTime,
}
impl From<Profile> for ProfileView {
	fn from(row: Profile) -> Self {
		Self {
			name: row.name,
			title: row.title,
			bio: row.bio,
			avatar_url: row.avatar_url,
			contact_email: row.contact_email,
			phone: row.phone,
			socials: row.socials.map(|socials| socials.0),
			updated_at: row.updated_at,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfileView {
	pub id: Uuid,
	pub name: String,
	pub title: String,
	pub bio: String,
	pub avatar_url: Option<String>,
	pub contact_email: Option<String>,
	pub phone: Option<String>,
	pub socials: Option<BTreeMap<String, String>>,
	pub published: bool,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub created_at: OffsetDateTime,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub updated_at: OffsetDateTime,
}
impl From<Profile> for AdminProfileView {
	fn from(row: Profile) -> Self {
		Self {
			id: row.id,
			name: row.name,
			title: row.title,
			bio: row.bio,
			avatar_url: row.avatar_url,
			contact_email: row.contact_email,
			phone: row.phone,
			socials: row.socials.map(|socials| socials.0),
			published: row.published,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}

/// Partial profile update. For the nullable fields an explicit `null` clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
	pub name: Option<String>,
	pub title: Option<String>,
	pub bio: Option<String>,
	#[serde(default, deserialize_with = "crate::nullable::deserialize")]
	pub avatar_url: Option<Option<String>>,
	#[serde(default, deserialize_with = "crate::nullable::deserialize")]
	pub contact_email: Option<Option<String>>,
	#[serde(default, deserialize_with = "crate::nullable::deserialize")]
	pub phone: Option<Option<String>>,
	#[serde(default, deserialize_with = "crate::nullable::deserialize")]
	pub socials: Option<Option<BTreeMap<String, String>>>,
	pub published: Option<bool>,
}
impl UpdateProfile {
	fn validate(&self) -> Result<()> {
		let mut validator = Validator::default();

		for (field, value) in [("name", &self.name), ("title", &self.title), ("bio", &self.bio)] {
			if let Some(value) = value.as_deref() {
				validator.non_empty(field, value);
			}
		}

		validator.http_url("avatarUrl", self.avatar_url.clone().flatten().as_deref());
		validator.email("contactEmail", self.contact_email.clone().flatten().as_deref());
		validator.length("phone", self.phone.clone().flatten().as_deref(), 3, 30);
		validator.finish(INVALID_BODY)
	}

	fn apply(self, row: &mut Profile) {
		if let Some(name) = self.name {
			row.name = name;
		}
		if let Some(title) = self.title {
			row.title = title;
		}
		if let Some(bio) = self.bio {
			row.bio = bio;
		}
		if let Some(avatar_url) = self.avatar_url {
			row.avatar_url = avatar_url;
		}
		if let Some(contact_email) = self.contact_email {
			row.contact_email = contact_email;
		}
		if let Some(phone) = self.phone {
			row.phone = phone;
		}
		if let Some(socials) = self.socials {
			row.socials = socials.map(Json);
		}
		if let Some(published) = self.published {
			row.published = published;
		}
	}
}

impl FolioService {
	/// The most recently updated published profile.
	pub async fn public_profile(&self) -> Result<ProfileView> {
		profile::latest(&self.db.pool, true)
			.await?
			.map(ProfileView::from)
			.ok_or_else(|| Error::NotFound { message: "Profile not found.".to_string() })
	}

	pub async fn admin_profile(&self) -> Result<Option<AdminProfileView>> {
		Ok(profile::latest(&self.db.pool, false).await?.map(AdminProfileView::from))
	}

	/// Updates the profile singleton, creating a placeholder first when none exists.
	pub async fn update_profile(
		&self,
		actor: Option<&str>,
		req: UpdateProfile,
	) -> Result<AdminProfileView> {
		req.validate()?;

		let now = OffsetDateTime::now_utc();
		let mut tx = self.db.pool.begin().await?;
		let mut row = match profile::latest(&mut *tx, false).await? {
			Some(row) => row,
			None => {
				let row = Profile {
					id: Uuid::new_v4(),
					name: PLACEHOLDER_NAME.to_string(),
					title: String::new(),
					bio: String::new(),
					avatar_url: None,
					contact_email: None,
					phone: None,
					socials: None,
					published: true,
					created_at: now,
					updated_at: now,
				};

				profile::insert_profile(&mut tx, &row).await?;

				tracing::info!(id = %row.id, "Profile placeholder created.");

				row
			},
		};
		let before = serde_json::to_value(AdminProfileView::from(row.clone()))?;

		req.apply(&mut row);

		row.updated_at = now;

		profile::update_profile(&mut tx, &row).await?;

		let view = AdminProfileView::from(row);

		audit::record(
			&mut tx,
			AuditEntry {
				actor,
				action: AuditAction::Update,
				entity: ENTITY,
				entity_id: view.id,
				before: Some(before),
				after: Some(serde_json::to_value(&view)?),
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(id = %view.id, "Profile updated.");

		Ok(view)
	}
}
