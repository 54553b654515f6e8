use sqlx::{Executor, PgConnection, Postgres};

use crate::{Result, models::Profile};

/// The most recently updated profile, optionally restricted to published ones.
pub async fn latest<'e, E>(executor: E, published_only: bool) -> Result<Option<Profile>>
where
	E: Executor<'e, Database = Postgres>,
{
	let profile = sqlx::query_as::<_, Profile>(
		"\
SELECT *
FROM profiles
WHERE published OR NOT $1
ORDER BY updated_at DESC, id ASC
LIMIT 1",
	)
	.bind(published_only)
	.fetch_optional(executor)
	.await?;

	Ok(profile)
}

pub async fn insert_profile(conn: &mut PgConnection, profile: &Profile) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO profiles (
	id,
	name,
	title,
	bio,
	avatar_url,
	contact_email,
	phone,
	socials,
	published,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
	)
	.bind(profile.id)
	.bind(profile.name.as_str())
	.bind(profile.title.as_str())
	.bind(profile.bio.as_str())
	.bind(profile.avatar_url.as_deref())
	.bind(profile.contact_email.as_deref())
	.bind(profile.phone.as_deref())
	.bind(&profile.socials)
	.bind(profile.published)
	.bind(profile.created_at)
	.bind(profile.updated_at)
	.execute(conn)
	.await?;

	Ok(())
}

pub async fn update_profile(conn: &mut PgConnection, profile: &Profile) -> Result<()> {
	sqlx::query(
		"\
UPDATE profiles
SET
	name = $2,
	title = $3,
	bio = $4,
	avatar_url = $5,
	contact_email = $6,
	phone = $7,
	socials = $8,
	published = $9,
	updated_at = $10
WHERE id = $1",
	)
	.bind(profile.id)
	.bind(profile.name.as_str())
	.bind(profile.title.as_str())
	.bind(profile.bio.as_str())
	.bind(profile.avatar_url.as_deref())
	.bind(profile.contact_email.as_deref())
	.bind(profile.phone.as_deref())
	.bind(&profile.socials)
	.bind(profile.published)
	.bind(profile.updated_at)
	.execute(conn)
	.await?;

	Ok(())
}
