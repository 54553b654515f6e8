use serde_json::Value;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::Result;
use folio_storage::{audit, models::AuditLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuditAction {
	Create,
	Update,
	Delete,
}
impl AuditAction {
	fn as_str(self) -> &'static str {
		match self {
			Self::Create => "CREATE",
			Self::Update => "UPDATE",
			Self::Delete => "DELETE",
		}
	}
}

pub(crate) struct AuditEntry<'a> {
	pub(crate) actor: Option<&'a str>,
	pub(crate) action: AuditAction,
	pub(crate) entity: &'static str,
	pub(crate) entity_id: Uuid,
	pub(crate) before: Option<Value>,
	pub(crate) after: Option<Value>,
}

/// Appends an audit row on the caller's transaction so it commits with the change.
pub(crate) async fn record(conn: &mut PgConnection, entry: AuditEntry<'_>) -> Result<()> {
	let row = AuditLog {
		id: Uuid::new_v4(),
		actor_id: entry.actor.map(ToString::to_string),
		action: entry.action.as_str().to_string(),
		entity: entry.entity.to_string(),
		entity_id: Some(entry.entity_id),
		before: entry.before,
		after: entry.after,
		created_at: OffsetDateTime::now_utc(),
	};

	audit::insert_audit_log(conn, &row).await?;

	tracing::debug!(
		entity = entry.entity,
		entity_id = %entry.entity_id,
		action = entry.action.as_str(),
		"Audit entry recorded."
	);

	Ok(())
}
