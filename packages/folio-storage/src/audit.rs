use sqlx::{Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{Result, models::AuditLog};

pub async fn insert_audit_log(conn: &mut PgConnection, entry: &AuditLog) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO audit_logs (id, actor_id, action, entity, entity_id, before, after, created_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
	)
	.bind(entry.id)
	.bind(entry.actor_id.as_deref())
	.bind(entry.action.as_str())
	.bind(entry.entity.as_str())
	.bind(entry.entity_id)
	.bind(&entry.before)
	.bind(&entry.after)
	.bind(entry.created_at)
	.execute(conn)
	.await?;

	Ok(())
}

/// Audit trail of one entity, oldest first.
pub async fn list_for_entity<'e, E>(
	executor: E,
	entity: &str,
	entity_id: Uuid,
) -> Result<Vec<AuditLog>>
where
	E: Executor<'e, Database = Postgres>,
{
	let entries = sqlx::query_as::<_, AuditLog>(
		"\
SELECT *
FROM audit_logs
WHERE entity = $1 AND entity_id = $2
ORDER BY created_at ASC, id ASC",
	)
	.bind(entity)
	.bind(entity_id)
	.fetch_all(executor)
	.await?;

	Ok(entries)
}
