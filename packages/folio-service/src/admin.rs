use serde::Serialize;
use uuid::Uuid;

use crate::{
	FolioService, Resource, Result,
	audit::{self, AuditAction, AuditEntry},
	not_found,
};
use folio_storage::records;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deleted {
	pub id: Uuid,
	pub deleted: bool,
}

impl FolioService {
	/// Hard-deletes a record of any kind, published or not.
	pub async fn delete<V>(&self, actor: Option<&str>, id: Uuid) -> Result<Deleted>
	where
		V: Resource,
	{
		let mut tx = self.db.pool.begin().await?;
		let current: V::Row = records::find_for_update(&mut tx, V::KIND, id)
			.await?
			.ok_or_else(|| not_found(V::KIND))?;
		let before = serde_json::to_value(V::from(current))?;

		records::delete(&mut tx, V::KIND, id).await?;
		audit::record(
			&mut tx,
			AuditEntry {
				actor,
				action: AuditAction::Delete,
				entity: V::KIND.entity(),
				entity_id: id,
				before: Some(before),
				after: None,
			},
		)
		.await?;

		tx.commit().await?;

		tracing::info!(kind = %V::KIND, %id, "Record deleted.");

		Ok(Deleted { id, deleted: true })
	}
}
