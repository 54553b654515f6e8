pub mod admin;
pub mod articles;
pub mod certifications;
pub mod grants;
pub mod listing;
#[cfg(feature = "test-support")]
pub mod memory;
pub mod patents;
pub mod profile;
pub mod publications;
pub mod search;
pub mod time_serde;
pub mod validation;

mod audit;
mod error;
mod nullable;

pub use admin::Deleted;
pub use articles::{ArticleView, CreateArticle, UpdateArticle};
pub use certifications::{CertificationView, CreateCertification, UpdateCertification};
pub use error::{Error, FieldErrors, Result};
pub use grants::{CreateGrant, GrantView, UpdateGrant};
pub use listing::{ListParams, ListQuery, Page};
#[cfg(feature = "test-support")]
pub use memory::{MemoryRecord, MemoryStore};
pub use patents::{CreatePatent, PatentView, UpdatePatent};
pub use profile::{AdminProfileView, ProfileView, UpdateProfile};
pub use publications::{CreatePublication, PublicationView, UpdatePublication};
pub use search::{SearchItem, SearchParams, SearchQuery, SearchResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use serde::Serialize;
use sqlx::{FromRow, PgPool, postgres::PgRow};

use folio_config::Config;
use folio_domain::{Kind, KindFilter, SortKey};
use folio_storage::{db::Db, listing as queries, models::SearchRow};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Per-kind access used by the search engine.
///
/// Calls for different kinds are independent and may run concurrently; implementations must not
/// share a transaction between them. `find_many` returns at most `limit` rows ordered by `order`
/// with `id` ascending as the final tie-break.
pub trait RecordStore
where
	Self: Send + Sync,
{
	fn count<'a>(&'a self, filter: &'a KindFilter) -> BoxFuture<'a, Result<u64>>;

	fn find_many<'a>(
		&'a self,
		filter: &'a KindFilter,
		order: &'a [SortKey],
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<SearchRow>>>;
}

/// A publicly readable record kind and the row it is read from.
pub trait Resource
where
	Self: Serialize + From<Self::Row> + Send + Sized,
{
	const KIND: Kind;

	type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;
}

#[derive(Clone)]
pub struct PgRecordStore {
	pool: PgPool,
}
impl PgRecordStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}
impl RecordStore for PgRecordStore {
	fn count<'a>(&'a self, filter: &'a KindFilter) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move { Ok(queries::count_matching(&self.pool, filter).await?) })
	}

	fn find_many<'a>(
		&'a self,
		filter: &'a KindFilter,
		order: &'a [SortKey],
		limit: u64,
	) -> BoxFuture<'a, Result<Vec<SearchRow>>> {
		Box::pin(async move { Ok(queries::search_matching(&self.pool, filter, order, limit).await?) })
	}
}

pub struct FolioService {
	pub cfg: Config,
	pub db: Db,
	pub store: Arc<dyn RecordStore>,
}
impl FolioService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let store = Arc::new(PgRecordStore::new(db.pool.clone()));

		Self { cfg, db, store }
	}

	/// Searches through `store` instead of Postgres. Everything else still uses `db`.
	pub fn with_store(cfg: Config, db: Db, store: Arc<dyn RecordStore>) -> Self {
		Self { cfg, db, store }
	}

	pub async fn ready(&self) -> Result<()> {
		self.db.ping().await?;

		Ok(())
	}
}

pub(crate) fn not_found(kind: Kind) -> Error {
	Error::NotFound { message: format!("{} not found.", kind.entity()) }
}
