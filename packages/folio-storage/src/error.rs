#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error("Conflict: {0}")]
	Conflict(String),
	#[error("Failed to encode snapshot: {0}")]
	Snapshot(#[from] serde_json::Error),
}
impl Error {
	/// Maps unique-constraint violations raised by a write to [`Error::Conflict`].
	pub(crate) fn from_write(err: sqlx::Error, what: &str) -> Self {
		match &err {
			sqlx::Error::Database(db_err) if db_err.is_unique_violation() =>
				Self::Conflict(format!("{what} already exists.")),
			_ => Self::Sqlx(err),
		}
	}
}
