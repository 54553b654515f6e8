use std::collections::BTreeMap;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Field name to the messages collected for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	Validation { message: String, fields: FieldErrors },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub fn validation(message: impl Into<String>, field: &str, reason: impl Into<String>) -> Self {
		let mut fields = FieldErrors::new();

		fields.insert(field.to_string(), vec![reason.into()]);

		Self::Validation { message: message.into(), fields }
	}
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
impl From<folio_storage::Error> for Error {
	fn from(err: folio_storage::Error) -> Self {
		match err {
			folio_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			folio_storage::Error::NotFound(message) => Self::NotFound { message },
			folio_storage::Error::Conflict(message) => Self::Conflict { message },
			folio_storage::Error::Snapshot(inner) => Self::Storage { message: inner.to_string() },
		}
	}
}
impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Storage { message: format!("Failed to encode snapshot: {err}") }
	}
}
