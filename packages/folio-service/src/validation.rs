use std::{fmt::Display, str::FromStr};

use uuid::Uuid;

use crate::{Error, FieldErrors, Result};
use folio_domain::{Person, slug, validate};

pub const INVALID_QUERY: &str = "Invalid query";
pub const INVALID_BODY: &str = "Invalid body";

/// Collects messages per field so one response can report every problem at once.
#[derive(Debug, Default)]
pub(crate) struct Validator {
	fields: FieldErrors,
}
impl Validator {
	pub(crate) fn add(&mut self, field: &str, reason: impl Into<String>) {
		self.fields.entry(field.to_string()).or_default().push(reason.into());
	}

	pub(crate) fn finish(self, message: &str) -> Result<()> {
		if self.fields.is_empty() {
			return Ok(());
		}

		Err(Error::Validation { message: message.to_string(), fields: self.fields })
	}

	pub(crate) fn integer(
		&mut self,
		field: &str,
		raw: Option<&str>,
		min: i64,
		max: i64,
	) -> Option<i64> {
		let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
		let Ok(value) = raw.parse::<i64>() else {
			self.add(field, "Expected an integer.");

			return None;
		};

		if value < min {
			self.add(field, format!("Must be greater than or equal to {min}."));

			return None;
		}
		if value > max {
			self.add(field, format!("Must be less than or equal to {max}."));

			return None;
		}

		Some(value)
	}

	pub(crate) fn parsed<T>(&mut self, field: &str, raw: Option<&str>) -> Option<T>
	where
		T: FromStr,
		T::Err: Display,
	{
		let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;

		match raw.parse::<T>() {
			Ok(value) => Some(value),
			Err(err) => {
				self.add(field, err.to_string());

				None
			},
		}
	}

	pub(crate) fn non_empty(&mut self, field: &str, value: &str) {
		if value.trim().is_empty() {
			self.add(field, "Must not be empty.");
		}
	}

	pub(crate) fn year(&mut self, field: &str, value: i32) {
		if value < 0 {
			self.add(field, "Must be greater than or equal to 0.");
		}
	}

	pub(crate) fn http_url(&mut self, field: &str, value: Option<&str>) {
		if let Some(value) = value
			&& !validate::is_http_url(value)
		{
			self.add(field, "Must be an absolute http(s) URL.");
		}
	}

	pub(crate) fn email(&mut self, field: &str, value: Option<&str>) {
		if let Some(value) = value
			&& !validate::is_email(value)
		{
			self.add(field, "Must be a valid email address.");
		}
	}

	pub(crate) fn length(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) {
		if let Some(value) = value {
			let len = value.chars().count();

			if len < min || len > max {
				self.add(field, format!("Must be between {min} and {max} characters."));
			}
		}
	}

	pub(crate) fn people(&mut self, field: &str, people: Option<&[Person]>) {
		let incomplete = people.unwrap_or_default().iter().any(|person| {
			person.first_name.trim().is_empty() || person.last_name.trim().is_empty()
		});

		if incomplete {
			self.add(field, "Every entry needs a first and last name.");
		}
	}

	/// Slug for a new record: the explicit one when given, otherwise derived from the title.
	pub(crate) fn slug(&mut self, given: Option<&str>, title: &str) -> String {
		match given {
			Some(raw) => self.explicit_slug(raw),
			None => self.derived_slug(title),
		}
	}

	/// Slug change for an update. A new title without an explicit slug regenerates it.
	pub(crate) fn updated_slug(&mut self, given: Option<&str>, title: Option<&str>) -> Option<String> {
		match (given, title) {
			(Some(raw), _) => Some(self.explicit_slug(raw)),
			(None, Some(title)) => Some(self.derived_slug(title)),
			(None, None) => None,
		}
	}

	fn explicit_slug(&mut self, raw: &str) -> String {
		let slug = raw.trim();

		if !slug::is_valid_slug(slug) {
			self.add("slug", "Must use lowercase letters, digits and single dashes.");
		}

		slug.to_string()
	}

	fn derived_slug(&mut self, title: &str) -> String {
		let derived = slug::slugify(title);

		// Blank titles are already reported under their own field.
		if derived.is_empty() && !title.trim().is_empty() {
			self.add("slug", "Cannot be derived from the title; provide one explicitly.");
		}

		derived
	}
}

/// Trimmed text; blank input counts as absent.
pub(crate) fn optional_text(raw: Option<&str>) -> Option<String> {
	raw.map(str::trim).filter(|value| !value.is_empty()).map(ToString::to_string)
}

pub fn parse_id(raw: &str) -> Result<Uuid> {
	Uuid::parse_str(raw.trim())
		.map_err(|_| Error::validation("Invalid params", "id", "Must be a valid UUID."))
}
