use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{value:?} is not one of {expected}.")]
pub struct ParseEnumError {
	pub value: String,
	pub expected: &'static str,
}

/// The five record categories served by the portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
	Article,
	Publication,
	Grant,
	Patent,
	Certification,
}
impl Kind {
	/// Fixed iteration order. Merged search results keep this order for equal sort keys.
	pub const ALL: [Self; 5] =
		[Self::Article, Self::Publication, Self::Grant, Self::Patent, Self::Certification];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Article => "article",
			Self::Publication => "publication",
			Self::Grant => "grant",
			Self::Patent => "patent",
			Self::Certification => "certification",
		}
	}

	/// Entity name used in audit records.
	pub fn entity(self) -> &'static str {
		match self {
			Self::Article => "Article",
			Self::Publication => "Publication",
			Self::Grant => "Grant",
			Self::Patent => "Patent",
			Self::Certification => "Certification",
		}
	}

	/// Fields searched by a free-text term, title first.
	pub fn text_fields(self) -> &'static [TextField] {
		match self {
			Self::Article => &[TextField::Title, TextField::Abstract, TextField::Journal],
			Self::Publication =>
				&[TextField::Title, TextField::Description, TextField::Publisher],
			Self::Grant => &[TextField::Title, TextField::Summary],
			Self::Patent => &[TextField::Title, TextField::Country, TextField::PatentNo],
			Self::Certification => &[TextField::Title, TextField::Issuer],
		}
	}

	pub fn supports_tags(self) -> bool {
		matches!(self, Self::Article | Self::Publication)
	}

	pub fn supports_type(self) -> bool {
		matches!(self, Self::Publication)
	}
}
impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for Kind {
	type Err = ParseEnumError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter().find(|kind| kind.as_str() == value).ok_or_else(|| ParseEnumError {
			value: value.to_string(),
			expected: "article, publication, grant, patent, certification",
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublicationType {
	Book,
	Conference,
	Chapter,
}
impl PublicationType {
	pub const ALL: [Self; 3] = [Self::Book, Self::Conference, Self::Chapter];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Book => "Book",
			Self::Conference => "Conference",
			Self::Chapter => "Chapter",
		}
	}
}
impl fmt::Display for PublicationType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for PublicationType {
	type Err = ParseEnumError;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		Self::ALL.into_iter().find(|ty| ty.as_str() == value).ok_or_else(|| ParseEnumError {
			value: value.to_string(),
			expected: "Book, Conference, Chapter",
		})
	}
}

/// A text column that participates in free-text matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
	Title,
	Abstract,
	Journal,
	Description,
	Publisher,
	Summary,
	Country,
	PatentNo,
	Issuer,
}
impl TextField {
	pub fn column(self) -> &'static str {
		match self {
			Self::Title => "title",
			Self::Abstract => "abstract",
			Self::Journal => "journal",
			Self::Description => "description",
			Self::Publisher => "publisher",
			Self::Summary => "summary",
			Self::Country => "country",
			Self::PatentNo => "patent_no",
			Self::Issuer => "issuer",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kinds_round_trip_through_their_tags() {
		for kind in Kind::ALL {
			assert_eq!(kind.as_str().parse::<Kind>(), Ok(kind));
		}
	}

	#[test]
	fn kind_parse_is_case_sensitive() {
		let err = "Article".parse::<Kind>().expect_err("Expected parse failure.");

		assert_eq!(err.value, "Article");
	}

	#[test]
	fn only_articles_and_publications_carry_tags() {
		let tagged: Vec<Kind> = Kind::ALL.into_iter().filter(|kind| kind.supports_tags()).collect();

		assert_eq!(tagged, vec![Kind::Article, Kind::Publication]);
	}

	#[test]
	fn every_kind_searches_its_title() {
		for kind in Kind::ALL {
			assert_eq!(kind.text_fields().first(), Some(&TextField::Title));
		}
	}
}
