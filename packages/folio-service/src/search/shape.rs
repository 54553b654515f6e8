use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use folio_domain::Kind;
use folio_storage::models::SearchRow;

/// One search hit in the shape shared by every kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
	pub kind: Kind,
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub year: Option<i32>,
	#[serde(serialize_with = "crate::time_serde::serialize")]
	pub created_at: OffsetDateTime,
	pub extra: Extra,
}

/// Kind-specific fields. Serialized without a tag; `kind` on the item says which variant it is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Extra {
	Article {
		journal: Option<String>,
		tags: Vec<String>,
	},
	Publication {
		#[serde(rename = "type")]
		publication_type: Option<String>,
		publisher: Option<String>,
		tags: Vec<String>,
	},
	Grant {
		amount: Option<i64>,
	},
	Patent {
		country: Option<String>,
		#[serde(rename = "patentNo")]
		patent_no: Option<String>,
	},
	Certification {
		issuer: Option<String>,
	},
}

pub fn shape(kind: Kind, row: SearchRow) -> SearchItem {
	let extra = match kind {
		Kind::Article => Extra::Article { journal: row.journal, tags: row.tags.unwrap_or_default() },
		Kind::Publication => Extra::Publication {
			publication_type: row.publication_type,
			publisher: row.publisher,
			tags: row.tags.unwrap_or_default(),
		},
		Kind::Grant => Extra::Grant { amount: row.amount },
		Kind::Patent => Extra::Patent { country: row.country, patent_no: row.patent_no },
		Kind::Certification => Extra::Certification { issuer: row.issuer },
	};

	SearchItem {
		kind,
		id: row.id,
		slug: row.slug,
		title: row.title,
		year: row.year,
		created_at: row.created_at,
		extra,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;
	use time::macros::datetime;

	use super::*;

	fn row() -> SearchRow {
		SearchRow {
			id: Uuid::nil(),
			slug: "edge-inference".to_string(),
			title: "Edge inference".to_string(),
			year: Some(2022),
			created_at: datetime!(2024-03-01 12:00 UTC),
			journal: None,
			tags: None,
			publication_type: None,
			publisher: None,
			amount: None,
			country: None,
			patent_no: None,
			issuer: None,
		}
	}

	#[test]
	fn article_without_tags_serializes_an_empty_list() {
		let item = shape(Kind::Article, SearchRow { journal: Some("JMLR".to_string()), ..row() });
		let value = serde_json::to_value(&item).expect("Failed to serialize item.");

		assert_eq!(
			value,
			json!({
				"kind": "article",
				"id": "00000000-0000-0000-0000-000000000000",
				"slug": "edge-inference",
				"title": "Edge inference",
				"year": 2022,
				"createdAt": "2024-03-01T12:00:00Z",
				"extra": { "journal": "JMLR", "tags": [] }
			})
		);
	}

	#[test]
	fn publication_extra_uses_type_key() {
		let item = shape(
			Kind::Publication,
			SearchRow {
				publication_type: Some("Chapter".to_string()),
				tags: Some(vec!["vision".to_string()]),
				..row()
			},
		);
		let value = serde_json::to_value(&item.extra).expect("Failed to serialize extra.");

		assert_eq!(value, json!({ "type": "Chapter", "publisher": null, "tags": ["vision"] }));
	}

	#[test]
	fn missing_scalars_serialize_as_null() {
		let grant = serde_json::to_value(shape(Kind::Grant, row()).extra)
			.expect("Failed to serialize extra.");
		let patent = serde_json::to_value(
			shape(Kind::Patent, SearchRow { patent_no: Some("US-1".to_string()), ..row() }).extra,
		)
		.expect("Failed to serialize extra.");
		let certification = serde_json::to_value(shape(Kind::Certification, row()).extra)
			.expect("Failed to serialize extra.");

		assert_eq!(grant, json!({ "amount": null }));
		assert_eq!(patent, json!({ "country": null, "patentNo": "US-1" }));
		assert_eq!(certification, json!({ "issuer": null }));
	}

	#[test]
	fn missing_year_is_null() {
		let value = serde_json::to_value(shape(Kind::Grant, SearchRow { year: None, ..row() }))
			.expect("Failed to serialize item.");

		assert_eq!(value["year"], serde_json::Value::Null);
	}
}
