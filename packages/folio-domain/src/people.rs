use serde::{Deserialize, Serialize};

/// An author or inventor attached to a record, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
	pub first_name: String,
	pub last_name: String,
	#[serde(default)]
	pub affiliation: Option<String>,
}

/// Renders people as `"First Last; First Last"`, or `None` when nobody has a usable name.
pub fn legacy_names(people: &[Person]) -> Option<String> {
	let names: Vec<String> = people
		.iter()
		.map(|person| format!("{} {}", person.first_name.trim(), person.last_name.trim()))
		.map(|name| name.trim().to_string())
		.filter(|name| !name.is_empty())
		.collect();

	if names.is_empty() { None } else { Some(names.join("; ")) }
}
