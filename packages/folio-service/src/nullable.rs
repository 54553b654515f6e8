//! Distinguishes an absent JSON field from an explicit `null`.
//!
//! Use with `#[serde(default, deserialize_with = "crate::nullable::deserialize")]`: a missing field
//! stays `None`, `null` becomes `Some(None)`, and a value becomes `Some(Some(value))`.

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Some)
}
