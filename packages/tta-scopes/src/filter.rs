//! Raw `topic.condition=value` input.

use std::{
	fmt::{Display, Formatter},
	str::FromStr,
};

use serde_json::Value;
use url::form_urlencoded;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Condition {
	In,
	NotIn,
	Contains,
	NotContains,
	Before,
	After,
	Within,
}
impl Condition {
	pub const ALL: [Condition; 7] = [
		Self::In,
		Self::NotIn,
		Self::Contains,
		Self::NotContains,
		Self::Before,
		Self::After,
		Self::Within,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::In => "in",
			Self::NotIn => "nin",
			Self::Contains => "ctn",
			Self::NotContains => "nctn",
			Self::Before => "bef",
			Self::After => "aft",
			Self::Within => "win",
		}
	}
}
impl FromStr for Condition {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		Self::ALL.into_iter().find(|condition| condition.as_str() == raw).ok_or_else(|| {
			Error::MalformedKey { key: raw.to_string() }
		})
	}
}
impl Display for Condition {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterKey {
	pub topic: String,
	pub condition: Condition,
}
impl FilterKey {
	/// Strict parse for callers handing a key to a handler directly.
	pub fn parse(key: &str) -> Result<Self> {
		let malformed = || Error::MalformedKey { key: key.to_string() };
		let (topic, condition) = key.rsplit_once('.').ok_or_else(malformed)?;

		if topic.is_empty() {
			return Err(malformed());
		}

		let condition = condition.parse().map_err(|_| malformed())?;

		Ok(Self { topic: topic.to_string(), condition })
	}

	/// Tolerant variant used by the compiler: foreign keys are simply not filters.
	pub fn split(key: &str) -> Option<Self> {
		Self::parse(key).ok()
	}
}
impl Display for FilterKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}", self.topic, self.condition)
	}
}

/// Insertion-ordered `key -> values`; repeated keys accumulate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawFilters {
	entries: Vec<(String, Vec<String>)>,
}
impl RawFilters {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses `a.in=1&a.in=2&b.ctn=x`, with or without a leading `?`.
	pub fn from_query(query: &str) -> Self {
		let mut filters = Self::new();
		let query = query.strip_prefix('?').unwrap_or(query);

		for (key, value) in form_urlencoded::parse(query.as_bytes()) {
			filters.insert(key.into_owned(), value.into_owned());
		}

		filters
	}

	/// Accepts an object of scalars or arrays of scalars. Nested shapes are skipped.
	pub fn from_json(raw: &Value) -> Result<Self> {
		let object = raw.as_object().ok_or_else(|| Error::InvalidFilterValues {
			message: "Filters must be a JSON object.".to_string(),
		})?;
		let mut filters = Self::new();

		for (key, value) in object {
			match value {
				Value::Array(items) =>
					for item in items {
						if let Some(text) = scalar_to_string(item) {
							filters.insert(key.clone(), text);
						}
					},
				other =>
					if let Some(text) = scalar_to_string(other) {
						filters.insert(key.clone(), text);
					},
			}
		}

		Ok(filters)
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();

		match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, values)) => values.push(value),
			None => self.entries.push((key, vec![value])),
		}
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(key, value);

		self
	}

	/// Replaces every value stored under `key`.
	pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
		let key = key.into();

		match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, existing)) => *existing = values,
			None => self.entries.push((key, values)),
		}
	}

	pub fn get(&self, key: &str) -> Option<&[String]> {
		self.entries.iter().find(|(existing, _)| existing == key).map(|(_, values)| values.as_slice())
	}

	pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
		let idx = self.entries.iter().position(|(existing, _)| existing == key)?;

		Some(self.entries.remove(idx).1)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.entries.iter().map(|(key, values)| (key.as_str(), values.as_slice()))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
impl<K, V> FromIterator<(K, V)> for RawFilters
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut filters = Self::new();

		for (key, value) in iter {
			filters.insert(key, value);
		}

		filters
	}
}

fn scalar_to_string(value: &Value) -> Option<String> {
	match value {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use crate::{
		Error,
		filter::{Condition, FilterKey, RawFilters},
	};

	#[test]
	fn key_splits_on_last_dot() {
		let key = FilterKey::parse("report.text.ctn").expect("key");

		assert_eq!(key.topic, "report.text");
		assert_eq!(key.condition, Condition::Contains);
	}

	#[test]
	fn malformed_keys_error_when_parsed_strictly() {
		for raw in ["status", ".in", "status.like"] {
			assert!(matches!(FilterKey::parse(raw), Err(Error::MalformedKey { .. })), "{raw}");
			assert!(FilterKey::split(raw).is_none());
		}
	}

	#[test]
	fn query_strings_accumulate_repeated_keys() {
		let filters =
			RawFilters::from_query("?status.in=Active&status.in=Suspended&region.nin=1&q=%27x%27");

		assert_eq!(
			filters.get("status.in"),
			Some(&["Active".to_string(), "Suspended".to_string()][..])
		);
		assert_eq!(filters.get("q"), Some(&["'x'".to_string()][..]));
		assert_eq!(filters.len(), 3);
	}

	#[test]
	fn json_scalars_are_stringified() {
		let filters = RawFilters::from_json(&json!({
			"region.in": [1, 2],
			"status.in": "Active",
			"flag.in": true,
			"nested.in": { "a": 1 },
		}))
		.expect("filters");

		assert_eq!(filters.get("region.in"), Some(&["1".to_string(), "2".to_string()][..]));
		assert_eq!(filters.get("flag.in"), Some(&["true".to_string()][..]));
		assert_eq!(filters.get("nested.in"), None);
	}

	#[test]
	fn json_root_must_be_an_object() {
		assert!(RawFilters::from_json(&json!(["status.in"])).is_err());
	}

	#[test]
	fn set_replaces_values() {
		let mut filters = RawFilters::new().with("region.in", "1").with("region.in", "2");

		filters.set("region.in", vec!["3".to_string()]);

		assert_eq!(filters.get("region.in"), Some(&["3".to_string()][..]));
		assert_eq!(filters.remove("region.in"), Some(vec!["3".to_string()]));
		assert!(filters.is_empty());
	}
}
