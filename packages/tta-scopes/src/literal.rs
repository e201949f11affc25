//! The only path by which a value reaches SQL text.

use std::fmt::{Display, Formatter};

use time::Date;

/// An escaped SQL literal. There is no constructor that accepts pre-rendered SQL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SqlLiteral(String);
impl SqlLiteral {
	pub fn text(value: &str) -> Self {
		let cleaned = value.replace('\0', "");
		let quoted = cleaned.replace('\'', "''");

		// Escape-string syntax keeps backslashes literal whatever standard_conforming_strings says.
		if quoted.contains('\\') {
			Self(format!("E'{}'", quoted.replace('\\', "\\\\")))
		} else {
			Self(format!("'{quoted}'"))
		}
	}

	pub fn integer(value: i64) -> Self {
		Self(value.to_string())
	}

	pub fn date(value: Date) -> Self {
		Self(format!("'{:04}-{:02}-{:02}'", value.year(), u8::from(value.month()), value.day()))
	}

	pub fn boolean(value: bool) -> Self {
		Self(if value { "TRUE" } else { "FALSE" }.to_string())
	}

	pub fn as_sql(&self) -> &str {
		&self.0
	}
}
impl Display for SqlLiteral {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// A non-empty list of integer ids, validated before any of them is spliced without quoting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdList(Vec<i64>);
impl IdList {
	/// Keeps the values that are integer literals. `None` when none of them are.
	pub fn parse<S>(values: &[S]) -> Option<Self>
	where
		S: AsRef<str>,
	{
		let mut ids = Vec::with_capacity(values.len());

		for id in values.iter().filter_map(|value| parse_integer(value.as_ref())) {
			if !ids.contains(&id) {
				ids.push(id);
			}
		}

		if ids.is_empty() { None } else { Some(Self(ids)) }
	}

	pub fn from_ids(ids: &[i64]) -> Option<Self> {
		let mut unique = Vec::with_capacity(ids.len());

		for id in ids {
			if !unique.contains(id) {
				unique.push(*id);
			}
		}

		if unique.is_empty() { None } else { Some(Self(unique)) }
	}

	pub fn ids(&self) -> &[i64] {
		&self.0
	}

	pub fn literals(&self) -> Vec<SqlLiteral> {
		self.0.iter().copied().map(SqlLiteral::integer).collect()
	}
}

/// Accepts an optional leading minus followed by ASCII digits that fit in `i64`.
pub fn parse_integer(raw: &str) -> Option<i64> {
	let trimmed = raw.trim();
	let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);

	if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
		return None;
	}

	trimmed.parse().ok()
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use crate::literal::{IdList, SqlLiteral, parse_integer};

	#[test]
	fn quotes_are_doubled() {
		assert_eq!(SqlLiteral::text("O'Brien").as_sql(), "'O''Brien'");
		assert_eq!(
			SqlLiteral::text("'; DROP TABLE goals; --").as_sql(),
			"'''; DROP TABLE goals; --'"
		);
	}

	#[test]
	fn backslashes_switch_to_escape_strings() {
		assert_eq!(SqlLiteral::text(r"a\'b").as_sql(), r"E'a\\''b'");
	}

	#[test]
	fn nul_bytes_are_stripped() {
		assert_eq!(SqlLiteral::text("a\0b").as_sql(), "'ab'");
	}

	#[test]
	fn dates_render_iso() {
		assert_eq!(SqlLiteral::date(date!(2021 - 06 - 07)).as_sql(), "'2021-06-07'");
	}

	#[test]
	fn id_list_rejects_anything_but_integers() {
		assert_eq!(IdList::parse(&["1", "2 OR 1=1"]).map(|ids| ids.ids().to_vec()), Some(vec![1]));
		assert!(IdList::parse(&["2 OR 1=1", "x"]).is_none());
		assert!(IdList::parse(&["1e3"]).is_none());
		assert!(IdList::parse(&["+4"]).is_none());
		assert!(IdList::parse::<&str>(&[]).is_none());
		assert_eq!(IdList::parse(&[" 7", "7", "12"]).map(|ids| ids.ids().to_vec()), Some(vec![7, 12]));
	}

	#[test]
	fn integer_parsing_rejects_overflow() {
		assert_eq!(parse_integer("-3"), Some(-3));
		assert_eq!(parse_integer("99999999999999999999"), None);
		assert_eq!(parse_integer("-"), None);
	}
}
