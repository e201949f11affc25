//! Leaf predicate builders shared by every topic registry.

use serde_json::Value;
use tta_domain::AllowList;

use crate::{
	Error, Result,
	literal::SqlLiteral,
	predicate::{ColumnRef, CompareOp, Predicate, SqlExpr},
	registry::{Ignored, Outcome},
};

/// Filter values whose type the caller has already decided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterValues {
	Text(Vec<String>),
	Numeric(Vec<i64>),
}
impl FilterValues {
	/// Classifies a JSON array; mixing strings and numbers is a caller bug.
	pub fn from_json(values: &[Value]) -> Result<Self> {
		let mut texts = Vec::new();
		let mut numbers = Vec::new();

		for value in values {
			match value {
				Value::String(text) => texts.push(text.clone()),
				Value::Number(number) => numbers.push(number.as_i64().ok_or_else(|| {
					Error::InvalidFilterValues {
						message: format!("{number} is not an integer."),
					}
				})?),
				other => {
					return Err(Error::InvalidFilterValues {
						message: format!("Unsupported filter value {other}."),
					});
				},
			}
		}

		match (texts.is_empty(), numbers.is_empty()) {
			(false, false) => Err(Error::InvalidFilterValues {
				message: "Filter values mix strings and numbers.".to_string(),
			}),
			(true, false) => Ok(Self::Numeric(numbers)),
			_ => Ok(Self::Text(texts)),
		}
	}

	pub fn is_empty(&self) -> bool {
		match self {
			Self::Text(values) => values.is_empty(),
			Self::Numeric(values) => values.is_empty(),
		}
	}
}

/// Case-insensitive substring match on any value, or on none of them.
///
/// Exclusion is NULL-safe: a row without a value does not contain any term.
pub fn text_predicate<S>(included: bool, expr: SqlExpr, values: &[S]) -> Predicate
where
	S: AsRef<str>,
{
	if values.is_empty() {
		return Predicate::True;
	}

	let literals = values.iter().map(|value| SqlLiteral::text(&regex::escape(value.as_ref())));

	if included {
		Predicate::or(literals.map(|literal| Predicate::compare(expr, CompareOp::Matches, literal)))
	} else {
		Predicate::or([
			Predicate::is_null(expr),
			Predicate::and(
				literals.map(|literal| Predicate::compare(expr, CompareOp::NotMatches, literal)),
			),
		])
	}
}

/// Exact integer membership with the same NULL-safe exclusion as [`text_predicate`].
pub fn numeric_predicate(included: bool, expr: SqlExpr, values: &[i64]) -> Predicate {
	if values.is_empty() {
		return Predicate::True;
	}

	let literals = values.iter().copied().map(SqlLiteral::integer).collect();

	if included {
		Predicate::in_list(expr, literals)
	} else {
		Predicate::or([Predicate::is_null(expr), Predicate::not_in_list(expr, literals)])
	}
}

pub fn enum_predicate(included: bool, expr: SqlExpr, values: &FilterValues) -> Predicate {
	match values {
		FilterValues::Text(texts) => text_predicate(included, expr, texts),
		FilterValues::Numeric(numbers) => numeric_predicate(included, expr, numbers),
	}
}

/// Exact, quoted set membership. Exclusion keeps rows whose value is NULL.
pub fn exact_predicate<S>(included: bool, expr: SqlExpr, values: &[S]) -> Predicate
where
	S: AsRef<str>,
{
	if values.is_empty() {
		return Predicate::True;
	}

	let literals = values.iter().map(|value| SqlLiteral::text(value.as_ref())).collect();

	if included {
		Predicate::in_list(expr, literals)
	} else {
		Predicate::or([Predicate::is_null(expr), Predicate::not_in_list(expr, literals)])
	}
}

/// Allow-listed exact membership on a scalar column.
pub fn allowed_exact(included: bool, expr: SqlExpr, allow: &AllowList, values: &[String]) -> Outcome {
	let allowed = allow.retain(values);

	if allowed.is_empty() {
		return Err(Ignored::NoValidValues);
	}

	Ok(exact_predicate(included, expr, &allowed))
}

/// Allow-listed overlap on a `text[]` column. Exclusion keeps rows with a NULL array.
pub fn array_predicate(
	included: bool,
	column: ColumnRef,
	allow: &AllowList,
	values: &[String],
) -> Outcome {
	let allowed = allow.retain(values);

	if allowed.is_empty() {
		return Err(Ignored::NoValidValues);
	}

	let overlap = Predicate::ArrayOverlap {
		column,
		values: allowed.iter().map(|value| SqlLiteral::text(value)).collect(),
	};

	if included {
		Ok(overlap)
	} else {
		Ok(Predicate::or([Predicate::is_null(SqlExpr::Column(column)), Predicate::not(overlap)]))
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;
	use tta_domain::constants::TTA_TYPES;

	use crate::{
		Error,
		predicate::{ColumnRef, Predicate, SqlExpr},
		primitives::{self, FilterValues},
		registry::Ignored,
	};

	const NAME: SqlExpr = SqlExpr::Column(ColumnRef::new("Goal", "name"));
	const TTA_TYPE: ColumnRef = ColumnRef::new("ActivityReport", "tta_type");

	#[test]
	fn empty_values_are_neutral() {
		let none: [&str; 0] = [];

		assert_eq!(primitives::text_predicate(true, NAME, &none), Predicate::True);
		assert_eq!(primitives::text_predicate(false, NAME, &none), Predicate::True);
		assert_eq!(primitives::numeric_predicate(false, NAME, &[]), Predicate::True);
	}

	#[test]
	fn text_exclusion_keeps_nulls() {
		let sql = primitives::text_predicate(false, NAME, &["Literacy"]).render();

		assert_eq!(sql, r#"("Goal"."name" IS NULL OR "Goal"."name" !~* 'Literacy')"#);
	}

	#[test]
	fn numeric_inclusion_is_an_in_list() {
		assert_eq!(
			primitives::numeric_predicate(true, NAME, &[3, 5]).render(),
			r#""Goal"."name" IN (3, 5)"#
		);
	}

	#[test]
	fn enum_dispatches_on_tag() {
		let values = FilterValues::Numeric(vec![1]);

		assert_eq!(
			primitives::enum_predicate(true, NAME, &values),
			primitives::numeric_predicate(true, NAME, &[1])
		);
	}

	#[test]
	fn mixed_json_values_are_a_caller_bug() {
		let err = FilterValues::from_json(&[json!("a"), json!(1)]).expect_err("mixed values");

		assert!(matches!(err, Error::InvalidFilterValues { .. }));
		assert_eq!(
			FilterValues::from_json(&[json!(1), json!(2)]).expect("numbers"),
			FilterValues::Numeric(vec![1, 2])
		);
		assert!(FilterValues::from_json(&[json!(1.5)]).is_err());
	}

	#[test]
	fn array_predicate_drops_disallowed_values() {
		let values = vec!["training".to_string(), "'); DELETE FROM goals; --".to_string()];
		let sql = primitives::array_predicate(true, TTA_TYPE, &TTA_TYPES, &values)
			.expect("predicate")
			.render();

		assert_eq!(sql, r#""ActivityReport"."tta_type" && ARRAY['training']::text[]"#);
	}

	#[test]
	fn array_predicate_without_valid_values_is_ignored() {
		let values = vec!["bogus".to_string()];

		assert_eq!(
			primitives::array_predicate(false, TTA_TYPE, &TTA_TYPES, &values),
			Err(Ignored::NoValidValues)
		);
	}
}
