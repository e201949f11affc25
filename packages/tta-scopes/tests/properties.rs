use proptest::prelude::*;
use regex::RegexBuilder;
use time::{Date, Month};

use tta_scopes::{
	Predicate,
	association::{self, Comparator, SubqueryTemplate, TemplateParams},
	dates::{self, DateColumn, DateTarget},
	predicate::{ColumnRef, CompareOp, SqlExpr},
	primitives,
};

const GOAL_ID: ColumnRef = ColumnRef::new("Goal", "id");
const GRANT_NUMBER: SubqueryTemplate = SubqueryTemplate::new(
	GOAL_ID,
	"SELECT g.id FROM goals g JOIN grants gr ON gr.id = g.grant_id WHERE gr.number",
);
const NAME: SqlExpr = SqlExpr::Column(ColumnRef::new("Goal", "name"));
const CREATED: DateTarget = DateTarget::Column(DateColumn::Native(ColumnRef::new("Goal", "created_on")));

/// True when `sql` is exactly one SQL string literal, with nothing before or after it.
fn is_single_literal(sql: &str) -> bool {
	let (escaped, body) = match sql.strip_prefix("E'") {
		Some(rest) => (true, rest),
		None => match sql.strip_prefix('\'') {
			Some(rest) => (false, rest),
			None => return false,
		},
	};
	let mut chars = body.chars().peekable();

	while let Some(ch) = chars.next() {
		match ch {
			'\\' if escaped => {
				if chars.next().is_none() {
					return false;
				}
			},
			'\'' => match chars.peek() {
				Some('\'') => {
					chars.next();
				},
				Some(_) => return false,
				None => return true,
			},
			_ => {},
		}
	}

	false
}

/// Recovers the string a literal stands for.
fn unquote(sql: &str) -> String {
	let (escaped, body) = match sql.strip_prefix("E'") {
		Some(rest) => (true, rest),
		None => (false, sql.trim_start_matches('\'')),
	};
	let body = body.strip_suffix('\'').unwrap_or(body).replace("''", "'");

	if escaped { body.replace("\\\\", "\\") } else { body }
}

/// Evaluates a text predicate over one non-NULL column value.
fn eval(predicate: &Predicate, value: &str) -> bool {
	match predicate {
		Predicate::True => true,
		Predicate::False => false,
		Predicate::And(items) => items.iter().all(|item| eval(item, value)),
		Predicate::Or(items) => items.iter().any(|item| eval(item, value)),
		Predicate::Not(inner) => !eval(inner, value),
		Predicate::IsNull { negated, .. } => *negated,
		Predicate::Compare { op, rhs, .. } => {
			let matched = RegexBuilder::new(&unquote(rhs.as_sql()))
				.case_insensitive(true)
				.build()
				.expect("escaped pattern compiles")
				.is_match(value);

			match op {
				CompareOp::Matches => matched,
				CompareOp::NotMatches => !matched,
				other => panic!("Unexpected operator {other:?}."),
			}
		},
		other => panic!("Unexpected predicate {other:?}."),
	}
}

fn date() -> impl Strategy<Value = Date> {
	(1990_i32..2100, 1_u8..=12, 1_u8..=28).prop_map(|(year, month, day)| {
		let month = Month::try_from(month).expect("month in range");

		Date::from_calendar_date(year, month, day).expect("valid calendar date")
	})
}

fn slashed(date: Date) -> String {
	format!("{:04}/{:02}/{:02}", date.year(), u8::from(date.month()), date.day())
}

proptest! {
	#[test]
	fn terms_only_reach_sql_inside_one_literal(term in any::<String>(), exact in any::<bool>()) {
		let comparator = if exact { Comparator::Equals } else { Comparator::Matches };
		let sql = association::filter_association(
			GRANT_NUMBER,
			&[term.as_str()],
			false,
			comparator,
			TemplateParams::default(),
		)
		.render();
		let prefix = format!(
			"\"Goal\".\"id\" IN (SELECT g.id FROM goals g JOIN grants gr ON gr.id = g.grant_id WHERE gr.number {} ",
			if exact { "=" } else { "~*" },
		);
		let literal = sql
			.strip_prefix(&prefix)
			.and_then(|rest| rest.strip_suffix(')'))
			.expect("template is untouched around the literal");

		prop_assert!(is_single_literal(literal), "{literal}");
	}

	#[test]
	fn include_and_exclude_partition_non_null_values(
		terms in prop::collection::vec("[a-zA-Z0-9 .*+?()\\[\\]|'\\\\-]{1,6}", 1..4),
		value in "[a-zA-Z0-9 .*+?()\\[\\]|'\\\\-]{0,12}",
	) {
		let included = primitives::text_predicate(true, NAME, &terms);
		let excluded = primitives::text_predicate(false, NAME, &terms);

		prop_assert_ne!(eval(&included, &value), eval(&excluded, &value));
	}

	#[test]
	fn range_separators_are_equivalent(start in date(), span in 0_i64..400) {
		let end = start.checked_add(time::Duration::days(span)).expect("date in range");
		let bare = dates::within(CREATED, &[format!("{}-{}", slashed(start), slashed(end))], TemplateParams::default());
		let spaced = dates::within(CREATED, &[format!("{} - {}", slashed(start), slashed(end))], TemplateParams::default());

		prop_assert!(bare.is_ok());
		prop_assert_eq!(bare, spaced);
	}
}
