//! `bef` / `aft` / `win` normalization.
//!
//! Accepted day layouts: `YYYY/MM/DD`, `YYYY-MM-DD`, `MM/DD/YYYY`, plus single-digit month/day and
//! two-digit year variants. Month-only values (`YYYY/MM`, `YYYY-MM`, `MM/YYYY`) round to the first
//! day when they open a range and to the last day when they close one.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use time::{Date, Month};

use crate::{
	association::{self, SubqueryTemplate, TemplateParams},
	literal::SqlLiteral,
	predicate::{ColumnRef, CompareOp, Predicate, SqlExpr},
	registry::{Ignored, Outcome},
};

static YEAR_FIRST: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^(\d{4})[/-](\d{1,2})[/-](\d{1,2})$").ok());
static YEAR_LAST: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})$").ok());
static MONTH_YEAR_FIRST: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^(\d{4})[/-](\d{1,2})$").ok());
static MONTH_YEAR_LAST: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{4})$").ok());

/// Which end of a period a month-only value stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
	Start,
	End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
	pub start: Date,
	pub end: Date,
}

/// How a date-bearing topic reaches its stored value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateColumn {
	Native(ColumnRef),
	Timestamp(ColumnRef),
	/// Text inside a semi-structured document column.
	Document(&'static str),
}
impl DateColumn {
	pub fn expr(self) -> SqlExpr {
		match self {
			Self::Native(column) => SqlExpr::Column(column),
			Self::Timestamp(column) => SqlExpr::TimestampDate(column),
			Self::Document(sql) => SqlExpr::DocumentDate(sql),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateTarget {
	Column(DateColumn),
	/// The template ends with a comparable date expression.
	Association(SubqueryTemplate),
}

pub fn parse_date(raw: &str, rounding: Rounding) -> Option<Date> {
	let value = raw.trim();

	if let Some(caps) = captures(&YEAR_FIRST, value) {
		return calendar_date(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?);
	}
	if let Some(caps) = captures(&YEAR_LAST, value) {
		let year = match caps[3].len() {
			2 => 2000 + caps[3].parse::<i32>().ok()?,
			_ => caps[3].parse().ok()?,
		};

		return calendar_date(year, caps[1].parse().ok()?, caps[2].parse().ok()?);
	}

	let (year, month) = if let Some(caps) = captures(&MONTH_YEAR_FIRST, value) {
		(caps[1].parse().ok()?, caps[2].parse().ok()?)
	} else if let Some(caps) = captures(&MONTH_YEAR_LAST, value) {
		(caps[2].parse().ok()?, caps[1].parse().ok()?)
	} else {
		return None;
	};
	let first = calendar_date(year, month, 1)?;

	match rounding {
		Rounding::Start => Some(first),
		Rounding::End => last_day_of_month(first),
	}
}

/// Splits on ` - ` first, then on a bare `-`; a bare split is accepted only when exactly one
/// hyphen position leaves two parseable dates.
pub fn parse_range(raw: &str) -> Option<DateRange> {
	let value = raw.trim();

	if let Some((start, end)) = value.split_once(" - ") {
		return range_from_parts(start, end);
	}

	let mut found = None;

	for (idx, _) in value.match_indices('-') {
		if let Some(range) = range_from_parts(&value[..idx], &value[idx + 1..]) {
			if found.is_some() {
				return None;
			}

			found = Some(range);
		}
	}

	found
}

pub fn before(target: DateTarget, values: &[String], params: TemplateParams) -> Outcome {
	bound(target, values, Rounding::End, CompareOp::Lte, params)
}

pub fn after(target: DateTarget, values: &[String], params: TemplateParams) -> Outcome {
	bound(target, values, Rounding::Start, CompareOp::Gte, params)
}

/// Each parseable range is one alternative; malformed ranges contribute nothing.
pub fn within(target: DateTarget, values: &[String], params: TemplateParams) -> Outcome {
	let ranges = values.iter().filter_map(|value| parse_range(value)).collect::<Vec<_>>();

	if ranges.is_empty() {
		return Err(Ignored::MalformedRange);
	}

	Ok(Predicate::or(ranges.into_iter().map(|range| {
		let low = SqlLiteral::date(range.start);
		let high = SqlLiteral::date(range.end);

		match target {
			DateTarget::Column(column) => Predicate::Between { expr: column.expr(), low, high },
			DateTarget::Association(template) =>
				association::filter_association_between(template, &low, &high, false, params),
		}
	})))
}

fn bound(
	target: DateTarget,
	values: &[String],
	rounding: Rounding,
	op: CompareOp,
	params: TemplateParams,
) -> Outcome {
	let dates = values.iter().filter_map(|value| parse_date(value, rounding)).collect::<Vec<_>>();

	if dates.is_empty() {
		return Err(Ignored::MalformedDate);
	}

	Ok(Predicate::or(dates.into_iter().map(|date| {
		let literal = SqlLiteral::date(date);

		match target {
			DateTarget::Column(column) => Predicate::compare(column.expr(), op, literal),
			DateTarget::Association(template) =>
				association::filter_association_bound(template, op, &literal, params),
		}
	})))
}

fn range_from_parts(start: &str, end: &str) -> Option<DateRange> {
	let start = parse_date(start, Rounding::Start)?;
	let end = parse_date(end, Rounding::End)?;

	if start > end {
		return None;
	}

	Some(DateRange { start, end })
}

fn captures<'v>(pattern: &LazyLock<Option<Regex>>, value: &'v str) -> Option<Captures<'v>> {
	pattern.as_ref().and_then(|re| re.captures(value))
}

fn calendar_date(year: i32, month: u8, day: u8) -> Option<Date> {
	Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()
}

fn last_day_of_month(first: Date) -> Option<Date> {
	let (year, month) = match first.month() {
		Month::December => (first.year() + 1, Month::January),
		month => (first.year(), month.next()),
	};

	Date::from_calendar_date(year, month, 1).ok()?.previous_day()
}

#[cfg(test)]
mod tests {
	use time::macros::date;

	use crate::{
		association::TemplateParams,
		dates::{self, DateColumn, DateRange, DateTarget, Rounding},
		predicate::ColumnRef,
		registry::Ignored,
	};

	const START_DATE: DateTarget =
		DateTarget::Column(DateColumn::Native(ColumnRef::new("ActivityReport", "start_date")));

	fn values(raw: &str) -> Vec<String> {
		vec![raw.to_string()]
	}

	#[test]
	fn parses_every_layout() {
		for raw in ["2021/06/07", "2021-06-07", "2021/6/7", "2021-6-7", "06/07/2021", "6/7/2021", "06/07/21"] {
			assert_eq!(dates::parse_date(raw, Rounding::Start), Some(date!(2021 - 06 - 07)), "{raw}");
		}
	}

	#[test]
	fn rejects_impossible_days() {
		assert_eq!(dates::parse_date("2021/02/30", Rounding::Start), None);
		assert_eq!(dates::parse_date("13/01/2021", Rounding::Start), None);
		assert_eq!(dates::parse_date("yesterday", Rounding::Start), None);
	}

	#[test]
	fn month_only_rounds_by_direction() {
		assert_eq!(dates::parse_date("2025/02", Rounding::Start), Some(date!(2025 - 02 - 01)));
		assert_eq!(dates::parse_date("2025/02", Rounding::End), Some(date!(2025 - 02 - 28)));
		assert_eq!(dates::parse_date("2024-02", Rounding::End), Some(date!(2024 - 02 - 29)));
		assert_eq!(dates::parse_date("12/2024", Rounding::End), Some(date!(2024 - 12 - 31)));
	}

	#[test]
	fn month_rounding_reaches_the_predicate() {
		let before = dates::before(START_DATE, &values("2025/02"), TemplateParams::default())
			.expect("predicate");
		let after = dates::after(START_DATE, &values("2025/02"), TemplateParams::default())
			.expect("predicate");

		assert_eq!(before.render(), r#""ActivityReport"."start_date" <= '2025-02-28'"#);
		assert_eq!(after.render(), r#""ActivityReport"."start_date" >= '2025-02-01'"#);
	}

	#[test]
	fn both_separators_normalize_identically() {
		let expected = Some(DateRange { start: date!(2021 - 01 - 09), end: date!(2021 - 01 - 11) });

		assert_eq!(dates::parse_range("2021/01/09-2021/01/11"), expected);
		assert_eq!(dates::parse_range("2021/01/09 - 2021/01/11"), expected);
		assert_eq!(dates::parse_range("2021-01-09-2021-01-11"), expected);
		assert_eq!(dates::parse_range("01/09/2021-01/11/2021"), expected);
	}

	#[test]
	fn month_only_ranges_cover_whole_months() {
		assert_eq!(
			dates::parse_range("2021/01-2021/03"),
			Some(DateRange { start: date!(2021 - 01 - 01), end: date!(2021 - 03 - 31) })
		);
	}

	#[test]
	fn malformed_ranges_are_ignored() {
		for raw in ["2021/06/07", "2021/06/07-", "-2021/06/07", "2021/06/07-nope", "2021/06/08-2021/06/07"] {
			assert_eq!(
				dates::within(START_DATE, &values(raw), TemplateParams::default()),
				Err(Ignored::MalformedRange),
				"{raw}"
			);
		}
	}

	#[test]
	fn malformed_bounds_are_ignored() {
		assert_eq!(
			dates::before(START_DATE, &values("not a date"), TemplateParams::default()),
			Err(Ignored::MalformedDate)
		);
	}

	#[test]
	fn within_renders_inclusive_between() {
		let predicate =
			dates::within(START_DATE, &values("2021/06/07-2021/06/07"), TemplateParams::default())
				.expect("predicate");

		assert_eq!(
			predicate.render(),
			r#""ActivityReport"."start_date" BETWEEN '2021-06-07' AND '2021-06-07'"#
		);
	}
}
