//! Boolean predicate algebra rendered to SQL. Predicates are built, never parsed.

use std::fmt::{Display, Formatter};

use crate::{association::Subquery, literal::SqlLiteral};

/// A static, quoted `"table"."column"` reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ColumnRef {
	pub table: &'static str,
	pub column: &'static str,
}
impl ColumnRef {
	pub const fn new(table: &'static str, column: &'static str) -> Self {
		Self { table, column }
	}
}
impl Display for ColumnRef {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "\"{}\".\"{}\"", self.table, self.column)
	}
}

/// Left-hand side of a leaf comparison. Every variant is static SQL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlExpr {
	Column(ColumnRef),
	/// A static expression such as a JSON field extraction.
	Static(&'static str),
	/// Timestamp column truncated to its calendar day.
	TimestampDate(ColumnRef),
	/// Text expression holding `YYYY/MM/DD`, `YYYY-MM-DD` or `MM/DD/YYYY`, converted with `to_date`.
	DocumentDate(&'static str),
}
impl Display for SqlExpr {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Column(column) => write!(f, "{column}"),
			Self::Static(sql) => f.write_str(sql),
			Self::TimestampDate(column) => write!(f, "{column}::date"),
			Self::DocumentDate(sql) => write!(
				f,
				"(CASE \
WHEN {sql} ~ '^[0-9]{{4}}[/-][0-9]{{1,2}}[/-][0-9]{{1,2}}$' THEN to_date(replace({sql}, '-', '/'), 'YYYY/MM/DD') \
WHEN {sql} ~ '^[0-9]{{1,2}}/[0-9]{{1,2}}/[0-9]{{4}}$' THEN to_date({sql}, 'MM/DD/YYYY') \
END)"
			),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompareOp {
	Eq,
	NotEq,
	Lte,
	Gte,
	/// Case-insensitive POSIX regex match.
	Matches,
	NotMatches,
}
impl CompareOp {
	pub fn as_sql(self) -> &'static str {
		match self {
			Self::Eq => "=",
			Self::NotEq => "<>",
			Self::Lte => "<=",
			Self::Gte => ">=",
			Self::Matches => "~*",
			Self::NotMatches => "!~*",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
	True,
	False,
	And(Vec<Predicate>),
	Or(Vec<Predicate>),
	Not(Box<Predicate>),
	Compare { lhs: SqlExpr, op: CompareOp, rhs: SqlLiteral },
	Between { expr: SqlExpr, low: SqlLiteral, high: SqlLiteral },
	InList { expr: SqlExpr, values: Vec<SqlLiteral>, negated: bool },
	IsNull { expr: SqlExpr, negated: bool },
	/// `text[]` column shares at least one element with `values`.
	ArrayOverlap { column: ColumnRef, values: Vec<SqlLiteral> },
	InSubquery { column: ColumnRef, subquery: Subquery, negated: bool },
}
impl Predicate {
	/// Conjunction that flattens nested `And`s and folds `True`/`False`.
	pub fn and<I>(items: I) -> Self
	where
		I: IntoIterator<Item = Predicate>,
	{
		let mut out = Vec::new();

		for item in items {
			match item {
				Self::True => {},
				Self::False => return Self::False,
				Self::And(inner) => out.extend(inner),
				other => out.push(other),
			}
		}

		match out.len() {
			0 => Self::True,
			1 => out.remove(0),
			_ => Self::And(out),
		}
	}

	/// Disjunction that flattens nested `Or`s and folds `True`/`False`.
	pub fn or<I>(items: I) -> Self
	where
		I: IntoIterator<Item = Predicate>,
	{
		let mut out = Vec::new();

		for item in items {
			match item {
				Self::False => {},
				Self::True => return Self::True,
				Self::Or(inner) => out.extend(inner),
				other => out.push(other),
			}
		}

		match out.len() {
			0 => Self::False,
			1 => out.remove(0),
			_ => Self::Or(out),
		}
	}

	#[allow(clippy::should_implement_trait)]
	pub fn not(inner: Predicate) -> Self {
		match inner {
			Self::True => Self::False,
			Self::False => Self::True,
			Self::Not(inner) => *inner,
			other => Self::Not(Box::new(other)),
		}
	}

	pub fn compare(lhs: SqlExpr, op: CompareOp, rhs: SqlLiteral) -> Self {
		Self::Compare { lhs, op, rhs }
	}

	pub fn is_null(expr: SqlExpr) -> Self {
		Self::IsNull { expr, negated: false }
	}

	pub fn is_not_null(expr: SqlExpr) -> Self {
		Self::IsNull { expr, negated: true }
	}

	pub fn in_list(expr: SqlExpr, values: Vec<SqlLiteral>) -> Self {
		if values.is_empty() {
			return Self::False;
		}

		Self::InList { expr, values, negated: false }
	}

	pub fn not_in_list(expr: SqlExpr, values: Vec<SqlLiteral>) -> Self {
		if values.is_empty() {
			return Self::True;
		}

		Self::InList { expr, values, negated: true }
	}

	pub fn is_neutral(&self) -> bool {
		matches!(self, Self::True)
	}

	pub fn render(&self) -> String {
		self.to_string()
	}
}
impl Display for Predicate {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::True => f.write_str("TRUE"),
			Self::False => f.write_str("FALSE"),
			Self::And(items) => write_joined(f, items, " AND "),
			Self::Or(items) => write_joined(f, items, " OR "),
			Self::Not(inner) => write!(f, "NOT ({inner})"),
			Self::Compare { lhs, op, rhs } => write!(f, "{lhs} {} {rhs}", op.as_sql()),
			Self::Between { expr, low, high } => write!(f, "{expr} BETWEEN {low} AND {high}"),
			Self::InList { values, negated, .. } if values.is_empty() =>
				f.write_str(if *negated { "TRUE" } else { "FALSE" }),
			Self::InList { expr, values, negated } => {
				write!(f, "{expr} {}IN (", if *negated { "NOT " } else { "" })?;

				for (idx, value) in values.iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}

					write!(f, "{value}")?;
				}

				f.write_str(")")
			},
			Self::IsNull { expr, negated } =>
				write!(f, "{expr} IS {}NULL", if *negated { "NOT " } else { "" }),
			Self::ArrayOverlap { values, .. } if values.is_empty() => f.write_str("FALSE"),
			Self::ArrayOverlap { column, values } => {
				write!(f, "{column} && ARRAY[")?;

				for (idx, value) in values.iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}

					write!(f, "{value}")?;
				}

				f.write_str("]::text[]")
			},
			Self::InSubquery { column, subquery, negated } =>
				write!(f, "{column} {}IN ({subquery})", if *negated { "NOT " } else { "" }),
		}
	}
}

fn write_joined(f: &mut Formatter<'_>, items: &[Predicate], separator: &str) -> std::fmt::Result {
	f.write_str("(")?;

	for (idx, item) in items.iter().enumerate() {
		if idx > 0 {
			f.write_str(separator)?;
		}

		write!(f, "{item}")?;
	}

	f.write_str(")")
}

/// The ordered predicate list a caller ANDs into its WHERE clause.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scope {
	predicates: Vec<Predicate>,
}
impl Scope {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, predicate: Predicate) {
		self.predicates.push(predicate);
	}

	/// Appends a predicate, typically an authorization restriction.
	pub fn with(mut self, predicate: Predicate) -> Self {
		self.predicates.push(predicate);

		self
	}

	pub fn predicates(&self) -> &[Predicate] {
		&self.predicates
	}

	pub fn len(&self) -> usize {
		self.predicates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.predicates.is_empty()
	}

	pub fn into_predicate(self) -> Predicate {
		Predicate::and(self.predicates)
	}

	pub fn to_sql(&self) -> String {
		if self.predicates.is_empty() {
			return "TRUE".to_string();
		}

		self.predicates.iter().map(Predicate::render).collect::<Vec<_>>().join(" AND ")
	}
}
impl FromIterator<Predicate> for Scope {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = Predicate>,
	{
		Self { predicates: iter.into_iter().collect() }
	}
}
impl Extend<Predicate> for Scope {
	fn extend<I>(&mut self, iter: I)
	where
		I: IntoIterator<Item = Predicate>,
	{
		self.predicates.extend(iter);
	}
}
