//! Correlated sub-query membership built from static templates and escaped literals.

use std::fmt::{Display, Formatter};

use crate::{
	literal::{IdList, SqlLiteral},
	predicate::{ColumnRef, CompareOp, Predicate},
};

const USER_PLACEHOLDER: &str = "$user";
const RECIPIENT_PLACEHOLDER: &str = "$recipient";

/// A `SELECT <entity id> FROM … WHERE <column>` fragment owned by a topic handler.
///
/// `$user` and `$recipient` are replaced with integer literals (or `NULL`) at render time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubqueryTemplate {
	entity: ColumnRef,
	sql: &'static str,
}
impl SubqueryTemplate {
	pub const fn new(entity: ColumnRef, sql: &'static str) -> Self {
		Self { entity, sql }
	}

	pub fn entity(&self) -> ColumnRef {
		self.entity
	}

	pub fn uses_user(&self) -> bool {
		self.sql.contains(USER_PLACEHOLDER)
	}

	fn render(&self, params: TemplateParams) -> String {
		let integer_or_null =
			|value: Option<i64>| value.map(|id| id.to_string()).unwrap_or_else(|| "NULL".to_string());

		self.sql
			.replace(USER_PLACEHOLDER, &integer_or_null(params.user_id))
			.replace(RECIPIENT_PLACEHOLDER, &integer_or_null(params.recipient_id))
	}
}

/// Integer values substituted into template placeholders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TemplateParams {
	pub user_id: Option<i64>,
	pub recipient_id: Option<i64>,
}

/// Operators a template may be completed with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparator {
	/// `~*` against the regex-escaped term: literal, case-insensitive substring match.
	Matches,
	/// `=` against the quoted term.
	Equals,
	/// `ILIKE '%term%'` with LIKE wildcards in the term escaped.
	ILike,
	/// `@> ARRAY[term]::text[]` for `text[]` columns.
	ArrayContains,
}
impl Comparator {
	fn complete(self, term: &str) -> String {
		match self {
			Self::Matches => format!("~* {}", SqlLiteral::text(&regex::escape(term))),
			Self::Equals => format!("= {}", SqlLiteral::text(term)),
			Self::ILike => format!("ILIKE {}", SqlLiteral::text(&format!("%{}%", like_escape(term)))),
			Self::ArrayContains => format!("@> ARRAY[{}]::text[]", SqlLiteral::text(term)),
		}
	}
}

/// Rendered sub-query text. Only this module can produce one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subquery(String);
impl Subquery {
	/// Combines membership queries over the same entity column.
	pub fn union(parts: Vec<Subquery>) -> Option<Subquery> {
		if parts.is_empty() {
			return None;
		}

		Some(Self(parts.into_iter().map(|part| part.0).collect::<Vec<_>>().join(" UNION ")))
	}

	pub fn as_sql(&self) -> &str {
		&self.0
	}
}
impl Display for Subquery {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// One `IN` (or `NOT IN`) leaf per term: any term matches when including, none when excluding.
pub fn filter_association<S>(
	template: SubqueryTemplate,
	terms: &[S],
	exclude: bool,
	comparator: Comparator,
	params: TemplateParams,
) -> Predicate
where
	S: AsRef<str>,
{
	if terms.is_empty() {
		return Predicate::True;
	}

	let base = template.render(params);
	let leaves = terms.iter().map(|term| Predicate::InSubquery {
		column: template.entity,
		subquery: Subquery(format!("{base} {}", comparator.complete(term.as_ref()))),
		negated: exclude,
	});

	combine(leaves, exclude)
}

/// Unquoted variant for id sets. The `IdList` type is the integer precondition.
pub fn filter_association_ids(
	template: SubqueryTemplate,
	ids: &IdList,
	exclude: bool,
	params: TemplateParams,
) -> Predicate {
	let list = ids.literals().iter().map(SqlLiteral::to_string).collect::<Vec<_>>().join(", ");

	Predicate::InSubquery {
		column: template.entity,
		subquery: Subquery(format!("{} IN ({list})", template.render(params))),
		negated: exclude,
	}
}

/// A single ranged leaf; the bounds arrive already escaped.
pub fn filter_association_between(
	template: SubqueryTemplate,
	low: &SqlLiteral,
	high: &SqlLiteral,
	exclude: bool,
	params: TemplateParams,
) -> Predicate {
	Predicate::InSubquery {
		column: template.entity,
		subquery: Subquery(format!("{} BETWEEN {low} AND {high}", template.render(params))),
		negated: exclude,
	}
}

/// Single-bound variant used by date topics.
pub fn filter_association_bound(
	template: SubqueryTemplate,
	op: CompareOp,
	bound: &SqlLiteral,
	params: TemplateParams,
) -> Predicate {
	Predicate::InSubquery {
		column: template.entity,
		subquery: Subquery(format!("{} {} {bound}", template.render(params), op.as_sql())),
		negated: false,
	}
}

/// Membership in a complete template that needs no trailing comparison.
pub fn membership(template: SubqueryTemplate, exclude: bool, params: TemplateParams) -> Predicate {
	Predicate::InSubquery {
		column: template.entity,
		subquery: Subquery(template.render(params)),
		negated: exclude,
	}
}

/// Membership in the union of several complete templates over the same entity column.
pub fn union_membership(
	templates: &[SubqueryTemplate],
	exclude: bool,
	params: TemplateParams,
) -> Predicate {
	let Some(first) = templates.first() else {
		return Predicate::True;
	};
	let parts = templates.iter().map(|template| Subquery(template.render(params))).collect();

	match Subquery::union(parts) {
		Some(subquery) => Predicate::InSubquery { column: first.entity, subquery, negated: exclude },
		None => Predicate::True,
	}
}

/// Checks every term against several text surfaces of the same entity.
///
/// Including matches when any surface contains any term. Excluding requires every surface to
/// contain none of the terms; a surface with no row for the entity counts as not containing.
pub fn filter_association_surfaces<S>(
	surfaces: &[SubqueryTemplate],
	terms: &[S],
	exclude: bool,
	comparator: Comparator,
	params: TemplateParams,
) -> Predicate
where
	S: AsRef<str>,
{
	if terms.is_empty() || surfaces.is_empty() {
		return Predicate::True;
	}

	let per_surface = surfaces
		.iter()
		.map(|surface| filter_association(*surface, terms, exclude, comparator, params));

	combine(per_surface, exclude)
}

pub fn combine<I>(leaves: I, exclude: bool) -> Predicate
where
	I: IntoIterator<Item = Predicate>,
{
	if exclude { Predicate::and(leaves) } else { Predicate::or(leaves) }
}

fn like_escape(term: &str) -> String {
	let mut out = String::with_capacity(term.len());

	for ch in term.chars() {
		if matches!(ch, '%' | '_' | '\\') {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}
