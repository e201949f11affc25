use tta_domain::constants::PROGRAM_TYPES;

use crate::{
	access::visible_group_condition,
	association::{self, Comparator, SubqueryTemplate},
	dates::{self, Rounding},
	filter::Condition,
	literal::SqlLiteral,
	predicate::{ColumnRef, CompareOp, Predicate, SqlExpr},
	primitives,
	registry::{EntityFamily, HandlerContext, Ignored, Outcome, TopicRegistry},
	topics::ids,
};

const GRANT_ID: ColumnRef = ColumnRef::new("Grant", "id");
const RECIPIENT_ID: SqlExpr = SqlExpr::Column(ColumnRef::new("Grant", "recipient_id"));
const REGION_ID: SqlExpr = SqlExpr::Column(ColumnRef::new("Grant", "region_id"));
const NUMBER: SqlExpr = SqlExpr::Column(ColumnRef::new("Grant", "number"));
const STATE_CODE: SqlExpr = SqlExpr::Column(ColumnRef::new("Grant", "state_code"));
const PROGRAM_SPECIALIST: SqlExpr =
	SqlExpr::Column(ColumnRef::new("Grant", "program_specialist_name"));
const START_DATE: SqlExpr = SqlExpr::Column(ColumnRef::new("Grant", "start_date"));
const END_DATE: SqlExpr = SqlExpr::Column(ColumnRef::new("Grant", "end_date"));

const RECIPIENT_NAME: SubqueryTemplate = SubqueryTemplate::new(
	GRANT_ID,
	"SELECT gr.id FROM grants gr JOIN recipients rc ON rc.id = gr.recipient_id WHERE rc.name",
);
const PROGRAM_TYPE: SubqueryTemplate =
	SubqueryTemplate::new(GRANT_ID, "SELECT p.grant_id FROM programs p WHERE p.program_type");
const GROUP_NAME: SubqueryTemplate = SubqueryTemplate::new(
	GRANT_ID,
	concat!(
		"SELECT gg.grant_id FROM group_grants gg JOIN groups gp ON gp.id = gg.group_id WHERE ",
		visible_group_condition!(),
		" AND gp.name"
	),
);

pub fn registry() -> TopicRegistry {
	TopicRegistry::builder(EntityFamily::Grant)
		.on("recipient", Condition::Contains, recipient_ctn)
		.on("recipient", Condition::NotContains, recipient_nctn)
		.on("recipientId", Condition::In, recipient_id_in)
		.on("recipientId", Condition::NotIn, recipient_id_nin)
		.on("programSpecialist", Condition::Contains, program_specialist_ctn)
		.on("programSpecialist", Condition::NotContains, program_specialist_nctn)
		.on("programType", Condition::In, program_type_in)
		.on("programType", Condition::NotIn, program_type_nin)
		.on("grantNumber", Condition::Contains, grant_number_ctn)
		.on("grantNumber", Condition::NotContains, grant_number_nctn)
		.on("stateCode", Condition::Contains, state_code_ctn)
		.on("region", Condition::In, region_in)
		.on("region", Condition::NotIn, region_nin)
		.on("group", Condition::In, group_in)
		.on("group", Condition::NotIn, group_nin)
		.on("startDate", Condition::Before, active_before)
		.on("startDate", Condition::After, active_after)
		.on("startDate", Condition::Within, active_within)
		.build()
}

fn recipient_ctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(RECIPIENT_NAME, values, false, Comparator::Matches, ctx.params()))
}

fn recipient_nctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(RECIPIENT_NAME, values, true, Comparator::Matches, ctx.params()))
}

fn recipient_id_in(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::numeric_predicate(true, RECIPIENT_ID, ids(values)?.ids()))
}

fn recipient_id_nin(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::numeric_predicate(false, RECIPIENT_ID, ids(values)?.ids()))
}

fn program_specialist_ctn(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::text_predicate(true, PROGRAM_SPECIALIST, values))
}

fn program_specialist_nctn(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::text_predicate(false, PROGRAM_SPECIALIST, values))
}

fn program_type(values: &[String], ctx: &HandlerContext, exclude: bool) -> Outcome {
	let types = PROGRAM_TYPES.retain(values);

	if types.is_empty() {
		return Err(Ignored::NoValidValues);
	}

	Ok(association::filter_association(PROGRAM_TYPE, &types, exclude, Comparator::Equals, ctx.params()))
}

fn program_type_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	program_type(values, ctx, false)
}

fn program_type_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	program_type(values, ctx, true)
}

fn grant_number_ctn(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::text_predicate(true, NUMBER, values))
}

fn grant_number_nctn(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::text_predicate(false, NUMBER, values))
}

fn state_code_ctn(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::text_predicate(true, STATE_CODE, values))
}

fn region_in(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::numeric_predicate(true, REGION_ID, ids(values)?.ids()))
}

fn region_nin(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::numeric_predicate(false, REGION_ID, ids(values)?.ids()))
}

fn group(values: &[String], ctx: &HandlerContext, exclude: bool) -> Outcome {
	ctx.require_user()?;

	Ok(association::filter_association(GROUP_NAME, values, exclude, Comparator::Equals, ctx.params()))
}

fn group_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	group(values, ctx, false)
}

fn group_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	group(values, ctx, true)
}

/// Grants that had started by the given day.
fn active_before(values: &[String], _: &HandlerContext) -> Outcome {
	let days = values.iter().filter_map(|value| dates::parse_date(value, Rounding::End));

	non_empty(days.map(|day| Predicate::compare(START_DATE, CompareOp::Lte, SqlLiteral::date(day))))
		.ok_or(Ignored::MalformedDate)
}

/// Grants still running on or after the given day.
fn active_after(values: &[String], _: &HandlerContext) -> Outcome {
	let days = values.iter().filter_map(|value| dates::parse_date(value, Rounding::Start));

	non_empty(days.map(|day| Predicate::compare(END_DATE, CompareOp::Gte, SqlLiteral::date(day))))
		.ok_or(Ignored::MalformedDate)
}

/// Grants whose active window overlaps the range.
fn active_within(values: &[String], _: &HandlerContext) -> Outcome {
	let ranges = values.iter().filter_map(|value| dates::parse_range(value));

	non_empty(ranges.map(|range| {
		Predicate::and([
			Predicate::compare(START_DATE, CompareOp::Lte, SqlLiteral::date(range.end)),
			Predicate::compare(END_DATE, CompareOp::Gte, SqlLiteral::date(range.start)),
		])
	}))
	.ok_or(Ignored::MalformedRange)
}

fn non_empty<I>(alternatives: I) -> Option<Predicate>
where
	I: Iterator<Item = Predicate>,
{
	let alternatives = alternatives.collect::<Vec<_>>();

	if alternatives.is_empty() { None } else { Some(Predicate::or(alternatives)) }
}
