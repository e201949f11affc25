use tta_domain::constants::REPORT_STATUSES;

use crate::{
	association::{self, Comparator, SubqueryTemplate},
	dates::{self, DateColumn, DateTarget},
	filter::Condition,
	predicate::{ColumnRef, SqlExpr},
	primitives,
	registry::{EntityFamily, HandlerContext, Outcome, TopicRegistry},
	topics::ids,
};

const COLLAB_ID: ColumnRef = ColumnRef::new("CollabReport", "id");
const ID: SqlExpr = SqlExpr::Column(COLLAB_ID);
const REGION_ID: SqlExpr = SqlExpr::Column(ColumnRef::new("CollabReport", "region_id"));
const STATUS: SqlExpr = SqlExpr::Column(ColumnRef::new("CollabReport", "calculated_status"));
const START_DATE: DateTarget =
	DateTarget::Column(DateColumn::Native(ColumnRef::new("CollabReport", "start_date")));

const CREATOR: SubqueryTemplate = SubqueryTemplate::new(
	COLLAB_ID,
	"SELECT cr.id FROM collab_reports cr JOIN users u ON u.id = cr.user_id WHERE u.name",
);
const COLLABORATOR: SubqueryTemplate = SubqueryTemplate::new(
	COLLAB_ID,
	"SELECT crc.collab_report_id FROM collab_report_collaborators crc \
JOIN users u ON u.id = crc.user_id WHERE u.name",
);

pub fn registry() -> TopicRegistry {
	TopicRegistry::builder(EntityFamily::CollabReport)
		.on("reportId", Condition::In, report_id_in)
		.on("reportId", Condition::NotIn, report_id_nin)
		.on("region", Condition::In, region_in)
		.on("region", Condition::NotIn, region_nin)
		.on("startDate", Condition::Before, start_date_before)
		.on("startDate", Condition::After, start_date_after)
		.on("startDate", Condition::Within, start_date_within)
		.on("creator", Condition::In, creator_in)
		.on("creator", Condition::NotIn, creator_nin)
		.on("collaborators", Condition::In, collaborators_in)
		.on("collaborators", Condition::NotIn, collaborators_nin)
		.on("status", Condition::In, status_in)
		.on("status", Condition::NotIn, status_nin)
		.build()
}

fn report_id_in(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::numeric_predicate(true, ID, ids(values)?.ids()))
}

fn report_id_nin(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::numeric_predicate(false, ID, ids(values)?.ids()))
}

fn region_in(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::numeric_predicate(true, REGION_ID, ids(values)?.ids()))
}

fn region_nin(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::numeric_predicate(false, REGION_ID, ids(values)?.ids()))
}

fn start_date_before(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::before(START_DATE, values, ctx.params())
}

fn start_date_after(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::after(START_DATE, values, ctx.params())
}

fn start_date_within(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::within(START_DATE, values, ctx.params())
}

fn creator_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(CREATOR, values, false, Comparator::Matches, ctx.params()))
}

fn creator_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(CREATOR, values, true, Comparator::Matches, ctx.params()))
}

fn collaborators_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(COLLABORATOR, values, false, Comparator::Matches, ctx.params()))
}

fn collaborators_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(COLLABORATOR, values, true, Comparator::Matches, ctx.params()))
}

fn status_in(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(true, STATUS, &REPORT_STATUSES, values)
}

fn status_nin(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(false, STATUS, &REPORT_STATUSES, values)
}
