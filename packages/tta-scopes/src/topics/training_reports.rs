use tta_domain::constants::TRAINING_REPORT_STATUSES;

use crate::{
	association::{self, Comparator, SubqueryTemplate},
	dates::{self, DateColumn, DateTarget},
	filter::Condition,
	predicate::{ColumnRef, SqlExpr},
	primitives,
	registry::{EntityFamily, HandlerContext, Outcome, TopicRegistry},
	topics::ids,
};

const EVENT_ID: ColumnRef = ColumnRef::new("EventReportPilot", "id");
const REGION_ID: SqlExpr = SqlExpr::Column(ColumnRef::new("EventReportPilot", "region_id"));
const DISPLAY_ID: SqlExpr = SqlExpr::Static(r#"("EventReportPilot"."data"->>'eventId')"#);
const STATUS: SqlExpr = SqlExpr::Static(r#"("EventReportPilot"."data"->>'status')"#);
const STANDARD: SqlExpr = SqlExpr::Static(r#"("EventReportPilot"."data"->>'standard')"#);
const START_DATE: DateTarget =
	DateTarget::Column(DateColumn::Document(r#"("EventReportPilot"."data"->>'startDate')"#));

const CREATOR_CENTER: SubqueryTemplate = SubqueryTemplate::new(
	EVENT_ID,
	"SELECT e.id FROM event_report_pilots e \
JOIN national_center_users ncu ON ncu.user_id = e.owner_id \
JOIN national_centers nc ON nc.id = ncu.national_center_id WHERE nc.name",
);
const COLLABORATOR_CENTER: SubqueryTemplate = SubqueryTemplate::new(
	EVENT_ID,
	"SELECT e.id FROM event_report_pilots e \
JOIN national_center_users ncu ON ncu.user_id = ANY(e.collaborator_ids) \
JOIN national_centers nc ON nc.id = ncu.national_center_id WHERE nc.name",
);

pub fn registry() -> TopicRegistry {
	TopicRegistry::builder(EntityFamily::TrainingReport)
		.on("startDate", Condition::Before, start_date_before)
		.on("startDate", Condition::After, start_date_after)
		.on("startDate", Condition::Within, start_date_within)
		.on("region", Condition::In, region_in)
		.on("region", Condition::NotIn, region_nin)
		.on("eventId", Condition::Contains, event_id_ctn)
		.on("eventId", Condition::NotContains, event_id_nctn)
		.on("creator", Condition::In, creator_in)
		.on("creator", Condition::NotIn, creator_nin)
		.on("collaborators", Condition::In, collaborators_in)
		.on("collaborators", Condition::NotIn, collaborators_nin)
		.on("status", Condition::In, status_in)
		.on("status", Condition::NotIn, status_nin)
		.on("standard", Condition::In, standard_in)
		.on("standard", Condition::NotIn, standard_nin)
		.build()
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

fn region_in(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::numeric_predicate(true, REGION_ID, ids(values)?.ids()))
}

fn region_nin(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::numeric_predicate(false, REGION_ID, ids(values)?.ids()))
}

fn event_id_ctn(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::text_predicate(true, DISPLAY_ID, values))
}

fn event_id_nctn(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::text_predicate(false, DISPLAY_ID, values))
}

// Creator and collaborators are matched by the national center their users belong to.
fn creator_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(CREATOR_CENTER, values, false, Comparator::Equals, ctx.params()))
}

fn creator_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(CREATOR_CENTER, values, true, Comparator::Equals, ctx.params()))
}

fn collaborators_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(
		COLLABORATOR_CENTER,
		values,
		false,
		Comparator::Equals,
		ctx.params(),
	))
}

fn collaborators_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(
		COLLABORATOR_CENTER,
		values,
		true,
		Comparator::Equals,
		ctx.params(),
	))
}

fn status_in(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(true, STATUS, &TRAINING_REPORT_STATUSES, values)
}

fn status_nin(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(false, STATUS, &TRAINING_REPORT_STATUSES, values)
}

fn standard_in(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::exact_predicate(true, STANDARD, values))
}

fn standard_nin(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::exact_predicate(false, STANDARD, values))
}

#[cfg(test)]
mod tests {
	use crate::{
		filter::Condition,
		registry::{HandlerContext, Ignored},
		topics::training_reports,
	};

	fn run(topic: &str, condition: Condition, values: &[&str]) -> Result<String, Ignored> {
		let values = values.iter().map(|value| value.to_string()).collect::<Vec<_>>();
		let handler =
			training_reports::registry().handler(topic, condition).expect("registered handler");

		handler(&values, &HandlerContext::default()).map(|predicate| predicate.render())
	}

	#[test]
	fn start_date_converts_document_text() {
		let sql = run("startDate", Condition::Within, &["2021/06/07-2021/06/07"]).expect("predicate");

		assert!(sql.contains("to_date((\"EventReportPilot\".\"data\"->>'startDate'), 'MM/DD/YYYY')"));
		assert!(sql.ends_with("BETWEEN '2021-06-07' AND '2021-06-07'"));
	}

	#[test]
	fn range_without_separator_is_ignored() {
		assert_eq!(
			run("startDate", Condition::Within, &["2021/06/07"]),
			Err(Ignored::MalformedRange)
		);
	}

	#[test]
	fn missing_event_id_counts_as_not_containing() {
		assert_eq!(
			run("eventId", Condition::NotContains, &["1035"]).expect("predicate"),
			r#"(("EventReportPilot"."data"->>'eventId') IS NULL OR ("EventReportPilot"."data"->>'eventId') !~* '1035')"#
		);
	}

	#[test]
	fn collaborators_match_national_centers() {
		let sql = run("collaborators", Condition::In, &["NC Test 1"]).expect("predicate");

		assert!(sql.contains("ncu.user_id = ANY(e.collaborator_ids)"));
		assert!(sql.ends_with("WHERE nc.name = 'NC Test 1')"));
	}
}
