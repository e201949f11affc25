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

const SESSION_ID: ColumnRef = ColumnRef::new("SessionReportPilot", "id");
const STATUS: SqlExpr = SqlExpr::Static(r#"("SessionReportPilot"."data"->>'status')"#);
const START_DATE: DateTarget =
	DateTarget::Column(DateColumn::Document(r#"("SessionReportPilot"."data"->>'startDate')"#));

const EVENT_REGION: SubqueryTemplate = SubqueryTemplate::new(
	SESSION_ID,
	"SELECT s.id FROM session_report_pilots s \
JOIN event_report_pilots e ON e.id = s.event_id WHERE e.region_id",
);
const EVENT_DISPLAY_ID: SubqueryTemplate = SubqueryTemplate::new(
	SESSION_ID,
	"SELECT s.id FROM session_report_pilots s \
JOIN event_report_pilots e ON e.id = s.event_id WHERE (e.data->>'eventId')",
);
const OBJECTIVE_TOPIC: SubqueryTemplate = SubqueryTemplate::new(
	SESSION_ID,
	"SELECT s.id FROM session_report_pilots s \
CROSS JOIN LATERAL jsonb_array_elements_text(\
CASE WHEN jsonb_typeof(s.data->'objectiveTopics') = 'array' THEN s.data->'objectiveTopics' ELSE '[]'::jsonb END\
) AS ot(name) WHERE ot.name",
);

pub fn registry() -> TopicRegistry {
	TopicRegistry::builder(EntityFamily::SessionReport)
		.on("startDate", Condition::Before, start_date_before)
		.on("startDate", Condition::After, start_date_after)
		.on("startDate", Condition::Within, start_date_within)
		.on("region", Condition::In, region_in)
		.on("region", Condition::NotIn, region_nin)
		.on("eventId", Condition::Contains, event_id_ctn)
		.on("eventId", Condition::NotContains, event_id_nctn)
		.on("status", Condition::In, status_in)
		.on("status", Condition::NotIn, status_nin)
		.on("objectiveTopics", Condition::In, objective_topics_in)
		.on("objectiveTopics", Condition::NotIn, objective_topics_nin)
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

fn region_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_ids(EVENT_REGION, &ids(values)?, false, ctx.params()))
}

fn region_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_ids(EVENT_REGION, &ids(values)?, true, ctx.params()))
}

fn event_id_ctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(EVENT_DISPLAY_ID, values, false, Comparator::Matches, ctx.params()))
}

fn event_id_nctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(EVENT_DISPLAY_ID, values, true, Comparator::Matches, ctx.params()))
}

fn status_in(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(true, STATUS, &TRAINING_REPORT_STATUSES, values)
}

fn status_nin(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(false, STATUS, &TRAINING_REPORT_STATUSES, values)
}

fn objective_topics_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(OBJECTIVE_TOPIC, values, false, Comparator::Equals, ctx.params()))
}

fn objective_topics_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(OBJECTIVE_TOPIC, values, true, Comparator::Equals, ctx.params()))
}

#[cfg(test)]
mod tests {
	use crate::{filter::Condition, registry::HandlerContext, topics::session_reports};

	fn run(topic: &str, condition: Condition, values: &[&str]) -> String {
		let values = values.iter().map(|value| value.to_string()).collect::<Vec<_>>();
		let handler =
			session_reports::registry().handler(topic, condition).expect("registered handler");

		handler(&values, &HandlerContext::default()).expect("predicate").render()
	}

	#[test]
	fn region_goes_through_the_event() {
		assert_eq!(
			run("region", Condition::NotIn, &["2", "5"]),
			"\"SessionReportPilot\".\"id\" NOT IN (SELECT s.id FROM session_report_pilots s \
JOIN event_report_pilots e ON e.id = s.event_id WHERE e.region_id IN (2, 5))"
		);
	}

	#[test]
	fn status_is_exact() {
		assert_eq!(
			run("status", Condition::In, &["Complete"]),
			r#"("SessionReportPilot"."data"->>'status') IN ('Complete')"#
		);
	}
}
