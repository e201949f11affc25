use tta_domain::constants::{NEEDS_STATUS, REASONS};

use crate::{
	access::visible_group_condition,
	association::{self, Comparator, SubqueryTemplate},
	dates::{self, DateColumn, DateTarget},
	filter::Condition,
	predicate::{ColumnRef, Predicate, SqlExpr},
	primitives,
	registry::{EntityFamily, HandlerContext, Ignored, Outcome, TopicRegistry},
	topics::ids,
};

const GOAL_ID: ColumnRef = ColumnRef::new("Goal", "id");
const STATUS: SqlExpr = SqlExpr::Column(ColumnRef::new("Goal", "status"));
const NAME: SqlExpr = SqlExpr::Column(ColumnRef::new("Goal", "name"));
const IS_RTTAPA: SqlExpr = SqlExpr::Column(ColumnRef::new("Goal", "is_rttapa"));
const CREATED_AT: DateTarget =
	DateTarget::Column(DateColumn::Timestamp(ColumnRef::new("Goal", "created_at")));

const OBJECTIVE_TOPIC: SubqueryTemplate = SubqueryTemplate::new(
	GOAL_ID,
	"SELECT g.id FROM goals g \
JOIN grants gr ON gr.id = g.grant_id \
JOIN objectives o ON o.goal_id = g.id \
JOIN activity_report_objectives aro ON aro.objective_id = o.id \
JOIN activity_report_objective_topics arot ON arot.activity_report_objective_id = aro.id \
JOIN topics t ON t.id = arot.topic_id \
WHERE ($recipient IS NULL OR gr.recipient_id = $recipient) AND t.name",
);
const REPORT_TOPIC: SubqueryTemplate = SubqueryTemplate::new(
	GOAL_ID,
	"SELECT g.id FROM goals g \
JOIN grants gr ON gr.id = g.grant_id \
JOIN activity_report_goals arg ON arg.goal_id = g.id \
JOIN activity_reports r ON r.id = arg.activity_report_id \
WHERE ($recipient IS NULL OR gr.recipient_id = $recipient) AND r.topics",
);
const REPORT_REASON: SubqueryTemplate = SubqueryTemplate::new(
	GOAL_ID,
	"SELECT g.id FROM goals g \
JOIN grants gr ON gr.id = g.grant_id \
JOIN activity_report_goals arg ON arg.goal_id = g.id \
JOIN activity_reports r ON r.id = arg.activity_report_id \
WHERE ($recipient IS NULL OR gr.recipient_id = $recipient) AND r.reason",
);
const RECIPIENT: SubqueryTemplate = SubqueryTemplate::new(
	GOAL_ID,
	"SELECT g.id FROM goals g JOIN grants gr ON gr.id = g.grant_id WHERE gr.recipient_id",
);
const REGION: SubqueryTemplate = SubqueryTemplate::new(
	GOAL_ID,
	"SELECT g.id FROM goals g JOIN grants gr ON gr.id = g.grant_id WHERE gr.region_id",
);
const GRANT_NUMBER: SubqueryTemplate = SubqueryTemplate::new(
	GOAL_ID,
	"SELECT g.id FROM goals g JOIN grants gr ON gr.id = g.grant_id WHERE gr.number",
);
const GROUP: SubqueryTemplate = SubqueryTemplate::new(
	GOAL_ID,
	concat!(
		"SELECT g.id FROM goals g \
JOIN group_grants gg ON gg.grant_id = g.grant_id \
JOIN groups gp ON gp.id = gg.group_id \
WHERE ",
		visible_group_condition!(),
		" AND gp.id"
	),
);

const REPORT_TEXT: [SubqueryTemplate; 12] = [
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT arg.goal_id FROM activity_report_goals arg \
JOIN next_steps ns ON ns.activity_report_id = arg.activity_report_id WHERE ns.note",
	),
	SubqueryTemplate::new(GOAL_ID, "SELECT arg.goal_id FROM activity_report_goals arg WHERE arg.name"),
	SubqueryTemplate::new(GOAL_ID, "SELECT g.id FROM goals g WHERE g.name"),
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT o.goal_id FROM objectives o WHERE o.goal_id IS NOT NULL AND o.title",
	),
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT o.goal_id FROM objectives o \
JOIN activity_report_objectives aro ON aro.objective_id = o.id \
WHERE o.goal_id IS NOT NULL AND aro.title",
	),
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT o.goal_id FROM objectives o \
JOIN activity_report_objectives aro ON aro.objective_id = o.id \
WHERE o.goal_id IS NOT NULL AND aro.tta_provided",
	),
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT arg.goal_id FROM activity_report_goals arg \
JOIN activity_reports r ON r.id = arg.activity_report_id WHERE r.context",
	),
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT arg.goal_id FROM activity_report_goals arg \
JOIN activity_reports r ON r.id = arg.activity_report_id WHERE r.additional_notes",
	),
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT arg.goal_id FROM activity_report_goals arg \
JOIN activity_report_resources arr ON arr.activity_report_id = arg.activity_report_id \
JOIN resources res ON res.id = arr.resource_id WHERE res.url",
	),
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT o.goal_id FROM objectives o \
JOIN activity_report_objectives aro ON aro.objective_id = o.id \
JOIN activity_report_objective_resources aror ON aror.activity_report_objective_id = aro.id \
JOIN resources res ON res.id = aror.resource_id \
WHERE o.goal_id IS NOT NULL AND res.url",
	),
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT arg.goal_id FROM activity_report_goals arg \
JOIN activity_report_files arf ON arf.activity_report_id = arg.activity_report_id \
JOIN files f ON f.id = arf.file_id WHERE f.original_file_name",
	),
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT o.goal_id FROM objectives o \
JOIN activity_report_objectives aro ON aro.objective_id = o.id \
JOIN activity_report_objective_files arof ON arof.activity_report_objective_id = aro.id \
JOIN files f ON f.id = arof.file_id \
WHERE o.goal_id IS NOT NULL AND f.original_file_name",
	),
];

const RESOURCE_URL: [SubqueryTemplate; 4] = [
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT arg.goal_id FROM activity_report_goals arg \
JOIN activity_report_resources arr ON arr.activity_report_id = arg.activity_report_id \
JOIN resources res ON res.id = arr.resource_id WHERE res.url",
	),
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT arg.goal_id FROM activity_report_goals arg \
JOIN activity_report_goal_resources argr ON argr.activity_report_goal_id = arg.id \
JOIN resources res ON res.id = argr.resource_id WHERE res.url",
	),
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT o.goal_id FROM objectives o \
JOIN activity_report_objectives aro ON aro.objective_id = o.id \
JOIN activity_report_objective_resources aror ON aror.activity_report_objective_id = aro.id \
JOIN resources res ON res.id = aror.resource_id \
WHERE o.goal_id IS NOT NULL AND res.url",
	),
	SubqueryTemplate::new(
		GOAL_ID,
		"SELECT arg.goal_id FROM activity_report_goals arg \
JOIN next_steps ns ON ns.activity_report_id = arg.activity_report_id \
JOIN next_step_resources nsr ON nsr.next_step_id = ns.id \
JOIN resources res ON res.id = nsr.resource_id WHERE res.url",
	),
];

pub fn registry() -> TopicRegistry {
	TopicRegistry::builder(EntityFamily::Goal)
		.on("status", Condition::In, status_in)
		.on("status", Condition::NotIn, status_nin)
		.on("createDate", Condition::Before, create_date_before)
		.on("createDate", Condition::After, create_date_after)
		.on("createDate", Condition::Within, create_date_within)
		.on("topic", Condition::In, topic_in)
		.on("topic", Condition::NotIn, topic_nin)
		.on("reason", Condition::In, reason_in)
		.on("reason", Condition::NotIn, reason_nin)
		.on("recipientId", Condition::In, recipient_in)
		.on("recipientId", Condition::Contains, recipient_in)
		.on("recipientId", Condition::NotIn, recipient_nin)
		.on("region", Condition::In, region_in)
		.on("region", Condition::NotIn, region_nin)
		.on("grantNumber", Condition::In, grant_number_in)
		.on("grantNumber", Condition::NotIn, grant_number_nin)
		.on("grantNumber", Condition::Contains, grant_number_ctn)
		.on("grantNumber", Condition::NotContains, grant_number_nctn)
		.on("group", Condition::In, group_in)
		.on("group", Condition::NotIn, group_nin)
		.on("goalType", Condition::In, goal_type_in)
		.on("goalType", Condition::NotIn, goal_type_nin)
		.on("goalName", Condition::Contains, goal_name_ctn)
		.on("goalName", Condition::NotContains, goal_name_nctn)
		.on("reportText", Condition::Contains, report_text_ctn)
		.on("reportText", Condition::NotContains, report_text_nctn)
		.on("resourceUrl", Condition::Contains, resource_url_ctn)
		.on("resourceUrl", Condition::NotContains, resource_url_nctn)
		.build()
}

/// `Needs status` stands for goals whose status was never set.
fn split_statuses(values: &[String]) -> (Vec<&str>, bool) {
	let mut statuses = Vec::with_capacity(values.len());
	let mut needs_status = false;

	for value in values {
		if value.eq_ignore_ascii_case(NEEDS_STATUS) {
			needs_status = true;
		} else {
			statuses.push(value.as_str());
		}
	}

	(statuses, needs_status)
}

fn status_in(values: &[String], _: &HandlerContext) -> Outcome {
	let (statuses, needs_status) = split_statuses(values);
	let listed = if statuses.is_empty() {
		Predicate::False
	} else {
		primitives::exact_predicate(true, STATUS, &statuses)
	};

	Ok(Predicate::or([
		listed,
		if needs_status { Predicate::is_null(STATUS) } else { Predicate::False },
	]))
}

fn status_nin(values: &[String], _: &HandlerContext) -> Outcome {
	let (statuses, needs_status) = split_statuses(values);

	if needs_status {
		return Ok(Predicate::and([
			Predicate::is_not_null(STATUS),
			primitives::exact_predicate(false, STATUS, &statuses),
		]));
	}

	Ok(primitives::exact_predicate(false, STATUS, &statuses))
}

fn create_date_before(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::before(CREATED_AT, values, ctx.params())
}

fn create_date_after(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::after(CREATED_AT, values, ctx.params())
}

fn create_date_within(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::within(CREATED_AT, values, ctx.params())
}

fn topic(values: &[String], ctx: &HandlerContext, exclude: bool) -> Outcome {
	let params = ctx.params();

	Ok(association::combine(
		[
			association::filter_association(OBJECTIVE_TOPIC, values, exclude, Comparator::Equals, params),
			association::filter_association(
				REPORT_TOPIC,
				values,
				exclude,
				Comparator::ArrayContains,
				params,
			),
		],
		exclude,
	))
}

fn topic_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	topic(values, ctx, false)
}

fn topic_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	topic(values, ctx, true)
}

fn reason(values: &[String], ctx: &HandlerContext, exclude: bool) -> Outcome {
	let reasons = REASONS.retain(values);

	if reasons.is_empty() {
		return Err(Ignored::NoValidValues);
	}

	Ok(association::filter_association(
		REPORT_REASON,
		&reasons,
		exclude,
		Comparator::ArrayContains,
		ctx.params(),
	))
}

fn reason_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	reason(values, ctx, false)
}

fn reason_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	reason(values, ctx, true)
}

fn recipient_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_ids(RECIPIENT, &ids(values)?, false, ctx.params()))
}

fn recipient_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_ids(RECIPIENT, &ids(values)?, true, ctx.params()))
}

fn region_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_ids(REGION, &ids(values)?, false, ctx.params()))
}

fn region_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_ids(REGION, &ids(values)?, true, ctx.params()))
}

fn grant_number_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(GRANT_NUMBER, values, false, Comparator::Equals, ctx.params()))
}

fn grant_number_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(GRANT_NUMBER, values, true, Comparator::Equals, ctx.params()))
}

fn grant_number_ctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(GRANT_NUMBER, values, false, Comparator::Matches, ctx.params()))
}

fn grant_number_nctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(GRANT_NUMBER, values, true, Comparator::Matches, ctx.params()))
}

fn group(values: &[String], ctx: &HandlerContext, exclude: bool) -> Outcome {
	ctx.require_user()?;

	Ok(association::filter_association_ids(GROUP, &ids(values)?, exclude, ctx.params()))
}

fn group_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	group(values, ctx, false)
}

fn group_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	group(values, ctx, true)
}

/// `RTTAPA` and `Non-RTTAPA` map onto the stored flag; anything else is not a goal type.
fn goal_types(values: &[String]) -> Result<Vec<&'static str>, Ignored> {
	let mut flags = Vec::new();

	for value in values {
		let flag = match value.as_str() {
			"RTTAPA" => "Yes",
			"Non-RTTAPA" => "No",
			_ => continue,
		};

		if !flags.contains(&flag) {
			flags.push(flag);
		}
	}

	if flags.is_empty() { Err(Ignored::Unrecognized) } else { Ok(flags) }
}

fn goal_type_in(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::exact_predicate(true, IS_RTTAPA, &goal_types(values)?))
}

fn goal_type_nin(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::exact_predicate(false, IS_RTTAPA, &goal_types(values)?))
}

fn goal_name_ctn(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::text_predicate(true, NAME, values))
}

fn goal_name_nctn(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::text_predicate(false, NAME, values))
}

fn report_text_ctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_surfaces(
		&REPORT_TEXT,
		values,
		false,
		Comparator::Matches,
		ctx.params(),
	))
}

fn report_text_nctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_surfaces(
		&REPORT_TEXT,
		values,
		true,
		Comparator::Matches,
		ctx.params(),
	))
}

fn resource_url_ctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_surfaces(
		&RESOURCE_URL,
		values,
		false,
		Comparator::Matches,
		ctx.params(),
	))
}

fn resource_url_nctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_surfaces(
		&RESOURCE_URL,
		values,
		true,
		Comparator::Matches,
		ctx.params(),
	))
}

#[cfg(test)]
mod tests {
	use crate::{
		filter::Condition,
		predicate::Predicate,
		registry::{HandlerContext, Ignored, ScopeOptions},
		topics::goals,
	};

	fn run(topic: &str, condition: Condition, values: &[&str], ctx: HandlerContext) -> String {
		let values = values.iter().map(|value| value.to_string()).collect::<Vec<_>>();
		let handler = goals::registry().handler(topic, condition).expect("registered handler");

		handler(&values, &ctx).expect("predicate").render()
	}

	#[test]
	fn needs_status_selects_null_status() {
		assert_eq!(
			run("status", Condition::In, &["In Progress", "Needs status"], HandlerContext::default()),
			r#"("Goal"."status" IN ('In Progress') OR "Goal"."status" IS NULL)"#
		);
	}

	#[test]
	fn status_exclusion_keeps_unset_statuses() {
		assert_eq!(
			run("status", Condition::NotIn, &["Suspended"], HandlerContext::default()),
			r#"("Goal"."status" IS NULL OR "Goal"."status" NOT IN ('Suspended'))"#
		);
		assert_eq!(
			run("status", Condition::NotIn, &["Needs status"], HandlerContext::default()),
			r#""Goal"."status" IS NOT NULL"#
		);
	}

	#[test]
	fn goal_type_maps_to_flag() {
		assert_eq!(
			run("goalType", Condition::In, &["RTTAPA"], HandlerContext::default()),
			r#""Goal"."is_rttapa" IN ('Yes')"#
		);

		let handler = goals::registry().handler("goalType", Condition::In).expect("handler");

		assert_eq!(handler(&["false".to_string()], &HandlerContext::default()), Err(Ignored::Unrecognized));
	}

	#[test]
	fn group_requires_a_user() {
		let handler = goals::registry().handler("group", Condition::In).expect("handler");

		assert_eq!(handler(&["3".to_string()], &HandlerContext::default()), Err(Ignored::MissingUser));

		let sql = run("group", Condition::In, &["3"], HandlerContext::for_user(11));

		assert!(sql.contains("gp.user_id = 11"));
		assert!(sql.ends_with("AND gp.id IN (3))"));
	}

	#[test]
	fn recipient_option_narrows_topic_lookups() {
		let ctx = HandlerContext::default().with_options(ScopeOptions { recipient_id: Some(42) });
		let sql = run("topic", Condition::In, &["Coaching"], ctx);

		assert!(sql.contains("(42 IS NULL OR gr.recipient_id = 42)"));
	}

	#[test]
	fn report_text_fans_out_over_every_surface() {
		let handler = goals::registry().handler("reportText", Condition::NotContains).expect("handler");
		let predicate = handler(&["literacy".to_string()], &HandlerContext::default()).expect("predicate");
		let Predicate::And(surfaces) = predicate else {
			panic!("Exclusion must require every surface to exclude.");
		};

		assert!(surfaces.len() >= 10);
		assert!(surfaces.iter().all(|surface| surface.render().contains("NOT IN (")));
	}

	#[test]
	fn non_integer_regions_are_ignored() {
		let handler = goals::registry().handler("region", Condition::In).expect("handler");

		assert_eq!(
			handler(&["1 OR 1=1".to_string()], &HandlerContext::default()),
			Err(Ignored::NoValidValues)
		);
	}
}
