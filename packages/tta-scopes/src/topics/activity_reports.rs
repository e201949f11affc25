use tta_domain::constants::{
	DELIVERY_METHODS, PARTICIPANTS, PROGRAM_TYPES, REASONS, REPORT_ROLES, TARGET_POPULATIONS,
	TTA_TYPES, USER_ROLES,
};

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

const REPORT_ID: ColumnRef = ColumnRef::new("ActivityReport", "id");
const ID_TEXT: SqlExpr = SqlExpr::Static(r#""ActivityReport"."id"::text"#);
const LEGACY_ID: SqlExpr = SqlExpr::Column(ColumnRef::new("ActivityReport", "legacy_id"));
const STATUS: SqlExpr = SqlExpr::Column(ColumnRef::new("ActivityReport", "calculated_status"));
const REGION_ID: SqlExpr = SqlExpr::Column(ColumnRef::new("ActivityReport", "region_id"));
const DELIVERY_METHOD: SqlExpr =
	SqlExpr::Column(ColumnRef::new("ActivityReport", "delivery_method"));
const TARGET_POPULATION_COLUMN: ColumnRef = ColumnRef::new("ActivityReport", "target_populations");
const REASON_COLUMN: ColumnRef = ColumnRef::new("ActivityReport", "reason");
const PARTICIPANT_COLUMN: ColumnRef = ColumnRef::new("ActivityReport", "participants");
const TTA_TYPE_COLUMN: ColumnRef = ColumnRef::new("ActivityReport", "tta_type");
const START_DATE: DateTarget =
	DateTarget::Column(DateColumn::Native(ColumnRef::new("ActivityReport", "start_date")));
const END_DATE: DateTarget =
	DateTarget::Column(DateColumn::Native(ColumnRef::new("ActivityReport", "end_date")));
const LAST_SAVED: DateTarget =
	DateTarget::Column(DateColumn::Timestamp(ColumnRef::new("ActivityReport", "updated_at")));

const RECIPIENT_NAMES: [SubqueryTemplate; 2] = [
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT ar.activity_report_id FROM activity_recipients ar \
JOIN grants gr ON gr.id = ar.grant_id \
JOIN recipients rc ON rc.id = gr.recipient_id WHERE rc.name",
	),
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT ar.activity_report_id FROM activity_recipients ar \
JOIN other_entities oe ON oe.id = ar.other_entity_id WHERE oe.name",
	),
];
const RECIPIENT_ID: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT ar.activity_report_id FROM activity_recipients ar \
JOIN grants gr ON gr.id = ar.grant_id WHERE gr.recipient_id",
);
const OTHER_ENTITY: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT ar.activity_report_id FROM activity_recipients ar WHERE ar.other_entity_id",
);
const GRANT_NUMBER: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT ar.activity_report_id FROM activity_recipients ar \
JOIN grants gr ON gr.id = ar.grant_id WHERE gr.number",
);
const STATE_CODE: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT ar.activity_report_id FROM activity_recipients ar \
JOIN grants gr ON gr.id = ar.grant_id WHERE gr.state_code",
);
const PROGRAM_SPECIALIST: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT ar.activity_report_id FROM activity_recipients ar \
JOIN grants gr ON gr.id = ar.grant_id WHERE gr.program_specialist_name",
);
const PROGRAM_TYPE: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT ar.activity_report_id FROM activity_recipients ar \
JOIN programs p ON p.grant_id = ar.grant_id WHERE p.program_type",
);
const CREATOR: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT r.id FROM activity_reports r JOIN users u ON u.id = r.user_id WHERE u.name",
);
const COLLABORATOR: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT arc.activity_report_id FROM activity_report_collaborators arc \
JOIN users u ON u.id = arc.user_id WHERE u.name",
);
const ROLES: [SubqueryTemplate; 2] = [
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT r.id FROM activity_reports r JOIN users u ON u.id = r.user_id WHERE u.role",
	),
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT arc.activity_report_id FROM activity_report_collaborators arc \
JOIN users u ON u.id = arc.user_id WHERE u.role",
	),
];
const TOPICS: [SubqueryTemplate; 2] = [
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT r.id FROM activity_reports r CROSS JOIN LATERAL unnest(r.topics) AS rt(name) WHERE rt.name",
	),
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT aro.activity_report_id FROM activity_report_objectives aro \
JOIN activity_report_objective_topics arot ON arot.activity_report_objective_id = aro.id \
JOIN topics t ON t.id = arot.topic_id WHERE t.name",
	),
];
const SINGLE_RECIPIENT: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT ar.activity_report_id FROM activity_recipients ar \
GROUP BY ar.activity_report_id HAVING COUNT(*) = 1",
);
const MULTI_RECIPIENTS: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT ar.activity_report_id FROM activity_recipients ar \
GROUP BY ar.activity_report_id HAVING COUNT(*) > 1",
);
const AS_CREATOR: SubqueryTemplate =
	SubqueryTemplate::new(REPORT_ID, "SELECT r.id FROM activity_reports r WHERE r.user_id = $user");
const AS_COLLABORATOR: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT arc.activity_report_id FROM activity_report_collaborators arc WHERE arc.user_id = $user",
);
const AS_APPROVER: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT ara.activity_report_id FROM activity_report_approvers ara WHERE ara.user_id = $user",
);
const GROUP: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	concat!(
		"SELECT ar.activity_report_id FROM activity_recipients ar \
JOIN group_grants gg ON gg.grant_id = ar.grant_id \
JOIN groups gp ON gp.id = gg.group_id WHERE ",
		visible_group_condition!(),
		" AND gp.id"
	),
);
const GOAL_NAME: SubqueryTemplate = SubqueryTemplate::new(
	REPORT_ID,
	"SELECT arg.activity_report_id FROM activity_report_goals arg \
JOIN goals g ON g.id = arg.goal_id WHERE g.name",
);

const REPORT_TEXT: [SubqueryTemplate; 12] = [
	SubqueryTemplate::new(REPORT_ID, "SELECT r.id FROM activity_reports r WHERE r.context"),
	SubqueryTemplate::new(REPORT_ID, "SELECT r.id FROM activity_reports r WHERE r.additional_notes"),
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT ns.activity_report_id FROM next_steps ns WHERE ns.note",
	),
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT arg.activity_report_id FROM activity_report_goals arg WHERE arg.name",
	),
	GOAL_NAME,
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT aro.activity_report_id FROM activity_report_objectives aro WHERE aro.title",
	),
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT aro.activity_report_id FROM activity_report_objectives aro WHERE aro.tta_provided",
	),
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT arr.activity_report_id FROM activity_report_resources arr \
JOIN resources res ON res.id = arr.resource_id WHERE res.url",
	),
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT aro.activity_report_id FROM activity_report_objectives aro \
JOIN activity_report_objective_resources aror ON aror.activity_report_objective_id = aro.id \
JOIN resources res ON res.id = aror.resource_id WHERE res.url",
	),
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT ns.activity_report_id FROM next_steps ns \
JOIN next_step_resources nsr ON nsr.next_step_id = ns.id \
JOIN resources res ON res.id = nsr.resource_id WHERE res.url",
	),
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT arf.activity_report_id FROM activity_report_files arf \
JOIN files f ON f.id = arf.file_id WHERE f.original_file_name",
	),
	SubqueryTemplate::new(
		REPORT_ID,
		"SELECT aro.activity_report_id FROM activity_report_objectives aro \
JOIN activity_report_objective_files arof ON arof.activity_report_objective_id = aro.id \
JOIN files f ON f.id = arof.file_id WHERE f.original_file_name",
	),
];

pub fn registry() -> TopicRegistry {
	TopicRegistry::builder(EntityFamily::ActivityReport)
		.on("reportId", Condition::In, report_id_in)
		.on("reportId", Condition::NotIn, report_id_nin)
		.on("reportId", Condition::Contains, report_id_in)
		.on("reportId", Condition::NotContains, report_id_nin)
		.on("recipient", Condition::In, recipient_in)
		.on("recipient", Condition::NotIn, recipient_nin)
		.on("recipient", Condition::Contains, recipient_in)
		.on("recipient", Condition::NotContains, recipient_nin)
		.on("recipientId", Condition::In, recipient_id_in)
		.on("recipientId", Condition::Contains, recipient_id_in)
		.on("startDate", Condition::Before, start_date_before)
		.on("startDate", Condition::After, start_date_after)
		.on("startDate", Condition::Within, start_date_within)
		.on("endDate", Condition::Before, end_date_before)
		.on("endDate", Condition::After, end_date_after)
		.on("endDate", Condition::Within, end_date_within)
		.on("lastSaved", Condition::Before, last_saved_before)
		.on("lastSaved", Condition::After, last_saved_after)
		.on("lastSaved", Condition::Within, last_saved_within)
		.on("creator", Condition::In, creator_in)
		.on("creator", Condition::NotIn, creator_nin)
		.on("collaborators", Condition::In, collaborators_in)
		.on("collaborators", Condition::NotIn, collaborators_nin)
		.on("topic", Condition::In, topic_in)
		.on("topic", Condition::NotIn, topic_nin)
		.on("status", Condition::In, status_in)
		.on("status", Condition::NotIn, status_nin)
		.on("role", Condition::In, role_in)
		.on("role", Condition::NotIn, role_nin)
		.on("programSpecialist", Condition::In, program_specialist_in)
		.on("programSpecialist", Condition::NotIn, program_specialist_nin)
		.on("programSpecialist", Condition::Contains, program_specialist_in)
		.on("programSpecialist", Condition::NotContains, program_specialist_nin)
		.on("programType", Condition::In, program_type_in)
		.on("programType", Condition::NotIn, program_type_nin)
		.on("targetPopulations", Condition::In, target_populations_in)
		.on("targetPopulations", Condition::NotIn, target_populations_nin)
		.on("reason", Condition::In, reason_in)
		.on("reason", Condition::NotIn, reason_nin)
		.on("participants", Condition::In, participants_in)
		.on("participants", Condition::NotIn, participants_nin)
		.on("ttaType", Condition::In, tta_type_in)
		.on("ttaType", Condition::NotIn, tta_type_nin)
		.on("deliveryMethod", Condition::In, delivery_method_in)
		.on("deliveryMethod", Condition::NotIn, delivery_method_nin)
		.on("region", Condition::In, region_in)
		.on("region", Condition::NotIn, region_nin)
		.on("grantNumber", Condition::Contains, grant_number_ctn)
		.on("grantNumber", Condition::NotContains, grant_number_nctn)
		.on("stateCode", Condition::Contains, state_code_ctn)
		.on("otherEntities", Condition::In, other_entities_in)
		.on("otherEntities", Condition::NotIn, other_entities_nin)
		.on("singleOrMultiRecipients", Condition::In, single_or_multi_recipients)
		.on("myReports", Condition::In, my_reports_in)
		.on("myReports", Condition::NotIn, my_reports_nin)
		.on("group", Condition::In, group_in)
		.on("group", Condition::NotIn, group_nin)
		.on("goalName", Condition::Contains, goal_name_ctn)
		.on("goalName", Condition::NotContains, goal_name_nctn)
		.on("reportText", Condition::Contains, report_text_ctn)
		.on("reportText", Condition::NotContains, report_text_nctn)
		.build()
}

/// Matches the numeric id and the legacy display id, e.g. `R01-AR-012345`.
fn report_id_in(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(Predicate::or([
		primitives::text_predicate(true, ID_TEXT, values),
		primitives::text_predicate(true, LEGACY_ID, values),
	]))
}

fn report_id_nin(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(Predicate::and([
		primitives::text_predicate(false, ID_TEXT, values),
		primitives::text_predicate(false, LEGACY_ID, values),
	]))
}

fn recipient_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_surfaces(
		&RECIPIENT_NAMES,
		values,
		false,
		Comparator::Matches,
		ctx.params(),
	))
}

fn recipient_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_surfaces(
		&RECIPIENT_NAMES,
		values,
		true,
		Comparator::Matches,
		ctx.params(),
	))
}

fn recipient_id_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_ids(RECIPIENT_ID, &ids(values)?, false, ctx.params()))
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

fn end_date_before(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::before(END_DATE, values, ctx.params())
}

fn end_date_after(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::after(END_DATE, values, ctx.params())
}

fn end_date_within(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::within(END_DATE, values, ctx.params())
}

fn last_saved_before(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::before(LAST_SAVED, values, ctx.params())
}

fn last_saved_after(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::after(LAST_SAVED, values, ctx.params())
}

fn last_saved_within(values: &[String], ctx: &HandlerContext) -> Outcome {
	dates::within(LAST_SAVED, values, ctx.params())
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

fn topic_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_surfaces(&TOPICS, values, false, Comparator::Matches, ctx.params()))
}

fn topic_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_surfaces(&TOPICS, values, true, Comparator::Matches, ctx.params()))
}

fn status_in(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::text_predicate(true, STATUS, values))
}

fn status_nin(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::text_predicate(false, STATUS, values))
}

fn role(values: &[String], ctx: &HandlerContext, exclude: bool) -> Outcome {
	let roles = USER_ROLES.retain(values);

	if roles.is_empty() {
		return Err(Ignored::NoValidValues);
	}

	Ok(association::filter_association_surfaces(
		&ROLES,
		&roles,
		exclude,
		Comparator::ArrayContains,
		ctx.params(),
	))
}

fn role_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	role(values, ctx, false)
}

fn role_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	role(values, ctx, true)
}

fn program_specialist_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(
		PROGRAM_SPECIALIST,
		values,
		false,
		Comparator::Matches,
		ctx.params(),
	))
}

fn program_specialist_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(
		PROGRAM_SPECIALIST,
		values,
		true,
		Comparator::Matches,
		ctx.params(),
	))
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

fn target_populations_in(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::array_predicate(true, TARGET_POPULATION_COLUMN, &TARGET_POPULATIONS, values)
}

fn target_populations_nin(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::array_predicate(false, TARGET_POPULATION_COLUMN, &TARGET_POPULATIONS, values)
}

fn reason_in(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::array_predicate(true, REASON_COLUMN, &REASONS, values)
}

fn reason_nin(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::array_predicate(false, REASON_COLUMN, &REASONS, values)
}

fn participants_in(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::array_predicate(true, PARTICIPANT_COLUMN, &PARTICIPANTS, values)
}

fn participants_nin(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::array_predicate(false, PARTICIPANT_COLUMN, &PARTICIPANTS, values)
}

fn tta_type_in(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::array_predicate(true, TTA_TYPE_COLUMN, &TTA_TYPES, values)
}

fn tta_type_nin(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::array_predicate(false, TTA_TYPE_COLUMN, &TTA_TYPES, values)
}

fn delivery_method_in(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(true, DELIVERY_METHOD, &DELIVERY_METHODS, values)
}

fn delivery_method_nin(values: &[String], _: &HandlerContext) -> Outcome {
	primitives::allowed_exact(false, DELIVERY_METHOD, &DELIVERY_METHODS, values)
}

fn region_in(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::numeric_predicate(true, REGION_ID, ids(values)?.ids()))
}

fn region_nin(values: &[String], _: &HandlerContext) -> Outcome {
	Ok(primitives::numeric_predicate(false, REGION_ID, ids(values)?.ids()))
}

fn grant_number_ctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(GRANT_NUMBER, values, false, Comparator::Matches, ctx.params()))
}

fn grant_number_nctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(GRANT_NUMBER, values, true, Comparator::Matches, ctx.params()))
}

fn state_code_ctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(STATE_CODE, values, false, Comparator::Matches, ctx.params()))
}

fn other_entities_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_ids(OTHER_ENTITY, &ids(values)?, false, ctx.params()))
}

fn other_entities_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association_ids(OTHER_ENTITY, &ids(values)?, true, ctx.params()))
}

/// `single-recipient` and `multi-recipients` count the report's recipient rows.
fn single_or_multi_recipients(values: &[String], ctx: &HandlerContext) -> Outcome {
	let mut templates = Vec::new();

	for value in values {
		let template = match value.as_str() {
			"single-recipient" => SINGLE_RECIPIENT,
			"multi-recipients" => MULTI_RECIPIENTS,
			_ => continue,
		};

		if !templates.contains(&template) {
			templates.push(template);
		}
	}

	if templates.is_empty() {
		return Err(Ignored::Unrecognized);
	}

	Ok(association::union_membership(&templates, false, ctx.params()))
}

/// Reports the requester created, collaborates on, or approves, per requested role.
fn my_reports(values: &[String], ctx: &HandlerContext, exclude: bool) -> Outcome {
	ctx.require_user()?;

	let templates = REPORT_ROLES
		.retain(values)
		.into_iter()
		.filter_map(|role| match role {
			"Creator" => Some(AS_CREATOR),
			"Collaborator" => Some(AS_COLLABORATOR),
			"Approver" => Some(AS_APPROVER),
			_ => None,
		})
		.collect::<Vec<_>>();

	if templates.is_empty() {
		return Err(Ignored::NoValidValues);
	}

	Ok(association::union_membership(&templates, exclude, ctx.params()))
}

fn my_reports_in(values: &[String], ctx: &HandlerContext) -> Outcome {
	my_reports(values, ctx, false)
}

fn my_reports_nin(values: &[String], ctx: &HandlerContext) -> Outcome {
	my_reports(values, ctx, true)
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

fn goal_name_ctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(GOAL_NAME, values, false, Comparator::Matches, ctx.params()))
}

fn goal_name_nctn(values: &[String], ctx: &HandlerContext) -> Outcome {
	Ok(association::filter_association(GOAL_NAME, values, true, Comparator::Matches, ctx.params()))
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

#[cfg(test)]
mod tests {
	use crate::{
		filter::Condition,
		predicate::Predicate,
		registry::{HandlerContext, Ignored},
		topics::activity_reports,
	};

	fn run(topic: &str, condition: Condition, values: &[&str], ctx: HandlerContext) -> Result<Predicate, Ignored> {
		let values = values.iter().map(|value| value.to_string()).collect::<Vec<_>>();
		let handler =
			activity_reports::registry().handler(topic, condition).expect("registered handler");

		handler(&values, &ctx)
	}

	#[test]
	fn report_id_checks_legacy_ids_too() {
		let sql = run("reportId", Condition::In, &["12345"], HandlerContext::default())
			.expect("predicate")
			.render();

		assert_eq!(
			sql,
			r#"("ActivityReport"."id"::text ~* '12345' OR "ActivityReport"."legacy_id" ~* '12345')"#
		);
	}

	#[test]
	fn status_is_a_substring_match() {
		let sql = run("status", Condition::In, &["app"], HandlerContext::default())
			.expect("predicate")
			.render();

		assert_eq!(sql, r#""ActivityReport"."calculated_status" ~* 'app'"#);
	}

	#[test]
	fn allow_listed_topics_drop_invalid_values() {
		assert_eq!(
			run("ttaType", Condition::In, &["bogus"], HandlerContext::default()),
			Err(Ignored::NoValidValues)
		);
		assert_eq!(
			run("ttaType", Condition::In, &["training", "bogus"], HandlerContext::default())
				.expect("predicate")
				.render(),
			r#""ActivityReport"."tta_type" && ARRAY['training']::text[]"#
		);
	}

	#[test]
	fn my_reports_unions_requested_roles() {
		assert_eq!(
			run("myReports", Condition::In, &["Creator"], HandlerContext::default()),
			Err(Ignored::MissingUser)
		);

		let sql = run("myReports", Condition::In, &["Creator", "Approver", "Owner"], HandlerContext::for_user(9))
			.expect("predicate")
			.render();

		assert!(sql.contains("r.user_id = 9 UNION SELECT ara.activity_report_id"));
		assert!(!sql.contains("activity_report_collaborators"));
	}

	#[test]
	fn recipient_counts_select_by_cardinality() {
		let sql = run(
			"singleOrMultiRecipients",
			Condition::In,
			&["multi-recipients"],
			HandlerContext::default(),
		)
		.expect("predicate")
		.render();

		assert!(sql.ends_with("HAVING COUNT(*) > 1)"));
		assert_eq!(
			run("singleOrMultiRecipients", Condition::In, &["both"], HandlerContext::default()),
			Err(Ignored::Unrecognized)
		);
	}

	#[test]
	fn report_text_covers_every_surface() {
		let Predicate::Or(surfaces) =
			run("reportText", Condition::Contains, &["math"], HandlerContext::default())
				.expect("predicate")
		else {
			panic!("Inclusion must accept any surface.");
		};

		assert_eq!(surfaces.len(), 12);
	}
}
