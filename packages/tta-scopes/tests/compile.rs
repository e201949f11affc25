use serde_json::json;

use tta_scopes::{
	Compiler, EntityFamily, Error, FilterValues, HandlerContext, Predicate, RawFilters, Requester,
	ScopeRegistries, compile,
	dates::{self, Rounding},
};

fn goal_scope(filters: &RawFilters) -> Vec<String> {
	let registries = ScopeRegistries::standard();
	let registry = registries.get(EntityFamily::Goal).expect("goal registry");

	compile(filters, registry, &HandlerContext::for_user(1))
		.predicates()
		.iter()
		.map(Predicate::render)
		.collect()
}

#[test]
fn unknown_keys_are_dropped() {
	let filters = RawFilters::new().with("bogus.topic", "x").with("status.in", "Active");
	let scope = goal_scope(&filters);

	assert_eq!(scope, vec![r#""Goal"."status" IN ('Active')"#.to_string()]);
}

#[test]
fn unregistered_conditions_are_dropped() {
	let filters = RawFilters::new().with("status.ctn", "Active").with("status.sideways", "x");

	assert!(goal_scope(&filters).is_empty());
}

#[test]
fn contradictory_filters_are_both_emitted() {
	let filters = RawFilters::new()
		.with("status.in", "In Progress")
		.with("status.nin", "In Progress");

	assert_eq!(goal_scope(&filters).len(), 2);
}

#[test]
fn invalid_range_is_neutral() {
	let compiler = Compiler::default();
	let filters = RawFilters::new().with("startDate.win", "2021/06/07");
	let scope = compiler.compile(EntityFamily::TrainingReport, &filters, &HandlerContext::default());

	assert!(scope.is_empty());
	assert_eq!(scope.to_sql(), "TRUE");
}

#[test]
fn month_values_round_by_direction() {
	assert_eq!(
		dates::parse_date("2025/02", Rounding::End).map(|date| date.to_string()),
		Some("2025-02-28".to_string())
	);
	assert_eq!(
		dates::parse_date("2025/02", Rounding::Start).map(|date| date.to_string()),
		Some("2025-02-01".to_string())
	);
}

#[test]
fn allow_list_misses_leave_no_restriction() {
	let compiler = Compiler::default();
	let filters = RawFilters::new()
		.with("ttaType.in", "bogus")
		.with("participants.nin", "nobody")
		.with("targetPopulations.in", "'; DROP TABLE goals; --");
	let scope = compiler.compile(EntityFamily::ActivityReport, &filters, &HandlerContext::default());

	assert!(scope.is_empty());
}

#[test]
fn injection_payload_stays_inside_a_literal() {
	let filters = RawFilters::new().with("goalName.ctn", "x'; DROP TABLE goals; --");
	let scope = goal_scope(&filters);

	assert_eq!(scope.len(), 1);
	assert!(scope[0].starts_with(r#""Goal"."name" ~* E'x''; DROP TABLE goals; "#));
	assert!(scope[0].ends_with('\''));
}

#[test]
fn id_topics_reject_non_integers() {
	let filters = RawFilters::new().with("region.in", "1) OR (1=1");

	assert!(goal_scope(&filters).is_empty());
}

#[test]
fn id_topics_keep_the_valid_ids() {
	let filters = RawFilters::from_query("region.in=1&region.in=x&region.in=3");

	assert_eq!(
		goal_scope(&filters),
		vec![
			"\"Goal\".\"id\" IN (SELECT g.id FROM goals g JOIN grants gr ON gr.id = g.grant_id WHERE gr.region_id IN (1, 3))"
				.to_string(),
		]
	);
}

#[test]
fn query_strings_accumulate_repeated_keys() {
	let filters = RawFilters::from_query("?status.in=Active&status.in=Suspended&region.in=2");

	assert_eq!(filters.get("status.in"), Some(&["Active".to_string(), "Suspended".to_string()][..]));
	assert_eq!(
		goal_scope(&filters),
		vec![
			r#""Goal"."status" IN ('Active', 'Suspended')"#.to_string(),
			"\"Goal\".\"id\" IN (SELECT g.id FROM goals g JOIN grants gr ON gr.id = g.grant_id WHERE gr.region_id IN (2))"
				.to_string(),
		]
	);
}

#[test]
fn json_filters_wrap_scalars() {
	let filters = RawFilters::from_json(&json!({ "region.in": 3, "status.in": ["Closed"] }))
		.expect("object filters");

	assert_eq!(filters.get("region.in"), Some(&["3".to_string()][..]));
	assert!(matches!(RawFilters::from_json(&json!(["region.in"])), Err(Error::InvalidFilterValues { .. })));
}

#[test]
fn mixed_enum_values_are_a_caller_bug() {
	assert!(matches!(
		FilterValues::from_json(&[json!("a"), json!(1)]),
		Err(Error::InvalidFilterValues { .. })
	));
}

#[test]
fn authorization_composes_with_filters() {
	let compiler = Compiler::default();
	let requester = Requester::new(7, vec![1, 2]);
	let filters = tta_scopes::set_read_regions(&RawFilters::new().with("region.in", "9"), &requester);
	let scope = tta_scopes::authorize(
		EntityFamily::Grant,
		compiler.compile(EntityFamily::Grant, &filters, &HandlerContext::for_user(7)),
		&requester,
	);

	assert_eq!(
		scope.to_sql(),
		r#""Grant"."region_id" IN (1, 2) AND "Grant"."region_id" IN (1, 2)"#
	);
}

#[test]
fn disabled_topics_are_removed() {
	let registries = ScopeRegistries::with_disabled(&["goal.reportText"]).expect("known family");
	let goal = registries.get(EntityFamily::Goal).expect("goal registry");

	assert!(!goal.contains("reportText"));
	assert!(goal.contains("status"));
	assert!(matches!(
		ScopeRegistries::with_disabled(&["widgets.status"]),
		Err(Error::UnknownFamily { .. })
	));
}

#[test]
fn activity_report_substring_conditions_constrain() {
	let compiler = Compiler::default();
	let ctx = HandlerContext::default();
	let render = |key: &str, value: &str| {
		compiler
			.compile(EntityFamily::ActivityReport, &RawFilters::new().with(key, value), &ctx)
			.to_sql()
	};

	for (contains, listed) in [
		("recipient.ctn", "recipient.in"),
		("recipient.nctn", "recipient.nin"),
		("recipientId.ctn", "recipientId.in"),
		("reportId.ctn", "reportId.in"),
		("reportId.nctn", "reportId.nin"),
		("programSpecialist.ctn", "programSpecialist.in"),
		("programSpecialist.nctn", "programSpecialist.nin"),
	] {
		let sql = render(contains, "1234");

		assert_ne!(sql, "TRUE", "{contains} should constrain the scope");
		assert_eq!(sql, render(listed, "1234"), "{contains} should match {listed}");
	}
	assert!(render("recipient.ctn", "test").contains("oe.name ~* 'test'"));
}

#[test]
fn needs_status_scenario_renders_null_aware_membership() {
	let filters = RawFilters::from_json(&json!({ "status.in": ["In Progress", "Needs status"] }))
		.expect("filters");

	assert_eq!(
		Compiler::default().compile(EntityFamily::Goal, &filters, &HandlerContext::for_user(1)).to_sql(),
		r#"("Goal"."status" IN ('In Progress') OR "Goal"."status" IS NULL)"#
	);
}

#[test]
fn training_window_scenario_converts_document_dates() {
	let start = r#"("EventReportPilot"."data"->>'startDate')"#;
	let expected = format!(
		"(CASE \
WHEN {start} ~ '^[0-9]{{4}}[/-][0-9]{{1,2}}[/-][0-9]{{1,2}}$' THEN to_date(replace({start}, '-', '/'), 'YYYY/MM/DD') \
WHEN {start} ~ '^[0-9]{{1,2}}/[0-9]{{1,2}}/[0-9]{{4}}$' THEN to_date({start}, 'MM/DD/YYYY') \
END) BETWEEN '2021-06-07' AND '2021-06-07'"
	);
	let scope = Compiler::default().compile(
		EntityFamily::TrainingReport,
		&RawFilters::new().with("startDate.win", "2021/06/07-2021/06/07"),
		&HandlerContext::default(),
	);

	assert_eq!(scope.to_sql(), expected);
}

#[test]
fn config_names_families_the_compiler_knows() {
	let filters = |entry: &str| tta_config::Filters {
		disabled_topics: vec![entry.to_string()],
		..Default::default()
	};

	for family in EntityFamily::ALL {
		let entry = format!("{}.status", family.name());

		assert!(Compiler::from_config(&filters(&entry)).is_ok(), "{entry} should be accepted");
	}
	assert!(matches!(
		Compiler::from_config(&filters("widget.status")),
		Err(Error::UnknownFamily { .. })
	));
}
