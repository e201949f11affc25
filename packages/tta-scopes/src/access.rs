//! Authorization expressed in the same predicate algebra as content filters.

use tta_domain::permissions::{self, Permission};

use crate::{
	association::{self, SubqueryTemplate, TemplateParams},
	filter::RawFilters,
	literal::{IdList, SqlLiteral, parse_integer},
	predicate::{ColumnRef, CompareOp, Predicate, Scope, SqlExpr},
	registry::{EntityFamily, HandlerContext},
};

/// Groups `$user` may see: public, owned, or shared with them. Expects the group aliased `gp`.
macro_rules! visible_group_condition {
	() => {
		"(gp.is_public OR gp.user_id = $user OR EXISTS (SELECT 1 FROM group_collaborators gc WHERE gc.group_id = gp.id AND gc.user_id = $user))"
	};
}
pub(crate) use visible_group_condition;

const GOAL_REGION: SubqueryTemplate = SubqueryTemplate::new(
	ColumnRef::new("Goal", "id"),
	"SELECT g.id FROM goals g JOIN grants gr ON gr.id = g.grant_id WHERE gr.region_id",
);
const REPORT_COLLABORATOR: SubqueryTemplate = SubqueryTemplate::new(
	ColumnRef::new("ActivityReport", "id"),
	"SELECT arc.activity_report_id FROM activity_report_collaborators arc WHERE arc.user_id = $user",
);
const REPORT_APPROVER: SubqueryTemplate = SubqueryTemplate::new(
	ColumnRef::new("ActivityReport", "id"),
	"SELECT ara.activity_report_id FROM activity_report_approvers ara WHERE ara.user_id = $user",
);
const EVENT_PARTICIPANT: SubqueryTemplate = SubqueryTemplate::new(
	ColumnRef::new("EventReportPilot", "id"),
	"SELECT e.id FROM event_report_pilots e WHERE e.owner_id = $user OR $user = ANY(e.poc_ids) OR $user = ANY(e.collaborator_ids)",
);
const SESSION_EVENT_REGION: SubqueryTemplate = SubqueryTemplate::new(
	ColumnRef::new("SessionReportPilot", "id"),
	"SELECT s.id FROM session_report_pilots s JOIN event_report_pilots e ON e.id = s.event_id WHERE e.region_id",
);
const SESSION_EVENT_PARTICIPANT: SubqueryTemplate = SubqueryTemplate::new(
	ColumnRef::new("SessionReportPilot", "id"),
	"SELECT s.id FROM session_report_pilots s JOIN event_report_pilots e ON e.id = s.event_id WHERE e.owner_id = $user OR $user = ANY(e.poc_ids) OR $user = ANY(e.collaborator_ids)",
);
const LOG_AUTHOR_REGION: SubqueryTemplate = SubqueryTemplate::new(
	ColumnRef::new("CommunicationLog", "id"),
	"SELECT c.id FROM communication_logs c JOIN users u ON u.id = c.user_id WHERE u.home_region_id",
);
const COLLAB_COLLABORATOR: SubqueryTemplate = SubqueryTemplate::new(
	ColumnRef::new("CollabReport", "id"),
	"SELECT crc.collab_report_id FROM collab_report_collaborators crc WHERE crc.user_id = $user",
);
const COLLAB_APPROVER: SubqueryTemplate = SubqueryTemplate::new(
	ColumnRef::new("CollabReport", "id"),
	"SELECT cra.collab_report_id FROM collab_report_approvers cra WHERE cra.user_id = $user",
);

/// Identity and region access supplied by the session layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Requester {
	pub user_id: i64,
	readable_regions: Vec<i64>,
}
impl Requester {
	pub fn new(user_id: i64, mut readable_regions: Vec<i64>) -> Self {
		readable_regions.sort_unstable();
		readable_regions.dedup();

		Self { user_id, readable_regions }
	}

	pub fn from_permissions(user_id: i64, permissions: &[Permission]) -> Self {
		Self::new(user_id, permissions::readable_regions(permissions))
	}

	pub fn readable_regions(&self) -> &[i64] {
		&self.readable_regions
	}

	pub fn can_read_region(&self, region_id: i64) -> bool {
		self.readable_regions.binary_search(&region_id).is_ok()
	}

	pub fn context(&self) -> HandlerContext {
		HandlerContext::for_user(self.user_id)
	}

	fn params(&self) -> TemplateParams {
		TemplateParams { user_id: Some(self.user_id), recipient_id: None }
	}
}

/// `column IN (regions)`. No readable region means no access.
pub fn region_restriction(column: ColumnRef, regions: &[i64]) -> Predicate {
	Predicate::in_list(SqlExpr::Column(column), regions.iter().copied().map(SqlLiteral::integer).collect())
}

/// What `requester` may read in `family`, by region or by ownership.
pub fn readable_scope(family: EntityFamily, requester: &Requester) -> Predicate {
	let params = requester.params();
	let regions = IdList::from_ids(requester.readable_regions());
	let by_region = |template: SubqueryTemplate| match &regions {
		Some(ids) => association::filter_association_ids(template, ids, false, params),
		None => Predicate::False,
	};
	let owner = |table: &'static str| {
		Predicate::compare(
			SqlExpr::Column(ColumnRef::new(table, "user_id")),
			CompareOp::Eq,
			SqlLiteral::integer(requester.user_id),
		)
	};

	match family {
		EntityFamily::Goal => by_region(GOAL_REGION),
		EntityFamily::Grant =>
			region_restriction(ColumnRef::new("Grant", "region_id"), requester.readable_regions()),
		EntityFamily::ActivityReport => Predicate::or([
			region_restriction(
				ColumnRef::new("ActivityReport", "region_id"),
				requester.readable_regions(),
			),
			owner("ActivityReport"),
			association::membership(REPORT_COLLABORATOR, false, params),
			association::membership(REPORT_APPROVER, false, params),
		]),
		EntityFamily::TrainingReport => Predicate::or([
			region_restriction(
				ColumnRef::new("EventReportPilot", "region_id"),
				requester.readable_regions(),
			),
			association::membership(EVENT_PARTICIPANT, false, params),
		]),
		EntityFamily::SessionReport => Predicate::or([
			by_region(SESSION_EVENT_REGION),
			association::membership(SESSION_EVENT_PARTICIPANT, false, params),
		]),
		EntityFamily::CommunicationLog =>
			Predicate::or([owner("CommunicationLog"), by_region(LOG_AUTHOR_REGION)]),
		EntityFamily::CollabReport => Predicate::or([
			region_restriction(ColumnRef::new("CollabReport", "region_id"), requester.readable_regions()),
			owner("CollabReport"),
			association::membership(COLLAB_COLLABORATOR, false, params),
			association::membership(COLLAB_APPROVER, false, params),
		]),
	}
}

/// Appends the read restriction so filters and access share one conjunction.
pub fn authorize(family: EntityFamily, scope: Scope, requester: &Requester) -> Scope {
	scope.with(readable_scope(family, requester))
}

/// Narrows `region.in` to regions the requester can read.
///
/// Without a usable request every readable region is selected, and a request that shares no
/// region with the readable set falls back to that set.
pub fn set_read_regions(filters: &RawFilters, requester: &Requester) -> RawFilters {
	let mut narrowed = filters.clone();
	let requested = filters
		.get("region.in")
		.unwrap_or_default()
		.iter()
		.filter_map(|value| parse_integer(value))
		.filter(|region| requester.can_read_region(*region))
		.collect::<Vec<_>>();
	let regions = if requested.is_empty() { requester.readable_regions().to_vec() } else { requested };

	narrowed.set("region.in", regions.iter().map(i64::to_string).collect());

	narrowed
}

#[cfg(test)]
mod tests {
	use tta_domain::permissions::{Permission, ScopeId};

	use crate::{
		access::{self, Requester},
		filter::RawFilters,
		predicate::{ColumnRef, Predicate},
		registry::EntityFamily,
	};

	#[test]
	fn empty_region_set_denies() {
		assert_eq!(access::region_restriction(ColumnRef::new("Grant", "region_id"), &[]), Predicate::False);
		assert_eq!(
			access::readable_scope(EntityFamily::Goal, &Requester::new(1, Vec::new())),
			Predicate::False
		);
	}

	#[test]
	fn ownership_keeps_reports_visible_without_regions() {
		let sql = access::readable_scope(EntityFamily::ActivityReport, &Requester::new(5, Vec::new()))
			.render();

		assert!(sql.contains(r#""ActivityReport"."user_id" = 5"#));
		assert!(sql.contains("arc.user_id = 5"));
		assert!(!sql.contains("region_id IN"));
	}

	#[test]
	fn requester_from_permissions_reads_regions() {
		let requester = Requester::from_permissions(
			2,
			&[
				Permission { region_id: 4, scope_id: ScopeId::ReadActivityReports },
				Permission { region_id: 1, scope_id: ScopeId::SiteAccess },
			],
		);

		assert_eq!(requester.readable_regions(), &[4]);
	}

	#[test]
	fn read_regions_intersect_requested_regions() {
		let requester = Requester::new(1, vec![1, 2, 3]);
		let filters = RawFilters::new().with("region.in", "2").with("region.in", "9");

		assert_eq!(
			access::set_read_regions(&filters, &requester).get("region.in"),
			Some(&["2".to_string()][..])
		);
	}

	#[test]
	fn read_regions_default_to_all_readable() {
		let requester = Requester::new(1, vec![3, 1]);
		let filters = RawFilters::new().with("status.in", "approved");
		let narrowed = access::set_read_regions(&filters, &requester);

		assert_eq!(narrowed.get("region.in"), Some(&["1".to_string(), "3".to_string()][..]));

		let foreign = RawFilters::new().with("region.in", "7");

		assert_eq!(
			access::set_read_regions(&foreign, &requester).get("region.in"),
			Some(&["1".to_string(), "3".to_string()][..])
		);
	}

	#[test]
	fn authorize_appends_to_scope() {
		let scope = access::authorize(
			EntityFamily::Grant,
			Default::default(),
			&Requester::new(1, vec![1]),
		);

		assert_eq!(scope.to_sql(), r#""Grant"."region_id" IN (1)"#);
	}
}
