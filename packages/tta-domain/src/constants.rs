//! Enumerations shared with the reporting frontend. Values are matched exactly.

use crate::AllowList;

/// Filter value that selects goals whose status has never been set.
pub const NEEDS_STATUS: &str = "Needs status";

pub const GOAL_STATUSES: AllowList = AllowList::new(
	"goal_statuses",
	&["Draft", "Not Started", "In Progress", "Suspended", "Closed"],
);

pub const REPORT_STATUSES: AllowList = AllowList::new(
	"report_statuses",
	&["draft", "deleted", "submitted", "approved", "needs_action"],
);

pub const TRAINING_REPORT_STATUSES: AllowList = AllowList::new(
	"training_report_statuses",
	&["Not started", "In progress", "Complete", "Suspended"],
);

/// Recipient participant categories followed by other-entity categories.
pub const PARTICIPANTS: AllowList = AllowList::new(
	"participants",
	&[
		"CEO / CFO / Executive",
		"Center Director / Site Director",
		"Coach",
		"Direct Service: Other",
		"Family Service Worker / Case Manager",
		"Fiscal Manager/Team",
		"Governing Body / Tribal Council / Policy Council",
		"Home Visitor",
		"Manager / Coordinator / Specialist",
		"Parent / Guardian",
		"Program Director (HS / EHS)",
		"Program Support / Administrative Assistant",
		"Teacher / Infant-Toddler Caregiver",
		"Volunteer",
		"HSCO",
		"Local or State Agency",
		"OCC Regional Office",
		"OHS Regional Office",
		"Regional Head Start Association",
		"Regional TTA Team / Specialists",
		"State Early Learning System",
		"State Head Start Association",
		"Other",
	],
);

pub const TOPICS: AllowList = AllowList::new(
	"topics",
	&[
		"Behavioral / Mental Health / Trauma",
		"Child Screening and Assessment",
		"CLASS: Classroom Organization",
		"CLASS: Emotional Support",
		"CLASS: Instructional Support",
		"Coaching",
		"Communication",
		"Community and Self-Assessment",
		"Culture & Language",
		"Curriculum (Instructional or Parenting)",
		"Data and Evaluation",
		"Disabilities Services",
		"ERSEA",
		"Emergency Preparedness, Response, and Recovery (EPRR)",
		"Environmental Health and Safety / EPRR",
		"Environmental Health and Safety",
		"Facilities",
		"Family Support Services",
		"Fatherhood / Male Caregiving",
		"Fiscal / Budget",
		"Five-Year Grant",
		"Home Visiting",
		"Human Resources",
		"Leadership / Governance",
		"Learning Environments",
		"Nutrition",
		"Ongoing Monitoring and Continuous Improvement",
		"Oral Health",
		"Parent and Family Engagement",
		"Partnerships and Community Engagement",
		"Physical Health and Screenings",
		"Pregnancy Services / Expectant Families",
		"Program Planning and Services",
		"Quality Improvement Plan / QIP",
		"Recordkeeping and Reporting",
		"Safety Practices",
		"Staff Wellness",
		"Teaching / Caregiving Practices",
		"Technology and Information Systems",
		"Training and Professional Development",
		"Transition Practices",
		"Transportation",
	],
);

pub const REASONS: AllowList = AllowList::new(
	"reasons",
	&[
		"Below Competitive Threshold (CLASS)",
		"Below Quality Threshold (CLASS)",
		"Change in Scope",
		"Child Incident",
		"Complaint",
		"Full Enrollment",
		"New Recipient",
		"New Director or Management",
		"New Program Option",
		"New Staff / Turnover",
		"Ongoing Quality Improvement",
		"Planning/Coordination",
		"School Readiness Goals",
		"Monitoring | Area of Concern",
		"Monitoring | Noncompliance",
		"Monitoring | Deficiency",
		// Retired, still present on historical reports.
		"COVID-19 response",
	],
);

pub const TARGET_POPULATIONS: AllowList = AllowList::new(
	"target_populations",
	&[
		"Infants and Toddlers (ages birth to 3)",
		"Preschool Children (ages 3-5)",
		"Expectant families",
		"Affected by Child Welfare Involvement",
		"Affected by Disaster",
		"Affected by Substance Use",
		"Children Experiencing Homelessness",
		"Children in Migrant and Seasonal Families",
		"Children with Disabilities",
		"Children with Special Health Care Needs",
		"Dual-Language Learners",
		"Program Staff",
		"Children/Families affected by traumatic events",
		"Parents/Families impacted by health disparities",
	],
);

pub const USER_ROLES: AllowList = AllowList::new(
	"user_roles",
	&[
		"Central Office",
		"Other Federal Staff",
		"National Center",
		"Regional Program Manager",
		"COR",
		"Supervisory Program Specialist",
		"Program Specialist",
		"Grants Specialist",
		"Customer Service Contract",
		"TTAC",
		"Admin. Assistant",
		"Early Childhood Manager",
		"Early Childhood Specialist",
		"Family Engagement Specialist",
		"Grantee Specialist Manager",
		"Grantee Specialist",
		"Health Specialist",
		"System Specialist",
		"Interim Management Team",
		"Integrated Service Team",
		"Grants Management Specialist",
	],
);

pub const TTA_TYPES: AllowList =
	AllowList::new("tta_types", &["training", "technical-assistance"]);

pub const DELIVERY_METHODS: AllowList =
	AllowList::new("delivery_methods", &["in-person", "virtual", "hybrid"]);

pub const COMMUNICATION_METHODS: AllowList =
	AllowList::new("communication_methods", &["Email", "Phone", "In person", "Virtual"]);

pub const COMMUNICATION_PURPOSES: AllowList = AllowList::new(
	"communication_purposes",
	&[
		"General Check-In",
		"New TTA request",
		"Program Specialist or Regional Office meeting",
		"Program Specialist's Monthly contact",
		"Program Specialist's site visit",
		"Recipient question/feedback",
		"RTTAPA updates",
		"RTTAPA Initial Plan / New Recipient",
		"TTA planning or scheduling",
	],
);

pub const COMMUNICATION_RESULTS: AllowList = AllowList::new(
	"communication_results",
	&["New TTA accepted", "New TTA declined", "RTTAPA declined", "Next Steps identified"],
);

/// Ownership roles accepted by `myReports`.
pub const REPORT_ROLES: AllowList =
	AllowList::new("report_roles", &["Creator", "Collaborator", "Approver"]);

/// Head Start program types a grant may carry.
pub const PROGRAM_TYPES: AllowList = AllowList::new(
	"program_types",
	&["EHS", "HS", "EHS-CCP", "AIAN EHS", "AIAN HS", "Migrant HS", "Seasonal HS"],
);
