//! Per-family `topic -> condition -> handler` tables.

use std::{
	collections::BTreeMap,
	fmt::{Display, Formatter},
	str::FromStr,
};

use crate::{
	Error, Result,
	association::TemplateParams,
	filter::Condition,
	predicate::{ColumnRef, Predicate},
	topics,
};

/// Why a registered handler declined to constrain the query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ignored {
	NoValidValues,
	MalformedDate,
	MalformedRange,
	MissingUser,
	Unrecognized,
}
impl Display for Ignored {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			Self::NoValidValues => "no valid values",
			Self::MalformedDate => "malformed date",
			Self::MalformedRange => "malformed date range",
			Self::MissingUser => "requires a user id",
			Self::Unrecognized => "unrecognized value",
		})
	}
}

pub type Outcome = std::result::Result<Predicate, Ignored>;

pub type Handler = fn(&[String], &HandlerContext) -> Outcome;

/// Per-call options some topics narrow their joins with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScopeOptions {
	/// Restricts goal `topic` / `reason` lookups to one recipient's grants.
	pub recipient_id: Option<i64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandlerContext {
	pub user_id: Option<i64>,
	pub options: ScopeOptions,
}
impl HandlerContext {
	pub fn anonymous() -> Self {
		Self::default()
	}

	pub fn for_user(user_id: i64) -> Self {
		Self { user_id: Some(user_id), options: ScopeOptions::default() }
	}

	pub fn with_options(mut self, options: ScopeOptions) -> Self {
		self.options = options;

		self
	}

	pub fn params(&self) -> TemplateParams {
		TemplateParams { user_id: self.user_id, recipient_id: self.options.recipient_id }
	}

	pub fn require_user(&self) -> std::result::Result<i64, Ignored> {
		self.user_id.ok_or(Ignored::MissingUser)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityFamily {
	Goal,
	Grant,
	ActivityReport,
	TrainingReport,
	SessionReport,
	CommunicationLog,
	CollabReport,
}
impl EntityFamily {
	pub const ALL: [EntityFamily; 7] = [
		Self::Goal,
		Self::Grant,
		Self::ActivityReport,
		Self::TrainingReport,
		Self::SessionReport,
		Self::CommunicationLog,
		Self::CollabReport,
	];

	pub fn name(self) -> &'static str {
		match self {
			Self::Goal => "goal",
			Self::Grant => "grant",
			Self::ActivityReport => "activityReport",
			Self::TrainingReport => "trainingReport",
			Self::SessionReport => "sessionReport",
			Self::CommunicationLog => "communicationLog",
			Self::CollabReport => "collabReport",
		}
	}

	pub fn table(self) -> &'static str {
		match self {
			Self::Goal => "goals",
			Self::Grant => "grants",
			Self::ActivityReport => "activity_reports",
			Self::TrainingReport => "event_report_pilots",
			Self::SessionReport => "session_report_pilots",
			Self::CommunicationLog => "communication_logs",
			Self::CollabReport => "collab_reports",
		}
	}

	/// Alias the outer query must give [`Self::table`]; every scope refers to it.
	pub fn alias(self) -> &'static str {
		match self {
			Self::Goal => "Goal",
			Self::Grant => "Grant",
			Self::ActivityReport => "ActivityReport",
			Self::TrainingReport => "EventReportPilot",
			Self::SessionReport => "SessionReportPilot",
			Self::CommunicationLog => "CommunicationLog",
			Self::CollabReport => "CollabReport",
		}
	}

	pub fn id_column(self) -> ColumnRef {
		ColumnRef::new(self.alias(), "id")
	}
}
impl FromStr for EntityFamily {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		Self::ALL
			.into_iter()
			.find(|family| family.name().eq_ignore_ascii_case(raw) || family.table() == raw)
			.ok_or_else(|| Error::UnknownFamily { name: raw.to_string() })
	}
}
impl Display for EntityFamily {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// Immutable once built; overrides produce a new registry.
#[derive(Clone, Debug)]
pub struct TopicRegistry {
	family: EntityFamily,
	topics: BTreeMap<&'static str, BTreeMap<Condition, Handler>>,
}
impl TopicRegistry {
	pub fn builder(family: EntityFamily) -> TopicRegistryBuilder {
		TopicRegistryBuilder { registry: Self { family, topics: BTreeMap::new() } }
	}

	pub fn family(&self) -> EntityFamily {
		self.family
	}

	pub fn handler(&self, topic: &str, condition: Condition) -> Option<Handler> {
		self.topics.get(topic).and_then(|conditions| conditions.get(&condition)).copied()
	}

	pub fn contains(&self, topic: &str) -> bool {
		self.topics.contains_key(topic)
	}

	pub fn topics(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.topics.keys().copied()
	}

	pub fn conditions(&self, topic: &str) -> Vec<Condition> {
		self.topics.get(topic).map(|conditions| conditions.keys().copied().collect()).unwrap_or_default()
	}

	pub fn without_topic(mut self, topic: &str) -> Self {
		self.topics.remove(topic);

		self
	}

	pub fn with_handler(mut self, topic: &'static str, condition: Condition, handler: Handler) -> Self {
		self.topics.entry(topic).or_default().insert(condition, handler);

		self
	}
}

pub struct TopicRegistryBuilder {
	registry: TopicRegistry,
}
impl TopicRegistryBuilder {
	pub fn on(mut self, topic: &'static str, condition: Condition, handler: Handler) -> Self {
		self.registry = self.registry.with_handler(topic, condition, handler);

		self
	}

	pub fn build(self) -> TopicRegistry {
		self.registry
	}
}

/// One registry per entity family, built once and shared read-only.
#[derive(Clone, Debug)]
pub struct ScopeRegistries {
	registries: BTreeMap<EntityFamily, TopicRegistry>,
}
impl ScopeRegistries {
	pub fn standard() -> Self {
		let registries = [
			topics::goals::registry(),
			topics::grants::registry(),
			topics::activity_reports::registry(),
			topics::training_reports::registry(),
			topics::session_reports::registry(),
			topics::communication_logs::registry(),
			topics::collab_reports::registry(),
		];

		Self { registries: registries.into_iter().map(|registry| (registry.family(), registry)).collect() }
	}

	/// Standard registries minus every `<family>.<topic>` entry in `disabled`.
	pub fn with_disabled<S>(disabled: &[S]) -> Result<Self>
	where
		S: AsRef<str>,
	{
		let mut registries = Self::standard();

		for entry in disabled {
			let entry = entry.as_ref();
			let (family, topic) = entry
				.split_once('.')
				.ok_or_else(|| Error::MalformedKey { key: entry.to_string() })?;

			registries = registries.without_topic(family.parse()?, topic);
		}

		Ok(registries)
	}

	pub fn get(&self, family: EntityFamily) -> Option<&TopicRegistry> {
		self.registries.get(&family)
	}

	pub fn iter(&self) -> impl Iterator<Item = &TopicRegistry> {
		self.registries.values()
	}

	pub fn without_topic(mut self, family: EntityFamily, topic: &str) -> Self {
		if let Some(registry) = self.registries.remove(&family) {
			self.registries.insert(family, registry.without_topic(topic));
		}

		self
	}

	pub fn replace(mut self, registry: TopicRegistry) -> Self {
		self.registries.insert(registry.family(), registry);

		self
	}
}

#[cfg(test)]
mod tests {
	use crate::{
		filter::Condition,
		predicate::Predicate,
		registry::{EntityFamily, HandlerContext, Outcome, ScopeRegistries, TopicRegistry},
	};

	fn always_false(_: &[String], _: &HandlerContext) -> Outcome {
		Ok(Predicate::False)
	}

	#[test]
	fn standard_registries_cover_every_family() {
		let registries = ScopeRegistries::standard();

		for family in EntityFamily::ALL {
			assert_eq!(registries.get(family).map(TopicRegistry::family), Some(family));
		}
	}

	#[test]
	fn family_names_parse() {
		assert_eq!("goal".parse::<EntityFamily>().ok(), Some(EntityFamily::Goal));
		assert_eq!("activity_reports".parse::<EntityFamily>().ok(), Some(EntityFamily::ActivityReport));
		assert!("widgets".parse::<EntityFamily>().is_err());
	}

	#[test]
	fn overrides_do_not_leak_between_instances() {
		let base = ScopeRegistries::standard();
		let overridden = base.clone().replace(
			TopicRegistry::builder(EntityFamily::Goal).on("status", Condition::In, always_false).build(),
		);
		let goal = overridden.get(EntityFamily::Goal).expect("goal registry");

		assert_eq!(goal.topics().collect::<Vec<_>>(), vec!["status"]);
		assert!(base.get(EntityFamily::Goal).expect("goal registry").contains("reportText"));
	}

	#[test]
	fn disabled_topics_are_removed() {
		let registries = ScopeRegistries::with_disabled(&["goal.reportText"]).expect("registries");

		assert!(!registries.get(EntityFamily::Goal).expect("goal registry").contains("reportText"));
		assert!(ScopeRegistries::with_disabled(&["widget.status"]).is_err());
	}
}
