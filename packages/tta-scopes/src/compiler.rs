//! Key validation and dispatch. Handlers own all SQL construction.

use std::collections::BTreeMap;

use crate::{
	Result,
	filter::{FilterKey, RawFilters},
	predicate::Scope,
	registry::{EntityFamily, HandlerContext, ScopeRegistries, TopicRegistry},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileLimits {
	pub max_values_per_filter: usize,
	pub max_value_bytes: usize,
}
impl Default for CompileLimits {
	fn default() -> Self {
		Self { max_values_per_filter: 64, max_value_bytes: 512 }
	}
}
impl From<&tta_config::Filters> for CompileLimits {
	fn from(cfg: &tta_config::Filters) -> Self {
		Self { max_values_per_filter: cfg.max_values_per_filter, max_value_bytes: cfg.max_value_bytes }
	}
}

/// Compiled scopes for every family, keyed by family.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeSet {
	scopes: BTreeMap<EntityFamily, Scope>,
}
impl ScopeSet {
	pub fn get(&self, family: EntityFamily) -> Option<&Scope> {
		self.scopes.get(&family)
	}

	pub fn iter(&self) -> impl Iterator<Item = (EntityFamily, &Scope)> {
		self.scopes.iter().map(|(family, scope)| (*family, scope))
	}

	pub fn into_scope(mut self, family: EntityFamily) -> Scope {
		self.scopes.remove(&family).unwrap_or_default()
	}
}

pub struct Compiler {
	registries: ScopeRegistries,
	limits: CompileLimits,
}
impl Compiler {
	pub fn new(registries: ScopeRegistries, limits: CompileLimits) -> Self {
		Self { registries, limits }
	}

	pub fn from_config(cfg: &tta_config::Filters) -> Result<Self> {
		Ok(Self::new(ScopeRegistries::with_disabled(&cfg.disabled_topics)?, cfg.into()))
	}

	pub fn registries(&self) -> &ScopeRegistries {
		&self.registries
	}

	pub fn limits(&self) -> CompileLimits {
		self.limits
	}

	pub fn compile(&self, family: EntityFamily, filters: &RawFilters, ctx: &HandlerContext) -> Scope {
		match self.registries.get(family) {
			Some(registry) => compile_with_limits(filters, registry, ctx, self.limits),
			None => Scope::new(),
		}
	}

	pub fn compile_all(&self, filters: &RawFilters, ctx: &HandlerContext) -> ScopeSet {
		let scopes = self
			.registries
			.iter()
			.map(|registry| {
				(registry.family(), compile_with_limits(filters, registry, ctx, self.limits))
			})
			.collect();

		ScopeSet { scopes }
	}
}
impl Default for Compiler {
	fn default() -> Self {
		Self::new(ScopeRegistries::standard(), CompileLimits::default())
	}
}

pub fn compile(filters: &RawFilters, registry: &TopicRegistry, ctx: &HandlerContext) -> Scope {
	compile_with_limits(filters, registry, ctx, CompileLimits::default())
}

/// Unknown keys are dropped and declined handlers are omitted; neither is an error.
pub fn compile_with_limits(
	filters: &RawFilters,
	registry: &TopicRegistry,
	ctx: &HandlerContext,
	limits: CompileLimits,
) -> Scope {
	let family = registry.family();
	let mut scope = Scope::new();

	for (key, raw_values) in filters.iter() {
		let Some(parsed) = FilterKey::split(key) else {
			tracing::debug!(%family, key, "Dropping filter key without a known condition.");

			continue;
		};
		let Some(handler) = registry.handler(&parsed.topic, parsed.condition) else {
			tracing::debug!(%family, key, "Dropping filter key not registered for this family.");

			continue;
		};
		let values = normalize_values(key, raw_values, limits);

		if values.is_empty() {
			tracing::debug!(%family, key, "Dropping filter key without usable values.");

			continue;
		}

		match handler(&values, ctx) {
			Ok(predicate) if predicate.is_neutral() => {},
			Ok(predicate) => scope.push(predicate),
			Err(reason) => {
				tracing::debug!(%family, key, %reason, "Filter handler declined to constrain.");
			},
		}
	}

	scope
}

fn normalize_values(key: &str, raw: &[String], limits: CompileLimits) -> Vec<String> {
	let mut values = Vec::with_capacity(raw.len().min(limits.max_values_per_filter));

	for value in raw {
		let trimmed = value.trim();

		if trimmed.is_empty() {
			continue;
		}
		if trimmed.len() > limits.max_value_bytes {
			tracing::warn!(key, bytes = trimmed.len(), "Discarding oversized filter value.");

			continue;
		}
		if values.len() == limits.max_values_per_filter {
			tracing::warn!(key, limit = limits.max_values_per_filter, "Truncating filter value list.");

			break;
		}

		values.push(trimmed.to_string());
	}

	values
}

#[cfg(test)]
mod tests {
	use crate::{
		compiler::{self, CompileLimits, Compiler},
		filter::{Condition, RawFilters},
		literal::SqlLiteral,
		predicate::{Predicate, SqlExpr},
		registry::{EntityFamily, HandlerContext, Outcome, TopicRegistry},
	};

	fn echo_count(values: &[String], _: &HandlerContext) -> Outcome {
		Ok(Predicate::InList {
			expr: SqlExpr::Static("n"),
			values: values.iter().map(|_| SqlLiteral::integer(1)).collect(),
			negated: false,
		})
	}

	fn registry() -> TopicRegistry {
		TopicRegistry::builder(EntityFamily::Goal).on("status", Condition::In, echo_count).build()
	}

	#[test]
	fn values_are_trimmed_and_limited() {
		let limits = CompileLimits { max_values_per_filter: 2, max_value_bytes: 4 };
		let filters = RawFilters::new()
			.with("status.in", " a ")
			.with("status.in", "")
			.with("status.in", "toolong")
			.with("status.in", "b")
			.with("status.in", "c");
		let scope =
			compiler::compile_with_limits(&filters, &registry(), &HandlerContext::default(), limits);
		let Predicate::InList { values, .. } = &scope.predicates()[0] else {
			panic!("Expected the echo handler's predicate.");
		};

		assert_eq!(values.len(), 2);
	}

	#[test]
	fn keys_without_values_are_dropped() {
		let filters = RawFilters::new().with("status.in", "  ");

		assert!(compiler::compile(&filters, &registry(), &HandlerContext::default()).is_empty());
	}

	#[test]
	fn compile_all_returns_every_family() {
		let filters = RawFilters::new().with("region.in", "1");
		let scopes = Compiler::default().compile_all(&filters, &HandlerContext::for_user(1));

		for family in EntityFamily::ALL {
			assert!(scopes.get(family).is_some(), "{family}");
		}
	}
}
