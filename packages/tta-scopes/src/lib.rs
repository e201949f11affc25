//! Compiles `topic.condition=value` filters into injection-safe SQL predicates.
//!
//! Everything here is pure and synchronous. Executing a [`Scope`] belongs to the storage layer.

pub mod access;
pub mod association;
pub mod compiler;
pub mod dates;
pub mod filter;
pub mod literal;
pub mod predicate;
pub mod primitives;
pub mod registry;
pub mod topics;

mod error;

pub use access::{Requester, authorize, readable_scope, region_restriction, set_read_regions};
pub use compiler::{CompileLimits, Compiler, ScopeSet, compile, compile_with_limits};
pub use error::{Error, Result};
pub use filter::{Condition, FilterKey, RawFilters};
pub use literal::{IdList, SqlLiteral};
pub use predicate::{Predicate, Scope};
pub use primitives::FilterValues;
pub use registry::{
	EntityFamily, Handler, HandlerContext, Ignored, Outcome, ScopeOptions, ScopeRegistries,
	TopicRegistry,
};
