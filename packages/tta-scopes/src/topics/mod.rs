//! One registry per entity family. Handlers are plain functions over `(values, context)`.

pub mod activity_reports;
pub mod collab_reports;
pub mod communication_logs;
pub mod goals;
pub mod grants;
pub mod session_reports;
pub mod training_reports;

use crate::{literal::IdList, registry::Ignored};

fn ids(values: &[String]) -> Result<IdList, Ignored> {
	IdList::parse(values).ok_or(Ignored::NoValidValues)
}
