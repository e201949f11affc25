use tta_domain::permissions::{Permission, ScopeId};
use tta_scopes::Requester;

use crate::{Result, db::Db};

/// Builds the requester from stored permissions. Unknown scope ids grant nothing.
pub async fn load_requester(db: &Db, user_id: i64) -> Result<Requester> {
	let rows: Vec<(i64, i64)> =
		sqlx::query_as("SELECT region_id, scope_id FROM permissions WHERE user_id = $1")
			.bind(user_id)
			.fetch_all(&db.pool)
			.await?;
	let permissions = rows
		.into_iter()
		.filter_map(|(region_id, scope_id)| {
			ScopeId::try_from(scope_id).ok().map(|scope_id| Permission { region_id, scope_id })
		})
		.collect::<Vec<_>>();

	Ok(Requester::from_permissions(user_id, &permissions))
}
