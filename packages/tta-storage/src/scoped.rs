//! Executes compiled scopes. The scope text is spliced as-is; only the id restriction is bound.

use sqlx::{Postgres, QueryBuilder};

use tta_scopes::{EntityFamily, Scope};

use crate::{Result, db::Db};

/// Ids of `family` rows matching `scope`, ascending, optionally limited to `restrict_to`.
pub async fn fetch_ids(
	db: &Db,
	family: EntityFamily,
	scope: &Scope,
	restrict_to: Option<&[i64]>,
) -> Result<Vec<i64>> {
	let alias = family.alias();
	let mut builder = select(family, &format!(r#""{alias}"."id""#), scope);

	if let Some(ids) = restrict_to {
		builder.push(format!(r#" AND "{alias}"."id" = ANY("#));
		builder.push_bind(ids.to_vec());
		builder.push(")");
	}

	builder.push(format!(r#" ORDER BY "{alias}"."id""#));

	let ids = builder.build_query_scalar::<i64>().fetch_all(&db.pool).await?;

	tracing::debug!(%family, rows = ids.len(), "Fetched scoped ids.");

	Ok(ids)
}

pub async fn count(db: &Db, family: EntityFamily, scope: &Scope) -> Result<i64> {
	let mut builder = select(family, "count(*)", scope);
	let count = builder.build_query_scalar::<i64>().fetch_one(&db.pool).await?;

	Ok(count)
}

/// `SELECT <projection> FROM <table> AS "<alias>" WHERE <scope>`.
pub fn select<'a>(family: EntityFamily, projection: &str, scope: &Scope) -> QueryBuilder<'a, Postgres> {
	let mut builder = QueryBuilder::new(format!(
		r#"SELECT {projection} FROM {} AS "{}" WHERE "#,
		family.table(),
		family.alias()
	));

	builder.push(scope.to_sql());

	builder
}
