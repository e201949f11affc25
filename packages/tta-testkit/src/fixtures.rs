//! Minimal reporting rows for scope tests. Every helper returns the ids it inserted.

use serde_json::json;
use sqlx::PgPool;

use crate::Result;

pub const USER_ID: i64 = 1;

/// Regions 1 and 2, plus user [`USER_ID`] homed in region 1.
pub async fn seed_base(pool: &PgPool) -> Result<()> {
	sqlx::query("INSERT INTO regions (id, name) VALUES (1, 'Region 1'), (2, 'Region 2')")
		.execute(pool)
		.await?;
	sqlx::query("INSERT INTO users (id, name, home_region_id) VALUES ($1, 'Ada Analyst', 1)")
		.bind(USER_ID)
		.execute(pool)
		.await?;

	Ok(())
}

/// One recipient and one grant per region, in region order.
pub async fn seed_grants(pool: &PgPool, regions: &[i64]) -> Result<Vec<i64>> {
	let recipient_id: i64 = sqlx::query_scalar(
		"INSERT INTO recipients (name) VALUES ('Harbor Head Start') RETURNING id",
	)
	.fetch_one(pool)
	.await?;
	let mut ids = Vec::with_capacity(regions.len());

	for (idx, region_id) in regions.iter().enumerate() {
		let id: i64 = sqlx::query_scalar(
			"\
INSERT INTO grants (number, recipient_id, region_id)
VALUES ($1, $2, $3)
RETURNING id",
		)
		.bind(format!("0{region_id}HP{idx:06}"))
		.bind(recipient_id)
		.bind(*region_id)
		.fetch_one(pool)
		.await?;

		ids.push(id);
	}

	Ok(ids)
}

/// One goal per status under `grant_id`, in status order.
pub async fn seed_goals(pool: &PgPool, grant_id: i64, statuses: &[&str]) -> Result<Vec<i64>> {
	let mut ids = Vec::with_capacity(statuses.len());

	for status in statuses {
		let id: i64 = sqlx::query_scalar(
			"INSERT INTO goals (name, status, grant_id) VALUES ($1, $2, $3) RETURNING id",
		)
		.bind(format!("{status} goal"))
		.bind(*status)
		.bind(grant_id)
		.fetch_one(pool)
		.await?;

		ids.push(id);
	}

	Ok(ids)
}

/// Training reports owned by [`USER_ID`] in region 1, one per raw `startDate` text.
pub async fn seed_training_reports(pool: &PgPool, start_dates: &[&str]) -> Result<Vec<i64>> {
	let mut ids = Vec::with_capacity(start_dates.len());

	for start in start_dates {
		let id: i64 = sqlx::query_scalar(
			"\
INSERT INTO event_report_pilots (owner_id, region_id, data)
VALUES ($1, 1, $2)
RETURNING id",
		)
		.bind(USER_ID)
		.bind(json!({ "startDate": start }))
		.fetch_one(pool)
		.await?;

		ids.push(id);
	}

	Ok(ids)
}

/// Stores `(region_id, scope_id)` permissions for [`USER_ID`].
pub async fn grant_permissions(pool: &PgPool, grants: &[(i64, i64)]) -> Result<()> {
	for &(region_id, scope_id) in grants {
		sqlx::query("INSERT INTO permissions (user_id, region_id, scope_id) VALUES ($1, $2, $3)")
			.bind(USER_ID)
			.bind(region_id)
			.bind(scope_id)
			.execute(pool)
			.await?;
	}

	Ok(())
}
