//! Disposable Postgres databases and reporting fixtures for integration tests.

pub mod fixtures;

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

/// Base DSN; each test database is created next to the database it names.
pub const DSN_VAR: &str = "TTA_PG_DSN";

/// A `tta_test_*` database that is dropped on [`TestDatabase::drop_database`] or, failing
/// that, when the value goes out of scope.
pub struct TestDatabase {
	name: String,
	dsn: String,
	maintenance: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	pub async fn create(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::InvalidDsn { var: DSN_VAR, message: err.to_string() })?;
		let maintenance = base.clone().database("postgres");
		let name = format!("tta_test_{}", Uuid::new_v4().simple());
		let mut conn = PgConnection::connect_with(&maintenance).await?;

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str()).await?;
		conn.close().await?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, maintenance, dropped: false })
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Storage settings pointing at this database.
	pub fn postgres(&self) -> tta_config::Postgres {
		tta_config::Postgres { dsn: self.dsn.clone(), pool_max_conns: 2 }
	}

	pub async fn drop_database(mut self) -> Result<()> {
		drop_named(&self.name, &self.maintenance).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let name = self.name.clone();
		let maintenance = self.maintenance.clone();

		// The owning runtime may already be shutting down, so drop from a fresh one.
		let handle = thread::spawn(move || {
			let outcome = Builder::new_current_thread()
				.enable_all()
				.build()
				.map_err(|err| err.to_string())
				.and_then(|runtime| {
					runtime.block_on(drop_named(&name, &maintenance)).map_err(|err| err.to_string())
				});

			if let Err(err) = outcome {
				eprintln!("Failed to drop test database {name}: {err}.");
			}
		});

		let _ = handle.join();
	}
}

/// `None` when Postgres-backed tests should skip.
pub fn env_dsn() -> Option<String> {
	env::var(DSN_VAR).ok().filter(|dsn| !dsn.trim().is_empty())
}

async fn drop_named(name: &str, maintenance: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(maintenance).await?;

	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#).as_str()).await?;
	conn.close().await?;

	Ok(())
}
