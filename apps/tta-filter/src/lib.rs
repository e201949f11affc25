use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tta_scopes::{
	Compiler, EntityFamily, HandlerContext, RawFilters, Requester, Scope, ScopeOptions,
};
use tta_storage::{access, db::Db, scoped};

#[derive(Debug, Parser)]
#[command(
	version = tta_cli::VERSION,
	rename_all = "kebab",
	styles = tta_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Print the WHERE clause each family compiles to.
	Explain(FilterArgs),
	/// Count the rows each family's scope matches.
	Count(FilterArgs),
}

#[derive(Debug, clap::Args)]
pub struct FilterArgs {
	/// Entity family to compile for; every family when omitted.
	#[arg(long, value_name = "NAME")]
	pub family: Option<EntityFamily>,
	/// Filters as a query string, e.g. `status.in=Active&region.in=1`.
	#[arg(long, value_name = "QUERY", default_value = "", conflicts_with = "json")]
	pub query: String,
	/// Filters as a JSON object of `topic.condition` keys.
	#[arg(long, value_name = "JSON")]
	pub json: Option<String>,
	/// Requesting user. Enables group topics and read authorization.
	#[arg(long, value_name = "ID")]
	pub user: Option<i64>,
	/// Region the user may read. Repeatable.
	#[arg(long = "region", value_name = "ID")]
	pub regions: Vec<i64>,
	/// Narrows goal topic and reason lookups to one recipient.
	#[arg(long, value_name = "ID")]
	pub recipient: Option<i64>,
}
impl FilterArgs {
	pub fn families(&self) -> Vec<EntityFamily> {
		match self.family {
			Some(family) => vec![family],
			None => EntityFamily::ALL.to_vec(),
		}
	}

	pub fn filters(&self) -> color_eyre::Result<RawFilters> {
		match &self.json {
			Some(raw) => Ok(RawFilters::from_json(&serde_json::from_str(raw)?)?),
			None => Ok(RawFilters::from_query(&self.query)),
		}
	}

	pub fn context(&self) -> HandlerContext {
		let ctx = match self.user {
			Some(user_id) => HandlerContext::for_user(user_id),
			None => HandlerContext::anonymous(),
		};

		ctx.with_options(ScopeOptions { recipient_id: self.recipient })
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = tta_config::load(&args.config)?;

	init_tracing(&config)?;

	let compiler = Compiler::from_config(&config.filters)?;

	match args.command {
		Command::Explain(filter_args) => {
			let requester =
				filter_args.user.map(|user_id| Requester::new(user_id, filter_args.regions.clone()));

			for (family, sql) in explain(&compiler, &config, &filter_args, requester.as_ref())? {
				println!("{family}: {sql}");
			}
		},
		Command::Count(filter_args) => {
			let db = Db::connect(&config.storage.postgres).await?;

			db.ensure_schema().await?;

			let requester = match filter_args.user {
				Some(user_id) if filter_args.regions.is_empty() =>
					Some(access::load_requester(&db, user_id).await?),
				Some(user_id) => Some(Requester::new(user_id, filter_args.regions.clone())),
				None => None,
			};

			for (family, scope) in
				compile_scopes(&compiler, &config, &filter_args, requester.as_ref())?
			{
				let count = scoped::count(&db, family, &scope).await?;

				tracing::info!(%family, count, "Counted scoped rows.");
				println!("{family}: {count}");
			}
		},
	}

	Ok(())
}

/// Compiled scope per requested family, authorized when a requester is present.
pub fn compile_scopes(
	compiler: &Compiler,
	config: &tta_config::Config,
	args: &FilterArgs,
	requester: Option<&Requester>,
) -> color_eyre::Result<Vec<(EntityFamily, Scope)>> {
	let mut filters = args.filters()?;
	let ctx = args.context();

	if let Some(requester) = requester
		&& config.access.enforce_region_filters
	{
		filters = tta_scopes::set_read_regions(&filters, requester);
	}

	Ok(args
		.families()
		.into_iter()
		.map(|family| {
			let scope = compiler.compile(family, &filters, &ctx);
			let scope = match requester {
				Some(requester) => tta_scopes::authorize(family, scope, requester),
				None => scope,
			};

			(family, scope)
		})
		.collect())
}

pub fn explain(
	compiler: &Compiler,
	config: &tta_config::Config,
	args: &FilterArgs,
	requester: Option<&Requester>,
) -> color_eyre::Result<Vec<(EntityFamily, String)>> {
	let scopes = compile_scopes(compiler, config, args, requester)?;

	Ok(scopes.into_iter().map(|(family, scope)| (family, scope.to_sql())).collect())
}

fn init_tracing(config: &tta_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	Ok(())
}
