use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = tta_filter::Args::parse();
	tta_filter::run(args).await
}
