use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = moodlog_api::Args::parse();

	moodlog_api::run(args).await
}
