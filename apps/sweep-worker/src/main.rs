use clap::Parser;

use sweep_worker::Args;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	sweep_worker::run(Args::parse()).await
}
