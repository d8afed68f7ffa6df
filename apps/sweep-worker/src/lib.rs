pub mod worker;

mod error;

pub use error::{Error, Result};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sweep_service::{ScheduledJob, SweepService};
use sweep_storage::{blobs::BlobStorage, db::Db};

#[derive(Debug, Parser)]
#[command(
	version = sweep_cli::VERSION,
	rename_all = "kebab",
	styles = sweep_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
	/// Run a single purge, print its summary as JSON, and exit.
	#[arg(long)]
	pub once: bool,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = sweep_config::load(&args.config)?;
	let filter = EnvFilter::new(config.service.log_level.clone());

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let blobs = BlobStorage::from_config(&config.storage.blobs)?;
	let service = SweepService::from_storage(config.purge, db, blobs)?;

	if args.once {
		let summary = service.invoke().await;

		println!("{}", serde_json::to_string_pretty(&summary)?);

		worker::ensure_success(&summary)?;

		return Ok(());
	}

	worker::run_scheduler(&service, worker::interval_from_hours(config.schedule.interval_hours))
		.await;

	Ok(())
}
