use std::{future::Future, time::Duration};

use tokio::time::{self as tokio_time, MissedTickBehavior};

use sweep_service::{PurgeSummary, ScheduledJob};

use crate::{Error, Result};

const SECONDS_PER_HOUR: u64 = 3_600;

pub fn interval_from_hours(hours: u64) -> Duration {
	Duration::from_secs(hours.saturating_mul(SECONDS_PER_HOUR))
}

/// Turns an unsuccessful summary into an error, so a one-shot run exits non-zero.
pub fn ensure_success(summary: &PurgeSummary) -> Result<()> {
	if !summary.success {
		return Err(Error::RunFailed { stop_reason: summary.stop_reason.clone() });
	}

	Ok(())
}

/// Invokes the job right away and then every `interval` until `shutdown` resolves.
///
/// An in-flight run is never interrupted; shutdown is observed between runs. Returns how many runs
/// were started.
pub async fn run_scheduler_until<J, S>(job: &J, interval: Duration, shutdown: S) -> usize
where
	J: ScheduledJob + ?Sized,
	S: Future<Output = ()>,
{
	let mut ticker = tokio_time::interval(interval);
	let mut runs = 0;

	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

	tokio::pin!(shutdown);

	loop {
		tokio::select! {
			_ = &mut shutdown => {
				tracing::info!(job = job.name(), runs, "Scheduler stopping.");

				return runs;
			},
			_ = ticker.tick() => {
				runs += 1;

				let summary = job.invoke().await;

				if summary.success {
					tracing::info!(
						job = job.name(),
						deleted_records = summary.deleted_records,
						deleted_attachments = summary.deleted_attachments,
						"Scheduled job finished."
					);
				} else {
					tracing::error!(
						job = job.name(),
						stop_reason = ?summary.stop_reason,
						"Scheduled job failed; retrying on the next tick."
					);
				}
			},
		}
	}
}

/// Runs the scheduler until Ctrl-C.
pub async fn run_scheduler<J>(job: &J, interval: Duration) -> usize
where
	J: ScheduledJob + ?Sized,
{
	tracing::info!(job = job.name(), interval_secs = interval.as_secs(), "Scheduler started.");

	run_scheduler_until(job, interval, async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %err, "Failed to listen for shutdown signal.");

			std::future::pending::<()>().await;
		}
	})
	.await
}
