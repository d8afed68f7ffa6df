use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use tokio::time::Instant;
use uuid::Uuid;

use sweep_domain::{Cutoff, compute_cutoff};

use crate::{BatchReport, Result, SweepService};

/// Why a run stopped fetching.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StopReason {
	/// The store returned an empty or short batch.
	Exhausted,
	BatchLimit,
	TimeBudget,
	/// The store kept returning records already attempted in this run.
	NoProgress,
	/// Dry runs stop after one batch since nothing changes in the stores.
	DryRun,
	/// The expiry query failed.
	Aborted { message: String },
}

/// Result of one purge run, handed back to whatever triggered it.
///
/// When `dry_run` is set, the deletion counts are what the run would have deleted; nothing was
/// removed from either store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeSummary {
	pub success: bool,
	pub deleted_records: usize,
	pub deleted_attachments: usize,
	pub attachment_warnings: usize,
	pub record_failures: usize,
	pub deferred_records: usize,
	pub batches: u32,
	pub stop_reason: StopReason,
	pub dry_run: bool,
	#[serde(with = "crate::time_serde")]
	pub cutoff: OffsetDateTime,
}

#[derive(Debug, Default)]
struct RunTally {
	batches: u32,
	totals: BatchReport,
}
impl RunTally {
	fn absorb(&mut self, report: &BatchReport) {
		self.batches += 1;
		self.totals.records += report.records;
		self.totals.purged += report.purged;
		self.totals.errors += report.errors;
		self.totals.deferred += report.deferred;
		self.totals.attachments_deleted += report.attachments_deleted;
		self.totals.attachments_already_absent += report.attachments_already_absent;
		self.totals.attachments_skipped += report.attachments_skipped;
		self.totals.attachment_warnings += report.attachment_warnings;
	}
}

impl SweepService {
	/// Purges every record soft-deleted at least `retention_days` before `now`.
	///
	/// The cutoff is fixed at the start, so records that expire mid-run wait for the next run. A
	/// failing expiry query aborts the run and is reported through the summary; everything purged
	/// before the failure is still counted.
	pub async fn run_purge(&self, now: OffsetDateTime) -> PurgeSummary {
		let cutoff = compute_cutoff(now, self.purge.retention_days);
		let mut tally = RunTally::default();

		tracing::info!(
			cutoff = %cutoff.timestamp(),
			retention_days = self.purge.retention_days,
			batch_size = self.purge.batch_size,
			dry_run = self.purge.dry_run,
			"Starting purge run."
		);

		let (success, stop_reason) = match self.drive(cutoff, &mut tally).await {
			Ok(reason) => (true, reason),
			Err(err) => {
				tracing::error!(error = %err, batches = tally.batches, "Purge run aborted.");

				(false, StopReason::Aborted { message: err.to_string() })
			},
		};
		let summary = PurgeSummary {
			success,
			deleted_records: tally.totals.purged,
			deleted_attachments: tally.totals.attachments_deleted,
			attachment_warnings: tally.totals.attachment_warnings,
			record_failures: tally.totals.errors,
			deferred_records: tally.totals.deferred,
			batches: tally.batches,
			stop_reason,
			dry_run: self.purge.dry_run,
			cutoff: cutoff.timestamp(),
		};

		tracing::info!(
			success = summary.success,
			deleted_records = summary.deleted_records,
			deleted_attachments = summary.deleted_attachments,
			attachment_warnings = summary.attachment_warnings,
			record_failures = summary.record_failures,
			deferred_records = summary.deferred_records,
			batches = summary.batches,
			stop_reason = ?summary.stop_reason,
			"Purge run finished."
		);

		summary
	}

	async fn drive(&self, cutoff: Cutoff, tally: &mut RunTally) -> Result<StopReason> {
		let batch_size = self.purge.batch_size;
		let budget = Duration::from_secs(self.purge.max_run_seconds);
		let started = Instant::now();
		// Failed and deferred records stay eligible; later fetches in this run skip them.
		let mut attempted: Vec<Uuid> = Vec::new();

		loop {
			if tally.batches >= self.purge.max_batches {
				tracing::warn!(max_batches = self.purge.max_batches, "Purge run hit its batch limit.");

				return Ok(StopReason::BatchLimit);
			}
			if started.elapsed() >= budget {
				tracing::warn!(
					max_run_seconds = self.purge.max_run_seconds,
					"Purge run exhausted its time budget."
				);

				return Ok(StopReason::TimeBudget);
			}

			let batch = self.fetch_expired_batch(cutoff, batch_size, &attempted).await?;

			if batch.is_all_filtered() {
				tracing::warn!(
					returned = batch.returned,
					attempted = attempted.len(),
					"Every record the store returned was filtered out; stopping."
				);

				return Ok(StopReason::NoProgress);
			}
			if batch.records.is_empty() {
				return Ok(StopReason::Exhausted);
			}

			let returned = batch.returned;
			let report = self.process_batch(batch.records).await;

			tally.absorb(&report);
			attempted.extend(report.unpurged.iter().copied());

			if self.purge.dry_run {
				return Ok(StopReason::DryRun);
			}
			if returned < batch_size as usize {
				return Ok(StopReason::Exhausted);
			}
		}
	}
}
