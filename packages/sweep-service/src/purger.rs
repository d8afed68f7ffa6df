use sweep_domain::TrashRecord;

use crate::SweepService;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PurgeOutcome {
	Purged,
	/// The record is still stored and stays eligible for the next run.
	Failed,
}

impl SweepService {
	/// Deletes the record itself. Callers run [`SweepService::reap_attachments`] first.
	pub async fn purge_record(&self, record: &TrashRecord) -> PurgeOutcome {
		if self.purge.dry_run {
			tracing::info!(
				record_id = %record.record_id,
				tenant_id = %record.tenant_id,
				kind = %record.kind,
				"[DRY-RUN] Would delete record."
			);

			return PurgeOutcome::Purged;
		}

		match self.records.delete_record(record.record_id).await {
			Ok(()) => {
				tracing::debug!(record_id = %record.record_id, "Purged record.");

				PurgeOutcome::Purged
			},
			Err(err) => {
				tracing::error!(
					record_id = %record.record_id,
					tenant_id = %record.tenant_id,
					error = %err,
					"Failed to delete record; it will be retried on the next run."
				);

				PurgeOutcome::Failed
			},
		}
	}
}
