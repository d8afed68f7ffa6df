use futures::{StreamExt, stream};
use serde::Serialize;
use uuid::Uuid;

use sweep_config::AttachmentFailurePolicy;
use sweep_domain::TrashRecord;

use crate::{PurgeOutcome, ReapReport, SweepService};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
	pub records: usize,
	pub purged: usize,
	/// Records whose delete failed.
	pub errors: usize,
	/// Records kept because an attachment could not be deleted under
	/// [`AttachmentFailurePolicy::KeepRecord`].
	pub deferred: usize,
	pub attachments_deleted: usize,
	pub attachments_already_absent: usize,
	pub attachments_skipped: usize,
	pub attachment_warnings: usize,
	/// Ids of records that are still stored after this batch, failed or deferred.
	#[serde(skip)]
	pub unpurged: Vec<Uuid>,
}
impl BatchReport {
	fn absorb(&mut self, unit: RecordUnit) {
		self.records += 1;
		self.attachments_deleted += unit.reap.deleted;
		self.attachments_already_absent += unit.reap.already_absent;
		self.attachments_skipped += unit.reap.skipped;
		self.attachment_warnings += unit.reap.warnings;

		match unit.status {
			RecordStatus::Purged => self.purged += 1,
			RecordStatus::Failed => {
				self.errors += 1;
				self.unpurged.push(unit.record_id);
			},
			RecordStatus::Deferred => {
				self.deferred += 1;
				self.unpurged.push(unit.record_id);
			},
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RecordStatus {
	Purged,
	Failed,
	Deferred,
}

struct RecordUnit {
	record_id: Uuid,
	reap: ReapReport,
	status: RecordStatus,
}

impl SweepService {
	/// Runs reap-then-purge for every record in the batch, concurrently and independently. The
	/// outcome of one record never affects whether another is attempted.
	pub async fn process_batch(&self, records: Vec<TrashRecord>) -> BatchReport {
		let limit = self.concurrency_limit();
		let units = stream::iter(records)
			.map(|record| async move { self.process_record(&record).await })
			.buffer_unordered(limit)
			.collect::<Vec<_>>()
			.await;
		let mut report = BatchReport::default();

		for unit in units {
			report.absorb(unit);
		}

		tracing::info!(
			records = report.records,
			purged = report.purged,
			errors = report.errors,
			deferred = report.deferred,
			attachments_deleted = report.attachments_deleted,
			attachment_warnings = report.attachment_warnings,
			"Processed purge batch."
		);

		report
	}

	async fn process_record(&self, record: &TrashRecord) -> RecordUnit {
		let reap = self.reap_attachments(record).await;

		if !reap.is_complete()
			&& self.purge.attachment_failure == AttachmentFailurePolicy::KeepRecord
		{
			tracing::warn!(
				record_id = %record.record_id,
				tenant_id = %record.tenant_id,
				attachment_warnings = reap.warnings,
				"Kept record because some attachments could not be deleted."
			);

			return RecordUnit {
				record_id: record.record_id,
				reap,
				status: RecordStatus::Deferred,
			};
		}

		let status = match self.purge_record(record).await {
			PurgeOutcome::Purged => RecordStatus::Purged,
			PurgeOutcome::Failed => RecordStatus::Failed,
		};

		RecordUnit { record_id: record.record_id, reap, status }
	}
}
