use serde::Serialize;

use sweep_domain::TrashRecord;

use crate::{BlobDeletion, SweepService};

/// Outcome of deleting one record's attachment blobs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReapReport {
	/// Blobs that are gone after this call, including ones that were already missing.
	pub deleted: usize,
	pub already_absent: usize,
	/// References without a storage path.
	pub skipped: usize,
	/// Deletes that failed for any reason other than "not found".
	pub warnings: usize,
}
impl ReapReport {
	pub fn is_complete(&self) -> bool {
		self.warnings == 0
	}
}

impl SweepService {
	/// Deletes every deletable attachment of `record`, in order. Never fails: a missing blob counts
	/// as deleted, and any other failure is logged, counted as a warning, and does not stop the
	/// remaining attachments.
	pub async fn reap_attachments(&self, record: &TrashRecord) -> ReapReport {
		let mut report = ReapReport::default();

		for (index, attachment) in record.attachments.iter().enumerate() {
			let Some(storage_path) = attachment.deletable_path() else {
				tracing::debug!(
					record_id = %record.record_id,
					index,
					"Attachment has no storage path; skipping."
				);

				report.skipped += 1;

				continue;
			};

			if self.purge.dry_run {
				tracing::info!(
					record_id = %record.record_id,
					storage_path,
					"[DRY-RUN] Would delete attachment."
				);

				report.deleted += 1;

				continue;
			}

			match self.blobs.delete_blob(storage_path).await {
				Ok(BlobDeletion::Deleted) => {
					report.deleted += 1;
				},
				Ok(BlobDeletion::AlreadyAbsent) => {
					tracing::debug!(
						record_id = %record.record_id,
						storage_path,
						"Attachment already absent."
					);

					report.deleted += 1;
					report.already_absent += 1;
				},
				Err(err) => {
					tracing::warn!(
						record_id = %record.record_id,
						tenant_id = %record.tenant_id,
						storage_path,
						error = %err,
						"Failed to delete attachment."
					);

					report.warnings += 1;
				},
			}
		}

		report
	}
}
