use std::collections::HashSet;

use uuid::Uuid;

use sweep_domain::{Cutoff, TrashRecord};

use crate::{Error, Result, SweepService};

/// One fetch from the record store, after filtering.
#[derive(Debug, Default)]
pub struct ExpiredBatch {
	pub records: Vec<TrashRecord>,
	/// How many records the store returned before filtering.
	pub returned: usize,
}
impl ExpiredBatch {
	/// The store returned records, but every one of them was dropped.
	pub fn is_all_filtered(&self) -> bool {
		self.records.is_empty() && self.returned > 0
	}
}

impl SweepService {
	/// Fetches the next batch of purge-eligible records, leaving out the ids in `exclude`.
	///
	/// A failing query is fatal for the run. Records the store returns that do not satisfy the
	/// cutoff predicate or that are listed in `exclude` are dropped, and the batch is capped at
	/// `batch_size`, so the purge set can never be wider than the predicate allows.
	pub async fn fetch_expired_batch(
		&self,
		cutoff: Cutoff,
		batch_size: u32,
		exclude: &[Uuid],
	) -> Result<ExpiredBatch> {
		if batch_size == 0 {
			return Err(Error::InvalidRequest {
				message: "batch_size must be greater than zero.".to_string(),
			});
		}

		let mut records = self
			.records
			.fetch_expired_batch(cutoff, batch_size, exclude)
			.await
			.map_err(|err| Error::Query { message: format!("{err:#}") })?;
		let returned = records.len();
		let excluded = exclude.iter().collect::<HashSet<_>>();

		records.retain(|record| {
			if !record.is_eligible(cutoff) {
				tracing::warn!(
					record_id = %record.record_id,
					tenant_id = %record.tenant_id,
					"Store returned a record outside the retention cutoff; skipping it."
				);

				return false;
			}
			if excluded.contains(&record.record_id) {
				tracing::warn!(
					record_id = %record.record_id,
					tenant_id = %record.tenant_id,
					"Store returned a record already attempted in this run; skipping it."
				);

				return false;
			}

			true
		});

		if records.len() > batch_size as usize {
			tracing::warn!(
				returned = records.len(),
				batch_size,
				"Store returned more records than requested; truncating."
			);

			records.truncate(batch_size as usize);
		}

		tracing::debug!(
			returned,
			kept = records.len(),
			excluded = exclude.len(),
			cutoff = %cutoff.timestamp(),
			"Fetched expired batch."
		);

		Ok(ExpiredBatch { records, returned })
	}
}
