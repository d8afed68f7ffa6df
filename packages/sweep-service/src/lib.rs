//! Retention purge pipeline.
//!
//! A run computes one cutoff, then repeatedly fetches a batch of expired records across all
//! tenants, reaps each record's attachment blobs, deletes the record, and stops when the store is
//! drained or a spin guard trips. Nothing is tracked between runs: eligibility is derived from
//! stored state, and every delete is idempotent, so an interrupted run is resumed by the next one.

pub mod batch;
pub mod job;
pub mod planner;
pub mod purger;
pub mod reaper;
pub mod run;
pub mod time_serde;

mod error;

pub use batch::BatchReport;
pub use planner::ExpiredBatch;
pub use error::{Error, Result};
pub use job::ScheduledJob;
pub use purger::PurgeOutcome;
pub use reaper::ReapReport;
pub use run::{PurgeSummary, StopReason};
pub use sweep_storage::blobs::BlobDeletion;

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

use sweep_config::Purge;
use sweep_domain::{Cutoff, TrashRecord};
use sweep_storage::{blobs::BlobStorage, db::Db, records};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Structured document store holding trashable records.
pub trait RecordStore
where
	Self: Send + Sync,
{
	/// Returns at most `batch_size` records with `deleted_at <= cutoff`, from any tenant, leaving
	/// out the ids in `exclude`.
	fn fetch_expired_batch<'a>(
		&'a self,
		cutoff: Cutoff,
		batch_size: u32,
		exclude: &'a [Uuid],
	) -> BoxFuture<'a, color_eyre::Result<Vec<TrashRecord>>>;

	/// Deletes a record by id. Deleting a record that no longer exists succeeds.
	fn delete_record<'a>(&'a self, record_id: Uuid) -> BoxFuture<'a, color_eyre::Result<()>>;
}

/// Unstructured store holding attachment blobs.
pub trait BlobStore
where
	Self: Send + Sync,
{
	/// Deletes the blob at `storage_path`. A missing blob resolves to
	/// [`BlobDeletion::AlreadyAbsent`], never to an error.
	fn delete_blob<'a>(
		&'a self,
		storage_path: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<BlobDeletion>>;
}

pub struct SweepService {
	pub purge: Purge,
	pub records: Arc<dyn RecordStore>,
	pub blobs: Arc<dyn BlobStore>,
}
impl SweepService {
	pub fn new(purge: Purge, records: Arc<dyn RecordStore>, blobs: Arc<dyn BlobStore>) -> Result<Self> {
		sweep_config::validate_purge(&purge)?;

		Ok(Self { purge, records, blobs })
	}

	pub fn from_storage(purge: Purge, db: Db, blobs: BlobStorage) -> Result<Self> {
		Self::new(purge, Arc::new(db), Arc::new(blobs))
	}

	pub(crate) fn concurrency_limit(&self) -> usize {
		let batch_size = self.purge.batch_size as usize;

		self.purge.max_concurrency.map(|limit| limit.min(batch_size)).unwrap_or(batch_size).max(1)
	}
}

impl RecordStore for Db {
	fn fetch_expired_batch<'a>(
		&'a self,
		cutoff: Cutoff,
		batch_size: u32,
		exclude: &'a [Uuid],
	) -> BoxFuture<'a, color_eyre::Result<Vec<TrashRecord>>> {
		Box::pin(async move {
			Ok(records::fetch_expired_batch(&self.pool, cutoff, batch_size, exclude).await?)
		})
	}

	fn delete_record<'a>(&'a self, record_id: Uuid) -> BoxFuture<'a, color_eyre::Result<()>> {
		Box::pin(async move {
			if !records::delete_record(&self.pool, record_id).await? {
				tracing::debug!(record_id = %record_id, "Record was already gone.");
			}

			Ok(())
		})
	}
}

impl BlobStore for BlobStorage {
	fn delete_blob<'a>(
		&'a self,
		storage_path: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<BlobDeletion>> {
		Box::pin(async move { Ok(self.delete(storage_path).await?) })
	}
}
