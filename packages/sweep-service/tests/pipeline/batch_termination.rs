use std::sync::atomic::Ordering;

use sweep_service::StopReason;

use super::{MemoryBlobStore, MemoryRecordStore, now, purge_config, service, trashed};

fn expired_records(count: usize) -> std::sync::Arc<MemoryRecordStore> {
	MemoryRecordStore::with_records((0..count).map(|_| trashed("tenant-a", 31, Vec::new())))
}

#[tokio::test]
async fn short_final_batch_ends_the_run() {
	let records = expired_records(1_200);
	let blobs = MemoryBlobStore::with_blobs([]);
	let summary = service(purge_config(500), &records, &blobs).run_purge(now()).await;

	assert_eq!(records.fetch_sizes(), vec![500, 500, 200]);
	assert_eq!(summary.deleted_records, 1_200);
	assert_eq!(summary.batches, 3);
	assert_eq!(summary.stop_reason, StopReason::Exhausted);
	assert_eq!(records.delete_calls.load(Ordering::SeqCst), 1_200);
	assert_eq!(records.len(), 0);
}

#[tokio::test]
async fn exact_multiple_ends_on_an_empty_batch() {
	let records = expired_records(1_000);
	let blobs = MemoryBlobStore::with_blobs([]);
	let summary = service(purge_config(500), &records, &blobs).run_purge(now()).await;

	assert_eq!(records.fetch_sizes(), vec![500, 500, 0]);
	assert_eq!(summary.deleted_records, 1_000);
	assert_eq!(summary.batches, 2);
	assert_eq!(summary.stop_reason, StopReason::Exhausted);
}
