use std::time::Duration as StdDuration;

use sweep_config::{AttachmentFailurePolicy, Purge};
use sweep_domain::AttachmentRef;

use super::{MemoryBlobStore, MemoryRecordStore, now, purge_config, service, trashed};

#[tokio::test]
async fn blob_failure_does_not_block_other_attachments_or_records() {
	let broken = trashed(
		"tenant-a",
		40,
		vec![
			AttachmentRef::with_path("tenant-a/locked.png"),
			AttachmentRef::with_path("tenant-a/free.png"),
		],
	);
	let healthy = trashed("tenant-b", 40, vec![AttachmentRef::with_path("tenant-b/free.png")]);
	let (broken_id, healthy_id) = (broken.record_id, healthy.record_id);
	let records = MemoryRecordStore::with_records([broken, healthy]);
	let blobs =
		MemoryBlobStore::with_blobs(["tenant-a/locked.png", "tenant-a/free.png", "tenant-b/free.png"]);

	blobs.fail_on("tenant-a/locked.png");

	let summary = service(purge_config(500), &records, &blobs).run_purge(now()).await;

	assert!(summary.success);
	assert_eq!(summary.attachment_warnings, 1);
	assert_eq!(summary.deleted_attachments, 2);
	assert_eq!(summary.deleted_records, 2);
	assert!(!records.contains(broken_id));
	assert!(!records.contains(healthy_id));
	assert!(blobs.contains("tenant-a/locked.png"));
	assert!(!blobs.contains("tenant-a/free.png"));
	assert!(!blobs.contains("tenant-b/free.png"));
}

#[tokio::test]
async fn keep_record_policy_defers_records_with_failed_attachments() {
	let broken = trashed(
		"tenant-a",
		40,
		vec![
			AttachmentRef::with_path("tenant-a/locked.png"),
			AttachmentRef::with_path("tenant-a/free.png"),
		],
	);
	let healthy = trashed("tenant-b", 40, vec![AttachmentRef::with_path("tenant-b/free.png")]);
	let (broken_id, healthy_id) = (broken.record_id, healthy.record_id);
	let records = MemoryRecordStore::with_records([broken, healthy]);
	let blobs =
		MemoryBlobStore::with_blobs(["tenant-a/locked.png", "tenant-a/free.png", "tenant-b/free.png"]);
	let purge = Purge {
		attachment_failure: AttachmentFailurePolicy::KeepRecord,
		..purge_config(500)
	};

	blobs.fail_on("tenant-a/locked.png");

	let summary = service(purge, &records, &blobs).run_purge(now()).await;

	assert!(summary.success);
	assert_eq!(summary.deferred_records, 1);
	assert_eq!(summary.deleted_records, 1);
	assert_eq!(summary.attachment_warnings, 1);
	assert!(records.contains(broken_id));
	assert!(!records.contains(healthy_id));
	assert!(!blobs.contains("tenant-a/free.png"));
}

#[tokio::test]
async fn record_delete_failure_is_retried_by_the_next_run() {
	let stuck = trashed("tenant-a", 40, Vec::new());
	let stuck_id = stuck.record_id;
	let others = (0..4).map(|_| trashed("tenant-b", 40, Vec::new())).collect::<Vec<_>>();
	let records = MemoryRecordStore::with_records(others.into_iter().chain([stuck]));
	let blobs = MemoryBlobStore::with_blobs([]);
	let sweep = service(purge_config(500), &records, &blobs);

	records.fail_delete(stuck_id);

	let first = sweep.run_purge(now()).await;

	assert!(first.success);
	assert_eq!(first.deleted_records, 4);
	assert_eq!(first.record_failures, 1);
	assert!(records.contains(stuck_id));

	records.heal_delete(stuck_id);

	let second = sweep.run_purge(now()).await;

	assert_eq!(second.deleted_records, 1);
	assert_eq!(second.record_failures, 0);
	assert!(!records.contains(stuck_id));
}

#[tokio::test]
async fn record_work_respects_the_concurrency_limit() {
	let expired = (0..12).map(|_| trashed("tenant-a", 40, Vec::new())).collect::<Vec<_>>();
	let records = MemoryRecordStore::with_records(expired);
	let blobs = MemoryBlobStore::with_blobs([]);
	let purge = Purge { max_concurrency: Some(3), ..purge_config(50) };

	records.slow_deletes(StdDuration::from_millis(10));

	let summary = service(purge, &records, &blobs).run_purge(now()).await;

	assert_eq!(summary.deleted_records, 12);
	assert!(records.max_in_flight() <= 3, "Saw {} concurrent deletes.", records.max_in_flight());
	assert!(records.max_in_flight() > 1);
}
