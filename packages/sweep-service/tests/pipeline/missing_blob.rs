use std::sync::{Arc, atomic::Ordering};

use object_store::{ObjectStore, PutPayload, memory::InMemory, path::Path};

use sweep_domain::AttachmentRef;
use sweep_service::SweepService;
use sweep_storage::blobs::BlobStorage;

use super::{MemoryBlobStore, MemoryRecordStore, now, purge_config, service, trashed};

#[tokio::test]
async fn missing_blob_still_purges_the_record_without_warnings() {
	let record = trashed(
		"tenant-a",
		60,
		vec![
			AttachmentRef::with_path("tenant-a/already-gone.png"),
			AttachmentRef::with_path("tenant-a/present.png"),
		],
	);
	let id = record.record_id;
	let records = MemoryRecordStore::with_records([record.clone()]);
	let blobs = MemoryBlobStore::with_blobs(["tenant-a/present.png"]);
	let sweep = service(purge_config(500), &records, &blobs);
	let reap = sweep.reap_attachments(&record).await;

	assert_eq!(reap.deleted, 2);
	assert_eq!(reap.already_absent, 1);
	assert_eq!(reap.warnings, 0);

	let summary = sweep.run_purge(now()).await;

	assert!(!records.contains(id));
	assert_eq!(summary.deleted_records, 1);
	assert_eq!(summary.attachment_warnings, 0);
}

#[tokio::test]
async fn url_only_attachments_are_skipped() {
	let record = trashed(
		"tenant-a",
		60,
		vec![
			AttachmentRef::url_only("https://cdn.example.com/shared.png"),
			AttachmentRef::with_path("  "),
			AttachmentRef::with_path("tenant-a/own.png"),
		],
	);
	let records = MemoryRecordStore::with_records([record.clone()]);
	let blobs = MemoryBlobStore::with_blobs(["tenant-a/own.png"]);
	let sweep = service(purge_config(500), &records, &blobs);
	let reap = sweep.reap_attachments(&record).await;

	assert_eq!(reap.skipped, 2);
	assert_eq!(reap.deleted, 1);
	assert_eq!(reap.warnings, 0);
	assert_eq!(blobs.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn object_store_adapter_purges_blobs() {
	let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
	let record = trashed(
		"tenant-a",
		60,
		vec![
			AttachmentRef::with_path("tenant-a/a.txt"),
			AttachmentRef::with_path("tenant-a/missing.txt"),
		],
	);

	store
		.put(&Path::from("uploads/tenant-a/a.txt"), PutPayload::from_static(b"a"))
		.await
		.expect("Failed to seed blob.");

	let records = MemoryRecordStore::with_records([record]);
	let blobs = BlobStorage::with_prefix(store.clone(), Path::from("uploads"));
	let sweep = SweepService::new(purge_config(500), records.clone(), Arc::new(blobs))
		.expect("Purge config must be valid.");
	let summary = sweep.run_purge(now()).await;

	assert_eq!(summary.deleted_records, 1);
	assert_eq!(summary.deleted_attachments, 2);
	assert_eq!(summary.attachment_warnings, 0);
	assert!(store.head(&Path::from("uploads/tenant-a/a.txt")).await.is_err());
}

#[tokio::test]
async fn invalid_and_blank_locators_warn_or_skip_but_never_block_the_record() {
	let store: Arc<dyn ObjectStore> = Arc::new(InMemory::new());
	let record = trashed(
		"tenant-a",
		60,
		vec![
			AttachmentRef::with_path("../outside/secret.txt"),
			AttachmentRef::with_path(" \t "),
			AttachmentRef::with_path(""),
			AttachmentRef::with_path("tenant-a/kept.txt"),
		],
	);
	let id = record.record_id;

	store
		.put(&Path::from("tenant-a/kept.txt"), PutPayload::from_static(b"k"))
		.await
		.expect("Failed to seed blob.");

	let records = MemoryRecordStore::with_records([record.clone()]);
	let blobs = BlobStorage::new(store.clone());
	let sweep = SweepService::new(purge_config(500), records.clone(), Arc::new(blobs))
		.expect("Purge config must be valid.");
	let reap = sweep.reap_attachments(&record).await;

	assert_eq!(reap.warnings, 1);
	assert_eq!(reap.skipped, 2);
	assert_eq!(reap.deleted, 1);
	assert!(store.head(&Path::from("tenant-a/kept.txt")).await.is_err());

	let summary = sweep.run_purge(now()).await;

	assert!(summary.success);
	assert_eq!(summary.attachment_warnings, 1);
	assert_eq!(summary.deleted_records, 1);
	assert!(!records.contains(id));
}
