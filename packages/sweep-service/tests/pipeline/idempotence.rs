use sweep_domain::AttachmentRef;

use super::{MemoryBlobStore, MemoryRecordStore, now, purge_config, service, trashed};

#[tokio::test]
async fn second_run_deletes_nothing() {
	let expired = (0..25)
		.map(|idx| {
			trashed("tenant-a", 40, vec![AttachmentRef::with_path(format!("tenant-a/{idx}.bin"))])
		})
		.collect::<Vec<_>>();
	let paths = (0..25).map(|idx| format!("tenant-a/{idx}.bin")).collect::<Vec<_>>();
	let records = MemoryRecordStore::with_records(expired);
	let blobs = MemoryBlobStore::with_blobs(paths.iter().map(String::as_str));
	let sweep = service(purge_config(10), &records, &blobs);
	let first = sweep.run_purge(now()).await;
	let second = sweep.run_purge(now()).await;

	assert_eq!(first.deleted_records, 25);
	assert_eq!(first.deleted_attachments, 25);
	assert!(second.success);
	assert_eq!(second.deleted_records, 0);
	assert_eq!(second.deleted_attachments, 0);
	assert_eq!(second.batches, 0);
	assert_eq!(records.len(), 0);
}
