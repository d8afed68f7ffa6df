use sqlx::{PgExecutor, types::Json};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, models::TrashRecordRow};
use sweep_domain::{Cutoff, TrashRecord};

/// Cross-tenant scan for soft-deleted records at or before `cutoff`, skipping the ids in
/// `exclude`. No ordering is imposed; any expired record is a valid target.
pub async fn fetch_expired_batch<'e, E>(
	executor: E,
	cutoff: Cutoff,
	batch_size: u32,
	exclude: &[Uuid],
) -> Result<Vec<TrashRecord>>
where
	E: PgExecutor<'e>,
{
	if batch_size == 0 {
		return Err(Error::InvalidArgument("batch_size must be greater than zero.".to_string()));
	}

	let rows: Vec<TrashRecordRow> = sqlx::query_as(
		"\
SELECT record_id, tenant_id, kind, deleted_at, attachments
FROM trash_records
WHERE deleted_at IS NOT NULL AND deleted_at <= $1 AND record_id <> ALL($3)
LIMIT $2",
	)
	.bind(cutoff.timestamp())
	.bind(i64::from(batch_size))
	.bind(exclude)
	.fetch_all(executor)
	.await?;

	Ok(rows.into_iter().map(TrashRecord::from).collect())
}

/// Deletes one record by id. Returns whether a row was removed; a missing row is not an error.
pub async fn delete_record<'e, E>(executor: E, record_id: Uuid) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query("DELETE FROM trash_records WHERE record_id = $1")
		.bind(record_id)
		.execute(executor)
		.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn insert_record<'e, E>(executor: E, record: &TrashRecord) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO trash_records (record_id, tenant_id, kind, deleted_at, attachments)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(record.record_id)
	.bind(record.tenant_id.as_str())
	.bind(record.kind.as_str())
	.bind(record.deleted_at)
	.bind(Json(&record.attachments))
	.execute(executor)
	.await?;

	Ok(())
}

/// Marks a record as soft-deleted. Leaves an existing `deleted_at` untouched.
pub async fn soft_delete_record<'e, E>(
	executor: E,
	record_id: Uuid,
	deleted_at: OffsetDateTime,
) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"UPDATE trash_records SET deleted_at = $1 WHERE record_id = $2 AND deleted_at IS NULL",
	)
	.bind(deleted_at)
	.bind(record_id)
	.execute(executor)
	.await?;

	Ok(result.rows_affected() > 0)
}

pub async fn record_exists<'e, E>(executor: E, record_id: Uuid) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let exists: bool =
		sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM trash_records WHERE record_id = $1)")
			.bind(record_id)
			.fetch_one(executor)
			.await?;

	Ok(exists)
}
