use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use sweep_domain::{AttachmentRef, TrashRecord};

#[derive(Debug, sqlx::FromRow)]
pub struct TrashRecordRow {
	pub record_id: Uuid,
	pub tenant_id: String,
	pub kind: String,
	pub deleted_at: Option<OffsetDateTime>,
	pub attachments: Json<Vec<AttachmentRef>>,
}
impl From<TrashRecordRow> for TrashRecord {
	fn from(row: TrashRecordRow) -> Self {
		Self {
			record_id: row.record_id,
			tenant_id: row.tenant_id,
			kind: row.kind,
			deleted_at: row.deleted_at,
			attachments: row.attachments.0,
		}
	}
}
