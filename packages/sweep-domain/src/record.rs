use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::retention::{Cutoff, is_purge_eligible};

/// A user-content document that supports soft deletion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrashRecord {
	pub record_id: Uuid,
	pub tenant_id: String,
	pub kind: String,
	pub deleted_at: Option<OffsetDateTime>,
	#[serde(default)]
	pub attachments: Vec<AttachmentRef>,
}
impl TrashRecord {
	pub fn is_eligible(&self, cutoff: Cutoff) -> bool {
		is_purge_eligible(self.deleted_at, cutoff)
	}
}

/// Pointer to a blob stored outside the record. URL-only references carry no storage path and are
/// never deleted by the purge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
	#[serde(default)]
	pub storage_path: Option<String>,
	#[serde(default)]
	pub url: Option<String>,
}
impl AttachmentRef {
	pub fn with_path(storage_path: impl Into<String>) -> Self {
		Self { storage_path: Some(storage_path.into()), url: None }
	}

	pub fn url_only(url: impl Into<String>) -> Self {
		Self { storage_path: None, url: Some(url.into()) }
	}

	/// The trimmed storage path, if this reference can be deleted.
	pub fn deletable_path(&self) -> Option<&str> {
		self.storage_path.as_deref().map(str::trim).filter(|path| !path.is_empty())
	}
}
