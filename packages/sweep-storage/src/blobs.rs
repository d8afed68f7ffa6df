use std::sync::Arc;

use object_store::{ObjectStore, path::Path};
use url::Url;

use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlobDeletion {
	Deleted,
	/// The store reported the object as missing. Deletes are idempotent, so this counts as done.
	AlreadyAbsent,
}

/// Attachment blob store rooted at a fixed prefix. Storage paths recorded on attachments are
/// resolved relative to that prefix.
#[derive(Clone)]
pub struct BlobStorage {
	store: Arc<dyn ObjectStore>,
	prefix: Path,
}
impl BlobStorage {
	pub fn new(store: Arc<dyn ObjectStore>) -> Self {
		Self { store, prefix: Path::default() }
	}

	pub fn with_prefix(store: Arc<dyn ObjectStore>, prefix: Path) -> Self {
		Self { store, prefix }
	}

	pub fn from_config(cfg: &sweep_config::Blobs) -> Result<Self> {
		let url = Url::parse(&cfg.url)
			.map_err(|source| Error::InvalidBlobUrl { url: cfg.url.clone(), source })?;
		let (store, prefix) = object_store::parse_url(&url)?;

		tracing::debug!(scheme = url.scheme(), prefix = %prefix, "Opened blob store.");

		Ok(Self { store: Arc::from(store), prefix })
	}

	pub fn store(&self) -> &Arc<dyn ObjectStore> {
		&self.store
	}

	pub fn resolve(&self, storage_path: &str) -> Result<Path> {
		let relative = Path::parse(storage_path).map_err(|err| {
			Error::InvalidArgument(format!("Invalid storage path {storage_path:?}: {err}."))
		})?;

		if relative.as_ref().is_empty() {
			return Err(Error::InvalidArgument("Storage path must be non-empty.".to_string()));
		}

		Ok(self.prefix.parts().chain(relative.parts()).collect())
	}

	pub async fn delete(&self, storage_path: &str) -> Result<BlobDeletion> {
		let location = self.resolve(storage_path)?;

		match self.store.delete(&location).await {
			Ok(()) => Ok(BlobDeletion::Deleted),
			Err(object_store::Error::NotFound { .. }) => Ok(BlobDeletion::AlreadyAbsent),
			Err(err) => Err(err.into()),
		}
	}

	pub async fn exists(&self, storage_path: &str) -> Result<bool> {
		let location = self.resolve(storage_path)?;

		match self.store.head(&location).await {
			Ok(_) => Ok(true),
			Err(object_store::Error::NotFound { .. }) => Ok(false),
			Err(err) => Err(err.into()),
		}
	}
}
