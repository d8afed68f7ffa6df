use serde::Deserialize;

pub const DEFAULT_RETENTION_DAYS: i64 = 30;
pub const MAX_RETENTION_DAYS: i64 = 36_500;
pub const DEFAULT_BATCH_SIZE: u32 = 500;
pub const MAX_BATCH_SIZE: u32 = 10_000;
pub const DEFAULT_MAX_BATCHES: u32 = 100;
pub const DEFAULT_MAX_RUN_SECONDS: u64 = 480;
pub const DEFAULT_INTERVAL_HOURS: u64 = 12;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub purge: Purge,
	#[serde(default)]
	pub schedule: Schedule,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub blobs: Blobs,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Blobs {
	/// Object store location, e.g. `file:///var/lib/sweep/blobs`, `s3://bucket/prefix` or
	/// `memory:///`.
	pub url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Purge {
	#[serde(default = "default_retention_days")]
	pub retention_days: i64,
	#[serde(default = "default_batch_size")]
	pub batch_size: u32,
	/// Upper bound on records processed concurrently within one batch. Defaults to the batch size.
	#[serde(default)]
	pub max_concurrency: Option<usize>,
	#[serde(default = "default_max_batches")]
	pub max_batches: u32,
	#[serde(default = "default_max_run_seconds")]
	pub max_run_seconds: u64,
	#[serde(default)]
	pub attachment_failure: AttachmentFailurePolicy,
	#[serde(default)]
	pub dry_run: bool,
}
impl Default for Purge {
	fn default() -> Self {
		Self {
			retention_days: DEFAULT_RETENTION_DAYS,
			batch_size: DEFAULT_BATCH_SIZE,
			max_concurrency: None,
			max_batches: DEFAULT_MAX_BATCHES,
			max_run_seconds: DEFAULT_MAX_RUN_SECONDS,
			attachment_failure: AttachmentFailurePolicy::default(),
			dry_run: false,
		}
	}
}

/// What to do with a record when one of its blobs could not be deleted for a reason other than
/// "not found".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentFailurePolicy {
	/// Delete the record anyway. The blob is left orphaned.
	#[default]
	PurgeRecord,
	/// Keep the record so a later run retries the blob.
	KeepRecord,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Schedule {
	#[serde(default = "default_interval_hours")]
	pub interval_hours: u64,
}
impl Default for Schedule {
	fn default() -> Self {
		Self { interval_hours: DEFAULT_INTERVAL_HOURS }
	}
}

fn default_retention_days() -> i64 {
	DEFAULT_RETENTION_DAYS
}

fn default_batch_size() -> u32 {
	DEFAULT_BATCH_SIZE
}

fn default_max_batches() -> u32 {
	DEFAULT_MAX_BATCHES
}

fn default_max_run_seconds() -> u64 {
	DEFAULT_MAX_RUN_SECONDS
}

fn default_interval_hours() -> u64 {
	DEFAULT_INTERVAL_HOURS
}
