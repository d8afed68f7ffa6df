pub mod record;
pub mod retention;

pub use record::{AttachmentRef, TrashRecord};
pub use retention::{Cutoff, compute_cutoff, is_purge_eligible};
