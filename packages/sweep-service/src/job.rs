use time::OffsetDateTime;

use crate::{BoxFuture, PurgeSummary, SweepService};

/// A job invoked on a timer with no input, returning a summary of what it did.
pub trait ScheduledJob
where
	Self: Send + Sync,
{
	fn name(&self) -> &'static str;

	fn invoke(&self) -> BoxFuture<'_, PurgeSummary>;
}

impl ScheduledJob for SweepService {
	fn name(&self) -> &'static str {
		"purge-trash"
	}

	fn invoke(&self) -> BoxFuture<'_, PurgeSummary> {
		Box::pin(self.run_purge(OffsetDateTime::now_utc()))
	}
}
