use time::{Date, Duration, OffsetDateTime};

const SECONDS_PER_DAY: i64 = 86_400;

/// Upper bound (inclusive) on `deleted_at` for a record to be purge-eligible. Computed once per
/// run and held constant for its duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cutoff(OffsetDateTime);
impl Cutoff {
	pub fn at(ts: OffsetDateTime) -> Self {
		Self(ts)
	}

	pub fn timestamp(self) -> OffsetDateTime {
		self.0
	}
}

/// `now - retention_days`, clamped to the earliest representable instant instead of overflowing.
pub fn compute_cutoff(now: OffsetDateTime, retention_days: i64) -> Cutoff {
	let retention = Duration::seconds(retention_days.saturating_mul(SECONDS_PER_DAY));

	Cutoff(now.checked_sub(retention).unwrap_or_else(|| Date::MIN.midnight().assume_utc()))
}

pub fn is_purge_eligible(deleted_at: Option<OffsetDateTime>, cutoff: Cutoff) -> bool {
	match deleted_at {
		Some(deleted_at) => deleted_at <= cutoff.0,
		None => false,
	}
}
