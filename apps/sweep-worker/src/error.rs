use sweep_service::StopReason;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Purge run did not complete: {stop_reason:?}.")]
	RunFailed { stop_reason: StopReason },
}
