pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Expiry query failed: {message}")]
	Query { message: String },
}
impl From<sweep_config::Error> for Error {
	fn from(err: sweep_config::Error) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}
