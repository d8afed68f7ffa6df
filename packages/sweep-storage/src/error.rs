#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Invalid blob store url {url:?}.")]
	InvalidBlobUrl { url: String, source: url::ParseError },
	#[error(transparent)]
	ObjectStore(#[from] Box<object_store::Error>),
}
impl From<object_store::Error> for Error {
	fn from(err: object_store::Error) -> Self {
		Self::ObjectStore(Box::new(err))
	}
}
