use moodlog_domain::FilterError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Unauthenticated: {message}")]
	Unauthenticated { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<moodlog_storage::Error> for Error {
	fn from(err: moodlog_storage::Error) -> Self {
		match err {
			moodlog_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			moodlog_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
		}
	}
}

impl From<FilterError> for Error {
	fn from(err: FilterError) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}
