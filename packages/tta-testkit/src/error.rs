pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid {var}: {message}")]
	InvalidDsn { var: &'static str, message: String },

	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
}
