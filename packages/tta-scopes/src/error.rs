pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Programming errors in a component adjacent to the compiler.
///
/// Untrusted filter input never produces one of these; it degrades to a dropped or neutral entry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid filter values: {message}")]
	InvalidFilterValues { message: String },

	#[error("Malformed filter key {key:?}; expected <topic>.<condition>.")]
	MalformedKey { key: String },

	#[error("Unknown entity family {name:?}.")]
	UnknownFamily { name: String },
}
