//! Error types shared across the engine and adapters.

pub type TlResult<T> = std::result::Result<T, Error>;

/// Errors produced by the settings engine and store adapters.
///
/// Validation errors carry enough structure for callers to surface the
/// offending key directly. Adapter-level database failures are logged at the
/// adapter and collapsed into `DbError`.
#[derive(Debug)]
pub enum Error {
	/// A candidate value does not match the declared type of its setting.
	TypeMismatch { key: Box<str>, expected: &'static str, actual: &'static str },
	/// A candidate value has the right type but fails the setting's condition.
	InvalidValue { key: Box<str>, message: Box<str> },
	/// Persisted settings could not be migrated into a valid configuration.
	/// Fatal at startup.
	CorruptedState(Box<str>),
	/// Lookup of a key that has no registered definition. Indicates a
	/// programming error, not a recoverable condition.
	UnknownKey(Box<str>),
	/// Registry misuse, e.g. duplicate registration or an incomplete builder.
	ConfigError(Box<str>),
	/// A reported status timestamp could not be parsed.
	BadTimestamp(Box<str>),
	NotFound,
	DbError,

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::TypeMismatch { key, expected, actual } => {
				write!(f, "{key} has to be a \"{expected}\" but \"{actual}\" was given")
			}
			Error::InvalidValue { key, message } => write!(f, "{key} has to be {message}"),
			Error::CorruptedState(msg) => write!(f, "corrupted persisted settings: {msg}"),
			Error::UnknownKey(key) => write!(f, "unknown setting key: {key}"),
			Error::ConfigError(msg) => write!(f, "configuration error: {msg}"),
			Error::BadTimestamp(raw) => write!(f, "invalid timestamp: {raw}"),
			Error::NotFound => write!(f, "not found"),
			Error::DbError => write!(f, "database error"),
			Error::Io(err) => write!(f, "io error: {err}"),
		}
	}
}

impl std::error::Error for Error {}

// vim: ts=4
