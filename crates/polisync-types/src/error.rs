//! Error taxonomy shared by the engine and store adapters.

use std::fmt;

pub type PsResult<T> = Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
	/// A cross-field rule rejected the settings tree before anything was sent
	ValidationError(String),
	/// A flat-namespace value did not have the shape the settings tree expects
	MalformedSettings { path: Box<str>, detail: Box<str> },
	/// No link with the given id exists in the server-held ordered list
	LinkNotFound(Box<str>),
	/// A reorder supplied a different number of ids than the server list holds
	CardinalityMismatch { expected: usize, actual: usize },
	/// The store rejected a stale revision stamp; restart from a fresh fetch
	ConcurrentModification,
	/// The settings document does not exist on the remote side
	NotFound,
	/// Opaque failure reported by the store collaborator, never interpreted
	StoreError(String),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::ValidationError(msg) => write!(f, "validation failed: {}", msg),
			Error::MalformedSettings { path, detail } => {
				write!(f, "malformed setting at {}: {}", path, detail)
			}
			Error::LinkNotFound(id) => write!(f, "no policy link with id {}", id),
			Error::CardinalityMismatch { expected, actual } => write!(
				f,
				"reorder id set has {} entries but the server list has {}",
				actual, expected
			),
			Error::ConcurrentModification => {
				write!(f, "revision stamp is stale: a concurrent writer won the race")
			}
			Error::NotFound => write!(f, "settings document not found"),
			Error::StoreError(msg) => write!(f, "store error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

// vim: ts=4
