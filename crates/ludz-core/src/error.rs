//! Error types for `ludz-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Blank or malformed input, or an unknown tier.
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// A registration collides with an existing record.
  #[error("conflict: {0}")]
  Conflict(String),

  /// A reference to a participant, pub or egg that does not exist.
  #[error("not found: {0}")]
  NotFound(String),

  /// The storage collaborator is unreachable or failed.
  #[error("store unavailable: {0}")]
  Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Wrap a backend error. Uniqueness violations become [`Error::Conflict`];
  /// everything else is [`Error::Unavailable`].
  pub fn from_store<E: crate::store::StoreError>(err: E) -> Self {
    if err.is_conflict() {
      Self::Conflict(err.to_string())
    } else {
      Self::Unavailable(Box::new(err))
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
