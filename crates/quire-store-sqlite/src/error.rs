//! Error type for `quire-store-sqlite`.

use quire_core::merge::MergeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] quire_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {kind}: {value:?}")]
  UnknownVariant { kind: &'static str, value: String },

  #[error("value out of range for column {0}")]
  OutOfRange(&'static str),
}

impl From<MergeError<Error>> for Error {
  fn from(e: MergeError<Error>) -> Self {
    match e {
      MergeError::Rejected(e) => Error::Core(e),
      MergeError::Store(e) => e,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
