//! Error types for `quire-core`.

use thiserror::Error;

use crate::user::UserId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("user not found: {0}")]
  UserNotFound(UserId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
