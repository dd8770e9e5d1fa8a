//! User identities: the accounts that every other record points at.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a user account.
///
/// The nil UUID is never assigned to a real account; it stands in for a
/// missing identifier and is rejected wherever a user is required.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }

  pub fn is_nil(&self) -> bool { self.0.is_nil() }
}

impl Default for UserId {
  fn default() -> Self { Self::new() }
}

impl From<Uuid> for UserId {
  fn from(id: Uuid) -> Self { Self(id) }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub user_id:     UserId,
  pub username:    String,
  pub email:       String,
  pub given_name:  String,
  pub family_name: String,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`AccountStore::add_user`](crate::store::AccountStore::add_user).
/// The id and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
  pub username:    String,
  pub email:       String,
  #[serde(default)]
  pub given_name:  String,
  #[serde(default)]
  pub family_name: String,
}
