//! Records that carry an owning reference to a user.
//!
//! Every record here points at exactly one [`User`](crate::user::User)
//! through its owning column. The merge moves that column from one user to
//! another; nothing else about the record changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserId;

// ─── Capability ──────────────────────────────────────────────────────────────

/// A record with a stable identity and a single owning-user reference.
pub trait OwnedRecord: Clone + Send + Sync + 'static {
  /// Short name of the record kind, used in logs and reports.
  const KIND: &'static str;

  fn record_id(&self) -> Uuid;

  fn owner(&self) -> UserId;

  /// Point the owning reference at `owner`, leaving every other field as is.
  fn set_owner(&mut self, owner: UserId);
}

macro_rules! owned_record {
  ($ty:ty, $kind:literal, id = $id:ident, owner = $owner:ident) => {
    impl $crate::record::OwnedRecord for $ty {
      const KIND: &'static str = $kind;

      fn record_id(&self) -> ::uuid::Uuid { self.$id }

      fn owner(&self) -> $crate::user::UserId { self.$owner }

      fn set_owner(&mut self, owner: $crate::user::UserId) { self.$owner = owner; }
    }
  };
}

pub(crate) use owned_record;

// ─── Annotations ─────────────────────────────────────────────────────────────

/// A free-form note attached to some object (a submission, a file, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  pub note_id:    Uuid,
  pub user_id:    UserId,
  pub assoc_id:   Uuid,
  pub title:      String,
  pub contents:   String,
  pub created_at: DateTime<Utc>,
}

owned_record!(Note, "note", id = note_id, owner = user_id);

/// A comment posted on a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionComment {
  pub comment_id:    Uuid,
  pub submission_id: Uuid,
  pub author_id:     UserId,
  pub title:         String,
  pub body:          String,
  pub posted_at:     DateTime<Utc>,
}

owned_record!(SubmissionComment, "submission_comment", id = comment_id, owner = author_id);

/// A task sign-off (copyediting, layout, proofreading) held by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signoff {
  pub signoff_id:   Uuid,
  /// Symbolic task name, e.g. `SIGNOFF_COPYEDITING_FINAL`.
  pub symbolic:     String,
  pub assoc_id:     Uuid,
  pub user_id:      UserId,
  pub completed_at: Option<DateTime<Utc>>,
}

owned_record!(Signoff, "signoff", id = signoff_id, owner = user_id);

// ─── Logs ────────────────────────────────────────────────────────────────────

/// An email sent about a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailLogEntry {
  pub log_id:        Uuid,
  pub submission_id: Uuid,
  pub sender_id:     UserId,
  pub subject:       String,
  pub sent_at:       DateTime<Utc>,
}

owned_record!(EmailLogEntry, "email_log_entry", id = log_id, owner = sender_id);

/// A workflow event recorded against a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogEntry {
  pub log_id:        Uuid,
  pub submission_id: Uuid,
  pub user_id:       UserId,
  pub message:       String,
  pub logged_at:     DateTime<Utc>,
}

owned_record!(EventLogEntry, "event_log_entry", id = log_id, owner = user_id);

// ─── Access ──────────────────────────────────────────────────────────────────

/// A one-time access key (e.g. a reviewer's login-free link).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessKey {
  pub access_key_id: Uuid,
  pub user_id:       UserId,
  pub context:       String,
  pub key_hash:      String,
  pub expires_at:    DateTime<Utc>,
}

owned_record!(AccessKey, "access_key", id = access_key_id, owner = user_id);

/// A gift subscription. Only the recipient is an owning reference; the buyer
/// is informational and is cleared if the buyer's account disappears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gift {
  pub gift_id:           Uuid,
  pub journal_id:        Uuid,
  pub buyer_user_id:     Option<UserId>,
  pub recipient_user_id: UserId,
  pub gift_note:         String,
  pub redeemed:          bool,
}

owned_record!(Gift, "gift", id = gift_id, owner = recipient_user_id);

// ─── Account residue ─────────────────────────────────────────────────────────
//
// These records belong to the account itself and are deleted, not moved,
// when the account is merged away.

/// A login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub session_id: Uuid,
  pub user_id:    UserId,
  pub ip_address: String,
  pub user_agent: String,
  pub created_at: DateTime<Utc>,
}

owned_record!(Session, "session", id = session_id, owner = user_id);

/// A file uploaded but not yet attached to anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryFile {
  pub file_id:     Uuid,
  pub user_id:     UserId,
  pub file_name:   String,
  pub file_type:   String,
  pub file_size:   u64,
  pub uploaded_at: DateTime<Utc>,
}

owned_record!(TemporaryFile, "temporary_file", id = file_id, owner = user_id);

/// One localised profile setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSetting {
  pub setting_id:    Uuid,
  pub user_id:       UserId,
  pub setting_name:  String,
  /// Empty for locale-independent settings.
  pub locale:        String,
  pub setting_value: String,
}

owned_record!(UserSetting, "user_setting", id = setting_id, owner = user_id);
