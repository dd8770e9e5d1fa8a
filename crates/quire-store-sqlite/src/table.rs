//! Table descriptions for every owned record kind.
//!
//! [`SqlRecord`] ties a record type to its table: the column list (id first),
//! the owning column, and the row codec. The repository implementation in
//! `scope.rs` is written once against this trait.

use quire_core::{
  record::{
    AccessKey, EmailLogEntry, EventLogEntry, Gift, Note, OwnedRecord, Session,
    Signoff, SubmissionComment, TemporaryFile, UserSetting,
  },
  subscription::{IndividualSubscription, InstitutionalSubscription, ValidityWindow},
  workflow::{EditorialDecision, ReviewAssignment, SectionEditorAssignment, StageAssignment},
};
use rusqlite::{Row, types::Value};

use crate::{
  Error, Result,
  encode::{
    decode_decision, decode_stage, decode_status, dt_at, dt_value, encode_decision,
    encode_stage, encode_status, opt_date_at, opt_date_value, opt_dt_at, opt_dt_value,
    opt_user_at, text_value, user_at, user_value, uuid_at, uuid_value,
  },
};

/// A record kind stored in its own table.
pub trait SqlRecord: OwnedRecord {
  const TABLE: &'static str;

  /// Every column, primary key first. Values from [`SqlRecord::to_values`]
  /// follow the same order.
  const COLUMNS: &'static [&'static str];

  const OWNER_COLUMN: &'static str;

  fn from_row(row: &Row<'_>) -> Result<Self>;

  fn to_values(&self) -> Result<Vec<Value>>;

  fn id_column() -> &'static str { Self::COLUMNS[0] }
}

// ─── Annotations ─────────────────────────────────────────────────────────────

impl SqlRecord for Note {
  const TABLE: &'static str = "notes";
  const COLUMNS: &'static [&'static str] =
    &["note_id", "user_id", "assoc_id", "title", "contents", "created_at"];
  const OWNER_COLUMN: &'static str = "user_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(Note {
      note_id:    uuid_at(row, 0)?,
      user_id:    user_at(row, 1)?,
      assoc_id:   uuid_at(row, 2)?,
      title:      row.get(3)?,
      contents:   row.get(4)?,
      created_at: dt_at(row, 5)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.note_id),
      user_value(self.user_id),
      uuid_value(self.assoc_id),
      text_value(&self.title),
      text_value(&self.contents),
      dt_value(self.created_at),
    ])
  }
}

impl SqlRecord for SubmissionComment {
  const TABLE: &'static str = "submission_comments";
  const COLUMNS: &'static [&'static str] =
    &["comment_id", "submission_id", "author_id", "title", "body", "posted_at"];
  const OWNER_COLUMN: &'static str = "author_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(SubmissionComment {
      comment_id:    uuid_at(row, 0)?,
      submission_id: uuid_at(row, 1)?,
      author_id:     user_at(row, 2)?,
      title:         row.get(3)?,
      body:          row.get(4)?,
      posted_at:     dt_at(row, 5)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.comment_id),
      uuid_value(self.submission_id),
      user_value(self.author_id),
      text_value(&self.title),
      text_value(&self.body),
      dt_value(self.posted_at),
    ])
  }
}

impl SqlRecord for Signoff {
  const TABLE: &'static str = "signoffs";
  const COLUMNS: &'static [&'static str] =
    &["signoff_id", "symbolic", "assoc_id", "user_id", "completed_at"];
  const OWNER_COLUMN: &'static str = "user_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(Signoff {
      signoff_id:   uuid_at(row, 0)?,
      symbolic:     row.get(1)?,
      assoc_id:     uuid_at(row, 2)?,
      user_id:      user_at(row, 3)?,
      completed_at: opt_dt_at(row, 4)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.signoff_id),
      text_value(&self.symbolic),
      uuid_value(self.assoc_id),
      user_value(self.user_id),
      opt_dt_value(self.completed_at),
    ])
  }
}

// ─── Workflow ────────────────────────────────────────────────────────────────

impl SqlRecord for EditorialDecision {
  const TABLE: &'static str = "editorial_decisions";
  const COLUMNS: &'static [&'static str] = &[
    "decision_id",
    "submission_id",
    "stage",
    "review_round",
    "editor_id",
    "decision",
    "decided_at",
  ];
  const OWNER_COLUMN: &'static str = "editor_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(EditorialDecision {
      decision_id:   uuid_at(row, 0)?,
      submission_id: uuid_at(row, 1)?,
      stage:         decode_stage(&row.get::<_, String>(2)?)?,
      review_round:  row.get(3)?,
      editor_id:     user_at(row, 4)?,
      decision:      decode_decision(&row.get::<_, String>(5)?)?,
      decided_at:    dt_at(row, 6)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.decision_id),
      uuid_value(self.submission_id),
      text_value(encode_stage(self.stage)),
      self.review_round.map_or(Value::Null, |r| Value::Integer(r.into())),
      user_value(self.editor_id),
      text_value(encode_decision(self.decision)),
      dt_value(self.decided_at),
    ])
  }
}

impl SqlRecord for ReviewAssignment {
  const TABLE: &'static str = "review_assignments";
  const COLUMNS: &'static [&'static str] = &[
    "review_id",
    "submission_id",
    "reviewer_id",
    "round",
    "assigned_at",
    "completed_at",
  ];
  const OWNER_COLUMN: &'static str = "reviewer_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(ReviewAssignment {
      review_id:     uuid_at(row, 0)?,
      submission_id: uuid_at(row, 1)?,
      reviewer_id:   user_at(row, 2)?,
      round:         row.get(3)?,
      assigned_at:   dt_at(row, 4)?,
      completed_at:  opt_dt_at(row, 5)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.review_id),
      uuid_value(self.submission_id),
      user_value(self.reviewer_id),
      Value::Integer(self.round.into()),
      dt_value(self.assigned_at),
      opt_dt_value(self.completed_at),
    ])
  }
}

impl SqlRecord for SectionEditorAssignment {
  const TABLE: &'static str = "section_editors";
  const COLUMNS: &'static [&'static str] =
    &["assignment_id", "journal_id", "section_id", "user_id"];
  const OWNER_COLUMN: &'static str = "user_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(SectionEditorAssignment {
      assignment_id: uuid_at(row, 0)?,
      journal_id:    uuid_at(row, 1)?,
      section_id:    uuid_at(row, 2)?,
      user_id:       user_at(row, 3)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.assignment_id),
      uuid_value(self.journal_id),
      uuid_value(self.section_id),
      user_value(self.user_id),
    ])
  }
}

impl SqlRecord for StageAssignment {
  const TABLE: &'static str = "stage_assignments";
  const COLUMNS: &'static [&'static str] = &[
    "stage_assignment_id",
    "submission_id",
    "stage",
    "user_group_id",
    "user_id",
    "assigned_at",
  ];
  const OWNER_COLUMN: &'static str = "user_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(StageAssignment {
      stage_assignment_id: uuid_at(row, 0)?,
      submission_id:       uuid_at(row, 1)?,
      stage:               decode_stage(&row.get::<_, String>(2)?)?,
      user_group_id:       uuid_at(row, 3)?,
      user_id:             user_at(row, 4)?,
      assigned_at:         dt_at(row, 5)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.stage_assignment_id),
      uuid_value(self.submission_id),
      text_value(encode_stage(self.stage)),
      uuid_value(self.user_group_id),
      user_value(self.user_id),
      dt_value(self.assigned_at),
    ])
  }
}

// ─── Logs ────────────────────────────────────────────────────────────────────

impl SqlRecord for EmailLogEntry {
  const TABLE: &'static str = "email_log";
  const COLUMNS: &'static [&'static str] =
    &["log_id", "submission_id", "sender_id", "subject", "sent_at"];
  const OWNER_COLUMN: &'static str = "sender_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(EmailLogEntry {
      log_id:        uuid_at(row, 0)?,
      submission_id: uuid_at(row, 1)?,
      sender_id:     user_at(row, 2)?,
      subject:       row.get(3)?,
      sent_at:       dt_at(row, 4)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.log_id),
      uuid_value(self.submission_id),
      user_value(self.sender_id),
      text_value(&self.subject),
      dt_value(self.sent_at),
    ])
  }
}

impl SqlRecord for EventLogEntry {
  const TABLE: &'static str = "event_log";
  const COLUMNS: &'static [&'static str] =
    &["log_id", "submission_id", "user_id", "message", "logged_at"];
  const OWNER_COLUMN: &'static str = "user_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(EventLogEntry {
      log_id:        uuid_at(row, 0)?,
      submission_id: uuid_at(row, 1)?,
      user_id:       user_at(row, 2)?,
      message:       row.get(3)?,
      logged_at:     dt_at(row, 4)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.log_id),
      uuid_value(self.submission_id),
      user_value(self.user_id),
      text_value(&self.message),
      dt_value(self.logged_at),
    ])
  }
}

// ─── Access & commerce ───────────────────────────────────────────────────────

impl SqlRecord for AccessKey {
  const TABLE: &'static str = "access_keys";
  const COLUMNS: &'static [&'static str] =
    &["access_key_id", "user_id", "context", "key_hash", "expires_at"];
  const OWNER_COLUMN: &'static str = "user_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(AccessKey {
      access_key_id: uuid_at(row, 0)?,
      user_id:       user_at(row, 1)?,
      context:       row.get(2)?,
      key_hash:      row.get(3)?,
      expires_at:    dt_at(row, 4)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.access_key_id),
      user_value(self.user_id),
      text_value(&self.context),
      text_value(&self.key_hash),
      dt_value(self.expires_at),
    ])
  }
}

impl SqlRecord for IndividualSubscription {
  const TABLE: &'static str = "individual_subscriptions";
  const COLUMNS: &'static [&'static str] =
    &["subscription_id", "user_id", "journal_id", "status", "date_start", "date_end"];
  const OWNER_COLUMN: &'static str = "user_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(IndividualSubscription {
      subscription_id: uuid_at(row, 0)?,
      user_id:         user_at(row, 1)?,
      journal_id:      uuid_at(row, 2)?,
      status:          decode_status(&row.get::<_, String>(3)?)?,
      window:          ValidityWindow {
        date_start: opt_date_at(row, 4)?,
        date_end:   opt_date_at(row, 5)?,
      },
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.subscription_id),
      user_value(self.user_id),
      uuid_value(self.journal_id),
      text_value(encode_status(self.status)),
      opt_date_value(self.window.date_start),
      opt_date_value(self.window.date_end),
    ])
  }
}

impl SqlRecord for InstitutionalSubscription {
  const TABLE: &'static str = "institutional_subscriptions";
  const COLUMNS: &'static [&'static str] = &[
    "subscription_id",
    "user_id",
    "journal_id",
    "institution_name",
    "status",
    "date_start",
    "date_end",
  ];
  const OWNER_COLUMN: &'static str = "user_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(InstitutionalSubscription {
      subscription_id:  uuid_at(row, 0)?,
      user_id:          user_at(row, 1)?,
      journal_id:       uuid_at(row, 2)?,
      institution_name: row.get(3)?,
      status:           decode_status(&row.get::<_, String>(4)?)?,
      window:           ValidityWindow {
        date_start: opt_date_at(row, 5)?,
        date_end:   opt_date_at(row, 6)?,
      },
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.subscription_id),
      user_value(self.user_id),
      uuid_value(self.journal_id),
      text_value(&self.institution_name),
      text_value(encode_status(self.status)),
      opt_date_value(self.window.date_start),
      opt_date_value(self.window.date_end),
    ])
  }
}

impl SqlRecord for Gift {
  const TABLE: &'static str = "gifts";
  const COLUMNS: &'static [&'static str] = &[
    "gift_id",
    "journal_id",
    "buyer_user_id",
    "recipient_user_id",
    "gift_note",
    "redeemed",
  ];
  const OWNER_COLUMN: &'static str = "recipient_user_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(Gift {
      gift_id:           uuid_at(row, 0)?,
      journal_id:        uuid_at(row, 1)?,
      buyer_user_id:     opt_user_at(row, 2)?,
      recipient_user_id: user_at(row, 3)?,
      gift_note:         row.get(4)?,
      redeemed:          row.get(5)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.gift_id),
      uuid_value(self.journal_id),
      self.buyer_user_id.map_or(Value::Null, user_value),
      user_value(self.recipient_user_id),
      text_value(&self.gift_note),
      Value::Integer(self.redeemed.into()),
    ])
  }
}

// ─── Account residue ─────────────────────────────────────────────────────────

impl SqlRecord for Session {
  const TABLE: &'static str = "sessions";
  const COLUMNS: &'static [&'static str] =
    &["session_id", "user_id", "ip_address", "user_agent", "created_at"];
  const OWNER_COLUMN: &'static str = "user_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(Session {
      session_id: uuid_at(row, 0)?,
      user_id:    user_at(row, 1)?,
      ip_address: row.get(2)?,
      user_agent: row.get(3)?,
      created_at: dt_at(row, 4)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.session_id),
      user_value(self.user_id),
      text_value(&self.ip_address),
      text_value(&self.user_agent),
      dt_value(self.created_at),
    ])
  }
}

impl SqlRecord for TemporaryFile {
  const TABLE: &'static str = "temporary_files";
  const COLUMNS: &'static [&'static str] =
    &["file_id", "user_id", "file_name", "file_type", "file_size", "uploaded_at"];
  const OWNER_COLUMN: &'static str = "user_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    let size: i64 = row.get(4)?;
    Ok(TemporaryFile {
      file_id:     uuid_at(row, 0)?,
      user_id:     user_at(row, 1)?,
      file_name:   row.get(2)?,
      file_type:   row.get(3)?,
      file_size:   u64::try_from(size).map_err(|_| Error::OutOfRange("file_size"))?,
      uploaded_at: dt_at(row, 5)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    let size = i64::try_from(self.file_size).map_err(|_| Error::OutOfRange("file_size"))?;
    Ok(vec![
      uuid_value(self.file_id),
      user_value(self.user_id),
      text_value(&self.file_name),
      text_value(&self.file_type),
      Value::Integer(size),
      dt_value(self.uploaded_at),
    ])
  }
}

impl SqlRecord for UserSetting {
  const TABLE: &'static str = "user_settings";
  const COLUMNS: &'static [&'static str] =
    &["setting_id", "user_id", "setting_name", "locale", "setting_value"];
  const OWNER_COLUMN: &'static str = "user_id";

  fn from_row(row: &Row<'_>) -> Result<Self> {
    Ok(UserSetting {
      setting_id:    uuid_at(row, 0)?,
      user_id:       user_at(row, 1)?,
      setting_name:  row.get(2)?,
      locale:        row.get(3)?,
      setting_value: row.get(4)?,
    })
  }

  fn to_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      uuid_value(self.setting_id),
      user_value(self.user_id),
      text_value(&self.setting_name),
      text_value(&self.locale),
      text_value(&self.setting_value),
    ])
  }
}
