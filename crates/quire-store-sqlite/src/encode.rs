//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`,
//! UUIDs as hyphenated lowercase strings and enums as snake_case text.

use chrono::{DateTime, NaiveDate, Utc};
use quire_core::{
  subscription::SubscriptionStatus,
  user::{User, UserId},
  workflow::{DecisionKind, WorkflowStage},
};
use rusqlite::{Row, types::Value};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_user_id(id: UserId) -> String { encode_uuid(id.0) }

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn encode_stage(s: WorkflowStage) -> &'static str {
  match s {
    WorkflowStage::Submission => "submission",
    WorkflowStage::InternalReview => "internal_review",
    WorkflowStage::ExternalReview => "external_review",
    WorkflowStage::Editing => "editing",
    WorkflowStage::Production => "production",
  }
}

pub fn decode_stage(s: &str) -> Result<WorkflowStage> {
  match s {
    "submission" => Ok(WorkflowStage::Submission),
    "internal_review" => Ok(WorkflowStage::InternalReview),
    "external_review" => Ok(WorkflowStage::ExternalReview),
    "editing" => Ok(WorkflowStage::Editing),
    "production" => Ok(WorkflowStage::Production),
    other => Err(unknown("workflow stage", other)),
  }
}

pub fn encode_decision(d: DecisionKind) -> &'static str {
  match d {
    DecisionKind::Accept => "accept",
    DecisionKind::ExternalReview => "external_review",
    DecisionKind::PendingRevisions => "pending_revisions",
    DecisionKind::Resubmit => "resubmit",
    DecisionKind::Decline => "decline",
    DecisionKind::SendToProduction => "send_to_production",
  }
}

pub fn decode_decision(s: &str) -> Result<DecisionKind> {
  match s {
    "accept" => Ok(DecisionKind::Accept),
    "external_review" => Ok(DecisionKind::ExternalReview),
    "pending_revisions" => Ok(DecisionKind::PendingRevisions),
    "resubmit" => Ok(DecisionKind::Resubmit),
    "decline" => Ok(DecisionKind::Decline),
    "send_to_production" => Ok(DecisionKind::SendToProduction),
    other => Err(unknown("decision", other)),
  }
}

pub fn encode_status(s: SubscriptionStatus) -> &'static str {
  match s {
    SubscriptionStatus::Active => "active",
    SubscriptionStatus::NeedsInformation => "needs_information",
    SubscriptionStatus::NeedsApproval => "needs_approval",
    SubscriptionStatus::AwaitingManualPayment => "awaiting_manual_payment",
    SubscriptionStatus::AwaitingOnlinePayment => "awaiting_online_payment",
    SubscriptionStatus::Other => "other",
  }
}

pub fn decode_status(s: &str) -> Result<SubscriptionStatus> {
  match s {
    "active" => Ok(SubscriptionStatus::Active),
    "needs_information" => Ok(SubscriptionStatus::NeedsInformation),
    "needs_approval" => Ok(SubscriptionStatus::NeedsApproval),
    "awaiting_manual_payment" => Ok(SubscriptionStatus::AwaitingManualPayment),
    "awaiting_online_payment" => Ok(SubscriptionStatus::AwaitingOnlinePayment),
    "other" => Ok(SubscriptionStatus::Other),
    other => Err(unknown("subscription status", other)),
  }
}

fn unknown(kind: &'static str, value: &str) -> Error {
  Error::UnknownVariant { kind, value: value.to_owned() }
}

// ─── Column values ───────────────────────────────────────────────────────────

pub fn uuid_value(id: Uuid) -> Value { Value::Text(encode_uuid(id)) }

pub fn user_value(id: UserId) -> Value { Value::Text(encode_user_id(id)) }

pub fn text_value(s: &str) -> Value { Value::Text(s.to_owned()) }

pub fn dt_value(dt: DateTime<Utc>) -> Value { Value::Text(encode_dt(dt)) }

pub fn opt_dt_value(dt: Option<DateTime<Utc>>) -> Value {
  dt.map_or(Value::Null, dt_value)
}

pub fn opt_date_value(d: Option<NaiveDate>) -> Value {
  d.map_or(Value::Null, |d| Value::Text(encode_date(d)))
}

// ─── Row accessors ───────────────────────────────────────────────────────────

pub fn uuid_at(row: &Row<'_>, idx: usize) -> Result<Uuid> {
  decode_uuid(&row.get::<_, String>(idx)?)
}

pub fn user_at(row: &Row<'_>, idx: usize) -> Result<UserId> { Ok(UserId(uuid_at(row, idx)?)) }

pub fn opt_user_at(row: &Row<'_>, idx: usize) -> Result<Option<UserId>> {
  row
    .get::<_, Option<String>>(idx)?
    .map(|s| decode_uuid(&s).map(UserId))
    .transpose()
}

pub fn dt_at(row: &Row<'_>, idx: usize) -> Result<DateTime<Utc>> {
  decode_dt(&row.get::<_, String>(idx)?)
}

pub fn opt_dt_at(row: &Row<'_>, idx: usize) -> Result<Option<DateTime<Utc>>> {
  row.get::<_, Option<String>>(idx)?.as_deref().map(decode_dt).transpose()
}

pub fn opt_date_at(row: &Row<'_>, idx: usize) -> Result<Option<NaiveDate>> {
  row.get::<_, Option<String>>(idx)?.as_deref().map(decode_date).transpose()
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, username, email, given_name, family_name, created_at";

pub fn user_from_row(row: &Row<'_>) -> Result<User> {
  Ok(User {
    user_id:     user_at(row, 0)?,
    username:    row.get(1)?,
    email:       row.get(2)?,
    given_name:  row.get(3)?,
    family_name: row.get(4)?,
    created_at:  dt_at(row, 5)?,
  })
}
