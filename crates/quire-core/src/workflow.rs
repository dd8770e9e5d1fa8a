//! Editorial workflow records: decisions, reviews, and who is assigned where.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{record::owned_record, user::UserId};

/// The stages a submission moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
  Submission,
  InternalReview,
  ExternalReview,
  Editing,
  Production,
}

/// What an editor decided about a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
  Accept,
  ExternalReview,
  PendingRevisions,
  Resubmit,
  Decline,
  SendToProduction,
}

/// One decision in a submission's editorial history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorialDecision {
  pub decision_id:   Uuid,
  pub submission_id: Uuid,
  pub stage:         WorkflowStage,
  pub review_round:  Option<u32>,
  pub editor_id:     UserId,
  pub decision:      DecisionKind,
  pub decided_at:    DateTime<Utc>,
}

owned_record!(EditorialDecision, "editorial_decision", id = decision_id, owner = editor_id);

/// A reviewer's assignment to one review round of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAssignment {
  pub review_id:     Uuid,
  pub submission_id: Uuid,
  pub reviewer_id:   UserId,
  pub round:         u32,
  pub assigned_at:   DateTime<Utc>,
  pub completed_at:  Option<DateTime<Utc>>,
}

owned_record!(ReviewAssignment, "review_assignment", id = review_id, owner = reviewer_id);

/// A section editor's responsibility for one journal section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEditorAssignment {
  pub assignment_id: Uuid,
  pub journal_id:    Uuid,
  pub section_id:    Uuid,
  pub user_id:       UserId,
}

owned_record!(SectionEditorAssignment, "section_editor_assignment", id = assignment_id, owner = user_id);

/// Who is responsible for a submission at a stage, acting in a role group.
///
/// At most one assignment exists per (submission, user group, user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageAssignment {
  pub stage_assignment_id: Uuid,
  pub submission_id:       Uuid,
  pub stage:               WorkflowStage,
  pub user_group_id:       Uuid,
  pub user_id:             UserId,
  pub assigned_at:         DateTime<Utc>,
}

owned_record!(StageAssignment, "stage_assignment", id = stage_assignment_id, owner = user_id);

/// Membership of a user in a role group. Pairs have set semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupMembership {
  pub user_id:       UserId,
  pub user_group_id: Uuid,
}
