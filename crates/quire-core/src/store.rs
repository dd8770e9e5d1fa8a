//! Repository traits and the `AccountStore` abstraction.
//!
//! Two layers live here:
//!
//! - The synchronous repository traits ([`Repository`], [`SubscriptionRepository`],
//!   [`GroupMembershipRepository`], ...) describe what the merge needs from
//!   storage. They are implemented by a *scope*: one unit of work, typically a
//!   database transaction, with a single error type.
//! - The async [`AccountStore`] trait is what higher layers (`quire-api`,
//!   `quire-server`) depend on.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  merge::MergeReport,
  record::{
    AccessKey, EmailLogEntry, EventLogEntry, Gift, Note, OwnedRecord, Session,
    Signoff, SubmissionComment, TemporaryFile, UserSetting,
  },
  subscription::{IndividualSubscription, InstitutionalSubscription},
  user::{NewUser, User, UserId},
  workflow::{
    EditorialDecision, GroupMembership, ReviewAssignment, SectionEditorAssignment,
    StageAssignment,
  },
};

// ─── Unit of work ────────────────────────────────────────────────────────────

/// A unit of work against storage. Every repository trait is implemented on
/// the scope so all of them share one error type and one transaction.
pub trait Scope {
  type Error: std::error::Error + Send + Sync + 'static;
}

/// Access to every record of kind `R`, keyed by its owning user.
pub trait Repository<R: OwnedRecord>: Scope {
  /// All records owned by `user`, fully materialised.
  fn find_all_owned_by(&self, user: UserId) -> Result<Vec<R>, Self::Error>;

  fn insert(&self, record: &R) -> Result<(), Self::Error>;

  /// Overwrite the stored record with the same id.
  fn update(&self, record: &R) -> Result<(), Self::Error>;

  fn delete(&self, record: &R) -> Result<(), Self::Error>;

  fn count_owned_by(&self, user: UserId) -> Result<usize, Self::Error> {
    Ok(self.find_all_owned_by(user)?.len())
  }

  /// Move every record owned by `from` to `to`. Returns the number moved.
  fn transfer_all(&self, from: UserId, to: UserId) -> Result<usize, Self::Error> {
    let records = self.find_all_owned_by(from)?;
    for mut record in records.iter().cloned() {
      record.set_owner(to);
      self.update(&record)?;
    }
    Ok(records.len())
  }

  /// Delete every record owned by `user`. Returns the number deleted.
  fn delete_all_owned_by(&self, user: UserId) -> Result<usize, Self::Error> {
    let records = self.find_all_owned_by(user)?;
    for record in &records {
      self.delete(record)?;
    }
    Ok(records.len())
  }
}

/// Individual subscriptions, queried per (user, journal).
pub trait SubscriptionRepository: Repository<IndividualSubscription> {
  fn find_by_user_and_journal(
    &self,
    user: UserId,
    journal_id: Uuid,
  ) -> Result<Vec<IndividualSubscription>, Self::Error>;

  /// Whether `user` holds at least one subscription to `journal_id` that is
  /// valid on `today`.
  fn is_currently_valid(
    &self,
    user: UserId,
    journal_id: Uuid,
    today: NaiveDate,
  ) -> Result<bool, Self::Error> {
    Ok(
      self
        .find_by_user_and_journal(user, journal_id)?
        .iter()
        .any(|s| s.is_valid_on(today)),
    )
  }

  fn delete_all_for_user_and_journal(
    &self,
    user: UserId,
    journal_id: Uuid,
  ) -> Result<usize, Self::Error>;
}

/// Role-group memberships.
pub trait GroupMembershipRepository: Scope {
  fn memberships_of(&self, user: UserId) -> Result<Vec<GroupMembership>, Self::Error>;

  fn membership_exists(&self, membership: &GroupMembership) -> Result<bool, Self::Error>;

  fn add_membership(&self, membership: &GroupMembership) -> Result<(), Self::Error>;

  fn remove_membership(&self, membership: &GroupMembership) -> Result<(), Self::Error>;
}

/// Stage assignments, with the duplicate check used during a merge.
pub trait StageAssignmentRepository: Repository<StageAssignment> {
  /// Whether `user` already holds an assignment on `submission_id` in
  /// `user_group_id`, at any stage.
  fn stage_assignment_exists(
    &self,
    submission_id: Uuid,
    user_group_id: Uuid,
    user: UserId,
  ) -> Result<bool, Self::Error>;
}

/// The account records themselves.
pub trait UserDirectory: Scope {
  fn user_exists(&self, user: UserId) -> Result<bool, Self::Error>;

  fn delete_user(&self, user: UserId) -> Result<(), Self::Error>;
}

/// Everything [`AccountMerger`](crate::merge::AccountMerger) touches.
///
/// Blanket-implemented for any scope that implements each repository.
pub trait MergeScope:
  Repository<Note>
  + Repository<EditorialDecision>
  + Repository<ReviewAssignment>
  + Repository<Signoff>
  + Repository<EmailLogEntry>
  + Repository<EventLogEntry>
  + Repository<SubmissionComment>
  + Repository<AccessKey>
  + SubscriptionRepository
  + Repository<InstitutionalSubscription>
  + Repository<Gift>
  + Repository<Session>
  + Repository<TemporaryFile>
  + Repository<UserSetting>
  + Repository<SectionEditorAssignment>
  + GroupMembershipRepository
  + StageAssignmentRepository
  + UserDirectory
{
}

impl<T> MergeScope for T where
  T: Repository<Note>
    + Repository<EditorialDecision>
    + Repository<ReviewAssignment>
    + Repository<Signoff>
    + Repository<EmailLogEntry>
    + Repository<EventLogEntry>
    + Repository<SubmissionComment>
    + Repository<AccessKey>
    + SubscriptionRepository
    + Repository<InstitutionalSubscription>
    + Repository<Gift>
    + Repository<Session>
    + Repository<TemporaryFile>
    + Repository<UserSetting>
    + Repository<SectionEditorAssignment>
    + GroupMembershipRepository
    + StageAssignmentRepository
    + UserDirectory
{
}

// ─── Reference summary ───────────────────────────────────────────────────────

/// How many records of each kind reference a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceCounts {
  pub notes:                       usize,
  pub editorial_decisions:         usize,
  pub review_assignments:          usize,
  pub signoffs:                    usize,
  pub email_log_entries:           usize,
  pub event_log_entries:           usize,
  pub submission_comments:         usize,
  pub access_keys:                 usize,
  pub individual_subscriptions:    usize,
  pub institutional_subscriptions: usize,
  pub gifts_received:              usize,
  pub sessions:                    usize,
  pub temporary_files:             usize,
  pub user_settings:               usize,
  pub section_editor_assignments:  usize,
  pub group_memberships:           usize,
  pub stage_assignments:           usize,
}

impl ReferenceCounts {
  /// Gather the counts for `user` from any merge-capable scope.
  pub fn collect<S: MergeScope>(scope: &S, user: UserId) -> Result<Self, <S as Scope>::Error> {
    Ok(Self {
      notes:                       count::<Note, S>(scope, user)?,
      editorial_decisions:         count::<EditorialDecision, S>(scope, user)?,
      review_assignments:          count::<ReviewAssignment, S>(scope, user)?,
      signoffs:                    count::<Signoff, S>(scope, user)?,
      email_log_entries:           count::<EmailLogEntry, S>(scope, user)?,
      event_log_entries:           count::<EventLogEntry, S>(scope, user)?,
      submission_comments:         count::<SubmissionComment, S>(scope, user)?,
      access_keys:                 count::<AccessKey, S>(scope, user)?,
      individual_subscriptions:    count::<IndividualSubscription, S>(scope, user)?,
      institutional_subscriptions: count::<InstitutionalSubscription, S>(scope, user)?,
      gifts_received:              count::<Gift, S>(scope, user)?,
      sessions:                    count::<Session, S>(scope, user)?,
      temporary_files:             count::<TemporaryFile, S>(scope, user)?,
      user_settings:               count::<UserSetting, S>(scope, user)?,
      section_editor_assignments:  count::<SectionEditorAssignment, S>(scope, user)?,
      group_memberships:           GroupMembershipRepository::memberships_of(scope, user)?.len(),
      stage_assignments:           count::<StageAssignment, S>(scope, user)?,
    })
  }

  pub fn total(&self) -> usize {
    self.notes
      + self.editorial_decisions
      + self.review_assignments
      + self.signoffs
      + self.email_log_entries
      + self.event_log_entries
      + self.submission_comments
      + self.access_keys
      + self.individual_subscriptions
      + self.institutional_subscriptions
      + self.gifts_received
      + self.sessions
      + self.temporary_files
      + self.user_settings
      + self.section_editor_assignments
      + self.group_memberships
      + self.stage_assignments
  }
}

fn count<R, S>(scope: &S, user: UserId) -> Result<usize, S::Error>
where
  R: OwnedRecord,
  S: Repository<R> + ?Sized,
{
  scope.count_owned_by(user)
}

// ─── Async store ─────────────────────────────────────────────────────────────

/// Abstraction over a Quire account store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Register a new account.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn list_users(&self) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Count the records of each kind that reference `id`.
  fn reference_counts(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<ReferenceCounts, Self::Error>> + Send + '_;

  /// Merge `source` into `target` atomically: every reference moves to
  /// `target` and `source` is deleted, or nothing changes at all.
  fn merge_users(
    &self,
    source: UserId,
    target: UserId,
  ) -> impl Future<Output = Result<MergeReport, Self::Error>> + Send + '_;
}
