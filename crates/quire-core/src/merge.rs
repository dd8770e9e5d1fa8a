//! Account merging: move every reference from one user to another, then
//! delete the emptied account.
//!
//! The merger is storage-agnostic. It is handed a [`MergeScope`] (one unit of
//! work implementing every repository) and runs a fixed sequence of passes
//! over it. Atomicity is the scope's job: a backend runs [`AccountMerger::apply`]
//! inside a transaction and commits only if it returns `Ok`.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  error::Error,
  record::{
    AccessKey, EmailLogEntry, EventLogEntry, Gift, Note, OwnedRecord, Session,
    Signoff, SubmissionComment, TemporaryFile, UserSetting,
  },
  store::{
    GroupMembershipRepository, MergeScope, ReferenceCounts, Repository, Scope,
    StageAssignmentRepository, SubscriptionRepository,
  },
  subscription::InstitutionalSubscription,
  user::UserId,
  workflow::{
    EditorialDecision, GroupMembership, ReviewAssignment, SectionEditorAssignment,
  },
};

// ─── Hooks ───────────────────────────────────────────────────────────────────

/// Observer invoked before a merge touches storage.
///
/// Hooks receive both identifiers by mutable reference and may rewrite them
/// (e.g. to canonicalise an alias). The rewritten pair is validated again
/// before any pass runs.
pub trait MergeHook: Send + Sync {
  fn before_merge(&self, source: &mut UserId, target: &mut UserId);
}

impl<F> MergeHook for F
where
  F: Fn(&mut UserId, &mut UserId) + Send + Sync,
{
  fn before_merge(&self, source: &mut UserId, target: &mut UserId) {
    self(source, target)
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Failure of a merge, generic over the storage error `E`.
#[derive(Debug, Error)]
pub enum MergeError<E: std::error::Error + 'static> {
  /// The pair was rejected before any mutation.
  #[error(transparent)]
  Rejected(#[from] Error),

  /// Storage failed partway through; the caller must roll back.
  #[error("store error: {0}")]
  Store(#[source] E),
}

// ─── Report ──────────────────────────────────────────────────────────────────

/// What a merge did, by record kind.
///
/// For every kind, `transferred + discarded + residue_deleted` equals what the
/// source held before the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
  pub source:                        UserId,
  pub target:                        UserId,
  /// Records now owned by the target.
  pub transferred:                   ReferenceCounts,
  /// Source records dropped because the target already held an equivalent
  /// (or, for subscriptions, because they were not valid).
  pub discarded:                     ReferenceCounts,
  /// Records tied to the source account itself and deleted with it.
  pub residue_deleted:               ReferenceCounts,
  /// Invalid target subscriptions removed to make room for a valid one.
  pub target_subscriptions_replaced: usize,
}

impl MergeReport {
  fn new(source: UserId, target: UserId) -> Self {
    Self {
      source,
      target,
      transferred: ReferenceCounts::default(),
      discarded: ReferenceCounts::default(),
      residue_deleted: ReferenceCounts::default(),
      target_subscriptions_replaced: 0,
    }
  }
}

// ─── Merger ──────────────────────────────────────────────────────────────────

/// Merges one user account into another.
///
/// Cloning is cheap; hooks are reference-counted.
#[derive(Clone, Default)]
pub struct AccountMerger {
  hooks: Vec<Arc<dyn MergeHook>>,
}

impl AccountMerger {
  pub fn new() -> Self { Self::default() }

  /// Append a hook. Hooks run in registration order.
  pub fn with_hook(mut self, hook: impl MergeHook + 'static) -> Self {
    self.hooks.push(Arc::new(hook));
    self
  }

  /// Validate the pair, run the hooks, and validate the rewritten pair.
  ///
  /// Touches no storage. Fails with [`Error::InvalidArgument`] if either id is
  /// nil or both are the same account.
  pub fn prepare(&self, source: UserId, target: UserId) -> Result<(UserId, UserId), Error> {
    validate_pair(source, target)?;
    let (mut source, mut target) = (source, target);
    for hook in &self.hooks {
      hook.before_merge(&mut source, &mut target);
    }
    validate_pair(source, target)?;
    Ok((source, target))
  }

  /// Prepare and apply a merge as of today.
  pub fn merge<S: MergeScope>(
    &self,
    scope: &S,
    source: UserId,
    target: UserId,
  ) -> Result<MergeReport, MergeError<<S as Scope>::Error>> {
    let (source, target) = self.prepare(source, target)?;
    self.apply(scope, source, target, Utc::now().date_naive())
  }

  /// Run every merge pass on an already-prepared pair.
  ///
  /// `today` decides which subscriptions count as valid. Both users must
  /// exist; [`Error::UserNotFound`] is returned before any mutation otherwise.
  pub fn apply<S: MergeScope>(
    &self,
    scope: &S,
    source: UserId,
    target: UserId,
    today: NaiveDate,
  ) -> Result<MergeReport, MergeError<<S as Scope>::Error>> {
    validate_pair(source, target)?;
    for user in [source, target] {
      if !scope.user_exists(user).map_err(MergeError::Store)? {
        return Err(Error::UserNotFound(user).into());
      }
    }

    tracing::info!(%source, %target, "merging user accounts");
    let report = run_passes(scope, source, target, today).map_err(MergeError::Store)?;
    tracing::info!(
      %source,
      %target,
      transferred = report.transferred.total(),
      discarded = report.discarded.total(),
      residue_deleted = report.residue_deleted.total(),
      "user accounts merged"
    );
    Ok(report)
  }
}

fn validate_pair(source: UserId, target: UserId) -> Result<(), Error> {
  if source.is_nil() || target.is_nil() {
    return Err(Error::InvalidArgument(
      "both a source and a target user are required".to_owned(),
    ));
  }
  if source == target {
    return Err(Error::InvalidArgument(format!(
      "cannot merge user {source} into itself"
    )));
  }
  Ok(())
}

// ─── Passes ──────────────────────────────────────────────────────────────────

fn run_passes<S: MergeScope>(
  scope: &S,
  source: UserId,
  target: UserId,
  today: NaiveDate,
) -> Result<MergeReport, <S as Scope>::Error> {
  let mut report = MergeReport::new(source, target);
  let moved = &mut report.transferred;

  moved.notes               = transfer::<Note, S>(scope, source, target)?;
  moved.editorial_decisions = transfer::<EditorialDecision, S>(scope, source, target)?;
  moved.review_assignments  = transfer::<ReviewAssignment, S>(scope, source, target)?;
  moved.signoffs            = transfer::<Signoff, S>(scope, source, target)?;
  moved.email_log_entries   = transfer::<EmailLogEntry, S>(scope, source, target)?;
  moved.event_log_entries   = transfer::<EventLogEntry, S>(scope, source, target)?;
  moved.submission_comments = transfer::<SubmissionComment, S>(scope, source, target)?;
  moved.access_keys         = transfer::<AccessKey, S>(scope, source, target)?;

  let subs = merge_subscriptions(scope, source, target, today)?;
  report.transferred.individual_subscriptions = subs.transferred;
  report.discarded.individual_subscriptions   = subs.discarded;
  report.target_subscriptions_replaced        = subs.replaced;

  report.transferred.institutional_subscriptions =
    transfer::<InstitutionalSubscription, S>(scope, source, target)?;
  report.transferred.gifts_received = transfer::<Gift, S>(scope, source, target)?;

  let residue = &mut report.residue_deleted;
  residue.sessions                   = purge::<Session, S>(scope, source)?;
  residue.temporary_files            = purge::<TemporaryFile, S>(scope, source)?;
  residue.user_settings              = purge::<UserSetting, S>(scope, source)?;
  residue.section_editor_assignments = purge::<SectionEditorAssignment, S>(scope, source)?;

  let (moved, dropped) = merge_group_memberships(scope, source, target)?;
  report.transferred.group_memberships = moved;
  report.discarded.group_memberships   = dropped;

  let (moved, dropped) = merge_stage_assignments(scope, source, target)?;
  report.transferred.stage_assignments = moved;
  report.discarded.stage_assignments   = dropped;

  scope.delete_user(source)?;
  Ok(report)
}

fn transfer<R, S>(scope: &S, source: UserId, target: UserId) -> Result<usize, S::Error>
where
  R: OwnedRecord,
  S: Repository<R> + ?Sized,
{
  let moved = scope.transfer_all(source, target)?;
  tracing::debug!(kind = R::KIND, moved, "transferred records");
  Ok(moved)
}

fn purge<R, S>(scope: &S, user: UserId) -> Result<usize, S::Error>
where
  R: OwnedRecord,
  S: Repository<R> + ?Sized,
{
  let deleted = scope.delete_all_owned_by(user)?;
  tracing::debug!(kind = R::KIND, deleted, "deleted account residue");
  Ok(deleted)
}

struct SubscriptionOutcome {
  transferred: usize,
  replaced:    usize,
  discarded:   usize,
}

/// Move the source's valid subscriptions wherever the target lacks a valid
/// one for the same journal, then delete whatever the source still holds.
fn merge_subscriptions<S>(
  scope: &S,
  source: UserId,
  target: UserId,
  today: NaiveDate,
) -> Result<SubscriptionOutcome, S::Error>
where
  S: SubscriptionRepository + ?Sized,
{
  let mut outcome = SubscriptionOutcome { transferred: 0, replaced: 0, discarded: 0 };

  for mut subscription in scope.find_all_owned_by(source)? {
    if !subscription.is_valid_on(today) {
      continue;
    }
    let journal_id = subscription.journal_id;
    let held = scope.find_by_user_and_journal(target, journal_id)?;
    if !held.is_empty() {
      if scope.is_currently_valid(target, journal_id, today)? {
        continue;
      }
      outcome.replaced += scope.delete_all_for_user_and_journal(target, journal_id)?;
    }
    subscription.set_owner(target);
    scope.update(&subscription)?;
    outcome.transferred += 1;
  }

  outcome.discarded = scope.delete_all_owned_by(source)?;
  tracing::debug!(
    transferred = outcome.transferred,
    replaced = outcome.replaced,
    discarded = outcome.discarded,
    "merged individual subscriptions"
  );
  Ok(outcome)
}

fn merge_group_memberships<S>(
  scope: &S,
  source: UserId,
  target: UserId,
) -> Result<(usize, usize), S::Error>
where
  S: GroupMembershipRepository + ?Sized,
{
  let (mut moved, mut dropped) = (0, 0);
  for membership in scope.memberships_of(source)? {
    let replacement = GroupMembership { user_id: target, ..membership };
    if scope.membership_exists(&replacement)? {
      dropped += 1;
    } else {
      scope.add_membership(&replacement)?;
      moved += 1;
    }
    scope.remove_membership(&membership)?;
  }
  tracing::debug!(moved, dropped, "merged group memberships");
  Ok((moved, dropped))
}

fn merge_stage_assignments<S>(
  scope: &S,
  source: UserId,
  target: UserId,
) -> Result<(usize, usize), S::Error>
where
  S: StageAssignmentRepository + ?Sized,
{
  let (mut moved, mut dropped) = (0, 0);
  for mut assignment in scope.find_all_owned_by(source)? {
    if scope.stage_assignment_exists(assignment.submission_id, assignment.user_group_id, target)? {
      scope.delete(&assignment)?;
      dropped += 1;
    } else {
      assignment.set_owner(target);
      scope.update(&assignment)?;
      moved += 1;
    }
  }
  tracing::debug!(moved, dropped, "merged stage assignments");
  Ok((moved, dropped))
}
