//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, Utc};
use quire_core::{
  merge::AccountMerger,
  record::{
    AccessKey, EmailLogEntry, EventLogEntry, Gift, Note, Session, Signoff,
    SubmissionComment, TemporaryFile, UserSetting,
  },
  store::{AccountStore, ReferenceCounts},
  subscription::{
    IndividualSubscription, InstitutionalSubscription, SubscriptionStatus, ValidityWindow,
  },
  user::{NewUser, UserId},
  workflow::{
    DecisionKind, EditorialDecision, GroupMembership, ReviewAssignment,
    SectionEditorAssignment, StageAssignment, WorkflowStage,
  },
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, username: &str) -> UserId {
  s.add_user(NewUser {
    username:    username.into(),
    email:       format!("{username}@example.org"),
    given_name:  username.into(),
    family_name: "Tester".into(),
  })
  .await
  .unwrap()
  .user_id
}

fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 6, 1).unwrap() }

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

// ─── Record builders ─────────────────────────────────────────────────────────

fn note(owner: UserId) -> Note {
  Note {
    note_id:    Uuid::new_v4(),
    user_id:    owner,
    assoc_id:   Uuid::new_v4(),
    title:      "Formatting".into(),
    contents:   "Figures need higher resolution.".into(),
    created_at: Utc::now(),
  }
}

fn decision(owner: UserId) -> EditorialDecision {
  EditorialDecision {
    decision_id:   Uuid::new_v4(),
    submission_id: Uuid::new_v4(),
    stage:         WorkflowStage::ExternalReview,
    review_round:  Some(1),
    editor_id:     owner,
    decision:      DecisionKind::PendingRevisions,
    decided_at:    Utc::now(),
  }
}

fn review(owner: UserId) -> ReviewAssignment {
  ReviewAssignment {
    review_id:     Uuid::new_v4(),
    submission_id: Uuid::new_v4(),
    reviewer_id:   owner,
    round:         1,
    assigned_at:   Utc::now(),
    completed_at:  None,
  }
}

fn signoff(owner: UserId) -> Signoff {
  Signoff {
    signoff_id:   Uuid::new_v4(),
    symbolic:     "SIGNOFF_COPYEDITING_FINAL".into(),
    assoc_id:     Uuid::new_v4(),
    user_id:      owner,
    completed_at: Some(Utc::now()),
  }
}

fn email(owner: UserId) -> EmailLogEntry {
  EmailLogEntry {
    log_id:        Uuid::new_v4(),
    submission_id: Uuid::new_v4(),
    sender_id:     owner,
    subject:       "Review request".into(),
    sent_at:       Utc::now(),
  }
}

fn event(owner: UserId) -> EventLogEntry {
  EventLogEntry {
    log_id:        Uuid::new_v4(),
    submission_id: Uuid::new_v4(),
    user_id:       owner,
    message:       "submission.event.proofsApproved".into(),
    logged_at:     Utc::now(),
  }
}

fn comment(owner: UserId) -> SubmissionComment {
  SubmissionComment {
    comment_id:    Uuid::new_v4(),
    submission_id: Uuid::new_v4(),
    author_id:     owner,
    title:         "Re: revisions".into(),
    body:          "Addressed all comments.".into(),
    posted_at:     Utc::now(),
  }
}

fn access_key(owner: UserId) -> AccessKey {
  AccessKey {
    access_key_id: Uuid::new_v4(),
    user_id:       owner,
    context:       "ReviewerContext".into(),
    key_hash:      "5f4dcc3b5aa765d61d8327deb882cf99".into(),
    expires_at:    Utc::now(),
  }
}

fn subscription(owner: UserId, journal_id: Uuid, valid: bool) -> IndividualSubscription {
  let window = if valid {
    ValidityWindow::between(date(2026, 1, 1), date(2026, 12, 31))
  } else {
    ValidityWindow::between(date(2024, 1, 1), date(2024, 12, 31))
  };
  IndividualSubscription {
    subscription_id: Uuid::new_v4(),
    user_id: owner,
    journal_id,
    status: SubscriptionStatus::Active,
    window,
  }
}

fn institutional(owner: UserId) -> InstitutionalSubscription {
  InstitutionalSubscription {
    subscription_id:  Uuid::new_v4(),
    user_id:          owner,
    journal_id:       Uuid::new_v4(),
    institution_name: "University Library".into(),
    status:           SubscriptionStatus::Active,
    window:           ValidityWindow::non_expiring(),
  }
}

fn gift(recipient: UserId, buyer: Option<UserId>) -> Gift {
  Gift {
    gift_id:           Uuid::new_v4(),
    journal_id:        Uuid::new_v4(),
    buyer_user_id:     buyer,
    recipient_user_id: recipient,
    gift_note:         "Happy reading".into(),
    redeemed:          false,
  }
}

fn session(owner: UserId) -> Session {
  Session {
    session_id: Uuid::new_v4(),
    user_id:    owner,
    ip_address: "192.0.2.10".into(),
    user_agent: "Mozilla/5.0".into(),
    created_at: Utc::now(),
  }
}

fn temporary_file(owner: UserId) -> TemporaryFile {
  TemporaryFile {
    file_id:     Uuid::new_v4(),
    user_id:     owner,
    file_name:   "draft.pdf".into(),
    file_type:   "application/pdf".into(),
    file_size:   48_213,
    uploaded_at: Utc::now(),
  }
}

fn setting(owner: UserId) -> UserSetting {
  UserSetting {
    setting_id:    Uuid::new_v4(),
    user_id:       owner,
    setting_name:  "affiliation".into(),
    locale:        "en_US".into(),
    setting_value: "Example University".into(),
  }
}

fn section_editor(owner: UserId) -> SectionEditorAssignment {
  SectionEditorAssignment {
    assignment_id: Uuid::new_v4(),
    journal_id:    Uuid::new_v4(),
    section_id:    Uuid::new_v4(),
    user_id:       owner,
  }
}

fn stage_assignment(owner: UserId, submission_id: Uuid, user_group_id: Uuid) -> StageAssignment {
  StageAssignment {
    stage_assignment_id: Uuid::new_v4(),
    submission_id,
    stage: WorkflowStage::Editing,
    user_group_id,
    user_id: owner,
    assigned_at: Utc::now(),
  }
}

/// Give `owner` one record of every kind the merge knows about.
async fn seed_everything(s: &SqliteStore, owner: UserId) {
  s.insert_record(note(owner)).await.unwrap();
  s.insert_record(decision(owner)).await.unwrap();
  s.insert_record(review(owner)).await.unwrap();
  s.insert_record(signoff(owner)).await.unwrap();
  s.insert_record(email(owner)).await.unwrap();
  s.insert_record(event(owner)).await.unwrap();
  s.insert_record(comment(owner)).await.unwrap();
  s.insert_record(access_key(owner)).await.unwrap();
  s.insert_record(subscription(owner, Uuid::new_v4(), true)).await.unwrap();
  s.insert_record(institutional(owner)).await.unwrap();
  s.insert_record(gift(owner, None)).await.unwrap();
  s.insert_record(session(owner)).await.unwrap();
  s.insert_record(temporary_file(owner)).await.unwrap();
  s.insert_record(setting(owner)).await.unwrap();
  s.insert_record(section_editor(owner)).await.unwrap();
  s.add_membership(GroupMembership { user_id: owner, user_group_id: Uuid::new_v4() })
    .await
    .unwrap();
  s.insert_record(stage_assignment(owner, Uuid::new_v4(), Uuid::new_v4()))
    .await
    .unwrap();
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;
  let id = user(&s, "alice").await;

  let fetched = s.get_user(id).await.unwrap().unwrap();
  assert_eq!(fetched.user_id, id);
  assert_eq!(fetched.username, "alice");
  assert_eq!(fetched.email, "alice@example.org");
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(UserId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_users_returns_all() {
  let s = store().await;
  user(&s, "alice").await;
  user(&s, "bob").await;
  assert_eq!(s.list_users().await.unwrap().len(), 2);
}

#[tokio::test]
async fn records_roundtrip_through_their_tables() {
  let s = store().await;
  let owner = user(&s, "alice").await;

  let stored = s.insert_record(temporary_file(owner)).await.unwrap();
  let fetched = s.records_owned_by::<TemporaryFile>(owner).await.unwrap();
  assert_eq!(fetched.len(), 1);
  assert_eq!(fetched[0].file_id, stored.file_id);
  assert_eq!(fetched[0].file_size, 48_213);

  let counts = s.reference_counts(owner).await.unwrap();
  assert_eq!(counts.temporary_files, 1);
  assert_eq!(counts.total(), 1);
}

#[tokio::test]
async fn record_for_unknown_owner_is_rejected() {
  let s = store().await;
  let err = s.insert_record(note(UserId::new())).await.unwrap_err();
  assert!(matches!(err, Error::Sqlite(_)));
}

// ─── Merge preconditions ─────────────────────────────────────────────────────

#[tokio::test]
async fn merge_with_nil_source_changes_nothing() {
  let s = store().await;
  let target = user(&s, "target").await;
  seed_everything(&s, target).await;
  let before = s.reference_counts(target).await.unwrap();

  let err = s
    .merge_users_as_of(UserId(Uuid::nil()), target, today())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(quire_core::Error::InvalidArgument(_))));

  assert_eq!(s.reference_counts(target).await.unwrap(), before);
  assert!(s.get_user(target).await.unwrap().is_some());
}

#[tokio::test]
async fn merge_with_nil_target_changes_nothing() {
  let s = store().await;
  let source = user(&s, "source").await;
  seed_everything(&s, source).await;
  let before = s.reference_counts(source).await.unwrap();

  let err = s
    .merge_users_as_of(source, UserId(Uuid::nil()), today())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(quire_core::Error::InvalidArgument(_))));

  assert_eq!(s.reference_counts(source).await.unwrap(), before);
  assert!(s.get_user(source).await.unwrap().is_some());
}

#[tokio::test]
async fn merge_into_self_is_rejected() {
  let s = store().await;
  let id = user(&s, "alice").await;
  let err = s.merge_users_as_of(id, id, today()).await.unwrap_err();
  assert!(matches!(err, Error::Core(quire_core::Error::InvalidArgument(_))));
  assert!(s.get_user(id).await.unwrap().is_some());
}

#[tokio::test]
async fn merge_into_missing_target_changes_nothing() {
  let s = store().await;
  let source = user(&s, "source").await;
  seed_everything(&s, source).await;
  let before = s.reference_counts(source).await.unwrap();

  let missing = UserId::new();
  let err = s.merge_users_as_of(source, missing, today()).await.unwrap_err();
  assert!(matches!(err, Error::Core(quire_core::Error::UserNotFound(id)) if id == missing));
  assert_eq!(s.reference_counts(source).await.unwrap(), before);
}

#[tokio::test]
async fn second_merge_of_same_source_fails() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;

  s.merge_users_as_of(source, target, today()).await.unwrap();
  let err = s.merge_users_as_of(source, target, today()).await.unwrap_err();
  assert!(matches!(err, Error::Core(quire_core::Error::UserNotFound(id)) if id == source));
}

// ─── Reassignment ────────────────────────────────────────────────────────────

#[tokio::test]
async fn merge_moves_records_in_place() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;

  let n = s.insert_record(note(source)).await.unwrap();
  let d = s.insert_record(decision(source)).await.unwrap();
  let r = s.insert_record(review(source)).await.unwrap();
  let c = s.insert_record(comment(source)).await.unwrap();

  s.merge_users_as_of(source, target, today()).await.unwrap();

  let notes = s.records_owned_by::<Note>(target).await.unwrap();
  assert_eq!(notes, vec![Note { user_id: target, ..n }]);

  let decisions = s.records_owned_by::<EditorialDecision>(target).await.unwrap();
  assert_eq!(decisions, vec![EditorialDecision { editor_id: target, ..d }]);

  let reviews = s.records_owned_by::<ReviewAssignment>(target).await.unwrap();
  assert_eq!(reviews.len(), 1);
  assert_eq!(reviews[0].review_id, r.review_id);
  assert_eq!(reviews[0].submission_id, r.submission_id);

  let comments = s.records_owned_by::<SubmissionComment>(target).await.unwrap();
  assert_eq!(comments.len(), 1);
  assert_eq!(comments[0].body, c.body);
}

#[tokio::test]
async fn merge_leaves_nothing_owned_by_source() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;
  seed_everything(&s, source).await;
  seed_everything(&s, target).await;

  let before = s.reference_counts(source).await.unwrap();
  let report = s.merge_users_as_of(source, target, today()).await.unwrap();

  assert_eq!(report.source, source);
  assert_eq!(report.target, target);
  assert_eq!(
    report.transferred.total() + report.discarded.total() + report.residue_deleted.total(),
    before.total(),
  );
  assert_eq!(s.reference_counts(source).await.unwrap(), ReferenceCounts::default());
  assert!(s.get_user(source).await.unwrap().is_none());

  let after = s.reference_counts(target).await.unwrap();
  assert_eq!(after.notes, 2);
  assert_eq!(after.editorial_decisions, 2);
  assert_eq!(after.review_assignments, 2);
  assert_eq!(after.signoffs, 2);
  assert_eq!(after.email_log_entries, 2);
  assert_eq!(after.event_log_entries, 2);
  assert_eq!(after.submission_comments, 2);
  assert_eq!(after.access_keys, 2);
  assert_eq!(after.institutional_subscriptions, 2);
  assert_eq!(after.gifts_received, 2);
  assert_eq!(after.group_memberships, 2);
  assert_eq!(after.stage_assignments, 2);
}

#[tokio::test]
async fn merge_deletes_account_residue() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;
  seed_everything(&s, source).await;

  let report = s.merge_users_as_of(source, target, today()).await.unwrap();
  assert_eq!(report.residue_deleted.sessions, 1);
  assert_eq!(report.residue_deleted.temporary_files, 1);
  assert_eq!(report.residue_deleted.user_settings, 1);
  assert_eq!(report.residue_deleted.section_editor_assignments, 1);

  let target_counts = s.reference_counts(target).await.unwrap();
  assert_eq!(target_counts.sessions, 0);
  assert_eq!(target_counts.temporary_files, 0);
  assert_eq!(target_counts.user_settings, 0);
  assert_eq!(target_counts.section_editor_assignments, 0);
  assert!(s.records_owned_by::<Session>(source).await.unwrap().is_empty());
  assert!(s.get_user(source).await.unwrap().is_none());
}

#[tokio::test]
async fn gift_bought_by_source_loses_its_buyer() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;
  let friend = user(&s, "friend").await;
  let g = s.insert_record(gift(friend, Some(source))).await.unwrap();

  s.merge_users_as_of(source, target, today()).await.unwrap();

  let gifts = s.records_owned_by::<Gift>(friend).await.unwrap();
  assert_eq!(gifts.len(), 1);
  assert_eq!(gifts[0].gift_id, g.gift_id);
  assert_eq!(gifts[0].buyer_user_id, None);
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn subscriptions_follow_validity_rules() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;
  let (j1, j2, j3, j4) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

  // J1: source valid, target none.
  let s1 = s.insert_record(subscription(source, j1, true)).await.unwrap();
  // J2: source valid, target invalid.
  let s2 = s.insert_record(subscription(source, j2, true)).await.unwrap();
  let t2 = s.insert_record(subscription(target, j2, false)).await.unwrap();
  // J3: both valid.
  let s3 = s.insert_record(subscription(source, j3, true)).await.unwrap();
  let t3 = s.insert_record(subscription(target, j3, true)).await.unwrap();
  // J4: source invalid, target none.
  let s4 = s.insert_record(subscription(source, j4, false)).await.unwrap();

  let report = s.merge_users_as_of(source, target, today()).await.unwrap();
  assert_eq!(report.transferred.individual_subscriptions, 2);
  assert_eq!(report.discarded.individual_subscriptions, 2);
  assert_eq!(report.target_subscriptions_replaced, 1);

  let held = s.records_owned_by::<IndividualSubscription>(target).await.unwrap();
  let ids: Vec<Uuid> = held.iter().map(|sub| sub.subscription_id).collect();
  assert_eq!(held.len(), 3);
  assert!(ids.contains(&s1.subscription_id));
  assert!(ids.contains(&s2.subscription_id));
  assert!(!ids.contains(&t2.subscription_id));
  assert!(ids.contains(&t3.subscription_id));
  assert!(!ids.contains(&s3.subscription_id));
  assert!(!ids.contains(&s4.subscription_id));
  assert!(held.iter().all(|sub| sub.is_valid_on(today())));

  assert!(s.records_owned_by::<IndividualSubscription>(source).await.unwrap().is_empty());
}

#[tokio::test]
async fn subscriptions_with_several_rows_per_journal() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;
  let journal = Uuid::new_v4();

  // Two lapsed target rows, two valid source rows, all for one journal.
  let lapsed_a = s.insert_record(subscription(target, journal, false)).await.unwrap();
  let lapsed_b = s.insert_record(subscription(target, journal, false)).await.unwrap();
  let first = s.insert_record(subscription(source, journal, true)).await.unwrap();
  let second = s.insert_record(subscription(source, journal, true)).await.unwrap();

  let report = s.merge_users_as_of(source, target, today()).await.unwrap();
  assert_eq!(report.target_subscriptions_replaced, 2);
  assert_eq!(report.transferred.individual_subscriptions, 1);
  assert_eq!(report.discarded.individual_subscriptions, 1);

  let held = s.records_owned_by::<IndividualSubscription>(target).await.unwrap();
  let ids: Vec<Uuid> = held.iter().map(|sub| sub.subscription_id).collect();
  assert_eq!(ids, vec![first.subscription_id]);
  assert!(!ids.contains(&second.subscription_id));
  assert!(!ids.contains(&lapsed_a.subscription_id));
  assert!(!ids.contains(&lapsed_b.subscription_id));
  assert!(s.records_owned_by::<IndividualSubscription>(source).await.unwrap().is_empty());
}

#[tokio::test]
async fn pending_subscription_is_not_transferred() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;
  let mut pending = subscription(source, Uuid::new_v4(), true);
  pending.status = SubscriptionStatus::AwaitingOnlinePayment;
  s.insert_record(pending).await.unwrap();

  let report = s.merge_users_as_of(source, target, today()).await.unwrap();
  assert_eq!(report.transferred.individual_subscriptions, 0);
  assert_eq!(report.discarded.individual_subscriptions, 1);
  assert!(s.records_owned_by::<IndividualSubscription>(target).await.unwrap().is_empty());
}

#[tokio::test]
async fn institutional_contact_moves_regardless_of_validity() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;
  let mut lapsed = institutional(source);
  lapsed.window = ValidityWindow::between(date(2020, 1, 1), date(2020, 12, 31));
  let lapsed = s.insert_record(lapsed).await.unwrap();

  s.merge_users_as_of(source, target, today()).await.unwrap();

  let held = s.records_owned_by::<InstitutionalSubscription>(target).await.unwrap();
  assert_eq!(held.len(), 1);
  assert_eq!(held[0].subscription_id, lapsed.subscription_id);
}

// ─── Groups and stages ───────────────────────────────────────────────────────

#[tokio::test]
async fn group_memberships_are_not_duplicated() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;
  let (editors, reviewers) = (Uuid::new_v4(), Uuid::new_v4());

  s.add_membership(GroupMembership { user_id: source, user_group_id: editors }).await.unwrap();
  s.add_membership(GroupMembership { user_id: source, user_group_id: reviewers }).await.unwrap();
  s.add_membership(GroupMembership { user_id: target, user_group_id: reviewers }).await.unwrap();

  let report = s.merge_users_as_of(source, target, today()).await.unwrap();
  assert_eq!(report.transferred.group_memberships, 1);
  assert_eq!(report.discarded.group_memberships, 1);

  let mut groups: Vec<Uuid> = s
    .memberships_of(target)
    .await
    .unwrap()
    .into_iter()
    .map(|m| m.user_group_id)
    .collect();
  groups.sort();
  let mut expected = vec![editors, reviewers];
  expected.sort();
  assert_eq!(groups, expected);
  assert!(s.memberships_of(source).await.unwrap().is_empty());
}

#[tokio::test]
async fn stage_assignments_are_not_duplicated() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;
  let (sub1, sub2, group) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

  let dup = s.insert_record(stage_assignment(source, sub1, group)).await.unwrap();
  let unique = s.insert_record(stage_assignment(source, sub2, group)).await.unwrap();
  let own = s.insert_record(stage_assignment(target, sub1, group)).await.unwrap();

  let report = s.merge_users_as_of(source, target, today()).await.unwrap();
  assert_eq!(report.transferred.stage_assignments, 1);
  assert_eq!(report.discarded.stage_assignments, 1);

  let held = s.records_owned_by::<StageAssignment>(target).await.unwrap();
  let ids: Vec<Uuid> = held.iter().map(|a| a.stage_assignment_id).collect();
  assert_eq!(held.len(), 2);
  assert!(ids.contains(&own.stage_assignment_id));
  assert!(ids.contains(&unique.stage_assignment_id));
  assert!(!ids.contains(&dup.stage_assignment_id));
}

// ─── Atomicity and hooks ─────────────────────────────────────────────────────

#[tokio::test]
async fn failed_merge_rolls_back_every_pass() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;
  seed_everything(&s, source).await;
  let before_source = s.reference_counts(source).await.unwrap();
  let before_target = s.reference_counts(target).await.unwrap();

  // The last pass deletes the source user; make that fail.
  s.execute_batch(
    "CREATE TRIGGER users_keep BEFORE DELETE ON users
     BEGIN SELECT RAISE(ABORT, 'users are kept'); END;",
  )
  .await
  .unwrap();

  let err = s.merge_users_as_of(source, target, today()).await.unwrap_err();
  assert!(matches!(err, Error::Sqlite(_)));

  assert_eq!(s.reference_counts(source).await.unwrap(), before_source);
  assert_eq!(s.reference_counts(target).await.unwrap(), before_target);
  assert!(s.get_user(source).await.unwrap().is_some());
}

#[tokio::test]
async fn hooks_can_redirect_the_target() {
  let base = store().await;
  let source = user(&base, "source").await;
  let alias = UserId::new();
  let canonical = user(&base, "canonical").await;

  let s = base.with_merger(AccountMerger::new().with_hook(
    move |_: &mut UserId, target: &mut UserId| {
      if *target == alias {
        *target = canonical;
      }
    },
  ));
  s.insert_record(note(source)).await.unwrap();

  let report = s.merge_users_as_of(source, alias, today()).await.unwrap();
  assert_eq!(report.target, canonical);
  assert_eq!(s.records_owned_by::<Note>(canonical).await.unwrap().len(), 1);
}

#[tokio::test]
async fn merge_users_uses_current_date() {
  let s = store().await;
  let source = user(&s, "source").await;
  let target = user(&s, "target").await;
  let mut forever = subscription(source, Uuid::new_v4(), true);
  forever.window = ValidityWindow::non_expiring();
  s.insert_record(forever).await.unwrap();

  let report = s.merge_users(source, target).await.unwrap();
  assert_eq!(report.transferred.individual_subscriptions, 1);
}
