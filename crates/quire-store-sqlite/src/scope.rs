//! [`SqliteScope`]: the repository traits implemented over one connection.
//!
//! A scope borrows a `rusqlite::Connection` (or a `Transaction`, which derefs
//! to one) and runs every statement on it synchronously. The store creates a
//! scope inside `tokio_rusqlite::Connection::call`.

use quire_core::{
  store::{
    GroupMembershipRepository, Repository, Scope, StageAssignmentRepository,
    SubscriptionRepository, UserDirectory,
  },
  subscription::IndividualSubscription,
  user::UserId,
  workflow::{GroupMembership, StageAssignment},
};
use rusqlite::{Connection, OptionalExtension as _, params, params_from_iter};
use uuid::Uuid;

use crate::{
  Result,
  encode::{encode_user_id, encode_uuid, uuid_at},
  table::SqlRecord,
};

pub(crate) struct SqliteScope<'c> {
  conn: &'c Connection,
}

impl<'c> SqliteScope<'c> {
  pub(crate) fn new(conn: &'c Connection) -> Self { Self { conn } }

  /// Select every `R` row matching `filter`, in insertion order.
  fn select<R: SqlRecord>(&self, filter: &str, params: impl rusqlite::Params) -> Result<Vec<R>> {
    let sql = format!(
      "SELECT {} FROM {} WHERE {filter} ORDER BY rowid",
      R::COLUMNS.join(", "),
      R::TABLE,
    );
    let mut stmt = self.conn.prepare_cached(&sql)?;
    let mut rows = stmt.query(params)?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
      records.push(R::from_row(row)?);
    }
    Ok(records)
  }
}

impl Scope for SqliteScope<'_> {
  type Error = crate::Error;
}

// ─── Owned records ───────────────────────────────────────────────────────────

impl<R: SqlRecord> Repository<R> for SqliteScope<'_> {
  fn find_all_owned_by(&self, user: UserId) -> Result<Vec<R>> {
    self.select::<R>(&format!("{} = ?1", R::OWNER_COLUMN), params![encode_user_id(user)])
  }

  fn insert(&self, record: &R) -> Result<()> {
    let placeholders = (1..=R::COLUMNS.len())
      .map(|i| format!("?{i}"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "INSERT INTO {} ({}) VALUES ({placeholders})",
      R::TABLE,
      R::COLUMNS.join(", "),
    );
    self
      .conn
      .prepare_cached(&sql)?
      .execute(params_from_iter(record.to_values()?))?;
    Ok(())
  }

  fn update(&self, record: &R) -> Result<()> {
    let assignments = R::COLUMNS
      .iter()
      .enumerate()
      .skip(1)
      .map(|(i, col)| format!("{col} = ?{}", i + 1))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!("UPDATE {} SET {assignments} WHERE {} = ?1", R::TABLE, R::id_column());
    self
      .conn
      .prepare_cached(&sql)?
      .execute(params_from_iter(record.to_values()?))?;
    Ok(())
  }

  fn delete(&self, record: &R) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE {} = ?1", R::TABLE, R::id_column());
    self
      .conn
      .prepare_cached(&sql)?
      .execute(params![encode_uuid(record.record_id())])?;
    Ok(())
  }

  fn count_owned_by(&self, user: UserId) -> Result<usize> {
    let sql = format!("SELECT COUNT(*) FROM {} WHERE {} = ?1", R::TABLE, R::OWNER_COLUMN);
    let count: i64 = self
      .conn
      .prepare_cached(&sql)?
      .query_row(params![encode_user_id(user)], |r| r.get(0))?;
    Ok(count as usize)
  }

  // Bulk statements; only the owning column changes.

  fn transfer_all(&self, from: UserId, to: UserId) -> Result<usize> {
    let sql = format!(
      "UPDATE {table} SET {owner} = ?1 WHERE {owner} = ?2",
      table = R::TABLE,
      owner = R::OWNER_COLUMN,
    );
    Ok(
      self
        .conn
        .prepare_cached(&sql)?
        .execute(params![encode_user_id(to), encode_user_id(from)])?,
    )
  }

  fn delete_all_owned_by(&self, user: UserId) -> Result<usize> {
    let sql = format!("DELETE FROM {} WHERE {} = ?1", R::TABLE, R::OWNER_COLUMN);
    Ok(self.conn.prepare_cached(&sql)?.execute(params![encode_user_id(user)])?)
  }
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

impl SubscriptionRepository for SqliteScope<'_> {
  fn find_by_user_and_journal(
    &self,
    user: UserId,
    journal_id: Uuid,
  ) -> Result<Vec<IndividualSubscription>> {
    self.select::<IndividualSubscription>(
      "user_id = ?1 AND journal_id = ?2",
      params![encode_user_id(user), encode_uuid(journal_id)],
    )
  }

  fn delete_all_for_user_and_journal(&self, user: UserId, journal_id: Uuid) -> Result<usize> {
    Ok(self.conn.execute(
      "DELETE FROM individual_subscriptions WHERE user_id = ?1 AND journal_id = ?2",
      params![encode_user_id(user), encode_uuid(journal_id)],
    )?)
  }
}

// ─── Group memberships ───────────────────────────────────────────────────────

impl GroupMembershipRepository for SqliteScope<'_> {
  fn memberships_of(&self, user: UserId) -> Result<Vec<GroupMembership>> {
    let mut stmt = self.conn.prepare_cached(
      "SELECT user_group_id FROM user_user_groups WHERE user_id = ?1 ORDER BY rowid",
    )?;
    let mut rows = stmt.query(params![encode_user_id(user)])?;
    let mut memberships = Vec::new();
    while let Some(row) = rows.next()? {
      memberships.push(GroupMembership { user_id: user, user_group_id: uuid_at(row, 0)? });
    }
    Ok(memberships)
  }

  fn membership_exists(&self, membership: &GroupMembership) -> Result<bool> {
    Ok(
      self
        .conn
        .query_row(
          "SELECT 1 FROM user_user_groups WHERE user_id = ?1 AND user_group_id = ?2",
          params![encode_user_id(membership.user_id), encode_uuid(membership.user_group_id)],
          |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false),
    )
  }

  fn add_membership(&self, membership: &GroupMembership) -> Result<()> {
    self.conn.execute(
      "INSERT INTO user_user_groups (user_id, user_group_id) VALUES (?1, ?2)",
      params![encode_user_id(membership.user_id), encode_uuid(membership.user_group_id)],
    )?;
    Ok(())
  }

  fn remove_membership(&self, membership: &GroupMembership) -> Result<()> {
    self.conn.execute(
      "DELETE FROM user_user_groups WHERE user_id = ?1 AND user_group_id = ?2",
      params![encode_user_id(membership.user_id), encode_uuid(membership.user_group_id)],
    )?;
    Ok(())
  }
}

// ─── Stage assignments ───────────────────────────────────────────────────────

impl StageAssignmentRepository for SqliteScope<'_> {
  fn stage_assignment_exists(
    &self,
    submission_id: Uuid,
    user_group_id: Uuid,
    user: UserId,
  ) -> Result<bool> {
    let sql = format!(
      "SELECT EXISTS(SELECT 1 FROM {} WHERE submission_id = ?1 AND user_group_id = ?2 AND user_id = ?3)",
      StageAssignment::TABLE,
    );
    Ok(self.conn.query_row(
      &sql,
      params![encode_uuid(submission_id), encode_uuid(user_group_id), encode_user_id(user)],
      |r| r.get(0),
    )?)
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

impl UserDirectory for SqliteScope<'_> {
  fn user_exists(&self, user: UserId) -> Result<bool> {
    Ok(
      self
        .conn
        .query_row(
          "SELECT 1 FROM users WHERE user_id = ?1",
          params![encode_user_id(user)],
          |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false),
    )
  }

  fn delete_user(&self, user: UserId) -> Result<()> {
    self
      .conn
      .execute("DELETE FROM users WHERE user_id = ?1", params![encode_user_id(user)])?;
    Ok(())
  }
}
