//! [`SqliteStore`], the SQLite implementation of [`AccountStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use quire_core::{
  merge::{AccountMerger, MergeReport},
  store::{AccountStore, GroupMembershipRepository, ReferenceCounts, Repository},
  user::{NewUser, User, UserId},
  workflow::GroupMembership,
};
use rusqlite::TransactionBehavior;

use crate::{
  Result,
  encode::{USER_COLUMNS, encode_dt, encode_user_id, user_from_row},
  schema::SCHEMA,
  scope::SqliteScope,
  table::SqlRecord,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Quire account store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection and merge hooks are
/// reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  merger: AccountMerger,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, merger: AccountMerger::new() })
  }

  /// Replace the merger (and with it the merge hooks) used by
  /// [`AccountStore::merge_users`].
  pub fn with_merger(mut self, merger: AccountMerger) -> Self {
    self.merger = merger;
    self
  }

  /// Store a record as is. Its owner must already exist.
  pub async fn insert_record<R: SqlRecord>(&self, record: R) -> Result<R> {
    self
      .conn
      .call(move |conn| {
        let outcome = Repository::<R>::insert(&SqliteScope::new(conn), &record);
        Ok(outcome.map(|()| record))
      })
      .await?
  }

  /// Every record of kind `R` owned by `user`.
  pub async fn records_owned_by<R: SqlRecord>(&self, user: UserId) -> Result<Vec<R>> {
    self
      .conn
      .call(move |conn| Ok(Repository::<R>::find_all_owned_by(&SqliteScope::new(conn), user)))
      .await?
  }

  pub async fn add_membership(&self, membership: GroupMembership) -> Result<()> {
    self
      .conn
      .call(move |conn| Ok(SqliteScope::new(conn).add_membership(&membership)))
      .await?
  }

  pub async fn memberships_of(&self, user: UserId) -> Result<Vec<GroupMembership>> {
    self
      .conn
      .call(move |conn| Ok(SqliteScope::new(conn).memberships_of(user)))
      .await?
  }

  /// Merge `source` into `target`, judging subscription validity on `today`.
  ///
  /// Hooks run and the pair is validated before the database is touched. All
  /// passes then run inside one `IMMEDIATE` transaction that is committed only
  /// if every pass succeeds.
  pub async fn merge_users_as_of(
    &self,
    source: UserId,
    target: UserId,
    today: NaiveDate,
  ) -> Result<MergeReport> {
    let (source, target) = self.merger.prepare(source, target)?;
    let merger = self.merger.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let outcome = merger.apply(&SqliteScope::new(&tx), source, target, today);
        match &outcome {
          Ok(_) => tx.commit()?,
          Err(e) => {
            tracing::warn!(%source, %target, error = %e, "merge aborted, rolling back");
            tx.rollback()?;
          }
        }
        Ok(outcome)
      })
      .await?;

    Ok(outcome?)
  }

  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  type Error = crate::Error;

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:     UserId::new(),
      username:    input.username,
      email:       input.email,
      given_name:  input.given_name,
      family_name: input.family_name,
      created_at:  Utc::now(),
    };

    let id_str      = encode_user_id(user.user_id);
    let at_str      = encode_dt(user.created_at);
    let username    = user.username.clone();
    let email       = user.email.clone();
    let given_name  = user.given_name.clone();
    let family_name = user.family_name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, username, email, given_name, family_name, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, username, email, given_name, family_name, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    let id_str = encode_user_id(id);
    self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1");
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(rusqlite::params![id_str])?;
        Ok(rows.next()?.map(user_from_row).transpose())
      })
      .await?
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    self
      .conn
      .call(|conn| {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, username");
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
          users.push(user_from_row(row));
        }
        Ok(users.into_iter().collect::<Result<Vec<_>>>())
      })
      .await?
  }

  async fn reference_counts(&self, id: UserId) -> Result<ReferenceCounts> {
    self
      .conn
      .call(move |conn| Ok(ReferenceCounts::collect(&SqliteScope::new(conn), id)))
      .await?
  }

  async fn merge_users(&self, source: UserId, target: UserId) -> Result<MergeReport> {
    self.merge_users_as_of(source, target, Utc::now().date_naive()).await
  }
}
