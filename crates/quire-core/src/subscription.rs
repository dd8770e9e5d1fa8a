//! Journal subscriptions held by individuals and institutions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{record::owned_record, user::UserId};

/// Administrative status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
  #[default]
  Active,
  NeedsInformation,
  NeedsApproval,
  AwaitingManualPayment,
  AwaitingOnlinePayment,
  Other,
}

/// The period during which a subscription grants access.
///
/// A missing start is unbounded below; a missing end never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidityWindow {
  pub date_start: Option<NaiveDate>,
  pub date_end:   Option<NaiveDate>,
}

impl ValidityWindow {
  pub fn non_expiring() -> Self { Self::default() }

  pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
    Self { date_start: Some(start), date_end: Some(end) }
  }

  pub fn contains(&self, date: NaiveDate) -> bool {
    self.date_start.is_none_or(|start| start <= date)
      && self.date_end.is_none_or(|end| date <= end)
  }
}

/// A subscription held by one user for one journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualSubscription {
  pub subscription_id: Uuid,
  pub user_id:         UserId,
  pub journal_id:      Uuid,
  pub status:          SubscriptionStatus,
  #[serde(flatten)]
  pub window:          ValidityWindow,
}

owned_record!(IndividualSubscription, "individual_subscription", id = subscription_id, owner = user_id);

impl IndividualSubscription {
  /// Whether this subscription grants access on `date`.
  pub fn is_valid_on(&self, date: NaiveDate) -> bool {
    self.status == SubscriptionStatus::Active && self.window.contains(date)
  }
}

/// A subscription held by an institution; `user_id` is its contact person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionalSubscription {
  pub subscription_id:  Uuid,
  pub user_id:          UserId,
  pub journal_id:       Uuid,
  pub institution_name: String,
  pub status:           SubscriptionStatus,
  #[serde(flatten)]
  pub window:           ValidityWindow,
}

owned_record!(InstitutionalSubscription, "institutional_subscription", id = subscription_id, owner = user_id);

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn subscription(status: SubscriptionStatus, window: ValidityWindow) -> IndividualSubscription {
    IndividualSubscription {
      subscription_id: Uuid::new_v4(),
      user_id: UserId::new(),
      journal_id: Uuid::new_v4(),
      status,
      window,
    }
  }

  #[test]
  fn active_inside_window_is_valid() {
    let sub = subscription(
      SubscriptionStatus::Active,
      ValidityWindow::between(date(2026, 1, 1), date(2026, 12, 31)),
    );
    assert!(sub.is_valid_on(date(2026, 6, 1)));
    assert!(sub.is_valid_on(date(2026, 1, 1)));
    assert!(sub.is_valid_on(date(2026, 12, 31)));
  }

  #[test]
  fn expired_or_not_started_is_invalid() {
    let sub = subscription(
      SubscriptionStatus::Active,
      ValidityWindow::between(date(2026, 1, 1), date(2026, 12, 31)),
    );
    assert!(!sub.is_valid_on(date(2025, 12, 31)));
    assert!(!sub.is_valid_on(date(2027, 1, 1)));
  }

  #[test]
  fn non_expiring_active_is_always_valid() {
    let sub = subscription(SubscriptionStatus::Active, ValidityWindow::non_expiring());
    assert!(sub.is_valid_on(date(1999, 1, 1)));
    assert!(sub.is_valid_on(date(2099, 1, 1)));
  }

  #[test]
  fn inactive_status_is_invalid_even_inside_window() {
    let sub = subscription(
      SubscriptionStatus::AwaitingManualPayment,
      ValidityWindow::non_expiring(),
    );
    assert!(!sub.is_valid_on(date(2026, 6, 1)));
  }
}
