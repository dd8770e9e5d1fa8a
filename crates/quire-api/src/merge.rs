//! Handler for `POST /users/merge`.
//!
//! Body: `{"source_id":"<uuid>","target_id":"<uuid>"}`. The source account's
//! references move to the target and the source is deleted.
//!
//! - `400` if either id is missing, empty, nil or malformed, or both name the
//!   same account.
//! - `404` if either account does not exist.
//! - `200` + [`MergeReport`] on success.
//!
//! Existence and self-merge are judged by the store's merger after its hooks
//! have run, so a hook may redirect an alias to its canonical account.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use quire_core::{merge::MergeReport, store::AccountStore, user::UserId};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct MergeBody {
  pub source_id: Option<String>,
  pub target_id: Option<String>,
}

/// `POST /users/merge`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<MergeBody>, JsonRejection>,
) -> Result<Json<MergeReport>, ApiError>
where
  S: AccountStore,
{
  let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let source = parse_id("source_id", body.source_id.as_deref())?;
  let target = parse_id("target_id", body.target_id.as_deref())?;

  let report = store
    .merge_users(source, target)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(report))
}

/// A missing or blank id becomes the nil id, which the merger rejects.
fn parse_id(field: &str, raw: Option<&str>) -> Result<UserId, ApiError> {
  match raw.map(str::trim) {
    None | Some("") => Ok(UserId(Uuid::nil())),
    Some(s) => Uuid::parse_str(s)
      .map(UserId)
      .map_err(|e| ApiError::BadRequest(format!("{field}: {e}"))),
  }
}
