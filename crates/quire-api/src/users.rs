//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users` | All accounts |
//! | `POST` | `/users` | Body: [`NewUser`]; returns 201 + stored user |
//! | `GET`  | `/users/:id` | 404 if not found |
//! | `GET`  | `/users/:id/references` | Per-kind reference counts |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use quire_core::{
  store::{AccountStore, ReferenceCounts},
  user::{NewUser, User, UserId},
};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<User>>, ApiError>
where
  S: AccountStore,
{
  let users = store.list_users().await.map_err(ApiError::store)?;
  Ok(Json(users))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /users`, body: `{"username":"..","email":".."}`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewUser>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AccountStore,
{
  if body.username.trim().is_empty() {
    return Err(ApiError::BadRequest("username must not be empty".into()));
  }
  let user = store.add_user(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError>
where
  S: AccountStore,
{
  Ok(Json(require_user(store.as_ref(), id).await?))
}

// ─── References ───────────────────────────────────────────────────────────────

/// `GET /users/:id/references`
pub async fn references<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<UserId>,
) -> Result<Json<ReferenceCounts>, ApiError>
where
  S: AccountStore,
{
  require_user(store.as_ref(), id).await?;
  let counts = store.reference_counts(id).await.map_err(ApiError::store)?;
  Ok(Json(counts))
}

/// Fetch `id`, or fail with a 404.
pub(crate) async fn require_user<S: AccountStore>(store: &S, id: UserId) -> Result<User, ApiError> {
  store
    .get_user(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))
}
