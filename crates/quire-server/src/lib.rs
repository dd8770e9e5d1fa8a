//! HTTP server assembly for Quire account administration.
//!
//! Mounts the [`quire_api`] router under `/api` behind HTTP Basic auth and
//! wires the audit hook into the account merger.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use quire_core::{merge::MergeHook, store::AccountStore, user::UserId};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs.
#[derive(Clone)]
pub struct AppState<S: AccountStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the server's axum [`Router`].
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AccountStore + 'static,
{
  let api = quire_api::api_router(state.store)
    .layer(middleware::from_fn_with_state(state.auth, auth::require_auth));

  Router::new()
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Merge audit ─────────────────────────────────────────────────────────────

/// Logs every merge pair before any record is touched.
pub struct AuditHook;

impl MergeHook for AuditHook {
  fn before_merge(&self, source: &mut UserId, target: &mut UserId) {
    tracing::info!(target: "quire::audit", %source, %target, "account merge requested");
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
