//! JSON administration API for Quire accounts.
//!
//! Exposes an axum [`Router`] backed by any [`quire_core::store::AccountStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", quire_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod merge;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use quire_core::store::AccountStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: AccountStore + 'static,
{
  Router::new()
    .route("/users", get(users::list::<S>).post(users::create::<S>))
    .route("/users/merge", post(merge::handler::<S>))
    .route("/users/{id}", get(users::get_one::<S>))
    .route("/users/{id}/references", get(users::references::<S>))
    .with_state(store)
}
