//! SQLite backend for the Quire account store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. A merge runs entirely inside one
//! transaction on that thread.

mod encode;
mod schema;
mod scope;
mod store;

pub mod error;
pub mod table;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
