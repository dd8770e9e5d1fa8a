//! Core types and trait definitions for Quire account consolidation.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! defines the records that reference a user, the repository traits a storage
//! backend implements, and the [`merge::AccountMerger`] that moves every
//! reference from one user to another.

pub mod error;
pub mod merge;
pub mod record;
pub mod store;
pub mod subscription;
pub mod user;
pub mod workflow;

pub use error::{Error, Result};
