//! # TaskVault Shared Library
//!
//! Authentication, identity and ownership-scoped task logic used by the
//! TaskVault API server.
//!
//! ## Module Organization
//!
//! - `auth`: tokens, password hashing, request authenticator, identity resolver
//! - `models`: database models and data structures
//! - `store`: storage trait with PostgreSQL and in-memory backends
//! - `services`: registration, login and task operations
//! - `db`: connection pool and embedded migrations
//! - `error`: domain error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::{Error, Result};

/// Current version of the TaskVault shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
