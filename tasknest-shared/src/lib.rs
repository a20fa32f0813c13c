//! # tasknest Shared Library
//!
//! This crate contains the database layer, models, and authentication
//! primitives used by the tasknest API server.
//!
//! ## Module Organization
//!
//! - `db`: Connection pool and migration runner
//! - `models`: Database models (users, sessions, tasks)
//! - `auth`: Password hashing, session tokens, request authentication

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the tasknest shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
