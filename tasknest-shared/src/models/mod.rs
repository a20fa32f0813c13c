/// Database models
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts (the identity side of the system)
/// - `session`: Server-side revocable sessions
/// - `task`: Tasks owned by users

pub mod session;
pub mod task;
pub mod user;
