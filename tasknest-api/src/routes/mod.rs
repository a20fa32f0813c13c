/// API route handlers
///
/// Organized by resource:
///
/// - `home`: Service info and health check
/// - `auth`: Account endpoints (signup, signin, signout, me)
/// - `tasks`: Task CRUD endpoints

pub mod auth;
pub mod home;
pub mod tasks;
