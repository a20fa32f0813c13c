/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the signup password policy
/// - [`token`]: Opaque session-token generation and hashing
/// - [`middleware`]: Resolving bearer tokens to a [`middleware::CurrentUser`]
///
/// Passwords are hashed with Argon2id and never stored or logged in
/// plaintext. Session tokens are random, hashed with SHA-256 at rest, and
/// compared in constant time.

pub mod middleware;
pub mod password;
pub mod token;
