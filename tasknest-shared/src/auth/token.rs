/// Session token utilities
///
/// Session tokens are opaque bearer credentials handed to the client at
/// sign-in. They work with the `models::session` module for persistence.
///
/// # Security
///
/// - **Format**: `tn_{32_chars}` (prefix + 32 random base62 chars)
/// - **Storage**: tokens are hashed with SHA-256 before storage
/// - **Validation**: constant-time comparison
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::token::{generate_session_token, hash_token, validate_token_format};
///
/// let (token, hash) = generate_session_token();
/// assert!(token.starts_with("tn_"));
/// assert!(validate_token_format(&token));
/// assert_eq!(hash, hash_token(&token));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random part of the token (characters)
const TOKEN_RANDOM_LENGTH: usize = 32;

/// Session token prefix
const TOKEN_PREFIX: &str = "tn_";

/// Total length of a session token (prefix + random)
pub const SESSION_TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new session token
///
/// Returns the plaintext token (for the client) and its SHA-256 hash (for
/// the database). Key space is 62^32, roughly 2^190 combinations.
pub fn generate_session_token() -> (String, String) {
    let random_part = generate_random_string(TOKEN_RANDOM_LENGTH);
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let hash = hash_token(&token);

    (token, hash)
}

/// Generates a random base62 string (A-Z, a-z, 0-9)
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Hashes a session token with SHA-256
///
/// Returns the hex-encoded hash (64 characters). Deterministic, so the
/// stored hash can be looked up by recomputing from the presented token.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Validates session token format
///
/// Checks prefix, length, and that the random part is alphanumeric. A cheap
/// pre-filter so obviously malformed credentials never reach the database.
pub fn validate_token_format(token: &str) -> bool {
    if token.len() != SESSION_TOKEN_LENGTH {
        return false;
    }

    if !token.starts_with(TOKEN_PREFIX) {
        return false;
    }

    let random_part = &token[TOKEN_PREFIX.len()..];
    random_part.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Validates a token against a stored hash in constant time
pub fn verify_token(token: &str, stored_hash: &str) -> bool {
    let computed_hash = hash_token(token);
    constant_time_compare(&computed_hash, stored_hash)
}

/// Constant-time string comparison
///
/// Always compares the full length so the comparison time does not leak
/// where the strings first differ.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut result = 0u8;
    for i in 0..a_bytes.len() {
        result |= a_bytes[i] ^ b_bytes[i];
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_token() {
        let (token1, hash1) = generate_session_token();
        let (token2, hash2) = generate_session_token();

        assert!(token1.starts_with("tn_"));
        assert_eq!(token1.len(), SESSION_TOKEN_LENGTH);

        assert_ne!(token1, token2);
        assert_ne!(hash1, hash2);

        assert_eq!(hash1.len(), 64);
        assert_eq!(hash2.len(), 64);
    }

    #[test]
    fn test_hash_token_deterministic() {
        let hash = hash_token("tn_test123");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("tn_test123"));
        assert_ne!(hash, hash_token("tn_different"));
    }

    #[test]
    fn test_validate_token_format() {
        assert!(validate_token_format("tn_abcdefghijklmnopqrstuvwxyz123456"));
        assert!(validate_token_format("tn_ABCDEFGHIJKLMNOPQRSTUVWXYZ123456"));

        // Wrong prefix
        assert!(!validate_token_format("xx_abcdefghijklmnopqrstuvwxyz123456"));

        // Too short / too long
        assert!(!validate_token_format("tn_short"));
        assert!(!validate_token_format("tn_abcdefghijklmnopqrstuvwxyz1234567890"));

        // Special characters
        assert!(!validate_token_format("tn_abc!@#$%^&*()_+={}[]|\\:;\"'<>,.?/"));
    }

    #[test]
    fn test_verify_token() {
        let (token, hash) = generate_session_token();

        assert!(verify_token(&token, &hash));
        assert!(!verify_token("tn_wrongtoken1234567890123456789012", &hash));
        assert!(!verify_token("", &hash));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(constant_time_compare("", ""));

        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hello2"));
        assert!(!constant_time_compare("short", "longer string"));
    }

    #[test]
    fn test_full_token_workflow() {
        let (plaintext, hash) = generate_session_token();

        assert!(validate_token_format(&plaintext));
        assert!(verify_token(&plaintext, &hash));

        let (other_token, _) = generate_session_token();
        assert!(!verify_token(&other_token, &hash));
    }
}
