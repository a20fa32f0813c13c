/// Session model and database operations
///
/// Sessions are server-side and revocable: signing out actually invalidates
/// the session rather than relying on the client to discard a credential.
/// The bearer token is random, returned to the client exactly once at
/// sign-in, and stored only as a SHA-256 hash.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     expires_at TIMESTAMPTZ NOT NULL,
///     revoked BOOLEAN NOT NULL DEFAULT FALSE,
///     revoked_at TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::models::session::Session;
/// # use sqlx::PgPool;
/// # use uuid::Uuid;
///
/// # async fn example(pool: PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
/// // Open a session; `token` goes to the client, the hash to the database
/// let (session, token) = Session::open(&pool, user_id, 14).await?;
///
/// // Later: resolve the presented token back to a session
/// let active = Session::authenticate(&pool, &token).await?;
/// assert!(active.is_some());
///
/// // Sign out
/// Session::revoke(&pool, session.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::token;

/// Server-side session record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Unique session ID
    pub id: Uuid,

    /// User this session belongs to
    pub user_id: Uuid,

    /// SHA-256 hash of the bearer token (hex, 64 chars)
    #[serde(skip_serializing)]
    pub token_hash: String,

    /// When the session was opened
    pub created_at: DateTime<Utc>,

    /// When the session stops being valid regardless of revocation
    pub expires_at: DateTime<Utc>,

    /// Whether the session was explicitly revoked (signout)
    pub revoked: bool,

    /// When the session was revoked (None if not revoked)
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Checks whether the session has passed its expiry time
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Opens a new session for a user
    ///
    /// Generates a fresh token, stores its hash, and returns both the
    /// session row and the plaintext token. The plaintext is not
    /// recoverable afterwards.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `user_id` - User signing in
    /// * `ttl_days` - Session lifetime in days
    pub async fn open(
        pool: &PgPool,
        user_id: Uuid,
        ttl_days: i64,
    ) -> Result<(Self, String), sqlx::Error> {
        let (plaintext, hash) = token::generate_session_token();
        let expires_at = Utc::now() + chrono::Duration::days(ttl_days);

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token_hash, created_at, expires_at, revoked, revoked_at
            "#,
        )
        .bind(user_id)
        .bind(hash)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok((session, plaintext))
    }

    /// Resolves a presented bearer token to an active session
    ///
    /// Returns None for unknown, revoked, or expired tokens; the three
    /// cases are indistinguishable to the caller.
    pub async fn authenticate(
        pool: &PgPool,
        plaintext_token: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        if !token::validate_token_format(plaintext_token) {
            return Ok(None);
        }

        let hash = token::hash_token(plaintext_token);

        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, token_hash, created_at, expires_at, revoked, revoked_at
            FROM sessions
            WHERE token_hash = $1
              AND revoked = FALSE
              AND expires_at > NOW()
            "#,
        )
        .bind(hash)
        .fetch_optional(pool)
        .await?;

        Ok(session)
    }

    /// Revokes a session (signout)
    ///
    /// Returns true if the session existed and was not already revoked.
    pub async fn revoke(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked = TRUE, revoked_at = NOW()
            WHERE id = $1 AND revoked = FALSE
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes expired and revoked sessions older than the cutoff
    ///
    /// Housekeeping; correctness never depends on this running since
    /// `authenticate` filters on expiry and revocation.
    pub async fn purge_stale(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM sessions
            WHERE expires_at <= NOW() OR revoked = TRUE
            "#,
        )
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
