/// Request authentication
///
/// Resolves the `Authorization: Bearer <token>` header to a [`CurrentUser`]
/// and injects it into request extensions. The axum layer function itself
/// lives in the API crate's `app` module; this module holds the pieces that
/// touch the session and user stores.
///
/// Authentication fails closed: handlers behind the auth layer never run
/// for requests without a valid, unexpired, unrevoked session.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use tasknest_shared::auth::middleware::CurrentUser;
///
/// async fn handler(Extension(user): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", user.username)
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{session::Session, user::User};

/// Authenticated identity added to request extensions
///
/// Carries the session ID alongside the user so signout can revoke the
/// exact session that authenticated the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Username, for responses and logging
    pub username: String,

    /// Session that authenticated this request
    pub session_id: Uuid,
}

/// Error type for request authentication
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Authorization header is not a well-formed bearer token
    InvalidFormat(String),

    /// Token is unknown, expired, or revoked
    InvalidSession,

    /// Database error during authentication
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidSession => {
                (StatusCode::UNAUTHORIZED, "Invalid or expired session").into_response()
            }
            AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Resolves a bearer token to the authenticated user
///
/// Looks up the session by token hash (rejecting expired and revoked
/// sessions in the query) and loads the owning user. A session whose user
/// has been deleted is treated as invalid, not as an error.
///
/// # Errors
///
/// - `AuthError::InvalidSession` for unknown/expired/revoked tokens
/// - `AuthError::DatabaseError` if the store is unreachable
pub async fn authenticate_token(pool: &PgPool, token: &str) -> Result<CurrentUser, AuthError> {
    let session = Session::authenticate(pool, token)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::InvalidSession)?;

    let user = User::find_by_id(pool, session.user_id)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::InvalidSession)?;

    Ok(CurrentUser {
        user_id: user.id,
        username: user.username,
        session_id: session.id,
    })
}

/// Extracts the bearer token from an Authorization header value
///
/// # Errors
///
/// Returns `AuthError::InvalidFormat` if the header is not
/// `Bearer <token>`.
pub fn bearer_token(header_value: &str) -> Result<&str, AuthError> {
    header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(
            bearer_token("Bearer tn_abc").expect("should parse"),
            "tn_abc"
        );

        assert!(bearer_token("Basic dXNlcjpwYXNz").is_err());
        assert!(bearer_token("tn_abc").is_err());
        assert!(bearer_token("").is_err());
    }

    #[test]
    fn test_auth_error_responses() {
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidSession.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AuthError::DatabaseError("oops".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
