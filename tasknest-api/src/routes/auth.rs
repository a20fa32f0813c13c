/// Account endpoints
///
/// # Endpoints
///
/// - `POST /signup` - Create an account and open a session
/// - `POST /signin` - Open a session
/// - `POST /signout` - Revoke the current session
/// - `GET /me` - The currently signed-in user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::{middleware::CurrentUser, password},
    models::{
        session::Session,
        user::{CreateUser, User},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Desired username
    #[validate(length(
        min = 1,
        max = 150,
        message = "Username must be between 1 and 150 characters"
    ))]
    pub username: String,

    /// Password
    pub password: String,

    /// Password, again
    pub password_confirm: String,
}

/// Signin request
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    /// Username
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    pub password: String,
}

/// Response for signup and signin: the opened session
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// User ID
    pub user_id: Uuid,

    /// Username
    pub username: String,

    /// Bearer token for subsequent requests; shown exactly once
    pub token: String,

    /// When the session expires
    pub expires_at: DateTime<Utc>,
}

/// Sign up
///
/// Creates a user and signs them in, mirroring a signup form that drops the
/// new user straight into their task list.
///
/// # Errors
///
/// - `422`: username out of bounds, passwords did not match, or password
///   policy violation
/// - `409`: username already exists
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    req.validate()?;

    if req.password != req.password_confirm {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password_confirm".to_string(),
            message: "Passwords did not match".to_string(),
        }]));
    }

    password::validate_password_policy(&req.password).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    // Duplicate usernames surface as Conflict via the unique constraint
    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
        },
    )
    .await?;

    let (session, token) = Session::open(&state.db, user.id, state.session_ttl_days()).await?;

    tracing::info!(user_id = %user.id, "New account created");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user_id: user.id,
            username: user.username,
            token,
            expires_at: session.expires_at,
        }),
    ))
}

/// Sign in
///
/// Verifies credentials and opens a new session. Unknown usernames and
/// wrong passwords get the same message.
///
/// # Errors
///
/// - `401`: invalid credentials
pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> ApiResult<Json<SessionResponse>> {
    req.validate()?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    User::update_last_login(&state.db, user.id).await?;

    let (session, token) = Session::open(&state.db, user.id, state.session_ttl_days()).await?;

    Ok(Json(SessionResponse {
        user_id: user.id,
        username: user.username,
        token,
        expires_at: session.expires_at,
    }))
}

/// Sign out
///
/// Revokes the session that authenticated this request. The token stops
/// working immediately; other sessions of the same user are untouched.
pub async fn signout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    Session::revoke(&state.db, user.session_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Current user
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, current.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let req = SignupRequest {
            username: "alice".to_string(),
            password: "correct horse".to_string(),
            password_confirm: "correct horse".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = SignupRequest {
            username: "".to_string(),
            password: "correct horse".to_string(),
            password_confirm: "correct horse".to_string(),
        };
        assert!(req.validate().is_err());

        let req = SignupRequest {
            username: "a".repeat(151),
            password: "correct horse".to_string(),
            password_confirm: "correct horse".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_signin_request_validation() {
        let req = SigninRequest {
            username: "alice".to_string(),
            password: "whatever".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = SigninRequest {
            username: "".to_string(),
            password: "whatever".to_string(),
        };
        assert!(req.validate().is_err());
    }
}
