//! Account routes: signup, login, session check

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{
    error::{ApiError, ApiResult},
    models::NewAccount,
    password,
    state::AppState,
    validation,
};

/// Request for account signup
///
/// Fields are optional at the serde level so a missing one becomes a 400
/// with a message rather than a deserialization rejection.
#[derive(Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Request for account login
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Session check endpoint, only reachable through the access guard
pub async fn session() -> impl IntoResponse {
    Json(json!({
        "message": "User logged in",
        "isLoggedIn": true,
    }))
}

/// Account signup endpoint
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    let (Some(username), Some(email), Some(password)) =
        (payload.username, payload.email, payload.password)
    else {
        return Err(ApiError::Validation("All fields are required.".to_string()));
    };

    validation::require(&username, "Username").map_err(ApiError::Validation)?;
    validation::require(&password, "Password").map_err(ApiError::Validation)?;
    validation::validate_email(&email).map_err(ApiError::Validation)?;

    let password_hash = password::hash(&password).map_err(|e| {
        error!("failed to hash password: {e}");
        ApiError::Internal
    })?;

    let account = state
        .store
        .create_account(&NewAccount {
            username,
            email,
            password_hash,
        })
        .await
        .map_err(|e| {
            if e.is_conflict() {
                ApiError::Conflict("Email already registered.".to_string())
            } else {
                ApiError::Store(e)
            }
        })?;

    info!(account_id = %account.id, "account registered");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration Successful.",
            "data": account,
        })),
    ))
}

/// Account login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(ApiError::Validation("All fields are required.".to_string()));
    };
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::Validation("All fields are required.".to_string()));
    }

    // Unknown email and wrong password are indistinguishable to the caller.
    let account = state
        .store
        .find_account_by_email(&email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify(&account.password_hash, &password) {
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.jwt.issue(account.id, &account.email).map_err(|e| {
        error!("failed to issue token: {e}");
        ApiError::Internal
    })?;

    info!(account_id = %account.id, "login successful");

    Ok(Json(json!({
        "message": "Login Successful",
        "token": token,
    })))
}
