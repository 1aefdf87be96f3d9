//! Authentication handlers: login and password change.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{AuthInfo, canonical_email, jwt, password};
use crate::db::models::AccountInfo;
use crate::error::{AppError, AppResult};
use crate::startup::AppState;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AccountInfo,
}

fn failed_login() -> AppError {
    AppError::Unauthenticated("Invalid email or password".to_string())
}

/// `POST /v1/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = canonical_email(&req.email);
    info!(email = %email, "Authentication attempt");

    let Some(account) = state.db.accounts.get_by_email(&email).await? else {
        warn!(email = %email, "Account not found");
        return Err(failed_login());
    };

    if !password::verify(&req.password, &account.password) {
        warn!(email = %email, "Invalid password");
        return Err(failed_login());
    }

    let token = jwt::issue_token(
        &account,
        &state.tokens.jwt_secret_key,
        state.tokens.access_token_ttl_minutes,
    )?;

    info!(user_id = %account.id, "Authentication successful");

    Ok(Json(LoginResponse {
        token,
        user: account.into(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// `POST /v1/auth/password`: change own password with current-password proof.
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<()> {
    if req.new_password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidArgument(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let account = state.db.accounts.get_by_id(auth.user_id).await?;

    if !password::verify(&req.current_password, &account.password) {
        warn!(user_id = %auth.user_id, "Password change with wrong current password");
        return Err(AppError::Unauthenticated(
            "Current password is incorrect".to_string(),
        ));
    }

    let hash = password::hash(&req.new_password)?;
    state.db.accounts.update_password(auth.user_id, &hash).await?;

    info!(user_id = %auth.user_id, "Password changed");
    Ok(())
}
