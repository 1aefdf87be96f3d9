//! Account management handlers (admin).

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::{AuthInfo, canonical_email, password};
use crate::db::models::{AccountInfo, CreateAccountParams};
use crate::error::{AppError, AppResult};
use crate::startup::AppState;
use crate::validation::require_valid_email;

/// `GET /v1/users`: list all accounts.
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
) -> AppResult<Json<Vec<AccountInfo>>> {
    auth.require_admin()?;
    Ok(Json(state.db.accounts.list().await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    /// Omit to have a random password generated.
    pub password: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateAccountResponse {
    pub account: AccountInfo,
    /// Present only when the password was generated; shown once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

/// `POST /v1/users`: create an account.
pub async fn create_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
    Json(req): Json<CreateAccountRequest>,
) -> AppResult<Json<CreateAccountResponse>> {
    auth.require_admin()?;

    let email = canonical_email(&req.email);
    require_valid_email(&email)?;

    let (plain, generated) = match req.password {
        Some(p) if !p.is_empty() => (p, None),
        _ => {
            let p = password::generate();
            (p.clone(), Some(p))
        }
    };
    let password_hash = password::hash(&plain)?;

    let id = state
        .db
        .accounts
        .create(CreateAccountParams {
            id: Uuid::new_v4(),
            email: email.clone(),
            password_hash,
            is_admin: req.is_admin,
        })
        .await?;

    info!(account_id = %id, email = %email, created_by = %auth.email, "Account created");

    let account = state.db.accounts.get_by_id(id).await?;
    Ok(Json(CreateAccountResponse {
        account: account.into(),
        generated_password: generated,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetPasswordRequest {
    /// Omit to have a random password generated.
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

/// `POST /v1/users/{id}/password`: reset an account password.
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
    Path(id): Path<Uuid>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<Json<ResetPasswordResponse>> {
    auth.require_admin()?;

    let (plain, generated) = match req.password {
        Some(p) if !p.is_empty() => (p, None),
        _ => {
            let p = password::generate();
            (p.clone(), Some(p))
        }
    };
    let hash = password::hash(&plain)?;
    state.db.accounts.update_password(id, &hash).await?;

    info!(account_id = %id, reset_by = %auth.email, "Password reset");

    Ok(Json(ResetPasswordResponse {
        generated_password: generated,
    }))
}

#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    /// Speakers removed along with the account.
    pub cascaded_speakers: u64,
}

/// `DELETE /v1/users/{id}`: delete an account and its speakers.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthInfo>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DeleteAccountResponse>> {
    auth.require_admin()?;

    if id == auth.user_id {
        return Err(AppError::InvalidArgument(
            "Cannot delete your own account".to_string(),
        ));
    }

    let cascaded = state.db.accounts.delete(id).await?;
    info!(account_id = %id, cascaded_speakers = cascaded, deleted_by = %auth.email, "Account deleted");

    Ok(Json(DeleteAccountResponse {
        cascaded_speakers: cascaded,
    }))
}
