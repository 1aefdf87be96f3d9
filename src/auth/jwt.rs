//! JWT access token issuing and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthInfo;
use crate::db::models::Account;
use crate::error::AppError;

/// JWT issuer identifier
pub const ISSUER: &str = "speaker-service";
/// JWT audience identifier
pub const AUDIENCE: &str = "speaker-service";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Audience
    pub aud: String,
    /// Issuer
    pub iss: String,
    /// JWT ID (unique token identifier)
    pub jti: String,
    /// Account email
    pub email: String,
    /// Admin flag
    pub admin: bool,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

/// Issue an access token for an account.
pub fn issue_token(
    account: &Account,
    jwt_secret_key: &SecretString,
    ttl_minutes: u64,
) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = now + Duration::minutes(ttl_minutes as i64);

    let claims = Claims {
        sub: account.id.to_string(),
        aud: AUDIENCE.to_string(),
        iss: ISSUER.to_string(),
        jti: Uuid::new_v4().to_string(),
        email: account.email.clone(),
        admin: account.is_admin,
        exp: expiration.timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret_key.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("JWT encoding error: {e}")))
}

/// Shared token validator built once at startup.
#[derive(Clone)]
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    #[must_use]
    pub fn new(jwt_secret_key: &SecretString) -> Self {
        let mut validation = Validation::default();
        validation.set_audience(&[AUDIENCE]);
        validation.set_issuer(&[ISSUER]);

        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret_key.expose_secret().as_bytes()),
            validation,
        }
    }

    /// Validate a token and extract the caller's identity.
    pub fn validate(&self, token: &str) -> Result<AuthInfo, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::Unauthenticated(format!("Invalid token: {e}")))?;

        let claims = token_data.claims;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthenticated("Invalid account ID in token".to_string()))?;

        Ok(AuthInfo {
            user_id,
            email: claims.email,
            is_admin: claims.admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account(is_admin: bool) -> Account {
        Account {
            id: Uuid::new_v4(),
            email: "intern@example.com".to_string(),
            password: "hash".to_string(),
            is_admin,
            created_at: Utc::now(),
        }
    }

    fn test_secret() -> SecretString {
        SecretString::from("test_secret_key_minimum_32_chars!")
    }

    #[test]
    fn test_issue_and_validate_token() {
        let account = test_account(false);
        let secret = test_secret();

        let token = issue_token(&account, &secret, 15).unwrap();
        let info = JwtValidator::new(&secret).validate(&token).unwrap();

        assert_eq!(info.user_id, account.id);
        assert_eq!(info.email, account.email);
        assert!(!info.is_admin);
    }

    #[test]
    fn test_admin_flag_round_trips() {
        let account = test_account(true);
        let secret = test_secret();

        let token = issue_token(&account, &secret, 15).unwrap();
        let info = JwtValidator::new(&secret).validate(&token).unwrap();

        assert!(info.is_admin);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let account = test_account(false);
        let token = issue_token(&account, &test_secret(), 15).unwrap();

        let other = SecretString::from("another_secret_key_32_chars_long!");
        assert!(JwtValidator::new(&other).validate(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let validator = JwtValidator::new(&test_secret());
        assert!(validator.validate("invalid.token.here").is_err());
    }
}
