//! Authentication primitives: password hashing, JWT tokens, caller identity.

pub mod jwt;
pub mod password;

pub use jwt::JwtValidator;

use uuid::Uuid;

use crate::error::AppError;

/// Authenticated caller identity, injected into request extensions by the
/// auth middleware.
#[derive(Debug, Clone)]
pub struct AuthInfo {
    pub user_id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

impl AuthInfo {
    /// Reject non-admin callers.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::PermissionDenied(
                "Administrator access required".to_string(),
            ))
        }
    }
}

/// Canonical form of an account email: trimmed and lower-cased.
///
/// Emails are compared case-insensitively everywhere; canonicalizing at the
/// boundary keeps lookups consistent.
#[must_use]
pub fn canonical_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_admin_rejects_interns() {
        let intern = AuthInfo {
            user_id: Uuid::new_v4(),
            email: "intern@example.com".into(),
            is_admin: false,
        };
        assert!(intern.require_admin().is_err());

        let admin = AuthInfo {
            user_id: Uuid::new_v4(),
            email: "admin@example.com".into(),
            is_admin: true,
        };
        assert!(admin.require_admin().is_ok());
    }

    #[test]
    fn canonical_email_lowercases_and_trims() {
        assert_eq!(canonical_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }
}
