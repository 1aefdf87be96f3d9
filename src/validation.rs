//! Input format checks.
//!
//! Deliberately minimal: one email regex. Anything beyond format is left to
//! human review of the lead data.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::AppError;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
    })
}

/// Is the string shaped like an email address?
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Reject malformed email addresses with an `InvalidArgument` error.
pub fn require_valid_email(value: &str) -> Result<(), AppError> {
    if is_valid_email(value) {
        Ok(())
    } else {
        Err(AppError::InvalidArgument(format!(
            "Invalid email address: {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("jane@example.com"));
        assert!(is_valid_email("j.doe+leads@sub.example.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaces in@example.com"));
        assert!(!is_valid_email("missing@tld"));
    }

    #[test]
    fn require_valid_email_errors_on_bad_input() {
        assert!(require_valid_email("jane@example.com").is_ok());
        assert!(matches!(
            require_valid_email("nope"),
            Err(AppError::InvalidArgument(_))
        ));
    }
}
