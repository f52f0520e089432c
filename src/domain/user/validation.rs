//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::domain::validation::{FieldViolation, Violations};

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Username is required")]
    EmptyUsername,

    #[error("Username must be between {0} and {1} characters")]
    UsernameLength(usize, usize),

    #[error("Invalid username format")]
    InvalidUsernameFormat,

    #[error("Password is required")]
    EmptyPassword,

    #[error("Password must be between {0} and {1} characters")]
    PasswordLength(usize, usize),

    #[error("Password must contain at least one letter and one digit")]
    WeakPassword,

    #[error("Full name must not exceed {0} characters")]
    FullNameTooLong(usize),

    #[error("Email must not exceed {0} characters")]
    EmailTooLong(usize),

    #[error("Invalid email format")]
    InvalidEmail,
}

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;
const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_PASSWORD_LENGTH: usize = 100;
const MAX_FULL_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 255;

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._-]+$").expect("username pattern is a valid regex")
});

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// Validate a username
///
/// Rules:
/// - Cannot be blank
/// - Between 3 and 50 characters
/// - Only letters, digits, dots, underscores and hyphens
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.trim().is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }

    let length = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(UserValidationError::UsernameLength(
            MIN_USERNAME_LENGTH,
            MAX_USERNAME_LENGTH,
        ));
    }

    if !USERNAME_PATTERN.is_match(username) {
        return Err(UserValidationError::InvalidUsernameFormat);
    }

    Ok(())
}

/// Validate a raw password before it is hashed
///
/// Rules:
/// - Cannot be blank
/// - Between 6 and 100 characters
/// - At least one ASCII letter and one ASCII digit
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.trim().is_empty() {
        return Err(UserValidationError::EmptyPassword);
    }

    let length = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        return Err(UserValidationError::PasswordLength(
            MIN_PASSWORD_LENGTH,
            MAX_PASSWORD_LENGTH,
        ));
    }

    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(UserValidationError::WeakPassword);
    }

    Ok(())
}

pub fn validate_full_name(full_name: &str) -> Result<(), UserValidationError> {
    if full_name.chars().count() > MAX_FULL_NAME_LENGTH {
        return Err(UserValidationError::FullNameTooLong(MAX_FULL_NAME_LENGTH));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_PATTERN.is_match(email) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate every field of a registration, collecting all violations
pub fn validate_registration(
    username: &str,
    password: &str,
    full_name: Option<&str>,
    email: Option<&str>,
) -> Result<(), Vec<FieldViolation>> {
    let mut violations = Violations::new();

    violations.check("username", validate_username(username));
    violations.check("password", validate_password(password));
    if let Some(full_name) = full_name {
        violations.check("full_name", validate_full_name(full_name));
    }
    if let Some(email) = email {
        violations.check("email", validate_email(email));
    }

    violations.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(validate_username("alice1").is_ok());
        assert!(validate_username("bob.smith").is_ok());
        assert!(validate_username("user_name-2").is_ok());
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn test_blank_username() {
        assert_eq!(
            validate_username("   "),
            Err(UserValidationError::EmptyUsername)
        );
        assert_eq!(validate_username(""), Err(UserValidationError::EmptyUsername));
    }

    #[test]
    fn test_username_length() {
        assert_eq!(
            validate_username("ab"),
            Err(UserValidationError::UsernameLength(3, 50))
        );
        assert_eq!(
            validate_username(&"a".repeat(51)),
            Err(UserValidationError::UsernameLength(3, 50))
        );
    }

    #[test]
    fn test_username_format() {
        assert_eq!(
            validate_username("alice smith"),
            Err(UserValidationError::InvalidUsernameFormat)
        );
        assert_eq!(
            validate_username("alice@home"),
            Err(UserValidationError::InvalidUsernameFormat)
        );
    }

    #[test]
    fn test_valid_passwords() {
        assert!(validate_password("Passw0rd").is_ok());
        assert!(validate_password("abc123").is_ok());
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(validate_password(""), Err(UserValidationError::EmptyPassword));
        assert_eq!(
            validate_password("a1b2"),
            Err(UserValidationError::PasswordLength(6, 100))
        );
        assert_eq!(
            validate_password("onlyletters"),
            Err(UserValidationError::WeakPassword)
        );
        assert_eq!(
            validate_password("12345678"),
            Err(UserValidationError::WeakPassword)
        );
        assert!(validate_password(&format!("a1{}", "x".repeat(99))).is_err());
    }

    #[test]
    fn test_password_letter_must_be_ascii() {
        assert_eq!(
            validate_password("éééééé1"),
            Err(UserValidationError::WeakPassword)
        );
        assert_eq!(
            validate_password("пароль1"),
            Err(UserValidationError::WeakPassword)
        );
        assert!(validate_password("ééééé1a").is_ok());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("alice@example.com").is_ok());
        assert_eq!(
            validate_email("not-an-email"),
            Err(UserValidationError::InvalidEmail)
        );
        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            validate_email(&long),
            Err(UserValidationError::EmailTooLong(255))
        );
    }

    #[test]
    fn test_full_name_length() {
        assert!(validate_full_name("Alice Nguyen").is_ok());
        assert_eq!(
            validate_full_name(&"x".repeat(101)),
            Err(UserValidationError::FullNameTooLong(100))
        );
    }

    #[test]
    fn test_registration_lists_every_violation() {
        let violations =
            validate_registration("a!", "short", None, Some("bad")).unwrap_err();

        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["username", "password", "email"]);
    }
}
