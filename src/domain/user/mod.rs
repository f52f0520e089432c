//! User domain
//!
//! This module provides domain types and traits for user authentication,
//! including user entities, stored credentials, validation, and repository traits.

mod credential;
mod entity;
mod repository;
mod validation;

pub use credential::{is_bcrypt_hash, CredentialFormat, StoredCredential};
pub use entity::{NewUser, User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_full_name, validate_password, validate_registration,
    validate_username, UserValidationError,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
