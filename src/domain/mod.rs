//! Domain layer - Core business logic and entities

pub mod error;
pub mod product;
pub mod user;
pub mod validation;

pub use error::DomainError;
pub use product::{
    Product, ProductDraft, ProductId, ProductInput, ProductRepository, ProductValidationError,
};
pub use user::{
    CredentialFormat, NewUser, StoredCredential, User, UserId, UserRepository,
    UserValidationError,
};
pub use validation::{FieldViolation, Violations};
