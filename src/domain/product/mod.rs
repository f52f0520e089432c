//! Product domain

mod entity;
mod repository;
mod validation;

pub use entity::{Product, ProductDraft, ProductId};
pub use repository::ProductRepository;
pub use validation::{
    validate_name, validate_price, validate_quantity, ProductInput, ProductValidationError,
};
