//! Product validation utilities

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use super::entity::ProductDraft;
use crate::domain::validation::{FieldViolation, Violations};

/// Errors that can occur during product validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProductValidationError {
    #[error("Product name is required")]
    EmptyName,

    #[error("Name must be between {0} and {1} characters")]
    NameLength(usize, usize),

    #[error("Description must not exceed {0} characters")]
    DescriptionTooLong(usize),

    #[error("Price is required")]
    MissingPrice,

    #[error("Price must be greater than 0")]
    NonPositivePrice,

    #[error("Price must have at most {0} decimal places")]
    PriceScale(u32),

    #[error("Price must have at most {0} integer digits")]
    PriceTooLarge(u32),

    #[error("Quantity cannot be negative")]
    NegativeQuantity,

    #[error("Category must not exceed {0} characters")]
    CategoryTooLong(usize),
}

const MIN_NAME_LENGTH: usize = 3;
const MAX_NAME_LENGTH: usize = 100;
const MAX_DESCRIPTION_LENGTH: usize = 500;
const MAX_CATEGORY_LENGTH: usize = 100;

/// Bounds of the `NUMERIC(19, 4)` price column
const MAX_PRICE_SCALE: u32 = 4;
const MAX_PRICE_INTEGER_DIGITS: u32 = 15;

pub fn validate_name(name: &str) -> Result<(), ProductValidationError> {
    if name.trim().is_empty() {
        return Err(ProductValidationError::EmptyName);
    }

    let length = name.chars().count();
    if !(MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length) {
        return Err(ProductValidationError::NameLength(
            MIN_NAME_LENGTH,
            MAX_NAME_LENGTH,
        ));
    }

    Ok(())
}

pub fn validate_price(price: Option<Decimal>) -> Result<(), ProductValidationError> {
    match price {
        None => Err(ProductValidationError::MissingPrice),
        Some(price) if price <= Decimal::ZERO => Err(ProductValidationError::NonPositivePrice),
        Some(price) if price.normalize().scale() > MAX_PRICE_SCALE => {
            Err(ProductValidationError::PriceScale(MAX_PRICE_SCALE))
        }
        Some(price) if price.trunc() >= Decimal::from(10_i64.pow(MAX_PRICE_INTEGER_DIGITS)) => {
            Err(ProductValidationError::PriceTooLarge(MAX_PRICE_INTEGER_DIGITS))
        }
        Some(_) => Ok(()),
    }
}

pub fn validate_quantity(quantity: i32) -> Result<(), ProductValidationError> {
    if quantity < 0 {
        return Err(ProductValidationError::NegativeQuantity);
    }
    Ok(())
}

fn validate_max_length(
    value: Option<&str>,
    max: usize,
    error: fn(usize) -> ProductValidationError,
) -> Result<(), ProductValidationError> {
    match value {
        Some(value) if value.chars().count() > max => Err(error(max)),
        _ => Ok(()),
    }
}

/// Unvalidated product fields as submitted by a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Trim optional text, treating blank values as absent
fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ProductInput {
    /// Check every field rule and produce a draft, or every violation found
    pub fn validate(self) -> Result<ProductDraft, Vec<FieldViolation>> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or_default();
        let description = normalize(self.description);
        let category = normalize(self.category);
        let quantity = self.quantity.unwrap_or(0);

        let mut violations = Violations::new();
        violations.check("name", validate_name(&name));
        violations.check(
            "description",
            validate_max_length(
                description.as_deref(),
                MAX_DESCRIPTION_LENGTH,
                ProductValidationError::DescriptionTooLong,
            ),
        );
        violations.check("price", validate_price(self.price));
        violations.check("quantity", validate_quantity(quantity));
        violations.check(
            "category",
            validate_max_length(
                category.as_deref(),
                MAX_CATEGORY_LENGTH,
                ProductValidationError::CategoryTooLong,
            ),
        );
        violations.into_result()?;

        // price presence was checked above
        let price = self.price.unwrap_or(Decimal::ZERO);

        Ok(ProductDraft {
            name,
            description,
            price,
            quantity,
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, price: Option<Decimal>, quantity: Option<i32>) -> ProductInput {
        ProductInput {
            name: Some(name.to_string()),
            description: None,
            price,
            quantity,
            category: None,
        }
    }

    #[test]
    fn test_valid_product() {
        let draft = input("  Laptop ", Some(Decimal::new(1500, 0)), Some(10))
            .validate()
            .unwrap();

        assert_eq!(draft.name, "Laptop");
        assert_eq!(draft.price, Decimal::new(1500, 0));
        assert_eq!(draft.quantity, 10);
    }

    #[test]
    fn test_quantity_defaults_to_zero() {
        let draft = input("Laptop", Some(Decimal::ONE), None).validate().unwrap();
        assert_eq!(draft.quantity, 0);
    }

    #[test]
    fn test_price_must_be_positive() {
        for price in [Decimal::ZERO, Decimal::new(-5, 0)] {
            let violations = input("Laptop", Some(price), Some(1)).validate().unwrap_err();
            assert_eq!(
                violations,
                vec![FieldViolation::new("price", "Price must be greater than 0")]
            );
        }
    }

    #[test]
    fn test_price_fits_storage_precision() {
        let too_precise: Decimal = "0.00001".parse().unwrap();
        let violations = input("Laptop", Some(too_precise), Some(1)).validate().unwrap_err();
        assert_eq!(violations[0].message, "Price must have at most 4 decimal places");

        let too_large: Decimal = "123456789012345678.5".parse().unwrap();
        let violations = input("Laptop", Some(too_large), Some(1)).validate().unwrap_err();
        assert_eq!(violations[0].message, "Price must have at most 15 integer digits");
    }

    #[test]
    fn test_price_precision_boundaries() {
        for accepted in ["0.0001", "1.50000", "999999999999999.9999"] {
            let price: Decimal = accepted.parse().unwrap();
            assert!(validate_price(Some(price)).is_ok(), "{} should pass", accepted);
        }

        let price: Decimal = "1000000000000000".parse().unwrap();
        assert_eq!(
            validate_price(Some(price)),
            Err(ProductValidationError::PriceTooLarge(15))
        );
    }

    #[test]
    fn test_price_required() {
        let violations = input("Laptop", None, Some(1)).validate().unwrap_err();
        assert_eq!(violations[0].message, "Price is required");
    }

    #[test]
    fn test_negative_quantity() {
        let violations = input("Laptop", Some(Decimal::ONE), Some(-1))
            .validate()
            .unwrap_err();
        assert_eq!(violations[0].field, "quantity");
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let mut product = input("Laptop", Some(Decimal::ONE), None);
        product.description = Some("   ".to_string());
        product.category = Some(" Electronics ".to_string());

        let draft = product.validate().unwrap();
        assert!(draft.description.is_none());
        assert_eq!(draft.category.as_deref(), Some("Electronics"));
    }

    #[test]
    fn test_collects_all_violations() {
        let product = ProductInput {
            name: Some("ab".to_string()),
            description: Some("d".repeat(501)),
            price: None,
            quantity: Some(-3),
            category: Some("c".repeat(101)),
        };

        let fields: Vec<String> = product
            .validate()
            .unwrap_err()
            .into_iter()
            .map(|v| v.field)
            .collect();
        assert_eq!(
            fields,
            vec!["name", "description", "price", "quantity", "category"]
        );
    }

    #[test]
    fn test_missing_name() {
        let violations = ProductInput {
            price: Some(Decimal::ONE),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            violations,
            vec![FieldViolation::new("name", "Product name is required")]
        );
    }
}
