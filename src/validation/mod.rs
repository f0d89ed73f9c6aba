use bigdecimal::BigDecimal;
use std::fmt;
use std::str::FromStr;

pub const PRODUCT_ID_MAX_LEN: usize = 64;
pub const PRODUCT_NAME_MAX_LEN: usize = 200;
pub const CATEGORY_MAX_LEN: usize = 100;
pub const IMAGE_URL_MAX_LEN: usize = 2048;
pub const MAX_CHECKOUT_ITEMS: usize = 100;
pub const MAX_ITEM_QUANTITY: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Prefixes the field with its position in a list, e.g. `items[2].price`.
    pub fn at(self, list: &str, index: usize) -> Self {
        Self {
            field: format!("{}[{}].{}", list, index, self.field),
            message: self.message,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &str, value: &str, max_len: usize) -> ValidationResult {
    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

/// Sanitizes and checks a required text field, returning the cleaned value.
pub fn required_text(field: &str, value: Option<&str>, max_len: usize) -> Result<String, ValidationError> {
    let value = sanitize_string(value.unwrap_or_default());
    validate_required(field, &value)?;
    validate_max_len(field, &value, max_len)?;
    Ok(value)
}

/// Converts a JSON price into an exact decimal. Must be finite and not negative.
pub fn validate_price(field: &str, price: Option<f64>) -> Result<BigDecimal, ValidationError> {
    let price = price.ok_or_else(|| ValidationError::new(field, "is required"))?;
    if !price.is_finite() {
        return Err(ValidationError::new(field, "must be a finite number"));
    }
    if price < 0.0 {
        return Err(ValidationError::new(field, "must not be negative"));
    }

    BigDecimal::from_str(&price.to_string())
        .map_err(|e| ValidationError::new(field, format!("is not a valid amount: {}", e)))
}

/// Quantity defaults to 1 and must lie within `1..=MAX_ITEM_QUANTITY`.
pub fn validate_quantity(field: &str, quantity: Option<i64>) -> Result<u32, ValidationError> {
    let quantity = quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(ValidationError::new(field, "must be at least 1"));
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::new(
            field,
            format!("must be at most {}", MAX_ITEM_QUANTITY),
        ));
    }

    Ok(quantity as u32)
}
