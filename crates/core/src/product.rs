//! Product documents.
//!
//! Products are only created by the seed; there is no product API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{
    PRODUCT_DESCRIPTION_MAX_LENGTH, PRODUCT_NAME_MAX_LENGTH, ValidationErrors, char_len,
};

/// A catalogue product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Display name, 1-200 characters.
    pub name: String,
    /// Optional description, at most 1000 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price, never negative.
    pub price: Decimal,
    /// Optional category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Stock availability, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
    /// Free-form tags, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Product {
    /// Check the product against the `products` document rules.
    ///
    /// # Errors
    ///
    /// Returns every rejected field at once.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name_len = char_len(&self.name);
        if name_len == 0 || name_len > PRODUCT_NAME_MAX_LENGTH {
            errors.push(
                "name",
                format!("Product name must be between 1 and {PRODUCT_NAME_MAX_LENGTH} characters"),
            );
        }

        if let Some(description) = &self.description
            && char_len(description) > PRODUCT_DESCRIPTION_MAX_LENGTH
        {
            errors.push(
                "description",
                format!(
                    "Product description must not exceed {PRODUCT_DESCRIPTION_MAX_LENGTH} characters"
                ),
            );
        }

        if self.price < Decimal::ZERO {
            errors.push("price", "Price must be a positive number");
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mug() -> Product {
        Product {
            name: "Coffee Mug".to_owned(),
            description: Some("Ceramic coffee mug with company logo".to_owned()),
            price: Decimal::new(1299, 2),
            category: Some("Accessories".to_owned()),
            in_stock: Some(true),
            tags: vec!["mug".to_owned(), "coffee".to_owned()],
        }
    }

    #[test]
    fn test_valid_product() {
        assert!(mug().validate().is_ok());
    }

    #[test]
    fn test_free_product_is_allowed() {
        let mut p = mug();
        p.price = Decimal::ZERO;
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_price_and_empty_name() {
        let mut p = mug();
        p.name = String::new();
        p.price = Decimal::new(-1, 0);

        let Err(errors) = p.validate() else {
            panic!("expected validation errors");
        };
        assert!(errors.contains("name"));
        assert!(errors.contains("price"));
    }

    #[test]
    fn test_rejects_long_description() {
        let mut p = mug();
        p.description = Some("d".repeat(1001));
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_price_serializes_as_string() {
        let json = serde_json::to_value(mug()).ok();
        assert_eq!(
            json.as_ref().and_then(|v| v.get("price")).and_then(|v| v.as_str()),
            Some("12.99")
        );
        assert_eq!(
            json.as_ref().and_then(|v| v.get("inStock")).and_then(serde_json::Value::as_bool),
            Some(true)
        );
    }
}
