use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde_json::Value;

use super::errors::ExtractionError;
use super::price;

/// Order fields recovered from free text. Fields the service could not
/// determine are empty strings or zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOrder {
    pub customer_name: String,
    pub phone_number: String,
    pub items: String,
    pub total_price: BigDecimal,
    pub notes: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractedFields {
    customer_name: String,
    items: String,
    total_price: Value,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

impl ParsedOrder {
    /// Validate the JSON text produced by the extraction service.
    ///
    /// `customerName`, `items` and `totalPrice` are required; a present but
    /// non-numeric `totalPrice` normalizes like any other price.
    pub fn from_json(text: &str) -> Result<Self, ExtractionError> {
        let fields: ExtractedFields =
            serde_json::from_str(text).map_err(|e| ExtractionError::Malformed(e.to_string()))?;
        Ok(ParsedOrder {
            customer_name: fields.customer_name,
            phone_number: fields.phone_number.unwrap_or_default(),
            items: fields.items,
            total_price: price::normalize_price(&fields.total_price),
            notes: fields.notes.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::Zero;

    #[test]
    fn optional_fields_default_to_empty() {
        let parsed = ParsedOrder::from_json(
            r#"{"customerName":"John","items":"2x Cookies","totalPrice":15}"#,
        )
        .expect("parse");

        assert_eq!(parsed.customer_name, "John");
        assert_eq!(parsed.phone_number, "");
        assert_eq!(parsed.notes, "");
        assert_eq!(parsed.total_price, BigDecimal::from(15));
    }

    #[test]
    fn missing_required_field_is_malformed() {
        let err = ParsedOrder::from_json(r#"{"customerName":"John","totalPrice":15}"#)
            .expect_err("items is required");
        assert!(matches!(err, ExtractionError::Malformed(_)));
    }

    #[test]
    fn null_price_is_zero() {
        let parsed = ParsedOrder::from_json(
            r#"{"customerName":"","items":"","totalPrice":null,"phoneNumber":null}"#,
        )
        .expect("parse");
        assert_eq!(parsed.total_price, BigDecimal::zero());
        assert_eq!(parsed.phone_number, "");
    }

    #[test]
    fn non_json_text_is_malformed() {
        let err = ParsedOrder::from_json("Sure! Here is the order").expect_err("not json");
        assert!(matches!(err, ExtractionError::Malformed(_)));
    }
}
