use std::str::FromStr;

use bigdecimal::{BigDecimal, Signed, Zero};
use serde_json::Value;

/// Amounts must stay below this many whole digits, which keeps every stored
/// price (two decimals included) exact as a JSON double.
const MAX_WHOLE_DIGITS: i64 = 13;

/// Coerce raw user or persisted input into an order amount.
///
/// Numbers keep their decimal value, strings are parsed after trimming (an
/// empty string is zero), and every other JSON value becomes zero. Results go
/// through [`sanitize_price`].
pub fn normalize_price(raw: &Value) -> BigDecimal {
    match raw {
        Value::Number(n) => sanitize_price(&parse_price(&n.to_string())),
        Value::String(s) => parse_price(s),
        _ => BigDecimal::zero(),
    }
}

/// Parse a price typed as text. Anything that is not a decimal number is zero.
pub fn parse_price(text: &str) -> BigDecimal {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return BigDecimal::zero();
    }
    match BigDecimal::from_str(trimmed) {
        Ok(value) => sanitize_price(&value),
        Err(_) => BigDecimal::zero(),
    }
}

/// Clamp an amount into the storable range: negative or out-of-range values
/// become zero, everything else is rounded to cents.
pub fn sanitize_price(value: &BigDecimal) -> BigDecimal {
    if value.is_negative() {
        return BigDecimal::zero();
    }
    // Decide on magnitude before touching the scale; a huge exponent would
    // otherwise expand into an equally huge integer.
    let whole = whole_digits(value);
    if whole > MAX_WHOLE_DIGITS {
        log::warn!("Price with {} whole digits is out of range, using 0", whole);
        return BigDecimal::zero();
    }
    if whole < -2 {
        return BigDecimal::zero();
    }
    let rounded = value.round(2).with_scale(2);
    if whole_digits(&rounded) > MAX_WHOLE_DIGITS {
        return BigDecimal::zero();
    }
    rounded
}

/// Digits left of the decimal point, negative for values below 0.1.
fn whole_digits(value: &BigDecimal) -> i64 {
    let (digits, scale) = value.as_bigint_and_exponent();
    digits.magnitude().to_string().len() as i64 - scale
}

/// Render an amount with exactly two decimal places, e.g. `29.00`.
pub fn format_amount(value: &BigDecimal) -> String {
    value.round(2).with_scale(2).to_string()
}

/// Serde adapter storing prices as JSON numbers.
///
/// Reading accepts any JSON value and runs it through [`normalize_price`], so
/// a corrupt price never fails the surrounding record. Writing goes through
/// the two-decimal text, which a double holds exactly within range.
pub mod json_number {
    use bigdecimal::BigDecimal;
    use serde::{ser, Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        let text = super::format_amount(&super::sanitize_price(value));
        let number = text.parse::<f64>().map_err(ser::Error::custom)?;
        serializer.serialize_f64(number)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(super::normalize_price(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[test]
    fn numbers_keep_their_value() {
        assert_eq!(normalize_price(&json!(18)), dec("18"));
        assert_eq!(normalize_price(&json!(9.99)), dec("9.99"));
    }

    #[test]
    fn numeric_strings_are_parsed() {
        assert_eq!(normalize_price(&json!("12.50")), dec("12.5"));
        assert_eq!(normalize_price(&json!("  7 ")), dec("7"));
    }

    #[test]
    fn garbage_becomes_zero() {
        assert_eq!(normalize_price(&json!("abc")), BigDecimal::zero());
        assert_eq!(normalize_price(&json!("")), BigDecimal::zero());
        assert_eq!(normalize_price(&json!("NaN")), BigDecimal::zero());
        assert_eq!(normalize_price(&Value::Null), BigDecimal::zero());
        assert_eq!(normalize_price(&json!([1, 2])), BigDecimal::zero());
        assert_eq!(normalize_price(&json!({ "amount": 3 })), BigDecimal::zero());
    }

    #[test]
    fn negative_amounts_are_clamped() {
        assert_eq!(normalize_price(&json!(-4)), BigDecimal::zero());
        assert_eq!(parse_price("-0.01"), BigDecimal::zero());
    }

    #[test]
    fn amounts_are_rounded_to_cents() {
        assert_eq!(parse_price("2.499"), dec("2.50"));
        assert_eq!(parse_price("0.001"), BigDecimal::zero());
        assert_eq!(normalize_price(&json!(0.1)), dec("0.10"));
    }

    #[test]
    fn out_of_range_amounts_become_zero() {
        assert_eq!(parse_price("1e100000000"), BigDecimal::zero());
        assert_eq!(parse_price("1e-100000000"), BigDecimal::zero());
        assert_eq!(parse_price("1e400"), BigDecimal::zero());
        assert_eq!(parse_price("12345678901234567.25"), BigDecimal::zero());
        assert_eq!(parse_price("9999999999999.999"), BigDecimal::zero());
        assert_eq!(normalize_price(&json!(1e300)), BigDecimal::zero());
        assert_eq!(normalize_price(&json!(u64::MAX)), BigDecimal::zero());
        assert_eq!(parse_price("9999999999999.99"), dec("9999999999999.99"));
    }

    #[test]
    fn huge_exponent_is_cheap_to_format() {
        let price = parse_price("1e100000000");
        assert_eq!(format_amount(&price), "0.00");
    }

    #[test]
    fn format_amount_uses_two_decimals() {
        assert_eq!(format_amount(&dec("29")), "29.00");
        assert_eq!(format_amount(&dec("9.5")), "9.50");
        assert_eq!(format_amount(&dec("1.234")), "1.23");
    }

    #[test]
    fn json_number_adapter_tolerates_bad_input() {
        #[derive(serde::Deserialize, serde::Serialize)]
        struct Wrapper {
            #[serde(with = "json_number")]
            price: BigDecimal,
        }

        let parsed: Wrapper = serde_json::from_value(json!({ "price": "oops" })).expect("parse");
        assert_eq!(parsed.price, BigDecimal::zero());

        let written = serde_json::to_value(Wrapper { price: dec("18.00") }).expect("serialize");
        assert_eq!(written, json!({ "price": 18.0 }));

        let largest = dec("9999999999999.99");
        let raw = serde_json::to_string(&Wrapper { price: largest.clone() }).expect("serialize");
        let back: Wrapper = serde_json::from_str(&raw).expect("parse");
        assert_eq!(back.price, largest);
    }
}
