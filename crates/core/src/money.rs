use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Lenient money parsing: trims whitespace and an optional leading currency
/// marker, maps anything non-numeric to zero, and clamps negatives to zero.
/// Catalog and quote records imported from spreadsheets routinely carry blank
/// or garbled amounts; a single bad field must never sink a whole costing run.
pub fn parse_amount(raw: &str) -> Decimal {
    let trimmed = raw.trim().trim_start_matches(['$', '₹', '€', '£']).trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    match Decimal::from_str(trimmed) {
        Ok(value) => value.max(Decimal::ZERO),
        Err(_) => Decimal::ZERO,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Numeric(Decimal),
    Text(String),
}

/// Serde adapter for amount fields: accepts a JSON number, a numeric string,
/// a malformed string (becomes zero), or null/absent (becomes zero).
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawAmount::Numeric(value)) => value.max(Decimal::ZERO),
        Some(RawAmount::Text(text)) => parse_amount(&text),
        None => Decimal::ZERO,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde::Deserialize;

    use super::parse_amount;

    #[test]
    fn parses_plain_decimal_strings() {
        assert_eq!(parse_amount("100"), Decimal::from(100));
        assert_eq!(parse_amount(" 49.99 "), Decimal::new(4999, 2));
    }

    #[test]
    fn strips_currency_markers() {
        assert_eq!(parse_amount("₹1500"), Decimal::from(1500));
        assert_eq!(parse_amount("$ 20.50"), Decimal::new(2050, 2));
    }

    #[test]
    fn malformed_input_becomes_zero() {
        assert_eq!(parse_amount(""), Decimal::ZERO);
        assert_eq!(parse_amount("abc"), Decimal::ZERO);
        assert_eq!(parse_amount("12abc"), Decimal::ZERO);
    }

    #[test]
    fn negative_amounts_clamp_to_zero() {
        assert_eq!(parse_amount("-50"), Decimal::ZERO);
    }

    #[derive(Deserialize)]
    struct Line {
        #[serde(default, deserialize_with = "super::lenient_amount")]
        price: Decimal,
    }

    #[test]
    fn lenient_amount_accepts_numbers_strings_and_null() {
        let from_number: Line = serde_json::from_str(r#"{"price": 42.5}"#).expect("number");
        assert_eq!(from_number.price, Decimal::new(425, 1));

        let from_string: Line = serde_json::from_str(r#"{"price": "42.5"}"#).expect("string");
        assert_eq!(from_string.price, Decimal::new(425, 1));

        let from_garbage: Line = serde_json::from_str(r#"{"price": "n/a"}"#).expect("garbage");
        assert_eq!(from_garbage.price, Decimal::ZERO);

        let from_null: Line = serde_json::from_str(r#"{"price": null}"#).expect("null");
        assert_eq!(from_null.price, Decimal::ZERO);
    }
}
