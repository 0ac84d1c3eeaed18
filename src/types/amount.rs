//! Decimal codec for monetary fields in the persisted document
//!
//! Balances are written as JSON numbers so the document stays readable and
//! compatible with hand-edited seed files. The number text is the exact
//! decimal (serde_json's `arbitrary_precision`), never an `f64`, so what is
//! flushed is what is loaded back and the scale survives: `100` stays `100`,
//! `12.50` stays `12.50`.
//!
//! Reading is lenient: numbers, numeric strings and `null` (treated as zero)
//! are all accepted.

use rust_decimal::Decimal;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::str::FromStr;

/// Serialize a decimal as an exact JSON number
pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    Number::from_str(&value.to_string())
        .map_err(ser::Error::custom)?
        .serialize(serializer)
}

/// Deserialize a decimal from a number, a numeric string or `null`
pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(number) => parse_decimal(&number.to_string()).map_err(de::Error::custom),
        Value::String(text) => parse_decimal(&text).map_err(de::Error::custom),
        Value::Null => Ok(Decimal::ZERO),
        other => Err(de::Error::custom(format!(
            "expected a decimal number or numeric string, found {}",
            other
        ))),
    }
}

/// Parse a decimal from user-facing text, accepting scientific notation
pub fn parse_decimal(text: &str) -> Result<Decimal, rust_decimal::Error> {
    let text = text.trim();
    Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text))
}
