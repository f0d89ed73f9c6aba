//! Serde adapter that puts `BigDecimal` amounts on the wire as JSON numbers.
//!
//! Use with `#[serde(with = "crate::domain::money")]`. Decoding also accepts
//! the decimal-string form.

use bigdecimal::BigDecimal;
use serde::{de, Deserialize, Deserializer, Serializer};
use std::str::FromStr;

pub fn serialize<S>(amount: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    // Parsing the decimal text gives the nearest f64, unlike scaling the mantissa.
    let value: f64 = amount
        .to_string()
        .parse()
        .map_err(|_| serde::ser::Error::custom(format!("amount {} is not representable", amount)))?;
    serializer.serialize_f64(value)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(n) if n.is_finite() => n.to_string(),
        RawAmount::Number(n) => return Err(de::Error::custom(format!("amount {} is not finite", n))),
        RawAmount::Text(s) => s,
    };
    BigDecimal::from_str(text.trim()).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Priced {
        #[serde(with = "super")]
        price: BigDecimal,
    }

    #[test]
    fn writes_a_json_number() {
        let value = serde_json::to_value(Priced {
            price: BigDecimal::from_str("799.00").unwrap(),
        })
        .unwrap();
        assert!(value["price"].is_number());
        assert_eq!(value["price"].as_f64(), Some(799.0));

        let value = serde_json::to_value(Priced {
            price: BigDecimal::from_str("-20.27").unwrap(),
        })
        .unwrap();
        assert_eq!(value["price"].as_f64(), Some(-20.27));

        let value = serde_json::to_value(Priced {
            price: BigDecimal::from_str("888.99").unwrap(),
        })
        .unwrap();
        assert_eq!(value.to_string(), r#"{"price":888.99}"#);
    }

    #[test]
    fn reads_numbers_and_decimal_strings() {
        let from_number: Priced = serde_json::from_value(json!({ "price": 349.99 })).unwrap();
        assert_eq!(from_number.price, BigDecimal::from_str("349.99").unwrap());

        let from_text: Priced = serde_json::from_value(json!({ "price": "12.50" })).unwrap();
        assert_eq!(from_text.price, BigDecimal::from_str("12.5").unwrap());

        assert!(serde_json::from_value::<Priced>(json!({ "price": "cheap" })).is_err());
    }
}
