//! Provider payloads encode numbers either as JSON numbers or as decimal
//! strings. These deserializers accept both and keep absence explicit.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(serde_json::Number),
    Text(String),
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Numeric>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Numeric::Number(n)) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("number out of range"))?,
        Some(Numeric::Text(s)) => {
            s.trim().parse::<f64>().map_err(de::Error::custom)?
        },
    };

    if !value.is_finite() {
        return Err(de::Error::custom("non-finite number"));
    }

    Ok(Some(value))
}

pub fn opt_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Numeric::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| de::Error::custom("expected unsigned integer")),
        Some(Numeric::Text(s)) => {
            s.trim().parse::<u64>().map(Some).map_err(de::Error::custom)
        },
    }
}

pub fn opt_decimal<'de, D>(
    deserializer: D,
) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Numeric::Number(n)) => BigDecimal::from_str(&n.to_string())
            .map(Some)
            .map_err(de::Error::custom),
        Some(Numeric::Text(s)) => BigDecimal::from_str(s.trim())
            .map(Some)
            .map_err(de::Error::custom),
    }
}
