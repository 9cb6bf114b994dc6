//! Lenient field decoders for backend payloads.
//!
//! The backend fills missing CSV cells with `""`, `"N/A"` or `null` and sends
//! numeric codes either as numbers or as strings. None of those are errors.
//! A record too broken to use (no timestamp, no logon id) is dropped from its
//! batch instead of failing the whole response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::model::LogonType;
use crate::util::time::Timestamp;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) if f.fract() == 0.0 => format!("{}", f as i64),
            Scalar::Float(f) => f.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

/// Identifier that may arrive as a string or a number.
pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Scalar::deserialize(d)?.into_text())
}

/// Optional string; `null` and `""` are absent.
pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?
        .map(Scalar::into_text)
        .filter(|s| !s.is_empty()))
}

/// Optional numeric code; anything that does not parse as an integer is absent.
pub fn opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?.and_then(|s| match s {
        Scalar::Int(i) => u32::try_from(i).ok(),
        other => {
            let text = other.into_text();
            text.trim().parse().ok()
        }
    }))
}

pub fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Option::<Scalar>::deserialize(d)? {
        Some(Scalar::Bool(b)) => b,
        Some(Scalar::Int(i)) => i != 0,
        Some(Scalar::Float(f)) => f != 0.0,
        Some(Scalar::Text(s)) => s.trim().eq_ignore_ascii_case("true"),
        None => false,
    })
}

pub fn opt_logon_type<'de, D: Deserializer<'de>>(d: D) -> Result<Option<LogonType>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?.and_then(|s| LogonType::from_raw(&s.into_text())))
}

/// Optional timestamp; unparseable values are absent rather than fatal.
pub fn opt_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Timestamp>, D::Error> {
    Ok(Option::<String>::deserialize(d)?.and_then(|s| Timestamp::parse(&s)))
}

/// Optional float; `null` and non-finite values are absent.
pub fn opt_minutes<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Scalar>::deserialize(d)?.and_then(|s| match s {
        Scalar::Int(i) => Some(i as f64),
        Scalar::Float(f) if f.is_finite() => Some(f),
        Scalar::Text(t) => t.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }))
}

/// Decode a JSON array row by row. Rows that do not decode as `T` are logged
/// and skipped; the rest are kept in order.
pub fn rows<T: DeserializeOwned>(values: Vec<serde_json::Value>, source: &str) -> Vec<T> {
    let total = values.len();
    let rows: Vec<T> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(row) => Some(row),
            Err(e) => {
                tracing::warn!(source, index, error = %e, "skipping malformed record");
                None
            }
        })
        .collect();
    if rows.len() < total {
        tracing::warn!(source, total, kept = rows.len(), "dropped malformed records");
    }
    rows
}
