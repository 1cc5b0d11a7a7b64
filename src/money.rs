//! Monetary rounding, tolerance, and permissive numeric parsing.
//!
//! Balances accumulate as plain `f64`; rounding to 2 decimal places happens
//! only at solver and presentation boundaries, so rounding error does not
//! compound across receipts. Incoming documents are loosely typed, so
//! numeric fields accept numbers, numeric strings, null, or nothing at all
//! and degrade to 0 instead of failing.

use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Balances within this distance of zero count as settled.
///
/// Accumulating many receipts in `f64` leaves sub-cent noise; one cent is
/// the smallest amount anyone is asked to pay back.
pub const TOLERANCE: f64 = 0.01;

/// Rounds a value to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Collapses non-finite amounts to 0 so ledger arithmetic stays total.
pub fn coerce(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// A numeric field as it appears in stored documents: a number, a string
/// holding a number, or something unusable.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum LooseNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl LooseNumber {
    pub(crate) fn into_f64(self) -> f64 {
        match self {
            LooseNumber::Number(n) => coerce(n),
            LooseNumber::Text(s) => s.trim().parse().map(coerce).unwrap_or(0.0),
            LooseNumber::Other(_) => 0.0,
        }
    }
}

/// Deserializes an amount field, coercing malformed input to 0.
pub(crate) fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LooseNumber::deserialize(deserializer)?.into_f64())
}

/// Deserializes an optional unit count. Values below 1 (and anything
/// unusable) become `None`, leaving the fallback chain to the model.
pub(crate) fn de_quantity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = LooseNumber::deserialize(deserializer)?.into_f64();
    if value >= 1.0 && value <= f64::from(u32::MAX) {
        Ok(Some(value as u32))
    } else {
        Ok(None)
    }
}

/// Deserializes a name → amount map, preserving entry order and coercing
/// malformed amounts to 0.
pub(crate) fn de_amount_map<'de, D>(deserializer: D) -> Result<IndexMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, LooseNumber>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(name, v)| (name, v.into_f64())).collect())
}
