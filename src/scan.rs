//! Boundary for the bill-scanning collaborator.
//!
//! The scanner takes a photo and returns an ordered JSON array of loose
//! `{name, price}` records; nothing about them is trusted. This module
//! coerces those records into typed [`Item`]s (finite non-negative price,
//! no explicit quantity, empty consumer set) before they can reach the
//! aggregator. Malformed JSON is the only failure; malformed fields inside
//! a record degrade instead.

use log::warn;
use serde::Deserialize;

use crate::error::Result;
use crate::model::Item;
use crate::money;

/// One raw line as returned by the scanner.
#[derive(Debug, Clone, Deserialize)]
pub struct ScannedItem {
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "money::de_amount")]
    pub price: f64,
}

/// Parses the scanner's JSON payload into typed items.
///
/// Items are assigned ids of the form `<id_prefix>-<index>` in payload
/// order. An empty array is a valid (empty) result.
pub fn items_from_json(json: &str, id_prefix: &str) -> Result<Vec<Item>> {
    let records: Vec<ScannedItem> = serde_json::from_str(json)?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, record)| item_from_record(record, format!("{}-{}", id_prefix, index)))
        .collect())
}

/// Coerces one scanned record into an item with no consumers assigned.
///
/// Unit prices are non-negative; a negative scan result is treated as a
/// misread and degraded to 0.
pub fn item_from_record(record: ScannedItem, id: String) -> Item {
    let mut price = money::coerce(record.price);
    if price < 0.0 {
        warn!(
            "scanned item {:?}: negative price {}, treating as 0",
            record.name, price
        );
        price = 0.0;
    }

    Item {
        id,
        name: record.name,
        unit_price: price,
        quantity: None,
        consumers: Vec::new(),
    }
}
