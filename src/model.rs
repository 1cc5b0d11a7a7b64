//! Ledger Model data shapes.
//!
//! Snapshots of a group, its members, and its receipts as supplied by the
//! external persistence collaborator. The core only reads these shapes and
//! returns new derived values (balances, transfers); it never mutates a
//! snapshot. Deserialization is permissive to match the loosely typed
//! documents the collaborator stores.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::money;

/// A person in a group, identified by name.
///
/// Names are case-sensitive, non-empty, and unique within a group; the name
/// is the identity key used throughout the ledger. There is no surrogate id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Display name and identity key.
    pub name: String,

    /// Payment handle (e.g. a UPI id) used when rendering payment requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_handle: Option<String>,
}

impl Member {
    /// Creates a member with no payment handle.
    pub fn new(name: impl Into<String>) -> Self {
        Member {
            name: name.into(),
            payment_handle: None,
        }
    }

    /// Creates a member with a payment handle.
    pub fn with_handle(name: impl Into<String>, handle: impl Into<String>) -> Self {
        Member {
            name: name.into(),
            payment_handle: Some(handle.into()),
        }
    }
}

/// A priced line on a receipt, together with who consumed it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    /// Price of one unit. Malformed or missing values deserialize as 0.
    #[serde(
        default,
        rename = "price",
        alias = "unitPrice",
        deserialize_with = "money::de_amount"
    )]
    pub unit_price: f64,

    /// Explicit unit count. When absent, the distinct consumer count (or 1)
    /// stands in; see [`Item::effective_quantity`].
    #[serde(
        default,
        alias = "qty",
        deserialize_with = "money::de_quantity",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<u32>,

    /// Members who consumed this item, in entry order. Duplicates have no
    /// additional effect.
    #[serde(default)]
    pub consumers: Vec<String>,
}

impl Item {
    /// Consumers with duplicates removed, in first-seen order.
    pub fn distinct_consumers(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.consumers
            .iter()
            .map(String::as_str)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Unit count used for totals: the explicit quantity, else the distinct
    /// consumer count when non-empty, else 1.
    pub fn effective_quantity(&self) -> u32 {
        match self.quantity {
            Some(q) if q >= 1 => q,
            _ => {
                let consumers = self.distinct_consumers().len();
                if consumers > 0 {
                    consumers as u32
                } else {
                    1
                }
            }
        }
    }

    /// Total cost of the line: unit price times effective quantity.
    pub fn line_total(&self) -> f64 {
        money::coerce(self.unit_price) * f64::from(self.effective_quantity())
    }
}

/// One itemized bill within a group.
///
/// Each receipt is aggregated independently and the results summed, so the
/// order of receipts never changes anyone's balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub items: Vec<Item>,

    /// Money fronted at the point of sale, member name → amount, in entry
    /// order.
    #[serde(default, deserialize_with = "money::de_amount_map")]
    pub payments: IndexMap<String, f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Root aggregate: a group of people and the receipts they share.
///
/// Removing a member does not scrub their name from existing receipts;
/// historical payments and consumer tags keep counting until the owning
/// collaborator rewrites them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub members: Vec<Member>,

    #[serde(default)]
    pub receipts: Vec<Receipt>,
}

impl Group {
    /// Roster names in member order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }
}
