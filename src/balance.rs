//! Balance aggregation: reducing a group snapshot to one signed net
//! position per member.
//!
//! Aggregation is a pure function of its input. It recomputes from scratch
//! on every call, so a live-updating collaborator can re-run it after any
//! mutation without the core ever reflecting stale derived state.

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::model::Group;
use crate::money::{self, TOLERANCE};

/// Net position per member. Positive means the member is owed money,
/// negative means the member owes.
///
/// Iteration order is insertion order: roster members first, then ad hoc
/// names in the order the receipts introduced them. The settlement solver's
/// pairing depends on this order, so it is part of the contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceMap {
    entries: IndexMap<String, f64>,
}

impl BalanceMap {
    /// Creates an empty balance map.
    pub fn new() -> Self {
        BalanceMap {
            entries: IndexMap::new(),
        }
    }

    /// Ensures `name` has an entry, inserting 0 if unseen.
    pub fn ensure(&mut self, name: &str) {
        if !self.entries.contains_key(name) {
            self.entries.insert(name.to_string(), 0.0);
        }
    }

    /// Adds `amount` to `name`'s balance, inserting the entry if unseen.
    pub fn credit(&mut self, name: &str, amount: f64) {
        if let Some(balance) = self.entries.get_mut(name) {
            *balance += amount;
        } else {
            self.entries.insert(name.to_string(), amount);
        }
    }

    /// Subtracts `amount` from `name`'s balance, inserting the entry if
    /// unseen.
    pub fn debit(&mut self, name: &str, amount: f64) {
        self.credit(name, -amount);
    }

    /// Returns `name`'s balance, if present.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.get(name).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, v)| (name.as_str(), *v))
    }

    /// Net imbalance across all entries.
    ///
    /// A balanced ledger nets to ~0; a value past [`TOLERANCE`] signals
    /// unassigned cost or accumulated drift worth surfacing upstream.
    pub fn residual(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Whether every balance is within [`TOLERANCE`] of zero.
    pub fn is_settled(&self) -> bool {
        self.entries.values().all(|v| v.abs() <= TOLERANCE)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for BalanceMap {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        BalanceMap {
            entries: iter.into_iter().map(|(name, v)| (name.into(), v)).collect(),
        }
    }
}

/// Policy for items nobody is marked as having consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnassignedCost {
    /// The item debits no one; its cost is only visible as aggregate
    /// residual. Default.
    #[default]
    Ignore,

    /// The item's line total is divided evenly across the group roster.
    SplitAmongMembers,
}

/// Tuning for [`aggregate_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    pub unassigned_cost: UnassignedCost,
}

/// Reduces a group snapshot to net balances with the default options.
pub fn aggregate(group: &Group) -> BalanceMap {
    aggregate_with(group, AggregateOptions::default())
}

/// Reduces a group snapshot to net balances.
///
/// Every roster member appears, at 0 when inactive. Counter payments credit
/// the payer; every distinct consumer of an item is debited the full unit
/// price once for that item. Names missing from the roster are accumulated
/// as ad hoc participants rather than rejected, and malformed amounts
/// coerce to 0, so this function never fails.
pub fn aggregate_with(group: &Group, options: AggregateOptions) -> BalanceMap {
    let mut balances = BalanceMap::new();
    for name in group.member_names() {
        balances.ensure(name);
    }

    for receipt in &group.receipts {
        for (name, amount) in &receipt.payments {
            if !amount.is_finite() {
                warn!(
                    "receipt {}: non-finite payment for {}, treating as 0",
                    receipt.id, name
                );
            }
            balances.credit(name, money::coerce(*amount));
        }

        for item in &receipt.items {
            if !item.unit_price.is_finite() {
                warn!(
                    "receipt {}: non-finite price on item {:?}, treating as 0",
                    receipt.id, item.name
                );
            }
            let unit = money::coerce(item.unit_price);

            let consumers = item.distinct_consumers();
            if consumers.is_empty() {
                match options.unassigned_cost {
                    UnassignedCost::Ignore => {
                        if unit != 0.0 {
                            debug!(
                                "receipt {}: item {:?} has no consumers, cost left unassigned",
                                receipt.id, item.name
                            );
                        }
                    }
                    UnassignedCost::SplitAmongMembers => {
                        if !group.members.is_empty() {
                            let share = item.line_total() / group.members.len() as f64;
                            for name in group.member_names() {
                                balances.debit(name, share);
                            }
                        }
                    }
                }
                continue;
            }

            for consumer in consumers {
                balances.debit(consumer, unit);
            }
        }
    }

    balances
}
