//! # Split Ledger
//!
//! Ledger aggregation and greedy debt settlement for groups sharing
//! expenses across itemized receipts.
//!
//! ## Design Principles
//!
//! - **Pure functions**: aggregation and settlement are deterministic,
//!   side-effect-free reductions of an input snapshot; no state survives a
//!   call
//! - **Insertion-order determinism**: settlement pairs debtors and
//!   creditors in balance-map order, never by magnitude
//! - **Degrade, don't fail**: malformed numeric fields coerce to 0 and
//!   unknown names are tracked as ad hoc participants
//! - **Boundary rounding**: balances accumulate as plain `f64`; rounding to
//!   2 decimal places happens only on emitted transfers and reports
//!
//! ## Example
//!
//! ```
//! use split_ledger::{aggregate, settle, Group};
//!
//! let group: Group = serde_json::from_str(
//!     r#"{
//!         "title": "Lunch",
//!         "members": [{"name": "A"}, {"name": "B"}],
//!         "receipts": [{
//!             "id": "r1",
//!             "name": "cafe",
//!             "items": [{"id": "i1", "name": "Thali", "price": 120, "consumers": ["A", "B"]}],
//!             "payments": {"A": 240}
//!         }]
//!     }"#,
//! )
//! .unwrap();
//!
//! let balances = aggregate(&group);
//! let transfers = settle(&balances);
//! assert_eq!(transfers.len(), 1);
//! assert_eq!(transfers[0].from, "B");
//! assert_eq!(transfers[0].amount, 120.0);
//! ```

pub mod balance;
pub mod error;
pub mod model;
pub mod money;
pub mod report;
pub mod scan;
pub mod settle;

pub use balance::{aggregate, aggregate_with, AggregateOptions, BalanceMap, UnassignedCost};
pub use error::{LedgerError, Result};
pub use model::{Group, Item, Member, Receipt};
pub use report::{expenditures, payment_request_uri, quick_split, summarize, TripSummary};
pub use scan::{item_from_record, items_from_json, ScannedItem};
pub use settle::{settle, Transfer};
