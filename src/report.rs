//! Derived read models for the presentation collaborator.
//!
//! Everything here is computed fresh from a group snapshot and rounded to
//! 2 decimal places, since these values go straight to a screen. The
//! aggregation core itself never rounds.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use url::Url;

use crate::balance::BalanceMap;
use crate::model::Group;
use crate::money::{self, round2};
use crate::settle::{settle, Transfer};

/// Headline numbers for a trip: total spend and who fronted what.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripSummary {
    /// Sum of `unit price × effective quantity` over every item of every
    /// receipt.
    pub total_spend: f64,

    /// Counter payments per member: roster members first (at 0 when they
    /// paid nothing), then ad hoc payers in order of appearance.
    pub paid: IndexMap<String, f64>,
}

/// Computes the trip summary for a group snapshot.
pub fn summarize(group: &Group) -> TripSummary {
    let mut total_spend = 0.0;
    let mut paid: IndexMap<String, f64> = group
        .member_names()
        .map(|name| (name.to_string(), 0.0))
        .collect();

    for receipt in &group.receipts {
        for item in &receipt.items {
            total_spend += item.line_total();
        }
        for (name, amount) in &receipt.payments {
            *paid.entry(name.clone()).or_insert(0.0) += money::coerce(*amount);
        }
    }

    for value in paid.values_mut() {
        *value = round2(*value);
    }

    TripSummary {
        total_spend: round2(total_spend),
        paid,
    }
}

/// Per-member consumption across all receipts.
///
/// Uses the same unit-cost charging policy as the aggregator: each distinct
/// consumer of an item is charged the full unit price once for that item.
pub fn expenditures(group: &Group) -> IndexMap<String, f64> {
    let mut spent: IndexMap<String, f64> = group
        .member_names()
        .map(|name| (name.to_string(), 0.0))
        .collect();

    for receipt in &group.receipts {
        for item in &receipt.items {
            let unit = money::coerce(item.unit_price);
            for consumer in item.distinct_consumers() {
                *spent.entry(consumer.to_string()).or_insert(0.0) += unit;
            }
        }
    }

    for value in spent.values_mut() {
        *value = round2(*value);
    }

    spent
}

/// Splits one bill evenly across `participants`, with `payer` having
/// fronted the whole amount.
///
/// The payer must be passed explicitly (there is no ambient notion of a
/// current user) and is charged a share like anyone else when listed among
/// the participants. Duplicate participant names count once. A non-positive
/// or unusable total yields no transfers.
pub fn quick_split(total: f64, payer: &str, participants: &[&str]) -> Vec<Transfer> {
    let total = money::coerce(total);
    if total <= 0.0 {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let distinct: Vec<&str> = participants
        .iter()
        .copied()
        .filter(|name| seen.insert(*name))
        .collect();
    if distinct.is_empty() {
        return Vec::new();
    }

    let share = total / distinct.len() as f64;
    let mut balances = BalanceMap::new();
    balances.ensure(payer);
    balances.credit(payer, total);
    for name in distinct {
        balances.debit(name, share);
    }

    settle(&balances)
}

/// Payment-request deep link for a transfer, suitable for QR encoding.
///
/// `payee_handle` is the receiving member's payment handle; the amount uses
/// the 2-decimal presentation form.
pub fn payment_request_uri(transfer: &Transfer, payee_handle: &str) -> String {
    // Safety: the base URI is static and well-formed
    let mut uri = Url::parse("upi://pay").expect("static base uri");
    uri.query_pairs_mut()
        .append_pair("pa", payee_handle)
        .append_pair("am", &format!("{:.2}", transfer.amount));
    uri.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Member, Receipt};

    fn sample_group() -> Group {
        Group {
            title: "Lunch".to_string(),
            members: vec![Member::new("A"), Member::new("B")],
            receipts: vec![Receipt {
                id: "r1".to_string(),
                name: "cafe".to_string(),
                items: vec![
                    Item {
                        id: "i1".to_string(),
                        name: "Biriyani".to_string(),
                        unit_price: 180.0,
                        quantity: None,
                        consumers: vec!["A".to_string(), "B".to_string()],
                    },
                    Item {
                        id: "i2".to_string(),
                        name: "Coke".to_string(),
                        unit_price: 40.0,
                        quantity: None,
                        consumers: vec!["A".to_string()],
                    },
                ],
                payments: [("A".to_string(), 220.0)].into_iter().collect(),
                timestamp: None,
            }],
        }
    }

    #[test]
    fn test_summary_totals_and_paid_map() {
        let summary = summarize(&sample_group());
        // 180 × 2 consumers + 40 × 1 consumer.
        assert_eq!(summary.total_spend, 400.0);
        assert_eq!(summary.paid.get("A"), Some(&220.0));
        assert_eq!(summary.paid.get("B"), Some(&0.0));
    }

    #[test]
    fn test_summary_tracks_ad_hoc_payers() {
        let mut group = sample_group();
        group.receipts[0]
            .payments
            .insert("Visitor".to_string(), 10.0);

        let summary = summarize(&group);
        let names: Vec<&str> = summary.paid.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["A", "B", "Visitor"]);
        assert_eq!(summary.paid.get("Visitor"), Some(&10.0));
    }

    #[test]
    fn test_expenditures_use_unit_cost_policy() {
        let spent = expenditures(&sample_group());
        assert_eq!(spent.get("A"), Some(&220.0));
        assert_eq!(spent.get("B"), Some(&180.0));
    }

    #[test]
    fn test_quick_split_payer_among_participants() {
        let transfers = quick_split(90.0, "Meenakshi", &["Meenakshi", "Saira", "Ravi"]);
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].from, "Saira");
        assert_eq!(transfers[0].to, "Meenakshi");
        assert_eq!(transfers[0].amount, 30.0);
        assert_eq!(transfers[1].from, "Ravi");
        assert_eq!(transfers[1].amount, 30.0);
    }

    #[test]
    fn test_quick_split_payer_not_participating() {
        let transfers = quick_split(60.0, "Host", &["A", "B"]);
        assert_eq!(transfers.len(), 2);
        assert!(transfers.iter().all(|t| t.to == "Host"));
        assert!(transfers.iter().all(|t| t.amount == 30.0));
    }

    #[test]
    fn test_quick_split_rejects_unusable_input() {
        assert!(quick_split(0.0, "A", &["A", "B"]).is_empty());
        assert!(quick_split(-5.0, "A", &["A", "B"]).is_empty());
        assert!(quick_split(f64::NAN, "A", &["A", "B"]).is_empty());
        assert!(quick_split(100.0, "A", &[]).is_empty());
    }

    #[test]
    fn test_payment_request_uri_encodes_handle() {
        let transfer = Transfer {
            from: "B".to_string(),
            to: "A".to_string(),
            amount: 180.0,
        };
        let uri = payment_request_uri(&transfer, "ada@bank");
        assert_eq!(uri, "upi://pay?pa=ada%40bank&am=180.00");
    }
}
