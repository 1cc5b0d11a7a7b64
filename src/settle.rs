//! Greedy settlement: reducing net balances to point-to-point transfers.
//!
//! The solver trades optimality for linear-time determinism: pairing is
//! strictly insertion-order, never sorted by magnitude, so the same balance
//! map always yields the same transfers. True minimum-transaction
//! settlement is a combinatorial problem this crate deliberately avoids.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::balance::BalanceMap;
use crate::money::{round2, TOLERANCE};

/// A single payment instruction from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    /// Amount to pay, rounded to 2 decimal places. Never negative.
    pub amount: f64,
}

/// An unsettled position: a name and the magnitude still owed or due.
#[derive(Debug, Clone)]
struct Position {
    name: String,
    amount: f64,
}

/// Produces transfers that clear every balance to within [`TOLERANCE`].
///
/// Debtors (balance < -0.01) and creditors (balance > 0.01) are walked in
/// balance-map order with running remainders; each step settles the
/// smaller of the current pair's remainders and advances whichever side
/// was exhausted. Balances already within tolerance are excluded, so an
/// empty or settled map yields no transfers. At most
/// `debtors + creditors - 1` transfers are emitted.
///
/// The function never fails. If the input does not net to zero, one side
/// runs out first and the leftover is logged; [`BalanceMap::residual`]
/// exposes the same signal to callers.
pub fn settle(balances: &BalanceMap) -> Vec<Transfer> {
    let mut debtors: Vec<Position> = Vec::new();
    let mut creditors: Vec<Position> = Vec::new();

    for (name, balance) in balances.iter() {
        if balance < -TOLERANCE {
            debtors.push(Position {
                name: name.to_string(),
                amount: -balance,
            });
        } else if balance > TOLERANCE {
            creditors.push(Position {
                name: name.to_string(),
                amount: balance,
            });
        }
    }

    let mut transfers = Vec::new();
    let mut d = 0;
    let mut c = 0;
    // Running remainders instead of mutating the partition lists in place.
    let mut owed = debtors.first().map_or(0.0, |p| p.amount);
    let mut due = creditors.first().map_or(0.0, |p| p.amount);

    while d < debtors.len() && c < creditors.len() {
        let settled = owed.min(due);
        transfers.push(Transfer {
            from: debtors[d].name.clone(),
            to: creditors[c].name.clone(),
            amount: round2(settled),
        });

        owed -= settled;
        due -= settled;

        if owed < TOLERANCE {
            d += 1;
            if let Some(next) = debtors.get(d) {
                owed = next.amount;
            }
        }
        if due < TOLERANCE {
            c += 1;
            if let Some(next) = creditors.get(c) {
                due = next.amount;
            }
        }
    }

    if d < debtors.len() {
        let leftover = owed + debtors[d + 1..].iter().map(|p| p.amount).sum::<f64>();
        debug!("settlement left {:.2} owed with no creditor to receive it", leftover);
    } else if c < creditors.len() {
        let leftover = due + creditors[c + 1..].iter().map(|p| p.amount).sum::<f64>();
        debug!("settlement left {:.2} due with no debtor to cover it", leftover);
    }

    transfers
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn balances(entries: &[(&str, f64)]) -> BalanceMap {
        entries.iter().map(|(name, v)| (*name, *v)).collect()
    }

    fn transfer(from: &str, to: &str, amount: f64) -> Transfer {
        Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        }
    }

    #[rstest]
    #[case::one_creditor_two_debtors(
        &[("A", 100.0), ("B", -60.0), ("C", -40.0)],
        vec![("B", "A", 60.0), ("C", "A", 40.0)]
    )]
    #[case::one_debtor_two_creditors(
        &[("A", 80.0), ("B", -110.0), ("C", 30.0)],
        vec![("B", "A", 80.0), ("B", "C", 30.0)]
    )]
    #[case::pairwise(
        &[("A", 25.0), ("B", -25.0)],
        vec![("B", "A", 25.0)]
    )]
    #[case::chain(
        &[("A", 10.0), ("B", 20.0), ("C", -5.0), ("D", -25.0)],
        vec![("C", "A", 5.0), ("D", "A", 5.0), ("D", "B", 20.0)]
    )]
    fn settle_cases(#[case] input: &[(&str, f64)], #[case] expected: Vec<(&str, &str, f64)>) {
        let expected: Vec<Transfer> = expected
            .into_iter()
            .map(|(from, to, amount)| transfer(from, to, amount))
            .collect();
        assert_eq!(settle(&balances(input)), expected);
    }

    #[test]
    fn test_settled_map_yields_no_transfers() {
        let map = balances(&[("A", 0.0), ("B", 0.005), ("C", -0.009)]);
        assert!(settle(&map).is_empty());
    }

    #[test]
    fn test_empty_map_yields_no_transfers() {
        assert!(settle(&BalanceMap::new()).is_empty());
    }

    #[test]
    fn test_pairing_is_insertion_order_not_magnitude() {
        // B entered the map before C, so B settles first even though C's
        // debt is larger.
        let map = balances(&[("A", 100.0), ("B", -1.0), ("C", -99.0)]);
        let transfers = settle(&map);
        assert_eq!(
            transfers,
            vec![transfer("B", "A", 1.0), transfer("C", "A", 99.0)]
        );
    }

    #[test]
    fn test_amounts_round_to_cents() {
        let map = balances(&[("A", 33.333333), ("B", -33.333333)]);
        let transfers = settle(&map);
        assert_eq!(transfers, vec![transfer("B", "A", 33.33)]);
    }

    #[test]
    fn test_transfer_count_bound() {
        let map = balances(&[
            ("A", 50.0),
            ("B", 50.0),
            ("C", -30.0),
            ("D", -30.0),
            ("E", -40.0),
        ]);
        let transfers = settle(&map);
        assert!(transfers.len() <= 4);
        assert!(transfers.iter().all(|t| t.amount >= 0.0));
        assert!(transfers.iter().all(|t| t.from != t.to));
    }

    #[test]
    fn test_imbalanced_input_consumes_one_side() {
        // Nets to +40: creditors are left holding the residual.
        let map = balances(&[("A", 100.0), ("B", -60.0)]);
        let transfers = settle(&map);
        assert_eq!(transfers, vec![transfer("B", "A", 60.0)]);
    }

    #[test]
    fn test_idempotent() {
        let map = balances(&[("A", 70.0), ("B", -20.0), ("C", -50.0)]);
        assert_eq!(settle(&map), settle(&map));
    }
}
