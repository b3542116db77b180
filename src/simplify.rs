//! Debt simplification (greedy minimum cash flow).
//!
//! Reduces an owes-graph to net positions and then repeatedly matches the
//! largest remaining debtor against the largest remaining creditor. The
//! result has at most `debtors + creditors - 1` payments.
//!
//! # Ordering
//!
//! Participants are registered in first-seen order while walking the graph
//! (debtors ascending, each debtor before its creditors). Debtors and
//! creditors are then stable-sorted by descending magnitude, so equal
//! magnitudes keep first-seen order and repeated runs emit identical output.

use crate::amount::Amount;
use crate::balance::OwesGraph;
use crate::model::Participant;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// A payment that, together with the others returned, clears every balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedPayment {
    pub from: Participant,
    pub to: Participant,
    pub amount: Amount,
}

/// Signed net position per participant: positive is owed money, negative owes.
///
/// # Invariants
///
/// - Entries are kept in first-seen order
/// - When built from an [`OwesGraph`] the total is exactly zero
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetBalances {
    entries: Vec<(Participant, Amount)>,
    index: HashMap<Participant, usize>,
}

impl NetBalances {
    /// Computes net positions from every edge of the graph.
    pub fn from_graph(graph: &OwesGraph) -> Self {
        let mut balances = NetBalances::default();
        for (debtor, creditor, amount) in graph.iter() {
            balances.adjust(debtor, -amount);
            balances.adjust(creditor, amount);
        }
        balances
    }

    fn adjust(&mut self, participant: &Participant, delta: Amount) {
        match self.index.get(participant) {
            Some(&slot) => self.entries[slot].1 += delta,
            None => {
                self.index.insert(participant.clone(), self.entries.len());
                self.entries.push((participant.clone(), delta));
            }
        }
    }

    /// Net position of `participant`, zero if they never appeared.
    pub fn get(&self, participant: &Participant) -> Amount {
        self.index
            .get(participant)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(Amount::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Participant, Amount)> + '_ {
        self.entries.iter().map(|(p, a)| (p, *a))
    }

    /// Sum of all positions.
    pub fn total(&self) -> Amount {
        self.entries.iter().map(|(_, a)| *a).sum()
    }

    /// Returns `true` if every participant's position is zero.
    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(|(_, a)| a.is_zero())
    }

    /// Returns the positions left after the given payments are made.
    pub fn after_payments(&self, payments: &[SuggestedPayment]) -> Self {
        let mut next = self.clone();
        for payment in payments {
            next.adjust(&payment.from, payment.amount);
            next.adjust(&payment.to, -payment.amount);
        }
        next
    }
}

/// Computes each participant's net position from the graph.
pub fn net_balances(graph: &OwesGraph) -> NetBalances {
    NetBalances::from_graph(graph)
}

/// Computes a minimal list of payments that resolves every balance in `graph`.
///
/// Payments are returned in emission order. Participants whose net position is
/// zero never appear, even if they have edges in the graph.
pub fn simplify(graph: &OwesGraph) -> Vec<SuggestedPayment> {
    settle_balances(&net_balances(graph))
}

/// Greedily matches debtors against creditors.
///
/// If the balances do not sum to zero one side runs out first and the rest of
/// the other side is left unresolved.
pub fn settle_balances(balances: &NetBalances) -> Vec<SuggestedPayment> {
    let mut debtors: Vec<(&Participant, Amount)> = balances
        .iter()
        .filter(|(_, net)| net.is_negative())
        .map(|(p, net)| (p, net.abs()))
        .collect();
    let mut creditors: Vec<(&Participant, Amount)> = balances
        .iter()
        .filter(|(_, net)| net.is_positive())
        .collect();

    // `sort_by` is stable: equal magnitudes keep first-seen order.
    debtors.sort_by(|a, b| b.1.cmp(&a.1));
    creditors.sort_by(|a, b| b.1.cmp(&a.1));

    let mut payments = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let (debtor, debt) = debtors[i];
        let (creditor, credit) = creditors[j];
        let amount = debt.min(credit);

        if amount.is_positive() {
            payments.push(SuggestedPayment {
                from: debtor.clone(),
                to: creditor.clone(),
                amount,
            });
        }

        debtors[i].1 -= amount;
        creditors[j].1 -= amount;

        if debtors[i].1.is_zero() {
            i += 1;
        }
        if creditors[j].1.is_zero() {
            j += 1;
        }
    }

    if i < debtors.len() || j < creditors.len() {
        debug!(
            "Unbalanced positions: {} debtor(s) and {} creditor(s) left unresolved",
            debtors.len() - i,
            creditors.len() - j
        );
    }

    debug!(
        "Simplified {} debtor(s) and {} creditor(s) into {} payment(s)",
        debtors.len(),
        creditors.len(),
        payments.len()
    );

    payments
}
