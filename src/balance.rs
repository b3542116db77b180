//! Pairwise balance aggregation.
//!
//! Collapses a group's expense splits into an owes-graph: for each ordered
//! pair `(debtor, creditor)`, the total the debtor still owes the creditor
//! across all unsettled splits.

use crate::amount::Amount;
use crate::model::{ExpenseSplit, Participant};
use log::trace;
use serde::Serialize;
use std::collections::BTreeMap;

/// Sparse, immutable mapping `debtor -> creditor -> amount owed`.
///
/// # Invariants
///
/// - Every stored amount is strictly positive; absent pairs mean zero
/// - No self-pairs (`debtor == creditor`)
/// - Iteration is ordered by debtor, then creditor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OwesGraph {
    debts: BTreeMap<Participant, BTreeMap<Participant, Amount>>,
}

impl OwesGraph {
    /// Builds a graph from raw `(debtor, creditor, amount)` triples.
    ///
    /// Amounts for the same pair are summed. Self-pairs and non-positive
    /// amounts contribute nothing.
    pub fn from_debts<I>(debts: I) -> Self
    where
        I: IntoIterator<Item = (Participant, Participant, Amount)>,
    {
        let mut accumulated: BTreeMap<Participant, BTreeMap<Participant, Amount>> =
            BTreeMap::new();

        for (debtor, creditor, amount) in debts {
            if debtor == creditor || !amount.is_positive() {
                continue;
            }
            let owed = accumulated
                .entry(debtor)
                .or_insert_with(BTreeMap::new)
                .entry(creditor)
                .or_insert(Amount::ZERO);
            *owed += amount;
        }

        OwesGraph { debts: accumulated }
    }

    /// Amount `debtor` owes `creditor`, zero if the pair is absent.
    pub fn owed(&self, debtor: &Participant, creditor: &Participant) -> Amount {
        self.debts
            .get(debtor)
            .and_then(|creditors| creditors.get(creditor))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Creditors of `debtor` with the amount owed to each.
    pub fn creditors_of(
        &self,
        debtor: &Participant,
    ) -> impl Iterator<Item = (&Participant, Amount)> + '_ {
        self.debts
            .get(debtor)
            .into_iter()
            .flat_map(|creditors| creditors.iter().map(|(c, a)| (c, *a)))
    }

    /// All `(debtor, creditor, amount)` edges in debtor-then-creditor order.
    pub fn iter(&self) -> impl Iterator<Item = (&Participant, &Participant, Amount)> + '_ {
        self.debts.iter().flat_map(|(debtor, creditors)| {
            creditors
                .iter()
                .map(move |(creditor, amount)| (debtor, creditor, *amount))
        })
    }

    /// Number of debtor/creditor edges.
    pub fn len(&self) -> usize {
        self.debts.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty()
    }
}

/// Aggregates a group's splits into an [`OwesGraph`].
///
/// Settled splits and a payer's own share are skipped. Multiple splits between
/// the same pair collapse into one summed amount. The input is not modified.
pub fn aggregate<'a, I>(splits: I) -> OwesGraph
where
    I: IntoIterator<Item = &'a ExpenseSplit>,
{
    let graph = OwesGraph::from_debts(
        splits
            .into_iter()
            .filter(|split| !split.settled && !split.is_self_share())
            .map(|split| (split.debtor.clone(), split.creditor.clone(), split.amount)),
    );

    trace!("Aggregated owes-graph with {} edges", graph.len());
    graph
}
