//! Per-group spending statistics.

use crate::amount::Amount;
use crate::model::{Expense, ExpenseSplit, Group, Participant};
use serde::Serialize;
use std::collections::BTreeMap;

/// What one member paid and still owes within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemberStatistics {
    pub paid: Amount,
    pub owed: Amount,
    pub balance: Amount,
}

/// Spending summary for a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStatistics {
    /// Sum of every expense in the group, settled or not.
    pub total_spent: Amount,
    pub expense_count: usize,
    pub per_member: BTreeMap<Participant, MemberStatistics>,
}

/// Summarizes a group's expenses and splits.
///
/// `paid` sums the expenses a member paid for; `owed` sums their unsettled
/// splits on expenses someone else paid. Expenses and splits belonging to
/// other groups must be filtered out by the caller.
pub fn statistics(group: &Group, expenses: &[Expense], splits: &[ExpenseSplit]) -> GroupStatistics {
    let total_spent = expenses.iter().map(|e| e.amount).sum();

    let per_member = group
        .members()
        .iter()
        .map(|member| {
            let paid: Amount = expenses
                .iter()
                .filter(|e| &e.paid_by == member)
                .map(|e| e.amount)
                .sum();
            let owed: Amount = splits
                .iter()
                .filter(|s| &s.debtor == member && !s.settled && !s.is_self_share())
                .map(|s| s.amount)
                .sum();

            let stats = MemberStatistics {
                paid,
                owed,
                balance: paid - owed,
            };
            (member.clone(), stats)
        })
        .collect();

    GroupStatistics {
        total_spent,
        expense_count: expenses.len(),
        per_member,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GroupId;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn amt(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn expense(id: u32, paid_by: &str, amount: &str) -> Expense {
        Expense {
            id,
            group: GroupId::from("trip"),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            description: format!("expense {}", id),
            amount: amt(amount),
            paid_by: Participant::from(paid_by),
        }
    }

    fn group(members: &[&str]) -> Group {
        let mut group = Group::new(GroupId::from("trip"));
        for m in members {
            group.add_member(Participant::from(*m));
        }
        group
    }

    #[test]
    fn test_even_split_between_payer_and_other() {
        let g = group(&["alice", "bob"]);
        let expenses = vec![expense(1, "alice", "100")];
        let splits = vec![
            ExpenseSplit::new(1, "alice", "alice", amt("50"), false),
            ExpenseSplit::new(1, "bob", "alice", amt("50"), false),
        ];

        let stats = statistics(&g, &expenses, &splits);
        assert_eq!(stats.total_spent, amt("100"));
        assert_eq!(stats.expense_count, 1);

        let alice = stats.per_member[&Participant::from("alice")];
        assert_eq!(alice.paid, amt("100"));
        assert_eq!(alice.owed, Amount::ZERO);
        assert_eq!(alice.balance, amt("100"));

        let bob = stats.per_member[&Participant::from("bob")];
        assert_eq!(bob.paid, Amount::ZERO);
        assert_eq!(bob.owed, amt("50"));
        assert_eq!(bob.balance, amt("-50"));
    }

    #[test]
    fn test_settled_splits_do_not_count_as_owed_but_spend_does() {
        let g = group(&["alice", "bob"]);
        let expenses = vec![expense(1, "alice", "40"), expense(2, "bob", "10")];
        let splits = vec![
            ExpenseSplit::new(1, "bob", "alice", amt("20"), true),
            ExpenseSplit::new(2, "alice", "bob", amt("5"), false),
        ];

        let stats = statistics(&g, &expenses, &splits);
        assert_eq!(stats.total_spent, amt("50"));

        let bob = stats.per_member[&Participant::from("bob")];
        assert_eq!(bob.owed, Amount::ZERO);
        assert_eq!(bob.balance, amt("10"));

        let alice = stats.per_member[&Participant::from("alice")];
        assert_eq!(alice.owed, amt("5"));
        assert_eq!(alice.balance, amt("35"));
    }

    #[test]
    fn test_inactive_members_are_listed_with_zeros() {
        let g = group(&["alice", "zoe"]);
        let stats = statistics(&g, &[], &[]);

        assert_eq!(stats.total_spent, Amount::ZERO);
        assert_eq!(stats.expense_count, 0);
        let zoe = stats.per_member[&Participant::from("zoe")];
        assert_eq!(zoe.paid, Amount::ZERO);
        assert_eq!(zoe.owed, Amount::ZERO);
        assert_eq!(zoe.balance, Amount::ZERO);
    }

    #[test]
    fn test_statistics_serialize_to_json() {
        let g = group(&["alice"]);
        let stats = statistics(&g, &[expense(1, "alice", "12.5")], &[]);
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["total_spent"], "12.50");
        assert_eq!(json["expense_count"], 1);
        assert_eq!(json["per_member"]["alice"]["paid"], "12.50");
    }
}
