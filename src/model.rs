//! Ledger entities: participants, groups, expenses, splits and settlements.
//!
//! These are snapshot values owned by the [`Ledger`](crate::Ledger). The
//! computation modules only ever borrow them.

use crate::amount::Amount;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// An opaque participant identifier (a username).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Participant(String);

impl Participant {
    /// Creates a participant from a username.
    pub fn new(name: impl Into<String>) -> Self {
        Participant(name.into())
    }

    /// The username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Participant {
    fn from(name: &str) -> Self {
        Participant::new(name)
    }
}

/// Identifier of an expense-sharing group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Creates a group id from its name.
    pub fn new(name: impl Into<String>) -> Self {
        GroupId(name.into())
    }

    /// The group name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(name: &str) -> Self {
        GroupId::new(name)
    }
}

/// A group of participants sharing expenses.
///
/// Members are kept in the order they joined. The first member to join is
/// the group's creator.
#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub id: GroupId,
    members: Vec<Participant>,
}

impl Group {
    /// Creates an empty group.
    pub fn new(id: GroupId) -> Self {
        Group {
            id,
            members: Vec::new(),
        }
    }

    /// Adds a member. Returns `false` if they were already a member.
    pub fn add_member(&mut self, member: Participant) -> bool {
        if self.is_member(&member) {
            return false;
        }
        self.members.push(member);
        true
    }

    /// The member who created the group, `None` while it has no members.
    pub fn created_by(&self) -> Option<&Participant> {
        self.members.first()
    }

    /// Returns `true` if `participant` belongs to the group.
    pub fn is_member(&self, participant: &Participant) -> bool {
        self.members.iter().any(|m| m == participant)
    }

    /// Members in join order.
    pub fn members(&self) -> &[Participant] {
        &self.members
    }
}

/// An expense paid by one member on behalf of the group.
#[derive(Debug, Clone, Serialize)]
pub struct Expense {
    pub id: u32,
    pub group: GroupId,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Amount,
    pub paid_by: Participant,
}

/// One member's stored share of an expense.
#[derive(Debug, Clone, Serialize)]
pub struct Split {
    pub expense_id: u32,
    pub member: Participant,
    pub amount_owed: Amount,
    pub settled: bool,
}

/// A split joined to its expense's payer.
///
/// `debtor` is the split's member and `creditor` the expense's payer. This is
/// the shape the balance and statistics computations consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseSplit {
    pub expense_id: u32,
    pub debtor: Participant,
    pub creditor: Participant,
    pub amount: Amount,
    pub settled: bool,
}

impl ExpenseSplit {
    /// Creates a split of `amount` owed by `debtor` to `creditor`.
    pub fn new(
        expense_id: u32,
        debtor: impl Into<Participant>,
        creditor: impl Into<Participant>,
        amount: Amount,
        settled: bool,
    ) -> Self {
        ExpenseSplit {
            expense_id,
            debtor: debtor.into(),
            creditor: creditor.into(),
            amount,
            settled,
        }
    }

    /// Returns `true` if the split is the payer's own share.
    pub fn is_self_share(&self) -> bool {
        self.debtor == self.creditor
    }
}

/// A recorded payment from one member to another.
#[derive(Debug, Clone, Serialize)]
pub struct Settlement {
    pub group: GroupId,
    pub paid_by: Participant,
    pub paid_to: Participant,
    pub amount: Amount,
    pub date: NaiveDate,
}
