//! # Expense Ledger
//!
//! Tracks shared expenses within groups, works out who owes whom, and
//! suggests the fewest payments that settle everyone up.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: Amounts carry exactly 2 decimal places via `rust_decimal`
//! - **Pure core**: Aggregation, simplification and statistics borrow a snapshot and return new values
//! - **Zero-sum balances**: Every amount a debtor owes is credited to a creditor
//! - **Deterministic output**: Ordered maps and stable sorts make every report reproducible
//!
//! ## Example
//!
//! ```
//! use expense_ledger::{aggregate, simplify, Amount, ExpenseSplit};
//! use std::str::FromStr;
//!
//! let splits = vec![
//!     ExpenseSplit::new(1, "alice", "bob", Amount::from_str("20").unwrap(), false),
//!     ExpenseSplit::new(2, "bob", "carol", Amount::from_str("20").unwrap(), false),
//! ];
//! let payments = simplify(&aggregate(&splits));
//!
//! assert_eq!(payments.len(), 1);
//! assert_eq!(payments[0].from.as_str(), "alice");
//! assert_eq!(payments[0].to.as_str(), "carol");
//! ```

pub mod amount;
pub mod balance;
pub mod error;
pub mod ledger;
pub mod model;
pub mod record;
pub mod settlement;
pub mod simplify;
pub mod statistics;

pub use amount::{Amount, ParseAmountError};
pub use balance::{aggregate, OwesGraph};
pub use error::{LedgerError, Result};
pub use ledger::Ledger;
pub use model::{Expense, ExpenseSplit, Group, GroupId, Participant, Settlement, Split};
pub use record::{LedgerRecord, ParsedRecord, RecordKind};
pub use settlement::apply_settlement;
pub use simplify::{net_balances, settle_balances, simplify, NetBalances, SuggestedPayment};
pub use statistics::{statistics, GroupStatistics, MemberStatistics};
