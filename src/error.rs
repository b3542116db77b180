//! Error types for the expense ledger.

use crate::model::{GroupId, Participant};
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while loading a ledger or producing reports.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid ledger record
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Duplicate expense ID
    #[error("Duplicate expense ID {expense_id}")]
    DuplicateExpenseId { expense_id: u32 },

    /// Expense with nobody to split it among
    #[error("Expense {expense_id} has no members to split among")]
    EmptySplit { expense_id: u32 },

    /// Group was never declared
    #[error("Unknown group '{0}'")]
    UnknownGroup(GroupId),

    /// Participant is not a member of the group
    #[error("'{participant}' is not a member of group '{group}'")]
    NotAMember {
        group: GroupId,
        participant: Participant,
    },

    /// Expense id not recorded in the group
    #[error("Unknown expense {expense_id} in group '{group}'")]
    UnknownExpense { group: GroupId, expense_id: u32 },

    /// Only the payer or the group creator may delete an expense
    #[error("'{participant}' may not delete expense {expense_id}: only its payer or the group creator can")]
    DeleteDenied {
        participant: Participant,
        expense_id: u32,
    },

    /// Settlement from a member to themself
    #[error("'{0}' cannot settle with themself")]
    SelfSettlement(Participant),

    /// Unrecognized CLI command
    #[error("Unknown command '{0}'. Expected one of: balances, simplify, stats, export")]
    UnknownCommand(String),

    /// Missing CLI argument
    #[error("Missing argument. Usage: expense-ledger <balances|simplify|stats|export> <ledger.csv> <group>")]
    MissingArgument,
}
