//! Ledger records for CSV parsing and their typed representation.

use crate::amount::Amount;
use crate::model::{GroupId, Participant};
use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;

/// Date format used for the `date` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separator between member names in an expense's `to` column.
pub const MEMBER_SEPARATOR: char = ';';

/// Raw ledger record as read from CSV.
///
/// All columns except `type` and `group` are optional because each record
/// type uses a different subset of them.
#[derive(Debug, Deserialize)]
pub struct LedgerRecord {
    /// Record type: member, expense, settlement, delete
    #[serde(rename = "type")]
    pub record_type: String,

    /// Group the record belongs to
    pub group: String,

    /// Expense ID (expense and delete records)
    pub id: Option<u32>,

    /// `YYYY-MM-DD` (expense and settlement records)
    pub date: Option<String>,

    /// Free text (expense records only)
    pub description: Option<String>,

    /// Joining member, expense payer, settlement payer, or deleting member
    pub from: Option<String>,

    /// Expense split members (`;`-separated) or settlement recipient
    pub to: Option<String>,

    /// Expense or settlement amount
    pub amount: Option<String>,
}

impl LedgerRecord {
    /// Parses the raw CSV record into a typed record.
    ///
    /// Returns a description of the problem if the record is malformed.
    pub fn parse(&self) -> Result<ParsedRecord, String> {
        let group = required(&self.group, "group").map(GroupId::new)?;
        let record_type = self.record_type.trim().to_lowercase();

        let kind = match record_type.as_str() {
            "member" => RecordKind::Member(self.participant(&self.from, "from")?),
            "expense" => {
                let id = self.id.ok_or_else(|| "missing expense id".to_string())?;
                let amount = self.parse_amount()?;
                if amount.is_negative() {
                    return Err(format!("negative expense amount {}", amount));
                }
                RecordKind::Expense {
                    id,
                    date: self.parse_date()?,
                    description: self
                        .description
                        .as_deref()
                        .map(str::trim)
                        .unwrap_or_default()
                        .to_string(),
                    amount,
                    paid_by: self.participant(&self.from, "from")?,
                    split_among: self.split_members(),
                }
            }
            "settlement" => {
                let amount = self.parse_amount()?;
                if !amount.is_positive() {
                    return Err(format!("settlement amount must be positive, got {}", amount));
                }
                RecordKind::Settlement {
                    date: self.parse_date()?,
                    paid_by: self.participant(&self.from, "from")?,
                    paid_to: self.participant(&self.to, "to")?,
                    amount,
                }
            }
            "delete" => RecordKind::DeleteExpense {
                id: self.id.ok_or_else(|| "missing expense id".to_string())?,
                acting: self.participant(&self.from, "from")?,
            },
            other => return Err(format!("unknown record type '{}'", other)),
        };

        Ok(ParsedRecord { group, kind })
    }

    fn participant(&self, field: &Option<String>, name: &str) -> Result<Participant, String> {
        let value = field.as_deref().unwrap_or_default();
        required(value, name).map(Participant::new)
    }

    fn parse_amount(&self) -> Result<Amount, String> {
        let raw = required(self.amount.as_deref().unwrap_or_default(), "amount")?;
        Amount::from_str(raw).map_err(|e| e.to_string())
    }

    fn parse_date(&self) -> Result<NaiveDate, String> {
        let raw = required(self.date.as_deref().unwrap_or_default(), "date")?;
        NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| format!("bad date '{}': {}", raw, e))
    }

    /// Split members in listed order, with blanks and repeats removed.
    fn split_members(&self) -> Vec<Participant> {
        let mut members: Vec<Participant> = Vec::new();
        for name in self
            .to
            .as_deref()
            .unwrap_or_default()
            .split(MEMBER_SEPARATOR)
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            let member = Participant::new(name);
            if !members.contains(&member) {
                members.push(member);
            }
        }
        members
    }
}

fn required<'a>(value: &'a str, name: &str) -> Result<&'a str, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("missing {}", name));
    }
    Ok(trimmed)
}

/// A parsed and validated record ready to apply to a ledger.
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub group: GroupId,
    pub kind: RecordKind,
}

/// Record variants with associated data.
#[derive(Debug, Clone)]
pub enum RecordKind {
    /// A participant joins the group.
    Member(Participant),

    /// An expense paid by one member, split evenly among `split_among`.
    Expense {
        id: u32,
        date: NaiveDate,
        description: String,
        amount: Amount,
        paid_by: Participant,
        split_among: Vec<Participant>,
    },

    /// A payment between two members.
    Settlement {
        date: NaiveDate,
        paid_by: Participant,
        paid_to: Participant,
        amount: Amount,
    },

    /// `acting` removes expense `id` along with its splits.
    DeleteExpense { id: u32, acting: Participant },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(record_type: &str) -> LedgerRecord {
        LedgerRecord {
            record_type: record_type.to_string(),
            group: "trip".to_string(),
            id: None,
            date: None,
            description: None,
            from: None,
            to: None,
            amount: None,
        }
    }

    #[test]
    fn test_parse_member() {
        let mut rec = record("member");
        rec.from = Some(" alice ".to_string());

        let parsed = rec.parse().unwrap();
        assert_eq!(parsed.group, GroupId::from("trip"));
        match parsed.kind {
            RecordKind::Member(p) => assert_eq!(p, Participant::from("alice")),
            _ => panic!("Expected Member"),
        }
    }

    #[test]
    fn test_parse_expense() {
        let mut rec = record("  Expense ");
        rec.id = Some(7);
        rec.date = Some("2024-03-01".to_string());
        rec.description = Some(" Dinner ".to_string());
        rec.from = Some("alice".to_string());
        rec.to = Some("alice; bob;;bob ".to_string());
        rec.amount = Some("100".to_string());

        let parsed = rec.parse().unwrap();
        match parsed.kind {
            RecordKind::Expense {
                id,
                date,
                description,
                amount,
                paid_by,
                split_among,
            } => {
                assert_eq!(id, 7);
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
                assert_eq!(description, "Dinner");
                assert_eq!(amount.to_string(), "100.00");
                assert_eq!(paid_by, Participant::from("alice"));
                assert_eq!(
                    split_among,
                    vec![Participant::from("alice"), Participant::from("bob")]
                );
            }
            _ => panic!("Expected Expense"),
        }
    }

    #[test]
    fn test_parse_settlement() {
        let mut rec = record("settlement");
        rec.date = Some("2024-03-05".to_string());
        rec.from = Some("bob".to_string());
        rec.to = Some("alice".to_string());
        rec.amount = Some("50.5".to_string());

        let parsed = rec.parse().unwrap();
        match parsed.kind {
            RecordKind::Settlement {
                paid_by,
                paid_to,
                amount,
                ..
            } => {
                assert_eq!(paid_by, Participant::from("bob"));
                assert_eq!(paid_to, Participant::from("alice"));
                assert_eq!(amount.to_string(), "50.50");
            }
            _ => panic!("Expected Settlement"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let err = record("refund").parse().unwrap_err();
        assert!(err.contains("unknown record type"));
    }

    #[test]
    fn test_parse_delete() {
        let mut rec = record("delete");
        rec.id = Some(3);
        rec.from = Some("bob".to_string());

        match rec.parse().unwrap().kind {
            RecordKind::DeleteExpense { id, acting } => {
                assert_eq!(id, 3);
                assert_eq!(acting, Participant::from("bob"));
            }
            _ => panic!("Expected DeleteExpense"),
        }

        rec.id = None;
        assert_eq!(rec.parse().unwrap_err(), "missing expense id");

        let mut rec = record("delete");
        rec.id = Some(3);
        assert_eq!(rec.parse().unwrap_err(), "missing from");
    }

    #[test]
    fn test_parse_rejects_negative_expense() {
        let mut rec = record("expense");
        rec.id = Some(1);
        rec.date = Some("2024-03-01".to_string());
        rec.from = Some("alice".to_string());
        rec.amount = Some("-5".to_string());

        assert!(rec.parse().unwrap_err().contains("negative"));
    }

    #[test]
    fn test_parse_rejects_zero_settlement() {
        let mut rec = record("settlement");
        rec.date = Some("2024-03-01".to_string());
        rec.from = Some("bob".to_string());
        rec.to = Some("alice".to_string());
        rec.amount = Some("0".to_string());

        assert!(rec.parse().unwrap_err().contains("positive"));
    }

    #[test]
    fn test_parse_rejects_bad_date_and_missing_fields() {
        let mut rec = record("expense");
        rec.id = Some(1);
        rec.date = Some("03/01/2024".to_string());
        rec.from = Some("alice".to_string());
        rec.amount = Some("5".to_string());
        assert!(rec.parse().unwrap_err().contains("bad date"));

        let mut rec = record("expense");
        rec.date = Some("2024-03-01".to_string());
        assert_eq!(rec.parse().unwrap_err(), "missing expense id");

        let mut rec = record("member");
        rec.group = "  ".to_string();
        rec.from = Some("alice".to_string());
        assert_eq!(rec.parse().unwrap_err(), "missing group");
    }

    #[test]
    fn test_parse_rejects_sub_cent_amount() {
        let mut rec = record("settlement");
        rec.date = Some("2024-03-01".to_string());
        rec.from = Some("bob".to_string());
        rec.to = Some("alice".to_string());
        rec.amount = Some("1.005".to_string());

        assert!(rec.parse().unwrap_err().contains("decimal places"));
    }
}
