//! The ledger: loads group activity from CSV and answers per-group queries.
//!
//! Records are applied in the order they are read. Invalid records are
//! logged and skipped so one bad row never aborts a load. Every query takes
//! the group it is scoped to as an explicit argument.

use crate::balance::{aggregate, OwesGraph};
use crate::error::{LedgerError, Result};
use crate::model::{Expense, ExpenseSplit, Group, GroupId, Participant, Settlement, Split};
use crate::record::{LedgerRecord, ParsedRecord, RecordKind};
use crate::settlement::apply_settlement;
use crate::simplify::{simplify, SuggestedPayment};
use crate::statistics::{statistics, GroupStatistics};
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::{Read, Write};

/// Everything recorded for one group.
#[derive(Debug, Clone)]
struct GroupBook {
    group: Group,
    expenses: Vec<Expense>,
    splits: Vec<Split>,
    settlements: Vec<Settlement>,
}

impl GroupBook {
    fn new(id: GroupId) -> Self {
        GroupBook {
            group: Group::new(id),
            expenses: Vec::new(),
            splits: Vec::new(),
            settlements: Vec::new(),
        }
    }

    fn ensure_member(&self, participant: &Participant) -> Result<()> {
        if self.group.is_member(participant) {
            Ok(())
        } else {
            Err(LedgerError::NotAMember {
                group: self.group.id.clone(),
                participant: participant.clone(),
            })
        }
    }

    /// Joins each stored split to its expense's payer.
    fn expense_splits(&self) -> Vec<ExpenseSplit> {
        let by_id: HashMap<u32, &Expense> = self.expenses.iter().map(|e| (e.id, e)).collect();

        self.splits
            .iter()
            .filter_map(|split| {
                let expense = by_id.get(&split.expense_id)?;
                Some(ExpenseSplit {
                    expense_id: split.expense_id,
                    debtor: split.member.clone(),
                    creditor: expense.paid_by.clone(),
                    amount: split.amount_owed,
                    settled: split.settled,
                })
            })
            .collect()
    }
}

/// An in-memory expense ledger holding any number of groups.
///
/// Expense IDs are unique across all groups.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    books: BTreeMap<GroupId, GroupBook>,
    expense_ids: HashSet<u32>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Ledger::default()
    }

    /// Loads ledger records from a CSV reader in streaming fashion.
    ///
    /// Invalid records are logged at warn level and skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.deserialize::<LedgerRecord>().enumerate() {
            let row = row_idx + 2; // 1-indexed, accounting for header row

            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row, e);
                    continue;
                }
            };

            match record.parse() {
                Ok(parsed) => {
                    if let Err(e) = self.apply_record(parsed) {
                        warn!("Row {}: {}", row, e);
                    }
                }
                Err(message) => {
                    warn!("{}", LedgerError::InvalidRecord { row, message });
                }
            }
        }

        Ok(())
    }

    /// Applies a single parsed record.
    pub fn apply_record(&mut self, record: ParsedRecord) -> Result<()> {
        let ParsedRecord { group, kind } = record;

        match kind {
            RecordKind::Member(member) => {
                self.add_member(group, member);
            }
            RecordKind::Expense {
                id,
                date,
                description,
                amount,
                paid_by,
                split_among,
            } => {
                let expense = Expense {
                    id,
                    group,
                    date,
                    description,
                    amount,
                    paid_by,
                };
                self.add_expense(expense, &split_among)?;
            }
            RecordKind::Settlement {
                date,
                paid_by,
                paid_to,
                amount,
            } => {
                let settlement = Settlement {
                    group,
                    paid_by,
                    paid_to,
                    amount,
                    date,
                };
                self.record_settlement(settlement)?;
            }
            RecordKind::DeleteExpense { id, acting } => {
                self.delete_expense(&group, id, &acting)?;
            }
        }

        Ok(())
    }

    /// Adds `member` to `group`, creating the group if it is new.
    ///
    /// Returns `false` if they were already a member.
    pub fn add_member(&mut self, group: GroupId, member: Participant) -> bool {
        let book = self
            .books
            .entry(group.clone())
            .or_insert_with(|| GroupBook::new(group.clone()));

        let added = book.group.add_member(member.clone());
        if added {
            debug!("Added {} to group {}", member, group);
        } else {
            debug!("{} is already a member of group {}", member, group);
        }
        added
    }

    /// Records an expense and splits it evenly among `split_among`.
    ///
    /// Shares are truncated to the cent and leftover cents go to the members
    /// listed first, so the shares always sum to the expense amount.
    pub fn add_expense(&mut self, expense: Expense, split_among: &[Participant]) -> Result<()> {
        if self.expense_ids.contains(&expense.id) {
            return Err(LedgerError::DuplicateExpenseId {
                expense_id: expense.id,
            });
        }
        if split_among.is_empty() {
            return Err(LedgerError::EmptySplit {
                expense_id: expense.id,
            });
        }

        let book = self
            .books
            .get_mut(&expense.group)
            .ok_or_else(|| LedgerError::UnknownGroup(expense.group.clone()))?;
        book.ensure_member(&expense.paid_by)?;
        for member in split_among {
            book.ensure_member(member)?;
        }

        let shares = expense.amount.split_evenly(split_among.len());
        for (member, share) in split_among.iter().zip(shares) {
            book.splits.push(Split {
                expense_id: expense.id,
                member: member.clone(),
                amount_owed: share,
                settled: false,
            });
        }

        debug!(
            "Expense {} of {} paid by {} split among {} member(s) in group {}",
            expense.id,
            expense.amount,
            expense.paid_by,
            split_among.len(),
            expense.group
        );

        self.expense_ids.insert(expense.id);
        book.expenses.push(expense);
        Ok(())
    }

    /// Records a settlement and marks the splits it fully covers as settled.
    ///
    /// Returns the expense ids of the splits that were settled.
    pub fn record_settlement(&mut self, settlement: Settlement) -> Result<Vec<u32>> {
        if settlement.paid_by == settlement.paid_to {
            return Err(LedgerError::SelfSettlement(settlement.paid_by));
        }

        let book = self
            .books
            .get_mut(&settlement.group)
            .ok_or_else(|| LedgerError::UnknownGroup(settlement.group.clone()))?;
        book.ensure_member(&settlement.paid_by)?;
        book.ensure_member(&settlement.paid_to)?;

        let settled = apply_settlement(
            &mut book.splits,
            &book.expenses,
            &settlement.paid_by,
            &settlement.paid_to,
            settlement.amount,
        );

        debug!(
            "{} paid {} {} in group {}, settling expense(s) {:?}",
            settlement.paid_by, settlement.paid_to, settlement.amount, settlement.group, settled
        );

        book.settlements.push(settlement);
        Ok(settled)
    }

    /// Deletes an expense of `group` together with its splits.
    ///
    /// Only the expense's payer or the group's creator may delete it. The
    /// expense id becomes free for reuse. Recorded settlements are kept.
    pub fn delete_expense(
        &mut self,
        group: &GroupId,
        expense_id: u32,
        acting: &Participant,
    ) -> Result<()> {
        let book = self
            .books
            .get_mut(group)
            .ok_or_else(|| LedgerError::UnknownGroup(group.clone()))?;
        book.ensure_member(acting)?;

        let position = book
            .expenses
            .iter()
            .position(|e| e.id == expense_id)
            .ok_or_else(|| LedgerError::UnknownExpense {
                group: group.clone(),
                expense_id,
            })?;

        let expense = &book.expenses[position];
        if &expense.paid_by != acting && book.group.created_by() != Some(acting) {
            return Err(LedgerError::DeleteDenied {
                participant: acting.clone(),
                expense_id,
            });
        }

        let expense = book.expenses.remove(position);
        book.splits.retain(|s| s.expense_id != expense_id);
        self.expense_ids.remove(&expense_id);

        debug!(
            "{} deleted expense {} of {} paid by {} in group {}",
            acting, expense_id, expense.amount, expense.paid_by, group
        );
        Ok(())
    }

    fn book(&self, group: &GroupId) -> Result<&GroupBook> {
        self.books
            .get(group)
            .ok_or_else(|| LedgerError::UnknownGroup(group.clone()))
    }

    /// Group ids in ascending order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupId> + '_ {
        self.books.keys()
    }

    pub fn group(&self, group: &GroupId) -> Result<&Group> {
        Ok(&self.book(group)?.group)
    }

    /// Expenses of `group` in the order they were recorded.
    pub fn expenses(&self, group: &GroupId) -> Result<&[Expense]> {
        Ok(&self.book(group)?.expenses)
    }

    /// Settlements of `group` in the order they were recorded.
    pub fn settlements(&self, group: &GroupId) -> Result<&[Settlement]> {
        Ok(&self.book(group)?.settlements)
    }

    /// Splits of `group` joined to their expense's payer.
    pub fn expense_splits(&self, group: &GroupId) -> Result<Vec<ExpenseSplit>> {
        Ok(self.book(group)?.expense_splits())
    }

    /// Who owes whom in `group`, from unsettled splits.
    pub fn balances(&self, group: &GroupId) -> Result<OwesGraph> {
        Ok(aggregate(&self.expense_splits(group)?))
    }

    /// A minimal set of payments that clears every balance in `group`.
    pub fn simplified(&self, group: &GroupId) -> Result<Vec<SuggestedPayment>> {
        Ok(simplify(&self.balances(group)?))
    }

    pub fn statistics(&self, group: &GroupId) -> Result<GroupStatistics> {
        let book = self.book(group)?;
        Ok(statistics(&book.group, &book.expenses, &book.expense_splits()))
    }

    /// Writes the owes-graph of `group` as `debtor,creditor,amount` CSV.
    pub fn write_balances<W: Write>(&self, group: &GroupId, writer: W) -> Result<()> {
        let graph = self.balances(group)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["debtor", "creditor", "amount"])?;
        for (debtor, creditor, amount) in graph.iter() {
            csv_writer.write_record([debtor.as_str(), creditor.as_str(), &amount.to_string()])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes the suggested payments of `group` as `from,to,amount` CSV.
    ///
    /// Rows are in emission order.
    pub fn write_payments<W: Write>(&self, group: &GroupId, writer: W) -> Result<()> {
        let payments = self.simplified(group)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["from", "to", "amount"])?;
        for payment in &payments {
            csv_writer.write_record([
                payment.from.as_str(),
                payment.to.as_str(),
                &payment.amount.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes the statistics of `group` as pretty-printed JSON.
    pub fn write_statistics<W: Write>(&self, group: &GroupId, mut writer: W) -> Result<()> {
        let stats = self.statistics(group)?;
        serde_json::to_writer_pretty(&mut writer, &stats)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Writes every expense of `group` as CSV, newest first.
    ///
    /// Columns are `Date,Description,Amount,Paid By,Split Among`, where
    /// `Split Among` lists the split members joined with `", "`.
    pub fn write_export<W: Write>(&self, group: &GroupId, writer: W) -> Result<()> {
        let book = self.book(group)?;
        let mut expenses: Vec<&Expense> = book.expenses.iter().collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["Date", "Description", "Amount", "Paid By", "Split Among"])?;

        for expense in expenses {
            let split_among = book
                .splits
                .iter()
                .filter(|s| s.expense_id == expense.id)
                .map(|s| s.member.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            csv_writer.write_record([
                expense.date.to_string(),
                expense.description.clone(),
                expense.amount.to_string(),
                expense.paid_by.to_string(),
                split_among,
            ])?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
