//! Expense Ledger CLI
//!
//! Loads a ledger CSV and prints one report for one group.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- simplify ledger.csv trip > payments.csv
//! ```
//!
//! Commands:
//!
//! - `balances`: who owes whom, as `debtor,creditor,amount`
//! - `simplify`: suggested payments, as `from,to,amount`
//! - `stats`: group statistics as JSON
//! - `export`: expenses as `Date,Description,Amount,Paid By,Split Among`
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use expense_ledger::{GroupId, Ledger, LedgerError, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

/// Report selected on the command line.
enum Command {
    Balances,
    Simplify,
    Stats,
    Export,
}

impl Command {
    fn parse(name: &str) -> Result<Self> {
        match name {
            "balances" => Ok(Command::Balances),
            "simplify" => Ok(Command::Simplify),
            "stats" => Ok(Command::Stats),
            "export" => Ok(Command::Export),
            other => Err(LedgerError::UnknownCommand(other.to_string())),
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        return Err(LedgerError::MissingArgument);
    }

    let command = Command::parse(&args[1])?;
    let input_path = &args[2];
    let group = GroupId::new(args[3].as_str());

    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let mut ledger = Ledger::new();
    ledger.process_csv(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    match command {
        Command::Balances => ledger.write_balances(&group, handle)?,
        Command::Simplify => ledger.write_payments(&group, handle)?,
        Command::Stats => ledger.write_statistics(&group, handle)?,
        Command::Export => ledger.write_export(&group, handle)?,
    }

    Ok(())
}
