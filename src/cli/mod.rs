// CLI module
// Command-line interface, argument parsing and command dispatch

mod args;

pub use args::{CliArgs, Command, Credentials};

use crate::core::{Persistence, SharedLedger, TransferRequest};
use crate::io::{
    write_balances_csv, write_banks_csv, write_currencies_csv, write_messages_csv, JsonFileStore,
};
use crate::types::{LedgerError, UserId};
use clap::Parser;
use std::io::Write;
use thiserror::Error;

/// Failure of a CLI command
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Output error: {0}")]
    Output(String),
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Output(error.to_string())
    }
}

/// Parse command-line arguments using clap
///
/// On invalid arguments or `--help`, clap prints the message and exits.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Run one command against the ledger document named in `args`
///
/// Reports are written to `output` as CSV; mutations print a one-line summary.
pub fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), CliError> {
    let ledger = SharedLedger::open(JsonFileStore::new(&args.data_file))?;

    match &args.command {
        Command::Balances { credentials } => {
            let user_id = authenticate(&ledger, credentials)?;
            write_balances_csv(&ledger.user_balances(&user_id)?, output).map_err(CliError::Output)?;
        }
        Command::Transfer {
            credentials,
            from,
            to,
            currency,
            amount,
        } => {
            let user_id = authenticate(&ledger, credentials)?;
            let receipt =
                ledger.transfer(&TransferRequest::new(user_id, from, to, currency, *amount))?;
            writeln!(
                output,
                "transferred {} {} from {} ({} -> {}) to {} ({} -> {})",
                amount,
                currency,
                from,
                receipt.sender.previous_balance(),
                receipt.sender.new_balance(),
                to,
                receipt.recipient.previous_balance(),
                receipt.recipient.new_balance(),
            )?;
        }
        Command::Messages { credentials } => {
            let user_id = authenticate(&ledger, credentials)?;
            write_messages_csv(&ledger.list_messages(&user_id)?, output).map_err(CliError::Output)?;
        }
        Command::PostMessage { credentials, text } => {
            let user_id = authenticate(&ledger, credentials)?;
            let delivered = ledger.post_message(&user_id, text)?;
            writeln!(output, "message delivered to {} account(s)", delivered)?;
        }
        Command::Banks => {
            write_banks_csv(&ledger.list_banks()?, output).map_err(CliError::Output)?;
        }
        Command::Currencies => {
            write_currencies_csv(&ledger.list_currencies()?, output).map_err(CliError::Output)?;
        }
        Command::Validate => {
            let model = ledger.snapshot()?;
            let accounts: usize = model.banks.iter().map(|bank| bank.accounts.len()).sum();
            writeln!(
                output,
                "valid: {} bank(s), {} account(s), {} user(s), {} currency(ies)",
                model.banks.len(),
                accounts,
                model.users.len(),
                model.currencies.len()
            )?;
        }
    }

    Ok(())
}

/// Resolve the caller from credentials; any mismatch is `NotAuthenticated`
fn authenticate<P: Persistence>(
    ledger: &SharedLedger<P>,
    credentials: &Credentials,
) -> Result<UserId, LedgerError> {
    ledger
        .login(&credentials.email, &credentials.password)
        .map_err(|e| match e {
            LedgerError::InvalidCredentials { .. } => LedgerError::NotAuthenticated,
            other => other,
        })
}
