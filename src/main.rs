//! Bank ledger CLI
//!
//! Command-line interface for operating a ledger stored in a JSON document.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --data-file data.json banks
//! cargo run -- --data-file data.json balances --email ann@example.com --password secret
//! cargo run -- transfer --email ann@example.com --password secret \
//!     --from acc-1 --to acc-2 --currency USD --amount 30
//! ```
//!
//! Every option can also come from the environment (`LEDGER_DATA_FILE`,
//! `LEDGER_EMAIL`, `LEDGER_PASSWORD`, `LEDGER_LOG_FORMAT`). Logs go to stderr,
//! reports to stdout.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unreadable or invalid document, rejected request, failed flush, etc.)

use bank_ledger::cli::{self, CliError};
use bank_ledger::logging;
use std::process;
use tracing::error;

fn main() {
    let args = cli::parse_args();
    logging::init(args.log_format);

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        match &e {
            CliError::Ledger(ledger_error) => error!(
                status = ledger_error.status_code(),
                fatal = ledger_error.is_fatal(),
                "{}",
                ledger_error
            ),
            CliError::Output(message) => error!("{}", message),
        }
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
