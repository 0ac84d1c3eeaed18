use crate::logging::LogFormat;
use crate::types::amount::parse_decimal;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Operate a multi-bank ledger stored in a JSON document
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Operate a multi-bank ledger stored in a JSON document", long_about = None)]
pub struct CliArgs {
    /// Ledger document to load and flush
    #[arg(
        long = "data-file",
        env = "LEDGER_DATA_FILE",
        value_name = "PATH",
        default_value = "data.json"
    )]
    pub data_file: PathBuf,

    /// Log output format
    #[arg(
        long = "log-format",
        env = "LEDGER_LOG_FORMAT",
        value_enum,
        default_value = "pretty"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Caller credentials for protected commands
#[derive(Args, Debug, Clone, PartialEq)]
pub struct Credentials {
    #[arg(long, env = "LEDGER_EMAIL")]
    pub email: String,

    #[arg(long, env = "LEDGER_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the caller's balances as CSV
    Balances {
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Move funds from one of the caller's accounts to any account
    Transfer {
        #[command(flatten)]
        credentials: Credentials,

        /// Source account id (must be owned by the caller)
        #[arg(long)]
        from: String,

        /// Destination account id
        #[arg(long)]
        to: String,

        /// Currency id
        #[arg(long)]
        currency: String,

        /// Amount to move, strictly positive
        #[arg(long, allow_negative_numbers = true, value_parser = parse_amount)]
        amount: Decimal,
    },

    /// Print every message across the caller's accounts as CSV
    Messages {
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Post a message to every account the caller owns
    PostMessage {
        #[command(flatten)]
        credentials: Credentials,

        #[arg(long)]
        text: String,
    },

    /// List banks as CSV
    Banks,

    /// List currencies as CSV
    Currencies,

    /// Load the document and check its invariants
    Validate,
}

fn parse_amount(value: &str) -> Result<Decimal, String> {
    parse_decimal(value).map_err(|e| format!("invalid amount '{}': {}", value, e))
}
