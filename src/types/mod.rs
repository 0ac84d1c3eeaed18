//! Types module
//!
//! Contains the entity model used throughout the application.
//! This module organizes types into logical submodules:
//! - `currency`: Currency definitions
//! - `account`: Accounts, balances, messages and transaction records
//! - `bank`: Banks and account types
//! - `user`: Users
//! - `model`: The `DataModel` root aggregate and its invariant check
//! - `amount`: Decimal codec for monetary fields
//! - `error`: Error types for the ledger

pub mod account;
pub mod amount;
pub mod bank;
pub mod currency;
pub mod error;
pub mod model;
pub mod user;

pub use account::{
    Account, AccountId, Authentication, Balance, Message, Owner, Transaction,
    TransactionCurrency,
};
pub use bank::{AccountType, Bank, BankAdminAuthentication, BankId, BankSummary};
pub use currency::{Currency, CurrencyId};
pub use error::{LedgerError, ModelError};
pub use model::DataModel;
pub use user::{User, UserId};
