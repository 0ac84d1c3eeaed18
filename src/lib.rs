//! Bank Ledger Library
//! # Overview
//!
//! This library provides a minimal multi-tenant ledger: users own accounts at
//! banks, accounts hold per-currency balances, and users move value between
//! accounts with atomic transfers that never lose or duplicate money.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Entity model (Currency, Account, Bank, User, DataModel, errors)
//! - [`core`] - Business logic components:
//!   - [`core::repository`] - Lookups over the owned data model
//!   - [`core::engine`] - Transfer protocol, messaging and read operations
//!   - [`core::shared`] - Single lock boundary serializing all mutations
//! - [`io`] - JSON persistence gateway and CSV reports
//! - [`cli`] - CLI arguments parsing and command dispatch
//! - [`logging`] - Tracing subscriber setup
//!
//! # Transfer Guarantees
//!
//! - **Conservation**: the sender's and recipient's balances in the transferred
//!   currency sum to the same value before and after
//! - **Atomicity**: a rejected transfer changes nothing; a committed one writes
//!   both balances and both transaction records
//! - **Durability**: the full model is flushed before a transfer reports success,
//!   and a failed flush rolls the transfer back

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod types;

pub use self::core::{
    AccountBalance, LedgerEngine, Persistence, Repository, SharedLedger, TransferReceipt,
    TransferRequest,
};
pub use io::{JsonFileStore, MemoryStore};
pub use types::{
    Account, Balance, Bank, Currency, DataModel, LedgerError, Message, ModelError, Transaction,
    User,
};
