//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - The persistence seam the engine flushes through
//! - `repository` - Lookups over the owned data model
//! - `engine` - Transfer protocol, messaging and read operations
//! - `shared` - Thread-safe handle serializing all mutations

pub mod engine;
pub mod repository;
pub mod shared;
pub mod traits;

pub use engine::{AccountBalance, LedgerEngine, TransferReceipt, TransferRequest};
pub use repository::Repository;
pub use shared::SharedLedger;
pub use traits::Persistence;
