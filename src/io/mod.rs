//! I/O module
//!
//! Handles durable storage of the ledger and report output.
//!
//! # Components
//!
//! - `json_store` - File-backed persistence gateway (one JSON document)
//! - `memory_store` - In-memory persistence gateway for tests and benchmarks
//! - `csv_format` - CSV reports over balances, messages, banks and currencies

pub mod csv_format;
pub mod json_store;
pub mod memory_store;

pub use csv_format::{
    write_balances_csv, write_banks_csv, write_currencies_csv, write_messages_csv,
};
pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;
