//! Persistence seam for the ledger engine
//!
//! The engine never touches storage directly. It loads its state once through
//! a [`Persistence`] implementation and flushes the full model back after every
//! committed mutation. Implementations can be file-backed (`JsonFileStore`) or
//! purely in memory (`MemoryStore`).

use crate::types::{DataModel, LedgerError};

/// Durable storage for the whole ledger state
pub trait Persistence {
    /// Read the stored model
    ///
    /// Returns the model exactly as parsed; invariant checks are the engine's job.
    fn load(&self) -> Result<DataModel, LedgerError>;

    /// Replace the stored model with `model`
    ///
    /// Every call is a full-state rewrite. An error means the new state may not
    /// be durable and the caller must treat the mutation as uncommitted.
    fn flush(&mut self, model: &DataModel) -> Result<(), LedgerError>;
}
