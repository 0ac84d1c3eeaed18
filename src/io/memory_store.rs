//! In-memory persistence gateway
//!
//! Keeps the last flushed model as a JSON value, so flushes still exercise the
//! full serialization path without touching the filesystem. Used by tests and
//! benchmarks.

use crate::core::traits::Persistence;
use crate::types::{DataModel, LedgerError};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document: Option<serde_json::Value>,
    flushes: usize,
}

impl MemoryStore {
    /// Empty store; loading it yields an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a model, as if it had been flushed before
    pub fn with_model(model: &DataModel) -> Result<Self, LedgerError> {
        Ok(MemoryStore {
            document: Some(model.to_json()?),
            flushes: 0,
        })
    }

    /// Number of flushes since the store was created
    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl Persistence for MemoryStore {
    fn load(&self) -> Result<DataModel, LedgerError> {
        match &self.document {
            Some(document) => Ok(DataModel::from_json(document.clone())?),
            None => Ok(DataModel::default()),
        }
    }

    fn flush(&mut self, model: &DataModel) -> Result<(), LedgerError> {
        self.document = Some(model.to_json()?);
        self.flushes += 1;
        Ok(())
    }
}
