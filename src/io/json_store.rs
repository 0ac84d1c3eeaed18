//! File-backed persistence gateway
//!
//! Stores the whole ledger as one pretty-printed JSON document. Every flush is
//! a full rewrite: the model is serialized into a temporary file next to the
//! target, synced, then atomically renamed over it, so a crash mid-write never
//! leaves a truncated document behind.

use crate::core::traits::Persistence;
use crate::types::{DataModel, LedgerError};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Persistence gateway writing the model to a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl Persistence for JsonFileStore {
    fn load(&self) -> Result<DataModel, LedgerError> {
        let file = File::open(&self.path).map_err(|e| {
            LedgerError::persistence(format!(
                "Failed to open '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let model: DataModel = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            LedgerError::persistence(format!(
                "Failed to parse '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        debug!(path = %self.path.display(), "ledger document loaded");
        Ok(model)
    }

    fn flush(&mut self, model: &DataModel) -> Result<(), LedgerError> {
        let mut temp = NamedTempFile::new_in(self.directory())?;

        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            let mut serializer =
                serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
            model.serialize(&mut serializer)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(&self.path).map_err(|e| {
            LedgerError::persistence(format!(
                "Failed to replace '{}': {}",
                self.path.display(),
                e.error
            ))
        })?;

        debug!(path = %self.path.display(), "ledger document flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LedgerEngine, TransferRequest};
    use crate::types::{Account, Bank, Currency, User};
    use rust_decimal::Decimal;
    use std::fs;
    use std::str::FromStr;
    use tempfile::tempdir;

    fn model() -> DataModel {
        DataModel {
            currencies: vec![Currency {
                currency_id: "USD".to_string(),
                ..Default::default()
            }],
            users: vec![],
            banks: vec![Bank::new("bank-1", "First")
                .with_account(Account::new("A", "bank-1", "u1").with_balance("USD", Decimal::new(1050, 1)))],
        }
    }

    #[test]
    fn test_flush_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("data.json"));

        store.flush(&model()).unwrap();

        assert_eq!(store.load().unwrap(), model());
    }

    #[test]
    fn test_flush_keeps_full_decimal_precision() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        let mut store = JsonFileStore::new(&path);
        let model = DataModel {
            currencies: vec![Currency {
                currency_id: "USD".to_string(),
                ..Default::default()
            }],
            users: vec![User::new("u1", "ann@example.com", "pw")],
            banks: vec![Bank::new("bank-1", "First")
                .with_account(Account::new("A", "bank-1", "u1").with_balance("USD", Decimal::ONE))
                .with_account(
                    Account::new("B", "bank-1", "u2")
                        .with_balance("USD", Decimal::from_str("10000000000000000").unwrap()),
                )],
        };
        store.flush(&model).unwrap();

        let mut engine = LedgerEngine::open(store).unwrap();
        engine
            .transfer(&TransferRequest::new("u1", "A", "B", "USD", Decimal::new(5, 1)))
            .unwrap();

        let reloaded = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(reloaded, *engine.repository().model());

        let account = |id: &str| {
            reloaded.banks[0]
                .accounts
                .iter()
                .find(|account| account.account_id == id)
                .and_then(|account| account.balance_of("USD"))
                .unwrap()
        };
        assert_eq!(account("A"), Decimal::new(5, 1));
        assert_eq!(account("B"), Decimal::from_str("10000000000000000.5").unwrap());
        assert_eq!(
            account("A") + account("B"),
            Decimal::from_str("10000000000000001").unwrap()
        );

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"balance\": 10000000000000000.5"));
    }

    #[test]
    fn test_flush_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("data.json"));
        store.flush(&model()).unwrap();

        store.flush(&DataModel::default()).unwrap();

        assert_eq!(store.load().unwrap(), DataModel::default());
    }

    #[test]
    fn test_flush_writes_four_space_indent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        let mut store = JsonFileStore::new(&path);

        store.flush(&model()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n    \"currencies\""));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing.json"));

        let result = store.load();

        assert!(matches!(result, Err(LedgerError::Persistence { .. })));
    }

    #[test]
    fn test_load_malformed_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::new(&path).load();

        match result {
            Err(LedgerError::Persistence { message }) => assert!(message.contains("Failed to parse")),
            other => panic!("expected persistence error, got {:?}", other),
        }
    }

    #[test]
    fn test_flush_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nope").join("data.json"));

        let result = store.flush(&model());

        assert!(matches!(result, Err(LedgerError::Persistence { .. })));
    }
}
