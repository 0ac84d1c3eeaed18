//! Thread-safe ledger handle
//!
//! `SharedLedger` puts a [`LedgerEngine`] behind a single `RwLock` scoped to the
//! whole data model. Transfers, message posts and their flushes take the write
//! lock, so at most one mutation is in flight and no two transfers can read the
//! same stale balance. Reads take the read lock: they may run concurrently with
//! each other but never observe a half-applied transfer.
//!
//! A poisoned lock means a thread panicked mid-operation; every later call then
//! fails with `LedgerError::Halted`.

use crate::core::engine::{AccountBalance, LedgerEngine, TransferReceipt, TransferRequest};
use crate::core::traits::Persistence;
use crate::types::{Account, BankSummary, Currency, DataModel, LedgerError, Message, UserId};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Ledger engine shared between threads
#[derive(Debug)]
pub struct SharedLedger<P: Persistence> {
    engine: RwLock<LedgerEngine<P>>,
}

impl<P: Persistence> SharedLedger<P> {
    pub fn new(engine: LedgerEngine<P>) -> Self {
        SharedLedger {
            engine: RwLock::new(engine),
        }
    }

    /// Load the model from `persistence` and wrap a new engine over it
    pub fn open(persistence: P) -> Result<Self, LedgerError> {
        LedgerEngine::open(persistence).map(Self::new)
    }

    pub fn transfer(&self, request: &TransferRequest) -> Result<TransferReceipt, LedgerError> {
        self.write()?.transfer(request)
    }

    pub fn post_message(&self, user_id: &str, payload: &str) -> Result<usize, LedgerError> {
        self.write()?.post_message(user_id, payload)
    }

    pub fn list_messages(&self, user_id: &str) -> Result<Vec<Message>, LedgerError> {
        Ok(self.read()?.list_messages(user_id))
    }

    pub fn login(&self, email: &str, password: &str) -> Result<UserId, LedgerError> {
        self.read()?.login(email, password)
    }

    pub fn user_balances(&self, user_id: &str) -> Result<Vec<AccountBalance>, LedgerError> {
        Ok(self.read()?.user_balances(user_id))
    }

    pub fn list_banks(&self) -> Result<Vec<BankSummary>, LedgerError> {
        Ok(self.read()?.list_banks())
    }

    pub fn list_currencies(&self) -> Result<Vec<Currency>, LedgerError> {
        Ok(self.read()?.list_currencies())
    }

    /// Copy of one account as of now
    pub fn account(&self, account_id: &str) -> Result<Option<Account>, LedgerError> {
        Ok(self
            .read()?
            .repository()
            .find_account_by_id(account_id)
            .cloned())
    }

    /// Consistent copy of the whole model
    pub fn snapshot(&self) -> Result<DataModel, LedgerError> {
        Ok(self.read()?.repository().model().clone())
    }

    pub fn is_halted(&self) -> Result<bool, LedgerError> {
        Ok(self.read()?.is_halted())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerEngine<P>>, LedgerError> {
        self.engine
            .read()
            .map_err(|_| LedgerError::halted("ledger lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerEngine<P>>, LedgerError> {
        self.engine
            .write()
            .map_err(|_| LedgerError::halted("ledger lock poisoned"))
    }
}
