//! Repository over the ledger data model
//!
//! The `Repository` exclusively owns the [`DataModel`] and answers the lookups
//! the engine needs: users by email, accounts by id or owner, and currencies.
//! Account ids are indexed on construction; accounts are never created or
//! removed at runtime, so the index stays valid for the repository's lifetime.
//!
//! Lookups that find nothing return `None` or an empty list rather than an
//! error. Callers decide whether an absence is a client error.

use crate::types::{Account, AccountId, Bank, Currency, DataModel, User};
use std::collections::HashMap;

/// Position of an account inside the model: bank index, then account index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AccountLocation {
    bank: usize,
    account: usize,
}

/// Query layer over the ledger state
#[derive(Debug)]
pub struct Repository {
    model: DataModel,

    /// Account id to position in `model.banks[..].accounts[..]`
    accounts: HashMap<AccountId, AccountLocation>,
}

impl Repository {
    /// Take ownership of a model and index its accounts
    ///
    /// If two accounts share an id, the first one in document order is the one
    /// indexed. Loading rejects such documents, so this only matters for models
    /// built by hand.
    pub fn new(model: DataModel) -> Self {
        let mut accounts = HashMap::new();
        for (bank_index, bank) in model.banks.iter().enumerate() {
            for (account_index, account) in bank.accounts.iter().enumerate() {
                accounts
                    .entry(account.account_id.clone())
                    .or_insert(AccountLocation {
                        bank: bank_index,
                        account: account_index,
                    });
            }
        }

        Repository { model, accounts }
    }

    pub fn model(&self) -> &DataModel {
        &self.model
    }

    pub fn into_model(self) -> DataModel {
        self.model
    }

    pub fn banks(&self) -> &[Bank] {
        &self.model.banks
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.model.currencies
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.model.users.iter().find(|user| user.email == email)
    }

    /// All accounts owned by a user, in bank order then account order
    pub fn find_user_accounts(&self, user_id: &str) -> Vec<&Account> {
        self.accounts_iter()
            .filter(|account| account.is_owned_by(user_id))
            .collect()
    }

    pub fn find_account_by_id(&self, account_id: &str) -> Option<&Account> {
        self.locate(account_id).map(|location| self.account_at(location))
    }

    /// The user's accounts that hold a balance entry for the currency
    pub fn find_accounts_by_currency(&self, user_id: &str, currency_id: &str) -> Vec<&Account> {
        self.find_user_accounts(user_id)
            .into_iter()
            .filter(|account| account.holds_currency(currency_id))
            .collect()
    }

    pub fn find_currency_by_id(&self, currency_id: &str) -> Option<&Currency> {
        self.model
            .currencies
            .iter()
            .find(|currency| currency.currency_id == currency_id)
    }

    pub(crate) fn locate(&self, account_id: &str) -> Option<AccountLocation> {
        self.accounts.get(account_id).copied()
    }

    /// Locations of the user's accounts, in the same order as `find_user_accounts`
    pub(crate) fn user_account_locations(&self, user_id: &str) -> Vec<AccountLocation> {
        let mut locations = Vec::new();
        for (bank_index, bank) in self.model.banks.iter().enumerate() {
            for (account_index, account) in bank.accounts.iter().enumerate() {
                if account.is_owned_by(user_id) {
                    locations.push(AccountLocation {
                        bank: bank_index,
                        account: account_index,
                    });
                }
            }
        }
        locations
    }

    pub(crate) fn account_at(&self, location: AccountLocation) -> &Account {
        &self.model.banks[location.bank].accounts[location.account]
    }

    pub(crate) fn account_at_mut(&mut self, location: AccountLocation) -> &mut Account {
        &mut self.model.banks[location.bank].accounts[location.account]
    }

    fn accounts_iter(&self) -> impl Iterator<Item = &Account> {
        self.model.banks.iter().flat_map(|bank| bank.accounts.iter())
    }
}
