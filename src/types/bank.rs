//! Banks and the account types they define

use super::account::Account;
use serde::{Deserialize, Serialize};

/// Bank identifier
pub type BankId = String;

/// Kind of account a bank offers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountType {
    pub type_id: String,
    pub name: String,
    pub description: String,
}

/// Administrative principal of a bank
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BankAdminAuthentication {
    pub name: String,
    pub created_at: String,
    pub username: String,
    pub password: String,
}

/// A bank and the accounts it exclusively owns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bank {
    pub bank_id: BankId,
    pub name: String,
    pub bank_type: String,
    pub created_at: String,
    pub account_types: Vec<AccountType>,
    pub admin_authentication: Vec<BankAdminAuthentication>,
    pub accounts: Vec<Account>,
}

impl Bank {
    pub fn new(bank_id: impl Into<BankId>, name: impl Into<String>) -> Self {
        Bank {
            bank_id: bank_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.push(account);
        self
    }
}

/// Public view of a bank, without its accounts or admin credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankSummary {
    pub bank_id: BankId,
    pub name: String,
    pub bank_type: String,
}

impl From<&Bank> for BankSummary {
    fn from(bank: &Bank) -> Self {
        BankSummary {
            bank_id: bank.bank_id.clone(),
            name: bank.name.clone(),
            bank_type: bank.bank_type.clone(),
        }
    }
}
