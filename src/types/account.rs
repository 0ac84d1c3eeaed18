//! Account-related types for the ledger
//!
//! An account lives inside exactly one bank and carries its per-currency
//! balances together with two append-only histories: the inbox messages and
//! the transaction records written by transfers.

use super::currency::CurrencyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account identifier
pub type AccountId = String;

/// Quantity of one currency held by an account
///
/// An account holds at most one `Balance` per currency. The amount is not
/// structurally prevented from going negative; the transfer protocol is what
/// keeps it from doing so.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    pub currency_id: CurrencyId,

    #[serde(with = "super::amount")]
    pub balance: Decimal,
}

impl Balance {
    pub fn new(currency_id: impl Into<CurrencyId>, balance: Decimal) -> Self {
        Balance {
            currency_id: currency_id.into(),
            balance,
        }
    }
}

/// Inbox entry attached to an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    /// Principal that posted the message
    #[serde(rename = "from")]
    pub from_id: String,

    /// Free-form payload
    pub data: String,
}

/// One side of a completed transfer
///
/// Every transfer writes two of these: one into the sender's history and a
/// mirrored one into the recipient's. Both carry the same `from_id`, `to_id`,
/// `when` and `currency_id`; the balances describe the account that holds the
/// record. Records are never mutated once written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    #[serde(rename = "from")]
    pub from_id: AccountId,

    #[serde(rename = "to")]
    pub to_id: AccountId,

    /// Human-readable local timestamp, `%Y-%m-%d %H:%M:%S.%f`
    pub when: String,

    /// Currency and balance movement, nested under `currency` on the wire
    pub currency: TransactionCurrency,
}

/// Currency block of a [`Transaction`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionCurrency {
    pub currency_id: CurrencyId,

    #[serde(with = "super::amount")]
    pub previous_balance: Decimal,

    #[serde(with = "super::amount")]
    pub new_balance: Decimal,
}

impl Transaction {
    pub fn new(
        from_id: impl Into<AccountId>,
        to_id: impl Into<AccountId>,
        when: impl Into<String>,
        currency_id: impl Into<CurrencyId>,
        previous_balance: Decimal,
        new_balance: Decimal,
    ) -> Self {
        Transaction {
            from_id: from_id.into(),
            to_id: to_id.into(),
            when: when.into(),
            currency: TransactionCurrency {
                currency_id: currency_id.into(),
                previous_balance,
                new_balance,
            },
        }
    }

    pub fn currency_id(&self) -> &str {
        &self.currency.currency_id
    }

    pub fn previous_balance(&self) -> Decimal {
        self.currency.previous_balance
    }

    pub fn new_balance(&self) -> Decimal {
        self.currency.new_balance
    }
}

/// Authentication credential attached to an account
///
/// The ledger never interprets `data`; it is carried through as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Authentication {
    #[serde(rename = "type")]
    pub auth_type: String,

    pub data: serde_json::Value,
}

/// Owning principal of an account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Owner {
    /// Principal kind, e.g. `user` or `bank_admin`
    #[serde(rename = "type")]
    pub owner_type: String,

    pub owner_id: String,
}

impl Owner {
    pub fn user(owner_id: impl Into<String>) -> Self {
        Owner {
            owner_type: "user".to_string(),
            owner_id: owner_id.into(),
        }
    }
}

/// A ledger account held at one bank
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub account_id: AccountId,
    pub bank_id: String,

    /// Reference to one of the owning bank's account types
    pub type_id: String,

    pub name: String,
    pub owner: Owner,
    pub created_at: String,

    /// Per-currency balances, at most one entry per currency
    pub balance: Vec<Balance>,

    pub messages: Vec<Message>,
    pub transactions: Vec<Transaction>,
    pub authentication: Vec<Authentication>,
}

impl Account {
    /// Create an empty account owned by a user
    pub fn new(
        account_id: impl Into<AccountId>,
        bank_id: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        Account {
            account_id: account_id.into(),
            bank_id: bank_id.into(),
            owner: Owner::user(owner_id),
            ..Default::default()
        }
    }

    /// Builder-style helper for seeding a balance
    pub fn with_balance(mut self, currency_id: impl Into<CurrencyId>, amount: Decimal) -> Self {
        self.balance.push(Balance::new(currency_id, amount));
        self
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner.owner_id == user_id
    }

    /// Current amount held in a currency, if the account is eligible for it
    pub fn balance_of(&self, currency_id: &str) -> Option<Decimal> {
        self.balance
            .iter()
            .find(|b| b.currency_id == currency_id)
            .map(|b| b.balance)
    }

    pub fn holds_currency(&self, currency_id: &str) -> bool {
        self.balance.iter().any(|b| b.currency_id == currency_id)
    }

    pub(crate) fn balance_mut(&mut self, currency_id: &str) -> Option<&mut Balance> {
        self.balance
            .iter_mut()
            .find(|b| b.currency_id == currency_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_uses_nested_currency_block() {
        let tx = Transaction::new(
            "acc-a",
            "acc-b",
            "2024-01-01 10:00:00.000000",
            "USD",
            Decimal::new(100, 0),
            Decimal::new(70, 0),
        );

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(
            value,
            json!({
                "from": "acc-a",
                "to": "acc-b",
                "when": "2024-01-01 10:00:00.000000",
                "currency": {
                    "currency_id": "USD",
                    "previous_balance": 100,
                    "new_balance": 70
                }
            })
        );
    }

    #[test]
    fn test_account_missing_fields_default_to_empty() {
        let account: Account = serde_json::from_value(json!({
            "account_id": "acc-a",
            "owner": { "type": "user", "owner_id": "u1" }
        }))
        .unwrap();

        assert_eq!(account.account_id, "acc-a");
        assert_eq!(account.bank_id, "");
        assert!(account.balance.is_empty());
        assert!(account.messages.is_empty());
        assert!(account.transactions.is_empty());
        assert!(account.authentication.is_empty());
        assert!(account.is_owned_by("u1"));
    }

    #[test]
    fn test_balance_lookup_by_currency() {
        let account = Account::new("acc-a", "bank-1", "u1")
            .with_balance("USD", Decimal::new(100, 0))
            .with_balance("EUR", Decimal::new(5, 0));

        assert_eq!(account.balance_of("EUR"), Some(Decimal::new(5, 0)));
        assert_eq!(account.balance_of("GBP"), None);
        assert!(account.holds_currency("USD"));
        assert!(!account.holds_currency("GBP"));
    }

    #[test]
    fn test_authentication_data_passes_through() {
        let raw = json!({ "type": "pin", "data": { "hash": "abc", "tries": 3 } });
        let auth: Authentication = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(auth.auth_type, "pin");
        assert_eq!(serde_json::to_value(&auth).unwrap(), raw);
    }
}
