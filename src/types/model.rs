//! Root aggregate of the ledger
//!
//! `DataModel` is the single unit of persistence: currencies, users and banks,
//! with banks embedding their accounts. Parsing is partial-data tolerant
//! (missing fields default to empty values); [`DataModel::validate`] is the
//! separate pass that rejects documents breaking the structural invariants.

use super::bank::Bank;
use super::currency::Currency;
use super::error::ModelError;
use super::user::User;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The whole ledger state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataModel {
    pub currencies: Vec<Currency>,
    pub users: Vec<User>,
    pub banks: Vec<Bank>,
}

impl DataModel {
    /// Parse a document without checking invariants
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Check the structural invariants of the model
    ///
    /// Reports the first violation found, scanning banks and accounts in
    /// document order:
    /// - account ids are unique across all banks
    /// - every balance references an existing currency
    /// - an account holds at most one balance per currency
    /// - every transaction's `from`/`to` references an existing account
    pub fn validate(&self) -> Result<(), ModelError> {
        let currency_ids: HashSet<&str> = self
            .currencies
            .iter()
            .map(|c| c.currency_id.as_str())
            .collect();

        let mut account_ids: HashSet<&str> = HashSet::new();
        for account in self.banks.iter().flat_map(|bank| &bank.accounts) {
            if !account_ids.insert(account.account_id.as_str()) {
                return Err(ModelError::DuplicateAccount {
                    account_id: account.account_id.clone(),
                });
            }
        }

        for account in self.banks.iter().flat_map(|bank| &bank.accounts) {
            let mut seen: HashSet<&str> = HashSet::new();
            for balance in &account.balance {
                if !currency_ids.contains(balance.currency_id.as_str()) {
                    return Err(ModelError::UnknownBalanceCurrency {
                        account_id: account.account_id.clone(),
                        currency_id: balance.currency_id.clone(),
                    });
                }
                if !seen.insert(balance.currency_id.as_str()) {
                    return Err(ModelError::DuplicateBalance {
                        account_id: account.account_id.clone(),
                        currency_id: balance.currency_id.clone(),
                    });
                }
            }

            for tx in &account.transactions {
                for referenced in [&tx.from_id, &tx.to_id] {
                    if !account_ids.contains(referenced.as_str()) {
                        return Err(ModelError::DanglingTransaction {
                            account_id: account.account_id.clone(),
                            referenced: referenced.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Account, Balance, Message, Transaction};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn currency(id: &str) -> Currency {
        Currency {
            currency_id: id.to_string(),
            name: id.to_string(),
            symbol: id.to_string(),
            bank_id: "bank-1".to_string(),
            created_at: "2024-01-01".to_string(),
        }
    }

    fn sample_model() -> DataModel {
        let mut a = Account::new("acc-a", "bank-1", "u1")
            .with_balance("USD", Decimal::new(7025, 2))
            .with_balance("EUR", Decimal::new(10, 0));
        a.messages.push(Message {
            from_id: "u1".to_string(),
            data: "hello".to_string(),
        });
        a.transactions.push(Transaction::new(
            "acc-a",
            "acc-b",
            "2024-01-01 10:00:00.000001",
            "USD",
            Decimal::new(100, 0),
            Decimal::new(7025, 2),
        ));
        let b = Account::new("acc-b", "bank-1", "u2").with_balance("USD", Decimal::new(50, 0));

        DataModel {
            currencies: vec![currency("USD"), currency("EUR")],
            users: vec![User::new("u1", "a@example.com", "pw")],
            banks: vec![Bank::new("bank-1", "First").with_account(a).with_account(b)],
        }
    }

    #[test]
    fn test_round_trip_preserves_model() {
        let model = sample_model();
        let text = serde_json::to_string_pretty(&model).unwrap();
        let parsed: DataModel = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, model);
    }

    #[test]
    fn test_round_trip_preserves_wire_shape() {
        let raw: serde_json::Value = serde_json::from_str(r#"{
            "currencies": [
                {"currency_id": "USD", "name": "Dollar", "symbol": "$", "bank_id": "b1", "created_at": "2024"},
                {"currency_id": "EUR", "name": "Euro", "symbol": "E", "bank_id": "b1", "created_at": "2024"},
                {"currency_id": "JPY", "name": "Yen", "symbol": "Y", "bank_id": "b1", "created_at": "2024"}
            ],
            "users": [{"user_id": "u1", "name": "Ann", "email": "ann@example.com", "password": "pw", "created_at": "2024"}],
            "banks": [{
                "bank_id": "b1", "name": "Bank", "bank_type": "retail", "created_at": "2024",
                "account_types": [{"type_id": "t1", "name": "Checking", "description": "Everyday"}],
                "admin_authentication": [{"name": "root", "created_at": "2024", "username": "admin", "password": "pw"}],
                "accounts": [{
                    "account_id": "a1", "bank_id": "b1", "type_id": "t1", "name": "Main",
                    "owner": {"type": "user", "owner_id": "u1"}, "created_at": "2024",
                    "balance": [
                        {"currency_id": "USD", "balance": 12.5},
                        {"currency_id": "EUR", "balance": 100},
                        {"currency_id": "JPY", "balance": 1234567890.123456789}
                    ],
                    "messages": [{"from": "u1", "data": "hi"}],
                    "transactions": [],
                    "authentication": [{"type": "pin", "data": 1234}]
                }]
            }]
        }"#)
        .unwrap();

        let model = DataModel::from_json(raw.clone()).unwrap();
        assert_eq!(model.to_json().unwrap(), raw);

        let text = serde_json::to_string(&model).unwrap();
        assert!(text.contains(r#"{"currency_id":"EUR","balance":100}"#));
        assert!(text.contains(r#"{"currency_id":"JPY","balance":1234567890.123456789}"#));
    }

    #[test]
    fn test_empty_document_is_an_empty_model() {
        let model = DataModel::from_json(json!({})).unwrap();
        assert_eq!(model, DataModel::default());
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample_model().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_balance_currency() {
        let mut model = sample_model();
        model.banks[0].accounts[1]
            .balance
            .push(Balance::new("GBP", Decimal::ONE));

        assert_eq!(
            model.validate(),
            Err(ModelError::UnknownBalanceCurrency {
                account_id: "acc-b".to_string(),
                currency_id: "GBP".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_balance() {
        let mut model = sample_model();
        model.banks[0].accounts[0]
            .balance
            .push(Balance::new("USD", Decimal::ONE));

        assert!(matches!(
            model.validate(),
            Err(ModelError::DuplicateBalance { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_dangling_transaction() {
        let mut model = sample_model();
        model.banks[0].accounts[0].transactions[0].to_id = "acc-zzz".to_string();

        assert_eq!(
            model.validate(),
            Err(ModelError::DanglingTransaction {
                account_id: "acc-a".to_string(),
                referenced: "acc-zzz".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_account_across_banks() {
        let mut model = sample_model();
        model
            .banks
            .push(Bank::new("bank-2", "Second").with_account(Account::new("acc-a", "bank-2", "u3")));

        assert!(matches!(
            model.validate(),
            Err(ModelError::DuplicateAccount { .. })
        ));
    }
}
