//! Error types for the ledger
//!
//! Every failure the engine can report is a variant of [`LedgerError`].
//! Validation failures are distinct, non-retryable outcomes; persistence
//! failures are fatal and halt further mutations.
//!
//! # Error Categories
//!
//! - **Request Errors**: invalid amount, same-account transfer, bad credentials
//! - **Lookup Errors**: unknown account or currency
//! - **Authorization Errors**: caller is not authenticated or does not own the source account
//! - **Funds Errors**: currency not held by an account, insufficient balance
//! - **Persistence Errors**: the durable store could not be read or written
//! - **Model Errors**: a loaded document breaks a structural invariant

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for ledger operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// No caller identity could be resolved from the supplied credential
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Email/password pair did not match any user
    #[error("Invalid credentials for {email}")]
    InvalidCredentials { email: String },

    /// Transfer amount is zero or negative
    #[error("Invalid amount {amount}: transfers must move a positive amount")]
    InvalidAmount { amount: Decimal },

    /// Source and destination are the same account
    #[error("Cannot transfer from account {account_id} to itself")]
    SameAccount { account_id: String },

    #[error("Account not found: {account_id}")]
    AccountNotFound { account_id: String },

    /// Caller does not own the source account
    #[error("User {caller} does not own account {account_id}")]
    NotOwner { caller: String, account_id: String },

    #[error("Unknown currency: {currency_id}")]
    UnknownCurrency { currency_id: String },

    /// Account has no balance entry for the currency
    #[error("Account {account_id} does not hold currency {currency_id}")]
    CurrencyNotEligible {
        account_id: String,
        currency_id: String,
    },

    #[error(
        "Insufficient funds in account {account_id}: available {available}, requested {requested}"
    )]
    InsufficientFunds {
        account_id: String,
        available: Decimal,
        requested: Decimal,
    },

    /// Arithmetic overflow while computing a new balance
    #[error("Arithmetic overflow crediting account {account_id}")]
    ArithmeticOverflow { account_id: String },

    /// The durable store could not be read or written
    #[error("Persistence failure: {message}")]
    Persistence { message: String },

    /// A previous persistence failure stopped the ledger from accepting mutations
    #[error("Ledger halted: {reason}")]
    Halted { reason: String },

    /// Loaded document violates a structural invariant
    #[error("Invalid data model: {0}")]
    InvalidModel(#[from] ModelError),
}

/// Structural invariant violations detected when a document is loaded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("duplicate account id {account_id}")]
    DuplicateAccount { account_id: String },

    #[error("account {account_id} holds a balance in unknown currency {currency_id}")]
    UnknownBalanceCurrency {
        account_id: String,
        currency_id: String,
    },

    #[error("account {account_id} holds more than one balance in currency {currency_id}")]
    DuplicateBalance {
        account_id: String,
        currency_id: String,
    },

    #[error("account {account_id} has a transaction referencing unknown account {referenced}")]
    DanglingTransaction {
        account_id: String,
        referenced: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::Persistence {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        LedgerError::Persistence {
            message: format!("JSON error: {}", error),
        }
    }
}

impl LedgerError {
    pub fn invalid_credentials(email: &str) -> Self {
        LedgerError::InvalidCredentials {
            email: email.to_string(),
        }
    }

    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    pub fn same_account(account_id: &str) -> Self {
        LedgerError::SameAccount {
            account_id: account_id.to_string(),
        }
    }

    pub fn account_not_found(account_id: &str) -> Self {
        LedgerError::AccountNotFound {
            account_id: account_id.to_string(),
        }
    }

    pub fn not_owner(caller: &str, account_id: &str) -> Self {
        LedgerError::NotOwner {
            caller: caller.to_string(),
            account_id: account_id.to_string(),
        }
    }

    pub fn unknown_currency(currency_id: &str) -> Self {
        LedgerError::UnknownCurrency {
            currency_id: currency_id.to_string(),
        }
    }

    pub fn currency_not_eligible(account_id: &str, currency_id: &str) -> Self {
        LedgerError::CurrencyNotEligible {
            account_id: account_id.to_string(),
            currency_id: currency_id.to_string(),
        }
    }

    pub fn insufficient_funds(account_id: &str, available: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account_id: account_id.to_string(),
            available,
            requested,
        }
    }

    pub fn arithmetic_overflow(account_id: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            account_id: account_id.to_string(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        LedgerError::Persistence {
            message: message.into(),
        }
    }

    pub fn halted(reason: impl Into<String>) -> Self {
        LedgerError::Halted {
            reason: reason.into(),
        }
    }

    /// HTTP status a transport layer should report for this error
    ///
    /// `NotOwner` maps to 403 so clients can tell it apart from a missing or
    /// expired credential (401).
    pub fn status_code(&self) -> u16 {
        match self {
            LedgerError::NotAuthenticated | LedgerError::InvalidCredentials { .. } => 401,
            LedgerError::NotOwner { .. } => 403,
            LedgerError::InvalidAmount { .. }
            | LedgerError::SameAccount { .. }
            | LedgerError::AccountNotFound { .. }
            | LedgerError::UnknownCurrency { .. }
            | LedgerError::CurrencyNotEligible { .. }
            | LedgerError::InsufficientFunds { .. }
            | LedgerError::ArithmeticOverflow { .. } => 400,
            LedgerError::Persistence { .. }
            | LedgerError::Halted { .. }
            | LedgerError::InvalidModel(_) => 500,
        }
    }

    /// Whether the error means the ledger can no longer accept mutations
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LedgerError::Persistence { .. }
                | LedgerError::Halted { .. }
                | LedgerError::InvalidModel(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::not_authenticated(LedgerError::NotAuthenticated, "Not authenticated")]
    #[case::account_not_found(
        LedgerError::account_not_found("acc-9"),
        "Account not found: acc-9"
    )]
    #[case::not_owner(
        LedgerError::not_owner("u2", "acc-1"),
        "User u2 does not own account acc-1"
    )]
    #[case::currency_not_eligible(
        LedgerError::currency_not_eligible("acc-2", "EUR"),
        "Account acc-2 does not hold currency EUR"
    )]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds("acc-1", Decimal::new(100, 0), Decimal::new(150, 0)),
        "Insufficient funds in account acc-1: available 100, requested 150"
    )]
    #[case::invalid_model(
        LedgerError::from(ModelError::DuplicateBalance {
            account_id: "acc-1".to_string(),
            currency_id: "USD".to_string(),
        }),
        "Invalid data model: account acc-1 holds more than one balance in currency USD"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::not_authenticated(LedgerError::NotAuthenticated, 401)]
    #[case::not_owner(LedgerError::not_owner("u2", "acc-1"), 403)]
    #[case::account_not_found(LedgerError::account_not_found("acc-9"), 400)]
    #[case::unknown_currency(LedgerError::unknown_currency("XYZ"), 400)]
    #[case::not_eligible(LedgerError::currency_not_eligible("acc-2", "EUR"), 400)]
    #[case::invalid_amount(LedgerError::invalid_amount(Decimal::ZERO), 400)]
    #[case::persistence(LedgerError::persistence("disk full"), 500)]
    #[case::halted(LedgerError::halted("disk full"), 500)]
    fn test_status_codes(#[case] error: LedgerError, #[case] expected: u16) {
        assert_eq!(error.status_code(), expected);
    }

    #[test]
    fn test_only_persistence_errors_are_fatal() {
        assert!(LedgerError::persistence("disk full").is_fatal());
        assert!(LedgerError::halted("disk full").is_fatal());
        assert!(!LedgerError::insufficient_funds("a", Decimal::ONE, Decimal::TWO).is_fatal());
        assert!(!LedgerError::not_owner("u", "a").is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert_eq!(error, LedgerError::persistence("Permission denied"));
        assert!(error.is_fatal());
    }
}
