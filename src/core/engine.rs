//! Ledger engine
//!
//! This module provides the `LedgerEngine`, which owns the [`Repository`] and a
//! [`Persistence`] gateway and runs every operation on the ledger state.
//!
//! The transfer protocol validates strictly before it mutates:
//! 1. the amount is positive and the two accounts differ
//! 2. both accounts exist
//! 3. the caller owns the source account
//! 4. the currency exists
//! 5. both accounts hold a balance entry for the currency
//! 6. the source balance covers the amount
//!
//! Only then are the two balances written in place and the mirrored pair of
//! transaction records appended. The full model is flushed before success is
//! reported; if the flush fails the mutation is rolled back and the engine stops
//! accepting further mutations.

use crate::core::repository::{AccountLocation, Repository};
use crate::core::traits::Persistence;
use crate::types::{
    Account, AccountId, BankSummary, Currency, CurrencyId, DataModel, LedgerError, Message,
    Transaction, UserId,
};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

/// Timestamp format written into transaction records
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Request to move value between two accounts
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    /// Authenticated user issuing the request
    pub caller: UserId,
    pub from: AccountId,
    pub to: AccountId,
    pub currency_id: CurrencyId,
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(
        caller: impl Into<UserId>,
        from: impl Into<AccountId>,
        to: impl Into<AccountId>,
        currency_id: impl Into<CurrencyId>,
        amount: Decimal,
    ) -> Self {
        TransferRequest {
            caller: caller.into(),
            from: from.into(),
            to: to.into(),
            currency_id: currency_id.into(),
            amount,
        }
    }
}

/// The two records written by a committed transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    /// Record appended to the source account
    pub sender: Transaction,
    /// Record appended to the destination account
    pub recipient: Transaction,
}

/// One balance line of a user's holdings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    pub account_id: AccountId,
    pub currency_id: CurrencyId,
    pub balance: Decimal,
}

/// Validated transfer, ready to apply
struct TransferPlan {
    from: AccountLocation,
    to: AccountLocation,
    sender_before: Decimal,
    sender_after: Decimal,
    recipient_before: Decimal,
    recipient_after: Decimal,
}

/// Ledger engine
///
/// Owns the ledger state and its persistence gateway. All mutating operations
/// take `&mut self`; wrap the engine in a [`SharedLedger`](crate::core::SharedLedger)
/// to share it between threads.
#[derive(Debug)]
pub struct LedgerEngine<P: Persistence> {
    repository: Repository,
    persistence: P,

    /// Set after a failed flush; no further mutations are accepted
    halted: Option<String>,
}

impl<P: Persistence> LedgerEngine<P> {
    /// Load the model from `persistence` and start an engine over it
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or parsed, or if the loaded
    /// model violates a structural invariant.
    pub fn open(persistence: P) -> Result<Self, LedgerError> {
        let model = persistence.load()?;
        Self::new(model, persistence)
    }

    /// Start an engine over an existing model
    ///
    /// The model is validated first; an invalid model is rejected here rather
    /// than failing later at use time.
    pub fn new(model: DataModel, persistence: P) -> Result<Self, LedgerError> {
        model.validate()?;
        debug!(
            banks = model.banks.len(),
            users = model.users.len(),
            currencies = model.currencies.len(),
            "ledger model loaded"
        );

        Ok(LedgerEngine {
            repository: Repository::new(model),
            persistence,
            halted: None,
        })
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Move `amount` of a currency from one account to another
    ///
    /// # Returns
    ///
    /// The sender-side and recipient-side transaction records on success.
    ///
    /// # Errors
    ///
    /// Validation stops at the first failing check, in this order:
    /// - `InvalidAmount` if the amount is zero or negative
    /// - `SameAccount` if source and destination are the same account
    /// - `AccountNotFound` if either account does not exist
    /// - `NotOwner` if the caller does not own the source account
    /// - `UnknownCurrency` if the currency does not exist
    /// - `CurrencyNotEligible` if either account has no balance in the currency
    /// - `InsufficientFunds` if the source balance is below the amount
    /// - `ArithmeticOverflow` if the recipient balance would exceed `Decimal::MAX`
    ///
    /// None of these leave any trace in the model. A `Persistence` error means
    /// the flush failed: the transfer is rolled back and the engine is halted.
    pub fn transfer(&mut self, request: &TransferRequest) -> Result<TransferReceipt, LedgerError> {
        self.ensure_running()?;

        let plan = match self.validate_transfer(request) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(
                    caller = %request.caller,
                    from = %request.from,
                    to = %request.to,
                    currency = %request.currency_id,
                    amount = %request.amount,
                    error = %e,
                    "transfer rejected"
                );
                return Err(e);
            }
        };

        let receipt = self.apply_transfer(request, &plan);

        if let Err(e) = self.flush() {
            self.revert_transfer(request, &plan);
            return Err(e);
        }

        info!(
            from = %request.from,
            to = %request.to,
            currency = %request.currency_id,
            amount = %request.amount,
            "transfer committed"
        );

        Ok(receipt)
    }

    fn validate_transfer(&self, request: &TransferRequest) -> Result<TransferPlan, LedgerError> {
        let amount = request.amount;
        let currency_id = request.currency_id.as_str();

        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount));
        }
        if request.from == request.to {
            return Err(LedgerError::same_account(&request.from));
        }

        let from = self
            .repository
            .locate(&request.from)
            .ok_or_else(|| LedgerError::account_not_found(&request.from))?;
        let to = self
            .repository
            .locate(&request.to)
            .ok_or_else(|| LedgerError::account_not_found(&request.to))?;

        let sender = self.repository.account_at(from);
        let recipient = self.repository.account_at(to);

        // Recipient ownership is never checked
        if !sender.is_owned_by(&request.caller) {
            return Err(LedgerError::not_owner(&request.caller, &sender.account_id));
        }

        if self.repository.find_currency_by_id(currency_id).is_none() {
            return Err(LedgerError::unknown_currency(currency_id));
        }

        let sender_before = sender
            .balance_of(currency_id)
            .ok_or_else(|| LedgerError::currency_not_eligible(&sender.account_id, currency_id))?;
        let recipient_before = recipient
            .balance_of(currency_id)
            .ok_or_else(|| LedgerError::currency_not_eligible(&recipient.account_id, currency_id))?;

        if sender_before < amount {
            return Err(LedgerError::insufficient_funds(
                &sender.account_id,
                sender_before,
                amount,
            ));
        }

        let sender_after = sender_before
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow(&sender.account_id))?;
        let recipient_after = recipient_before
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow(&recipient.account_id))?;

        Ok(TransferPlan {
            from,
            to,
            sender_before,
            sender_after,
            recipient_before,
            recipient_after,
        })
    }

    fn apply_transfer(&mut self, request: &TransferRequest, plan: &TransferPlan) -> TransferReceipt {
        let when = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();

        let sender_record = Transaction::new(
            &request.from,
            &request.to,
            when.clone(),
            &request.currency_id,
            plan.sender_before,
            plan.sender_after,
        );
        let recipient_record = Transaction::new(
            &request.from,
            &request.to,
            when,
            &request.currency_id,
            plan.recipient_before,
            plan.recipient_after,
        );

        write_side(
            self.repository.account_at_mut(plan.from),
            &request.currency_id,
            plan.sender_after,
            sender_record.clone(),
        );
        write_side(
            self.repository.account_at_mut(plan.to),
            &request.currency_id,
            plan.recipient_after,
            recipient_record.clone(),
        );

        TransferReceipt {
            sender: sender_record,
            recipient: recipient_record,
        }
    }

    fn revert_transfer(&mut self, request: &TransferRequest, plan: &TransferPlan) {
        for (location, before) in [
            (plan.from, plan.sender_before),
            (plan.to, plan.recipient_before),
        ] {
            let account = self.repository.account_at_mut(location);
            if let Some(entry) = account.balance_mut(&request.currency_id) {
                entry.balance = before;
            }
            account.transactions.pop();
        }
    }

    /// Append a message to every account the user owns
    ///
    /// # Returns
    ///
    /// The number of accounts the message was delivered to. A user without
    /// accounts gets `Ok(0)` and nothing is flushed.
    pub fn post_message(&mut self, user_id: &str, payload: &str) -> Result<usize, LedgerError> {
        self.ensure_running()?;

        let locations = self.repository.user_account_locations(user_id);
        if locations.is_empty() {
            debug!(user = user_id, "message dropped, user owns no accounts");
            return Ok(0);
        }

        for &location in &locations {
            self.repository
                .account_at_mut(location)
                .messages
                .push(Message {
                    from_id: user_id.to_string(),
                    data: payload.to_string(),
                });
        }

        if let Err(e) = self.flush() {
            for &location in &locations {
                self.repository.account_at_mut(location).messages.pop();
            }
            return Err(e);
        }

        info!(user = user_id, accounts = locations.len(), "message posted");
        Ok(locations.len())
    }

    /// All messages across the user's accounts
    ///
    /// Messages keep insertion order within an account; accounts follow
    /// repository scan order.
    pub fn list_messages(&self, user_id: &str) -> Vec<Message> {
        self.repository
            .find_user_accounts(user_id)
            .into_iter()
            .flat_map(|account| account.messages.iter().cloned())
            .collect()
    }

    /// Resolve a user id from an email and password
    pub fn login(&self, email: &str, password: &str) -> Result<UserId, LedgerError> {
        match self.repository.find_user_by_email(email) {
            Some(user) if user.password == password => Ok(user.user_id.clone()),
            _ => {
                warn!(email, "login rejected");
                Err(LedgerError::invalid_credentials(email))
            }
        }
    }

    /// Every balance line of every account the user owns
    pub fn user_balances(&self, user_id: &str) -> Vec<AccountBalance> {
        self.repository
            .find_user_accounts(user_id)
            .into_iter()
            .flat_map(|account| {
                account.balance.iter().map(|b| AccountBalance {
                    account_id: account.account_id.clone(),
                    currency_id: b.currency_id.clone(),
                    balance: b.balance,
                })
            })
            .collect()
    }

    pub fn list_banks(&self) -> Vec<BankSummary> {
        self.repository.banks().iter().map(BankSummary::from).collect()
    }

    pub fn list_currencies(&self) -> Vec<Currency> {
        self.repository.currencies().to_vec()
    }

    fn ensure_running(&self) -> Result<(), LedgerError> {
        match &self.halted {
            Some(reason) => Err(LedgerError::halted(reason.clone())),
            None => Ok(()),
        }
    }

    fn flush(&mut self) -> Result<(), LedgerError> {
        if let Err(e) = self.persistence.flush(self.repository.model()) {
            error!(error = %e, "flush failed, ledger no longer accepts mutations");
            self.halted = Some(e.to_string());
            return Err(e);
        }
        Ok(())
    }
}

/// Write one side of a transfer: the new balance and its record
fn write_side(account: &mut Account, currency_id: &str, balance: Decimal, record: Transaction) {
    if let Some(entry) = account.balance_mut(currency_id) {
        entry.balance = balance;
    }
    account.transactions.push(record);
}
