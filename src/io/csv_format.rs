//! CSV reports over ledger state
//!
//! Writes the read-side views (balances, messages, banks, currencies) as CSV
//! with a header row. All functions are pure apart from writing to `output`.

use crate::core::AccountBalance;
use crate::types::{BankSummary, Currency, Message};
use csv::Writer;
use std::io::Write;

/// Write a user's balances with columns: account_id, currency_id, balance
///
/// Rows keep the order given. Balances are normalized, so `70.00` is written as `70`.
pub fn write_balances_csv(
    balances: &[AccountBalance],
    output: &mut dyn Write,
) -> Result<(), String> {
    write_rows(
        output,
        ["account_id", "currency_id", "balance"],
        balances.iter().map(|line| {
            [
                line.account_id.clone(),
                line.currency_id.clone(),
                line.balance.normalize().to_string(),
            ]
        }),
    )
}

/// Write messages with columns: from, data
pub fn write_messages_csv(messages: &[Message], output: &mut dyn Write) -> Result<(), String> {
    write_rows(
        output,
        ["from", "data"],
        messages
            .iter()
            .map(|message| [message.from_id.clone(), message.data.clone()]),
    )
}

/// Write banks with columns: bank_id, name, bank_type
pub fn write_banks_csv(banks: &[BankSummary], output: &mut dyn Write) -> Result<(), String> {
    write_rows(
        output,
        ["bank_id", "name", "bank_type"],
        banks
            .iter()
            .map(|bank| [bank.bank_id.clone(), bank.name.clone(), bank.bank_type.clone()]),
    )
}

/// Write currencies with columns: currency_id, name, symbol, bank_id
pub fn write_currencies_csv(
    currencies: &[Currency],
    output: &mut dyn Write,
) -> Result<(), String> {
    write_rows(
        output,
        ["currency_id", "name", "symbol", "bank_id"],
        currencies.iter().map(|currency| {
            [
                currency.currency_id.clone(),
                currency.name.clone(),
                currency.symbol.clone(),
                currency.bank_id.clone(),
            ]
        }),
    )
}

fn write_rows<const N: usize>(
    output: &mut dyn Write,
    header: [&str; N],
    rows: impl Iterator<Item = [String; N]>,
) -> Result<(), String> {
    let mut writer = Writer::from_writer(output);

    writer
        .write_record(header)
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| format!("Failed to write CSV record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn line(account_id: &str, currency_id: &str, balance: Decimal) -> AccountBalance {
        AccountBalance {
            account_id: account_id.to_string(),
            currency_id: currency_id.to_string(),
            balance,
        }
    }

    #[rstest]
    #[case::empty(vec![], "account_id,currency_id,balance\n")]
    #[case::single(
        vec![line("A", "USD", Decimal::new(70, 0))],
        "account_id,currency_id,balance\nA,USD,70\n"
    )]
    #[case::trailing_zeros_normalized(
        vec![line("A", "USD", Decimal::new(7000, 2))],
        "account_id,currency_id,balance\nA,USD,70\n"
    )]
    #[case::keeps_order_and_precision(
        vec![
            line("C", "USD", Decimal::new(1025, 2)),
            line("A", "EUR", Decimal::new(5, 1)),
        ],
        "account_id,currency_id,balance\nC,USD,10.25\nA,EUR,0.5\n"
    )]
    fn test_write_balances_csv(#[case] balances: Vec<AccountBalance>, #[case] expected: &str) {
        let mut output = Vec::new();
        write_balances_csv(&balances, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_messages_csv_quotes_commas() {
        let messages = vec![Message {
            from_id: "u1".to_string(),
            data: "hello, world".to_string(),
        }];

        let mut output = Vec::new();
        write_messages_csv(&messages, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "from,data\nu1,\"hello, world\"\n"
        );
    }

    #[test]
    fn test_write_banks_and_currencies_csv() {
        let banks = vec![BankSummary {
            bank_id: "bank-1".to_string(),
            name: "First".to_string(),
            bank_type: "retail".to_string(),
        }];
        let currencies = vec![Currency {
            currency_id: "USD".to_string(),
            name: "Dollar".to_string(),
            symbol: "$".to_string(),
            bank_id: "bank-1".to_string(),
            created_at: "2024-01-01".to_string(),
        }];

        let mut output = Vec::new();
        write_banks_csv(&banks, &mut output).unwrap();
        write_currencies_csv(&currencies, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "bank_id,name,bank_type\nbank-1,First,retail\ncurrency_id,name,symbol,bank_id\nUSD,Dollar,$,bank-1\n"
        );
    }
}
