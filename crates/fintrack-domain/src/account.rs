//! Accounts, currencies and monetary values.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ISO 4217 style currency code, stored upper-case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An amount of money in a specific currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Value {
    pub amount: Decimal,
    pub currency: CurrencyCode,
}

impl Value {
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// A financial account; balances are tracked in its own currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub currency: CurrencyCode,
}

impl Account {
    pub fn new(name: impl Into<String>, currency: CurrencyCode) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            currency,
        }
    }
}

/// Aggregated figures for one account over one range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountStats {
    pub balance: Value,
    pub income: Value,
    pub expense: Value,
    pub income_count: usize,
    pub expense_count: usize,
}

impl AccountStats {
    pub fn empty(currency: CurrencyCode) -> Self {
        Self {
            balance: Value::zero(currency.clone()),
            income: Value::zero(currency.clone()),
            expense: Value::zero(currency),
            income_count: 0,
            expense_count: 0,
        }
    }
}
