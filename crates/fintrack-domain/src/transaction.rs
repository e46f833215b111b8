//! Raw transaction records consumed by the in-memory aggregation.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of money movement for a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    /// Moves `amount` out of the owning account and `to_amount` into `to_account`.
    Transfer { to_account: Uuid, to_amount: Decimal },
}

/// A single ledger entry. Amounts are positive; the kind gives the sign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub time: NaiveDateTime,
    #[serde(default)]
    pub hidden: bool,
}

impl Transaction {
    pub fn new(account_id: Uuid, kind: TransactionKind, amount: Decimal, time: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            kind,
            amount,
            time,
            hidden: false,
        }
    }

    pub fn income(account_id: Uuid, amount: Decimal, time: NaiveDateTime) -> Self {
        Self::new(account_id, TransactionKind::Income, amount, time)
    }

    pub fn expense(account_id: Uuid, amount: Decimal, time: NaiveDateTime) -> Self {
        Self::new(account_id, TransactionKind::Expense, amount, time)
    }

    pub fn transfer(
        from_account: Uuid,
        to_account: Uuid,
        amount: Decimal,
        to_amount: Decimal,
        time: NaiveDateTime,
    ) -> Self {
        Self::new(
            from_account,
            TransactionKind::Transfer {
                to_account,
                to_amount,
            },
            amount,
            time,
        )
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Signed effect of this transaction on `account`, if it touches it.
    pub fn effect_on(&self, account: Uuid) -> Option<Decimal> {
        match &self.kind {
            TransactionKind::Income if self.account_id == account => Some(self.amount),
            TransactionKind::Expense if self.account_id == account => Some(-self.amount),
            TransactionKind::Transfer {
                to_account,
                to_amount,
            } => {
                if self.account_id == account {
                    Some(-self.amount)
                } else if *to_account == account {
                    Some(*to_amount)
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}
