//! Account statistics: the aggregation interface and an in-memory implementation.

use std::{collections::HashMap, sync::Arc};

use fintrack_domain::{
    Account, AccountStats, CurrencyCode, SelectedPeriod, TimeRange, Transaction, TransactionKind,
    Value,
};
use rust_decimal::Decimal;
use tokio::{runtime::Handle, sync::watch};
use tracing::debug;

use crate::CoreError;

/// Inputs that fully determine one stats stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsQuery {
    pub account: Account,
    pub range: TimeRange,
    pub include_hidden: bool,
    pub output_currency: CurrencyCode,
}

impl StatsQuery {
    /// Query over the range of `period`, reported in the account's currency.
    pub fn for_period(account: Account, period: &SelectedPeriod, include_hidden: bool) -> Self {
        let output_currency = account.currency.clone();
        Self {
            account,
            range: period.range(),
            include_hidden,
            output_currency,
        }
    }
}

/// Produces account statistics that re-emit whenever the underlying data changes.
///
/// Implementations must be consistent: the same query over the same data
/// yields the same stats. Streams stop once every receiver is dropped.
/// Streams are driven by tokio tasks; outside a runtime `observe` fails
/// with [`CoreError::NoRuntime`].
pub trait AccStatsFlow: Send + Sync {
    fn observe(&self, query: StatsQuery) -> Result<watch::Receiver<AccountStats>, CoreError>;
}

/// Shared, observable set of transactions.
#[derive(Debug)]
pub struct TransactionFeed {
    transactions: watch::Sender<Arc<Vec<Transaction>>>,
}

impl TransactionFeed {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        let (transactions, _) = watch::channel(Arc::new(transactions));
        Self { transactions }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Transaction>>> {
        self.transactions.subscribe()
    }

    pub fn push(&self, transaction: Transaction) {
        self.transactions
            .send_modify(|current| Arc::make_mut(current).push(transaction));
    }

    /// Number of live subscriptions, including aggregation streams.
    pub fn observer_count(&self) -> usize {
        self.transactions.receiver_count()
    }
}

impl Default for TransactionFeed {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Aggregates a [`TransactionFeed`] in memory.
///
/// Conversion between currencies uses a fixed rate table; a query whose
/// output currency has no rate from the account currency is rejected.
pub struct LedgerStatsFlow {
    transactions: watch::Receiver<Arc<Vec<Transaction>>>,
    rates: HashMap<(CurrencyCode, CurrencyCode), Decimal>,
}

impl LedgerStatsFlow {
    pub fn new(feed: &TransactionFeed) -> Self {
        Self {
            transactions: feed.subscribe(),
            rates: HashMap::new(),
        }
    }

    /// Registers how many `to` one unit of `from` is worth.
    pub fn with_rate(mut self, from: CurrencyCode, to: CurrencyCode, rate: Decimal) -> Self {
        self.rates.insert((from, to), rate);
        self
    }

    fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<Decimal, CoreError> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        self.rates
            .get(&(from.clone(), to.clone()))
            .copied()
            .ok_or_else(|| CoreError::MissingRate {
                from: from.clone(),
                to: to.clone(),
            })
    }
}

impl AccStatsFlow for LedgerStatsFlow {
    fn observe(&self, query: StatsQuery) -> Result<watch::Receiver<AccountStats>, CoreError> {
        let runtime = Handle::try_current().map_err(|_| CoreError::NoRuntime)?;
        let rate = self.rate(&query.account.currency, &query.output_currency)?;
        let mut source = self.transactions.clone();
        let initial = aggregate(&source.borrow_and_update(), &query, rate);
        let (stats, receiver) = watch::channel(initial);

        runtime.spawn(async move {
            loop {
                tokio::select! {
                    _ = stats.closed() => break,
                    changed = source.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let next = aggregate(&source.borrow_and_update(), &query, rate);
                        stats.send_replace(next);
                    }
                }
            }
            debug!(account = %query.account.id, "stats stream finished");
        });

        Ok(receiver)
    }
}

fn aggregate(transactions: &[Transaction], query: &StatsQuery, rate: Decimal) -> AccountStats {
    let mut balance = Decimal::ZERO;
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut income_count = 0;
    let mut expense_count = 0;

    let relevant = transactions
        .iter()
        .filter(|txn| query.include_hidden || !txn.hidden)
        .filter(|txn| query.range.contains(txn.time));
    for txn in relevant {
        let Some(effect) = txn.effect_on(query.account.id) else {
            continue;
        };
        balance += effect;
        match txn.kind {
            TransactionKind::Income => {
                income += txn.amount;
                income_count += 1;
            }
            TransactionKind::Expense => {
                expense += txn.amount;
                expense_count += 1;
            }
            TransactionKind::Transfer { .. } => {}
        }
    }

    let currency = &query.output_currency;
    AccountStats {
        balance: Value::new(balance * rate, currency.clone()),
        income: Value::new(income * rate, currency.clone()),
        expense: Value::new(expense * rate, currency.clone()),
        income_count,
        expense_count,
    }
}
