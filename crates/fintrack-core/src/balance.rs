use std::sync::Arc;

use fintrack_domain::{all_time, Account, AccountStats, CurrencyCode, Value};
use tokio::{runtime::Handle, sync::watch};
use tracing::debug;

use crate::{
    stats::{AccStatsFlow, StatsQuery},
    time::Clock,
    CoreError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceInput {
    pub account: Account,
    /// Currency to report in; the account's own when `None`.
    pub output_currency: Option<CurrencyCode>,
}

impl BalanceInput {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            output_currency: None,
        }
    }

    pub fn in_currency(mut self, currency: CurrencyCode) -> Self {
        self.output_currency = Some(currency);
        self
    }

    pub fn output_currency(&self) -> CurrencyCode {
        self.output_currency
            .clone()
            .unwrap_or_else(|| self.account.currency.clone())
    }
}

/// An account's balance, including hidden and transfer transactions.
///
/// Pure projection of [`AccStatsFlow`] over all time: no caching of its own.
pub struct AccBalanceFlow {
    stats: Arc<dyn AccStatsFlow>,
    clock: Arc<dyn Clock>,
}

impl AccBalanceFlow {
    pub fn new(stats: Arc<dyn AccStatsFlow>, clock: Arc<dyn Clock>) -> Self {
        Self { stats, clock }
    }

    /// The upstream query a balance stream is built on.
    pub fn query(&self, input: &BalanceInput) -> StatsQuery {
        StatsQuery {
            account: input.account.clone(),
            range: all_time(self.clock.now()),
            include_hidden: true,
            output_currency: input.output_currency(),
        }
    }

    /// Streams the balance; the forwarding task stops when every receiver is dropped.
    ///
    /// Must be called inside a tokio runtime, otherwise [`CoreError::NoRuntime`].
    pub fn observe(&self, input: BalanceInput) -> Result<watch::Receiver<Value>, CoreError> {
        let runtime = Handle::try_current().map_err(|_| CoreError::NoRuntime)?;
        let mut upstream = self.stats.observe(self.query(&input))?;
        let initial = balance_of(&upstream.borrow_and_update());
        let (balance, receiver) = watch::channel(initial);
        let account_id = input.account.id;

        runtime.spawn(async move {
            loop {
                tokio::select! {
                    _ = balance.closed() => break,
                    changed = upstream.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let next = balance_of(&upstream.borrow_and_update());
                        balance.send_replace(next);
                    }
                }
            }
            debug!(account = %account_id, "balance stream finished");
        });

        Ok(receiver)
    }
}

fn balance_of(stats: &AccountStats) -> Value {
    stats.balance.clone()
}
