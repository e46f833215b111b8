//! Explicit wiring of configuration, period state and aggregation.

use std::sync::Arc;

use fintrack_config::{Config, ConfigManager};
use fintrack_core::{
    AccBalanceFlow, AccStatsFlow, BalanceInput, CalendarMonths, Clock, LedgerStatsFlow,
    MonthsProvider, PeriodStateStore, PeriodStoreDeps, PeriodStoreHandle, SettingsFlow,
    StatsQuery, TransactionFeed,
};
use fintrack_domain::{Account, AccountStats, Value};
use tokio::sync::watch;
use tracing::info;

use crate::FinTrackError;

/// A running instance: settings, the period store and the balance pipeline.
///
/// Must be created inside a tokio runtime; background tasks stop when it is dropped.
pub struct FinTrack {
    config: Config,
    config_manager: ConfigManager,
    settings: SettingsFlow,
    periods: PeriodStoreHandle,
    transactions: Arc<TransactionFeed>,
    stats: Arc<dyn AccStatsFlow>,
    balances: AccBalanceFlow,
}

impl FinTrack {
    /// Loads the stored configuration and starts the period store.
    pub fn bootstrap(
        config_manager: ConfigManager,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, FinTrackError> {
        let transactions = Arc::new(TransactionFeed::default());
        let stats: Arc<dyn AccStatsFlow> = Arc::new(LedgerStatsFlow::new(&transactions));
        Self::with_collaborators(
            config_manager,
            clock,
            Arc::new(CalendarMonths),
            transactions,
            stats,
        )
    }

    /// Bootstraps from the platform configuration directory.
    pub fn open(clock: Arc<dyn Clock>) -> Result<Self, FinTrackError> {
        Self::bootstrap(ConfigManager::default_location()?, clock)
    }

    /// Same as [`FinTrack::bootstrap`] with every collaborator supplied by the caller.
    pub fn with_collaborators(
        config_manager: ConfigManager,
        clock: Arc<dyn Clock>,
        months: Arc<dyn MonthsProvider>,
        transactions: Arc<TransactionFeed>,
        stats: Arc<dyn AccStatsFlow>,
    ) -> Result<Self, FinTrackError> {
        let config = config_manager.load()?;
        let settings = SettingsFlow::new(config.start_day_of_month)?;
        let periods = PeriodStateStore::spawn(PeriodStoreDeps {
            clock: Arc::clone(&clock),
            months,
            start_day_of_month: settings.start_day_of_month(),
            initial_period: None,
        });
        let balances = AccBalanceFlow::new(Arc::clone(&stats), clock);
        info!(
            start_day_of_month = config.start_day_of_month,
            currency = %config.currency,
            "fintrack started"
        );

        Ok(Self {
            config,
            config_manager,
            settings,
            periods,
            transactions,
            stats,
            balances,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn periods(&self) -> &PeriodStoreHandle {
        &self.periods
    }

    pub fn settings(&self) -> &SettingsFlow {
        &self.settings
    }

    pub fn transactions(&self) -> &TransactionFeed {
        &self.transactions
    }

    /// Persists a new start day and pushes it to every observer.
    pub fn set_start_day_of_month(&mut self, day: u32) -> Result<(), FinTrackError> {
        let updated = Config {
            start_day_of_month: day,
            ..self.config.clone()
        };
        updated.validate()?;
        self.config_manager.save(&updated)?;
        self.settings.set_start_day_of_month(day)?;
        self.config = updated;
        Ok(())
    }

    /// Snapshots the active configuration; returns the backup name.
    pub fn backup_config(&self) -> Result<String, FinTrackError> {
        let name = self.config_manager.backup(&self.config)?;
        info!(backup = %name, "configuration backed up");
        Ok(name)
    }

    /// Backup names, newest first.
    pub fn config_backups(&self) -> Result<Vec<String>, FinTrackError> {
        Ok(self.config_manager.list_backups()?)
    }

    /// Makes a backup the active configuration and pushes its start day.
    pub fn restore_config(&mut self, backup_name: &str) -> Result<(), FinTrackError> {
        let restored = self.config_manager.restore(backup_name)?;
        self.config_manager.save(&restored)?;
        self.settings
            .set_start_day_of_month(restored.start_day_of_month)?;
        info!(backup = %backup_name, "configuration restored");
        self.config = restored;
        Ok(())
    }

    /// Balance of `account` in its own currency.
    pub fn balance(&self, account: Account) -> Result<watch::Receiver<Value>, FinTrackError> {
        Ok(self.balances.observe(BalanceInput::new(account))?)
    }

    pub fn balance_in(&self, input: BalanceInput) -> Result<watch::Receiver<Value>, FinTrackError> {
        Ok(self.balances.observe(input)?)
    }

    /// Stats of `account` over the currently selected period.
    pub fn selected_period_stats(
        &self,
        account: Account,
        include_hidden: bool,
    ) -> Result<watch::Receiver<AccountStats>, FinTrackError> {
        let period = self.periods.current_period();
        let query = StatsQuery::for_period(account, &period, include_hidden);
        Ok(self.stats.observe(query)?)
    }
}
