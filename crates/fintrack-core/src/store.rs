//! The period state store: one task that owns the current selection.

use std::sync::Arc;

use fintrack_domain::SelectedPeriod;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use crate::{
    combine::LatestCombiner,
    months::{MonthEntry, MonthsProvider},
    period_event::{PeriodContext, PeriodEvent},
    time::Clock,
    CoreError,
};

const COMMAND_BUFFER: usize = 32;

/// Derived state published for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodState {
    pub start_day_of_month: u32,
    pub months: Vec<MonthEntry>,
    pub selected_period: SelectedPeriod,
}

/// Collaborators handed to [`PeriodStateStore::spawn`].
pub struct PeriodStoreDeps {
    pub clock: Arc<dyn Clock>,
    pub months: Arc<dyn MonthsProvider>,
    pub start_day_of_month: watch::Receiver<u32>,
    /// Selection to start from; all time when absent.
    pub initial_period: Option<SelectedPeriod>,
}

enum Command {
    Apply {
        event: PeriodEvent,
        reply: oneshot::Sender<Result<SelectedPeriod, CoreError>>,
    },
    Set {
        period: SelectedPeriod,
        reply: oneshot::Sender<()>,
    },
}

/// Serializes period events and republishes derived state.
///
/// Events are handled one at a time in arrival order; each one is reduced
/// and published before the next is read. A rejected event leaves the
/// current selection untouched.
pub struct PeriodStateStore {
    clock: Arc<dyn Clock>,
    start_day_of_month: watch::Receiver<u32>,
    settings_open: bool,
    selected: watch::Sender<SelectedPeriod>,
    state: LatestCombiner<u32, SelectedPeriod, PeriodState>,
    commands: mpsc::Receiver<Command>,
}

impl PeriodStateStore {
    /// Starts the store on the current tokio runtime.
    ///
    /// The task ends once every [`PeriodStoreHandle`] has been dropped.
    pub fn spawn(deps: PeriodStoreDeps) -> PeriodStoreHandle {
        let PeriodStoreDeps {
            clock,
            months,
            mut start_day_of_month,
            initial_period,
        } = deps;

        let initial = initial_period.unwrap_or_else(|| SelectedPeriod::all_time(clock.now()));
        let (selected, selected_rx) = watch::channel(initial.clone());
        let (commands_tx, commands) = mpsc::channel(COMMAND_BUFFER);

        let months_clock = Arc::clone(&clock);
        let mut state = LatestCombiner::new(move |start_day: &u32, period: &SelectedPeriod| {
            PeriodState {
                start_day_of_month: *start_day,
                months: months.months(months_clock.today()),
                selected_period: period.clone(),
            }
        });
        let state_rx = state.subscribe();
        state.set_left(*start_day_of_month.borrow_and_update());
        state.set_right(initial);

        let store = PeriodStateStore {
            clock,
            start_day_of_month,
            settings_open: true,
            selected,
            state,
            commands,
        };
        tokio::spawn(store.run());

        PeriodStoreHandle {
            commands: commands_tx,
            state: state_rx,
            selected: selected_rx,
        }
    }

    async fn run(mut self) {
        info!("period store started");
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                changed = self.start_day_of_month.changed(), if self.settings_open => {
                    if changed.is_err() {
                        debug!("start day source closed; keeping last value");
                        self.settings_open = false;
                        continue;
                    }
                    let start_day = *self.start_day_of_month.borrow_and_update();
                    debug!(start_day_of_month = start_day, "recomputing period state");
                    self.state.set_left(start_day);
                }
            }
        }
        info!("period store stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Apply { event, reply } => {
                let result = self.apply(&event);
                if let Err(err) = &result {
                    warn!(?event, "period event rejected: {err}");
                }
                // The issuer may have stopped waiting; the state is published either way.
                let _ = reply.send(result);
            }
            Command::Set { period, reply } => {
                self.publish(period);
                let _ = reply.send(());
            }
        }
    }

    fn apply(&mut self, event: &PeriodEvent) -> Result<SelectedPeriod, CoreError> {
        let context = PeriodContext::new(
            self.selected.borrow().clone(),
            *self.start_day_of_month.borrow(),
        );
        let next = context.reduce(event, self.clock.now())?;
        debug!(?event, period = %next, "period event applied");
        self.publish(next.clone());
        Ok(next)
    }

    fn publish(&mut self, period: SelectedPeriod) {
        self.selected.send_replace(period.clone());
        self.state.set_right(period);
    }
}

/// Cloneable front door to a running [`PeriodStateStore`].
#[derive(Clone)]
pub struct PeriodStoreHandle {
    commands: mpsc::Sender<Command>,
    state: watch::Receiver<Option<PeriodState>>,
    selected: watch::Receiver<SelectedPeriod>,
}

impl PeriodStoreHandle {
    /// Applies `event` and returns the selection it produced.
    pub async fn dispatch(&self, event: PeriodEvent) -> Result<SelectedPeriod, CoreError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Apply { event, reply })
            .await
            .map_err(|_| CoreError::StoreClosed)?;
        response.await.map_err(|_| CoreError::StoreClosed)?
    }

    /// Replaces the selection directly, bypassing the reducer.
    pub async fn set_selected_period(&self, period: SelectedPeriod) -> Result<(), CoreError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Set { period, reply })
            .await
            .map_err(|_| CoreError::StoreClosed)?;
        response.await.map_err(|_| CoreError::StoreClosed)
    }

    /// Derived state stream; `None` until both inputs are known.
    pub fn subscribe(&self) -> watch::Receiver<Option<PeriodState>> {
        self.state.clone()
    }

    pub fn current_state(&self) -> Option<PeriodState> {
        self.state.borrow().clone()
    }

    pub fn current_period(&self) -> SelectedPeriod {
        self.selected.borrow().clone()
    }
}
