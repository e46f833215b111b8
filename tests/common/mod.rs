#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::{NaiveDate, NaiveDateTime};
use fintrack::{
    fintrack_config::ConfigManager,
    fintrack_core::{Clock, FixedClock},
    FinTrack,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use tokio::{sync::watch, time::timeout};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub const WAIT: Duration = Duration::from_secs(1);

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Wednesday 2024-03-20, 18:45.
pub fn test_now() -> NaiveDateTime {
    date(2024, 3, 20).and_hms_opt(18, 45, 0).unwrap()
}

/// A config manager rooted in a fresh temporary directory.
pub fn config_manager() -> ConfigManager {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    ConfigManager::with_base_dir(base).expect("create config manager for temp dir")
}

/// Boots an app on a pinned clock with isolated configuration storage.
pub fn setup_test_env() -> (FinTrack, Arc<FixedClock>, ConfigManager) {
    let manager = config_manager();
    let clock = Arc::new(FixedClock::new(test_now()));
    let app = FinTrack::bootstrap(manager.clone(), Arc::clone(&clock) as Arc<dyn Clock>)
        .expect("bootstrap app");
    (app, clock, manager)
}

/// Waits until the watched value satisfies `predicate` and returns it.
pub async fn settle<T: Clone>(
    receiver: &mut watch::Receiver<T>,
    predicate: impl FnMut(&T) -> bool,
) -> T {
    timeout(WAIT, receiver.wait_for(predicate))
        .await
        .expect("value settles in time")
        .expect("sender still alive")
        .clone()
}
