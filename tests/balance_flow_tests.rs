mod common;

use std::sync::Arc;

use common::{config_manager, date, settle, setup_test_env, test_now};
use fintrack::{
    fintrack_core::{
        AccStatsFlow, BalanceInput, CalendarMonths, Clock, CoreError, FixedClock, LedgerStatsFlow,
        PeriodEvent, TransactionFeed,
    },
    fintrack_domain::{Account, CurrencyCode, Month, Transaction, Value},
    FinTrack, FinTrackError,
};
use rust_decimal::Decimal;

fn usd() -> CurrencyCode {
    CurrencyCode::new("USD")
}

fn dec(value: i64) -> Decimal {
    Decimal::new(value, 0)
}

#[tokio::test]
async fn balance_counts_hidden_and_transfers() {
    let (app, _clock, _manager) = setup_test_env();
    let checking = Account::new("Checking", usd());
    let savings = Account::new("Savings", usd());
    let at = date(2024, 3, 2).and_hms_opt(10, 0, 0).unwrap();

    let mut balance = app.balance(checking.clone()).unwrap();
    assert_eq!(*balance.borrow(), Value::zero(usd()));

    let feed = app.transactions();
    feed.push(Transaction::income(checking.id, dec(100), at));
    feed.push(Transaction::expense(checking.id, dec(30), at).hidden());
    feed.push(Transaction::transfer(checking.id, savings.id, dec(20), dec(20), at));

    let settled = settle(&mut balance, |value| value.amount == dec(50)).await;
    assert_eq!(settled.currency, usd());

    let mut other = app.balance(savings).unwrap();
    let settled = settle(&mut other, |value| value.amount == dec(20)).await;
    assert_eq!(settled, Value::new(dec(20), usd()));
}

#[tokio::test]
async fn balance_ignores_selected_period() {
    let (app, _clock, _manager) = setup_test_env();
    let account = Account::new("Wallet", usd());
    let january = date(2024, 1, 5).and_hms_opt(8, 0, 0).unwrap();
    app.transactions()
        .push(Transaction::income(account.id, dec(40), january));

    app.periods()
        .dispatch(PeriodEvent::Monthly(Month::new(2024, 3).unwrap()))
        .await
        .unwrap();

    let balance = app.balance(account.clone()).unwrap();
    assert_eq!(balance.borrow().amount, dec(40));

    let stats = app.selected_period_stats(account, true).unwrap();
    assert_eq!(stats.borrow().income.amount, Decimal::ZERO);
}

#[tokio::test]
async fn selected_period_stats_respect_hidden_policy() {
    let (app, _clock, _manager) = setup_test_env();
    let account = Account::new("Checking", usd());
    let at = date(2024, 3, 12).and_hms_opt(12, 0, 0).unwrap();
    app.transactions()
        .push(Transaction::income(account.id, dec(500), at));
    app.transactions()
        .push(Transaction::expense(account.id, dec(75), at).hidden());

    app.periods()
        .dispatch(PeriodEvent::ResetToCurrentPeriod)
        .await
        .unwrap();

    let visible = app.selected_period_stats(account.clone(), false).unwrap();
    assert_eq!(visible.borrow().expense_count, 0);
    assert_eq!(visible.borrow().balance.amount, dec(500));

    let everything = app.selected_period_stats(account, true).unwrap();
    assert_eq!(everything.borrow().expense.amount, dec(75));
    assert_eq!(everything.borrow().balance.amount, dec(425));
}

#[tokio::test]
async fn unknown_output_currency_is_rejected() {
    let (app, _clock, _manager) = setup_test_env();
    let account = Account::new("Checking", usd());

    let err = app
        .balance_in(BalanceInput::new(account).in_currency(CurrencyCode::new("eur")))
        .unwrap_err();
    assert!(matches!(
        err,
        FinTrackError::Core(CoreError::MissingRate { ref to, .. }) if to.as_str() == "EUR"
    ));
}

#[tokio::test]
async fn balance_converts_with_supplied_rates() {
    let feed = Arc::new(TransactionFeed::default());
    let stats: Arc<dyn AccStatsFlow> = Arc::new(
        LedgerStatsFlow::new(&feed).with_rate(usd(), CurrencyCode::new("EUR"), Decimal::new(9, 1)),
    );
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(test_now()));
    let app = FinTrack::with_collaborators(
        config_manager(),
        clock,
        Arc::new(CalendarMonths),
        Arc::clone(&feed),
        stats,
    )
    .unwrap();

    let account = Account::new("Travel", usd());
    feed.push(Transaction::income(account.id, dec(200), test_now()));

    let mut balance = app
        .balance_in(BalanceInput::new(account).in_currency(CurrencyCode::new("EUR")))
        .unwrap();
    let settled = settle(&mut balance, |value| value.amount == dec(180)).await;
    assert_eq!(settled.currency.as_str(), "EUR");
}
