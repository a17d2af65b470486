//! Paper session end-to-end tests
//!
//! Drives a session from JSON input the way the binary does and checks the
//! book, the broker and the reconciliation agree.

use meridian_core::OrderStatus;
use meridian_runner::{PaperSession, RunnerConfig, RunnerError, SessionInput};
use meridian_reconciliation::ReconError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_targets_session_reconciles_cleanly() {
    let _ = env_logger::try_init();

    let input = SessionInput::from_json(
        r#"{
            "targets": { "A": 10, "B": 5 },
            "marks": [
                { "instrument_id": "A", "price": 100 },
                { "instrument_id": "B", "price": 42.5, "timestamp": "2024-03-01T14:30:00Z" }
            ]
        }"#,
    )
    .unwrap();

    let mut session = PaperSession::new(RunnerConfig::default());
    let report = session.run(&input).unwrap();

    assert_eq!(report.submissions.len(), 2);
    assert!(report.updates.iter().all(|r| r.status == OrderStatus::Filled));
    assert_eq!(report.positions.get("A"), Some(&dec!(10)));
    assert_eq!(report.positions.get("B"), Some(&dec!(5)));
    assert_eq!(report.positions, report.broker_positions);
    assert_eq!(report.position_breaks.len(), 2);
    assert!(!report.summary.has_breaks());

    let fill = &session.broker().fills()[1];
    assert_eq!(fill.timestamp.to_rfc3339(), "2024-03-01T14:30:00+00:00");
}

#[test]
fn test_unfilled_orders_leave_no_breaks() {
    // No marks: nothing fills on either side
    let input = SessionInput::from_json(r#"{ "targets": { "A": 3 } }"#).unwrap();

    let mut session = PaperSession::new(RunnerConfig::default());
    let report = session.run(&input).unwrap();

    assert_eq!(report.updates[0].status, OrderStatus::Submitted);
    assert!(report.positions.is_empty());
    assert!(report.position_breaks.is_empty());
    assert!(!report.summary.has_breaks());
    assert_eq!(session.oms().open_order_count(), 1);
}

#[test]
fn test_external_fill_report_with_breaks() {
    let input = SessionInput::from_json(
        r#"{
            "targets": { "AAPL": 10, "MSFT": -2 },
            "marks": [
                { "instrument_id": "AAPL", "price": 190 },
                { "instrument_id": "MSFT", "price": 410 }
            ],
            "broker_fills": [
                { "symbol": "AAPL", "side": "buy", "qty": 10 },
                { "symbol": "MSFT", "side": "sell", "qty": 1 }
            ]
        }"#,
    )
    .unwrap();

    let mut session = PaperSession::new(RunnerConfig::default());
    let report = session.run(&input).unwrap();

    assert_eq!(report.summary.fill_breaks, 1);
    let msft = report
        .fill_breaks
        .iter()
        .find(|r| r.instrument_id.as_str() == "MSFT")
        .unwrap();
    assert_eq!(msft.diff_qty, Decimal::ONE);
    assert!(msft.is_break);
}

#[test]
fn test_bad_fill_report_fails_before_trading() {
    let input = SessionInput::from_json(
        r#"{
            "targets": { "AAPL": 10 },
            "broker_fills": [ { "symbol": "AAPL", "quantity": 10 } ]
        }"#,
    )
    .unwrap();

    let mut session = PaperSession::new(RunnerConfig::default());
    let err = session.run(&input).unwrap_err();

    match err {
        RunnerError::Reconciliation(ReconError::MissingColumns { columns, .. }) => {
            assert_eq!(columns, vec!["qty".to_string(), "side".to_string()]);
        }
        other => panic!("expected missing columns, got {:?}", other),
    }
    assert_eq!(session.broker().order_count(), 0);
}

#[test]
fn test_weights_session_applies_guardrails() {
    let config = RunnerConfig::from_json(
        r#"{ "live": { "starting_equity": 20000, "max_notional_per_order": 1000 } }"#,
    )
    .unwrap();
    let input = SessionInput::from_json(
        r#"{
            "weights": { "AAPL": 0.5, "MSFT": 0.001 },
            "prices": { "AAPL": 100, "MSFT": 10 },
            "marks": [ { "instrument_id": "AAPL", "price": 100 } ]
        }"#,
    )
    .unwrap();

    let mut session = PaperSession::new(config);
    let report = session.run(&input).unwrap();

    // AAPL capped at 1_000 notional; MSFT's 20 notional is below the minimum
    assert_eq!(report.targets.get("AAPL"), Some(&dec!(10)));
    assert_eq!(report.targets.get("MSFT"), Some(&dec!(0)));
    assert_eq!(report.submissions.len(), 1);
    assert_eq!(report.positions.get("AAPL"), Some(&dec!(10)));
}

#[test]
fn test_weights_without_prices_is_rejected() {
    let input = SessionInput::from_json(r#"{ "weights": { "AAPL": 0.1 } }"#).unwrap();
    let err = PaperSession::new(RunnerConfig::default())
        .run(&input)
        .unwrap_err();
    assert!(matches!(err, RunnerError::Session(_)));
}

#[test]
fn test_report_serializes() {
    let input = SessionInput::from_json(
        r#"{ "targets": { "A": 1 }, "marks": [ { "instrument_id": "A", "price": 1 } ] }"#,
    )
    .unwrap();
    let report = PaperSession::new(RunnerConfig::default())
        .run(&input)
        .unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["summary"]["position_breaks"], 0);
    assert_eq!(json["submissions"][0]["status"], "submitted");
}

#[test]
fn test_negative_cap_config_is_refused_and_session_survives_it() {
    assert!(RunnerConfig::from_json(r#"{ "live": { "max_notional_per_order": -500 } }"#).is_err());

    // Built in code, bypassing the loader
    let mut config = RunnerConfig::default();
    config.live.max_notional_per_order = dec!(-500);
    let input = SessionInput::from_json(
        r#"{ "weights": { "AAPL": 0.1 }, "prices": { "AAPL": 100 } }"#,
    )
    .unwrap();

    let report = PaperSession::new(config).run(&input).unwrap();
    assert_eq!(report.targets.get("AAPL"), Some(&dec!(0)));
    assert!(report.submissions.is_empty());
}
