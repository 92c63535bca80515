//! Unit tests for the alerts engine

use zonewatch::config::EngineConfig;
use zonewatch::indicators::WINDOW_CAPACITY;
use zonewatch::models::{AlertKind, Bar};
use zonewatch::signals::{AlertsEngine, Direction};

fn flat_bars(count: usize, price: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| Bar::new(60 * (i as i64 + 1), price, price, price, price, 1.0))
        .collect()
}

fn kinds(alerts: &[zonewatch::models::AlertEvent]) -> Vec<AlertKind> {
    alerts.iter().map(|a| a.kind).collect()
}

#[test]
fn test_engine_new_state() {
    let engine = AlertsEngine::new(EngineConfig::new("DOGE_USDT", "Min1"));
    assert_eq!(engine.bars_seen(), 0);
    assert_eq!(engine.last_time(), None);
    assert!(engine.zone().is_none());
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.ema_fast, None);
    assert_eq!(snapshot.atr, None);
    assert_eq!(snapshot.balance, None);
}

#[test]
fn test_engine_flat_series_is_silent() {
    let mut engine = AlertsEngine::new(EngineConfig::new("DOGE_USDT", "Min1"));
    for bar in flat_bars(200, 100.0) {
        assert!(engine.process(&bar).is_empty());
    }
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.bars_seen, 200);
    assert_eq!(snapshot.ema_fast, Some(100.0));
    assert_eq!(snapshot.atr, Some(0.0));
    assert!(snapshot.balance.unwrap().score.abs() < 1.0);
}

#[test]
fn test_engine_crossover_marks_zone() {
    let mut engine = AlertsEngine::new(EngineConfig::new("DOGE_USDT", "Min1"));
    for bar in flat_bars(60, 100.0) {
        engine.process(&bar);
    }
    let alerts = engine.process(&Bar::new(61 * 60, 99.0, 101.2, 98.8, 101.0, 1.0));
    assert_eq!(kinds(&alerts), vec![AlertKind::Efm]);
    assert_eq!(alerts[0].title, "EFMUS Long");

    let zone = engine.zone().unwrap();
    assert_eq!(zone.direction, Direction::Long);
    assert_eq!((zone.low, zone.high), (99.0, 101.0));
    assert_eq!(zone.marked_at, 60);
}

#[test]
fn test_engine_principal_rebound_repeats() {
    let mut engine = AlertsEngine::new(EngineConfig::new("DOGE_USDT", "Min1"));
    for bar in flat_bars(60, 100.0) {
        engine.process(&bar);
    }
    engine.process(&Bar::new(61 * 60, 99.0, 101.2, 98.8, 101.0, 1.0));

    let first = engine.process(&Bar::new(62 * 60, 100.0, 100.4, 99.5, 100.3, 1.0));
    assert_eq!(kinds(&first), vec![AlertKind::Rebound]);
    assert_eq!(first[0].title, "Rebound LONG (principal)");

    // The zone stays active, so the same setup fires again.
    let second = engine.process(&Bar::new(63 * 60, 100.0, 100.4, 99.5, 100.3, 1.0));
    assert_eq!(kinds(&second), vec![AlertKind::Rebound]);
}

#[test]
fn test_engine_detector_order_on_one_bar() {
    let mut engine = AlertsEngine::new(EngineConfig::new("DOGE_USDT", "Min1"));
    for bar in flat_bars(49, 100.0) {
        engine.process(&bar);
    }
    let alerts = engine.process(&Bar::new(50 * 60, 100.0, 105.0, 100.0, 105.0, 1.0));
    let kinds = kinds(&alerts);
    assert_eq!(kinds.first(), Some(&AlertKind::Efm));
    assert_eq!(kinds.last(), Some(&AlertKind::Rebound));
}

#[test]
fn test_engine_disabled_detectors_emit_nothing() {
    let config = EngineConfig::new("DOGE_USDT", "Min1").all_disabled();
    let mut engine = AlertsEngine::new(config);
    let mut bars = flat_bars(49, 100.0);
    bars.push(Bar::new(50 * 60, 100.0, 105.0, 100.0, 105.0, 1.0));
    for i in 0..100 {
        let p = 105.0 + i as f64;
        bars.push(Bar::new(60 * (51 + i), p, p + 1.0, p, p + 1.0, 1.0));
    }
    for bar in &bars {
        assert!(engine.process(bar).is_empty());
    }
    assert!(engine.zone().is_none());
    assert_eq!(engine.snapshot().balance, None);
}

#[test]
fn test_engine_zone_requires_efm_enabled() {
    let config = EngineConfig::new("DOGE_USDT", "Min1")
        .all_disabled()
        .with_rebounds(true);
    let mut engine = AlertsEngine::new(config);
    for bar in flat_bars(49, 100.0) {
        engine.process(&bar);
    }
    let alerts = engine.process(&Bar::new(50 * 60, 100.0, 105.0, 100.0, 105.0, 1.0));
    assert!(alerts.is_empty());
    assert!(engine.zone().is_none());
}

#[test]
fn test_engine_warm_up_discards_alerts_but_keeps_state() {
    let mut bars = flat_bars(60, 100.0);
    bars.push(Bar::new(61 * 60, 99.0, 101.2, 98.8, 101.0, 1.0));

    let mut engine = AlertsEngine::new(EngineConfig::new("DOGE_USDT", "Min1"));
    assert_eq!(engine.warm_up(&bars), 61);
    assert_eq!(engine.bars_seen(), 61);
    assert_eq!(engine.last_time(), Some(61 * 60));
    assert!(engine.zone().is_some());

    let alerts = engine.process(&Bar::new(62 * 60, 100.0, 100.4, 99.5, 100.3, 1.0));
    assert_eq!(kinds(&alerts), vec![AlertKind::Rebound]);
}

#[test]
fn test_engine_window_is_bounded() {
    let mut engine = AlertsEngine::new(EngineConfig::new("DOGE_USDT", "Min1"));
    for bar in flat_bars(WINDOW_CAPACITY + 100, 1.0) {
        engine.process(&bar);
    }
    assert_eq!(engine.window().len(), WINDOW_CAPACITY);
    assert_eq!(engine.bars_seen(), (WINDOW_CAPACITY + 100) as u64);
}

#[test]
fn test_engine_processes_non_advancing_bar() {
    let mut engine = AlertsEngine::new(EngineConfig::new("DOGE_USDT", "Min1"));
    engine.process(&Bar::new(120, 1.0, 1.0, 1.0, 1.0, 0.0));
    engine.process(&Bar::new(60, 1.0, 1.0, 1.0, 1.0, 0.0));
    assert_eq!(engine.bars_seen(), 2);
    assert_eq!(engine.last_time(), Some(60));
}
