//! Unit tests for alert assembly

use std::collections::HashSet;

use zonewatch::models::{AlertKind, BalanceReading, Bar, Severity};
use zonewatch::signals::{AlertFactory, Direction, Zone};

fn reading(score: f64) -> BalanceReading {
    BalanceReading {
        score,
        upper_break: 110.0,
        lower_break: 90.0,
        center: 100.0,
        envelope_width: 5.0,
        atr: 1.0,
    }
}

#[test]
fn test_crossover_alert() {
    let factory = AlertFactory::new("DOGE_USDT", "Min1");
    let alert = factory.crossover(Direction::Long, 0.123456789);
    assert_eq!(alert.title, "EFMUS Long");
    assert_eq!(alert.message, "EMA13>EMA48. C=0.123457");
    assert_eq!(alert.severity, Severity::Bull);
    assert_eq!(alert.kind, AlertKind::Efm);
    assert_eq!(alert.symbol, "DOGE_USDT");
    assert_eq!(alert.interval, "Min1");

    let alert = factory.crossover(Direction::Short, 2.0);
    assert_eq!(alert.title, "EFMUS Short");
    assert_eq!(alert.severity, Severity::Bear);
}

#[test]
fn test_balance_alerts() {
    let factory = AlertFactory::new("BTC_USDT", "Min5");

    let bull = factory.balance(&reading(25.0), 20.0, 100.0);
    assert_eq!(bull.len(), 1);
    assert_eq!(bull[0].title, "Balance Bull");
    assert_eq!(bull[0].message, "25.00 ≥ 20");
    assert_eq!(bull[0].severity, Severity::Bull);

    let bear = factory.balance(&reading(-30.5), 20.0, 100.0);
    assert_eq!(bear.len(), 1);
    assert_eq!(bear[0].title, "Balance Bear");
    assert_eq!(bear[0].message, "-30.50 ≤ -20");

    assert!(factory.balance(&reading(19.99), 20.0, 100.0).is_empty());
    assert_eq!(factory.balance(&reading(20.0), 20.0, 100.0).len(), 1);
}

#[test]
fn test_balance_zero_threshold_fires_both() {
    let factory = AlertFactory::new("BTC_USDT", "Min5");
    let alerts = factory.balance(&reading(0.0), 0.0, 100.0);
    let titles: Vec<&str> = alerts.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["Balance Bull", "Balance Bear"]);
}

#[test]
fn test_rebound_alerts() {
    let factory = AlertFactory::new("ETH_USDT", "Min15");
    let zone = Zone::from_bar(
        Direction::Long,
        &Bar::new(60, 99.0, 101.2, 98.8, 101.0, 0.0),
        0,
    );

    let principal = factory.rebound(Direction::Long, &zone, 100.3);
    assert_eq!(principal.title, "Rebound LONG (principal)");
    assert_eq!(principal.message, "active zone [99.000000, 101.000000]");
    assert_eq!(principal.kind, AlertKind::Rebound);

    let late = factory.late_rebound(Direction::Short, &zone, 100.3);
    assert_eq!(late.title, "Rebound SHORT (late)");
    assert_eq!(late.kind, AlertKind::ReboundLate);
    assert_eq!(late.severity, Severity::Bear);
}

#[test]
fn test_alert_ids_unique() {
    let factory = AlertFactory::new("ETH_USDT", "Min1");
    let ids: HashSet<String> = (0..100)
        .map(|_| factory.crossover(Direction::Long, 1.0).id)
        .collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn test_alert_text_and_wire_format() {
    let factory = AlertFactory::new("ETH_USDT", "Min1");
    let alert = factory.crossover(Direction::Long, 2.5);
    assert_eq!(
        alert.to_text(),
        "[ETH_USDT Min1] EFMUS Long\nEMA13>EMA48. C=2.500000\nPrice: 2.5"
    );

    let json = serde_json::to_value(&alert).unwrap();
    assert_eq!(json["severity"], "bull");
    assert_eq!(json["kind"], "efm");
    assert!(json["ts"].as_i64().unwrap() > 0);
}
