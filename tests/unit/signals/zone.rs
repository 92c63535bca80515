//! Unit tests for zone marking and rebound detection

use zonewatch::models::Bar;
use zonewatch::signals::zone::{late_rebound, principal_rebound};
use zonewatch::signals::{CandleShape, Direction, ReboundParams, Zone};

fn long_zone(marked_at: u64) -> Zone {
    Zone::from_bar(
        Direction::Long,
        &Bar::new(60, 99.0, 101.2, 98.8, 101.0, 0.0),
        marked_at,
    )
}

fn short_zone(marked_at: u64) -> Zone {
    Zone::from_bar(
        Direction::Short,
        &Bar::new(60, 101.0, 101.2, 98.8, 99.0, 0.0),
        marked_at,
    )
}

#[test]
fn test_zone_is_candle_body() {
    let zone = long_zone(3);
    assert_eq!(zone.low, 99.0);
    assert_eq!(zone.high, 101.0);
    assert_eq!(zone.size(), 2.0);
    assert_eq!(zone.marked_at, 3);

    let zone = short_zone(0);
    assert_eq!((zone.low, zone.high), (99.0, 101.0));
}

#[test]
fn test_late_band() {
    let (low, high) = long_zone(0).late_band(0.25, 0.1);
    assert!((low - 100.4).abs() < 1e-12);
    assert!((high - 101.1).abs() < 1e-12);

    let (low, high) = short_zone(0).late_band(0.25, 0.1);
    assert!((low - 98.9).abs() < 1e-12);
    assert!((high - 99.6).abs() < 1e-12);
}

#[test]
fn test_candle_shape() {
    let shape = CandleShape::of(&Bar::new(0, 100.0, 100.4, 99.5, 100.3, 0.0));
    let p = ReboundParams::default();
    assert!((shape.range - 0.9).abs() < 1e-12);
    assert!((shape.body - 0.3).abs() < 1e-12);
    assert!((shape.lower_wick - 0.5).abs() < 1e-12);
    assert!(shape.is_small_body(&p));
    assert!(shape.has_long_lower_wick(&p));
    assert!(!shape.has_long_upper_wick(&p));
    assert!(!shape.is_impulse(Direction::Long, 1.0, &p));
    assert!(shape.touches(Direction::Long, 99.0, 101.0, 0.02));
    assert!(!shape.touches(Direction::Long, 99.6, 101.0, 0.02));
}

#[test]
fn test_principal_rebound_long_rejection() {
    let bar = Bar::new(120, 100.0, 100.4, 99.5, 100.3, 0.0);
    let fired = principal_rebound(&long_zone(0), &bar, 1.0, &ReboundParams::default());
    assert_eq!(fired, Some(Direction::Long));
}

#[test]
fn test_principal_rebound_long_impulse() {
    let bar = Bar::new(120, 99.5, 100.6, 99.4, 100.5, 0.0);
    let fired = principal_rebound(&long_zone(0), &bar, 1.0, &ReboundParams::default());
    assert_eq!(fired, Some(Direction::Long));
}

#[test]
fn test_principal_rebound_requires_touch() {
    // Wick pierces below the zone (outside the tolerance).
    let bar = Bar::new(120, 99.0, 99.4, 98.5, 99.3, 0.0);
    let fired = principal_rebound(&long_zone(0), &bar, 1.0, &ReboundParams::default());
    assert_eq!(fired, None);
}

#[test]
fn test_principal_rebound_requires_confirmation() {
    // Touches the zone but closes down without an impulse.
    let bar = Bar::new(120, 100.3, 100.4, 99.5, 100.0, 0.0);
    let fired = principal_rebound(&long_zone(0), &bar, 1.0, &ReboundParams::default());
    assert_eq!(fired, None);
}

#[test]
fn test_principal_rebound_short() {
    let bar = Bar::new(120, 100.0, 100.5, 99.6, 99.7, 0.0);
    let fired = principal_rebound(&short_zone(0), &bar, 1.0, &ReboundParams::default());
    assert_eq!(fired, Some(Direction::Short));
}

#[test]
fn test_rebound_ignores_zero_range_bar() {
    let bar = Bar::new(120, 100.0, 100.0, 100.0, 100.0, 0.0);
    let p = ReboundParams::default();
    assert_eq!(principal_rebound(&long_zone(0), &bar, 1.0, &p), None);
    assert_eq!(late_rebound(&long_zone(0), &bar, 50, 1.0, &p), None);

    // Flat bar sitting inside the late band [100.48, 101.02].
    let flat = Bar::new(120, 100.9, 100.9, 100.9, 100.9, 0.0);
    assert_eq!(principal_rebound(&long_zone(0), &flat, 1.0, &p), None);
    assert_eq!(late_rebound(&long_zone(0), &flat, 50, 1.0, &p), None);
}

#[test]
fn test_late_rebound_waits_for_zone_age() {
    let zone = long_zone(10);
    let bar = Bar::new(120, 101.0, 101.4, 100.6, 101.3, 0.0);
    let p = ReboundParams::default();
    assert_eq!(late_rebound(&zone, &bar, 21, 1.0, &p), None);
    assert_eq!(late_rebound(&zone, &bar, 22, 1.0, &p), Some(Direction::Long));
}

#[test]
fn test_late_rebound_requires_band_touch() {
    let zone = long_zone(0);
    // Low sits under the late band even though it is inside the zone.
    let bar = Bar::new(120, 100.6, 101.0, 100.2, 100.9, 0.0);
    assert_eq!(
        late_rebound(&zone, &bar, 40, 1.0, &ReboundParams::default()),
        None
    );
}
