//! Unit tests for Wilder ATR

use zonewatch::indicators::volatility::{WilderAtr, DEFAULT_ATR_PERIOD};
use zonewatch::models::Bar;

#[test]
fn test_atr_seeds_with_first_range() {
    let mut atr = WilderAtr::default();
    assert_eq!(atr.value(), None);
    let value = atr.update(&Bar::new(60, 100.0, 104.0, 99.0, 103.0, 0.0));
    assert_eq!(value, 5.0);
    assert_eq!(atr.prev_close(), Some(103.0));
}

#[test]
fn test_atr_wilder_smoothing() {
    let mut atr = WilderAtr::new(DEFAULT_ATR_PERIOD);
    atr.update(&Bar::new(60, 100.0, 101.0, 100.0, 100.0, 0.0));
    // Gap up: true range is 110 - 100 = 10.
    let value = atr.update(&Bar::new(120, 109.0, 110.0, 109.0, 110.0, 0.0));
    assert!((value - (13.0 + 10.0) / 14.0).abs() < 1e-12);
}

#[test]
fn test_atr_converges_on_constant_range() {
    let mut atr = WilderAtr::default();
    for i in 0..500 {
        atr.update(&Bar::new(60 * i, 100.0, 102.0, 100.0, 101.0, 0.0));
    }
    assert!((atr.value().unwrap() - 2.0).abs() < 1e-9);
}
