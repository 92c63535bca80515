//! Unit tests for closed bar sequencing

use zonewatch::error::FeedError;
use zonewatch::models::Candle;
use zonewatch::services::mexc::KlineUpdate;
use zonewatch::services::ClosedBarFeed;

fn update(time: i64, close: f64) -> KlineUpdate {
    KlineUpdate {
        symbol: "DOGE_USDT".to_string(),
        interval: "Min1".to_string(),
        candle: Candle {
            time,
            open: 1.0,
            high: close.max(1.0),
            low: close.min(1.0),
            close,
            volume: 10.0,
        },
    }
}

#[test]
fn test_feed_holds_first_update() {
    let mut feed = ClosedBarFeed::new("Min1");
    assert_eq!(feed.step_secs(), 60);
    assert_eq!(feed.push(update(0, 1.1)).unwrap(), None);
    assert_eq!(feed.pending().map(|u| u.candle.close), Some(1.1));
}

#[test]
fn test_feed_same_open_time_replaces_pending() {
    let mut feed = ClosedBarFeed::new("Min1");
    feed.push(update(0, 1.1)).unwrap();
    feed.push(update(0, 1.2)).unwrap();
    assert_eq!(feed.push(update(0, 1.3)).unwrap(), None);

    let bar = feed.push(update(60, 1.0)).unwrap().unwrap();
    assert_eq!(bar.close, 1.3);
    assert_eq!(bar.time, 60);
    assert_eq!(feed.last_closed_open(), Some(0));
}

#[test]
fn test_feed_closed_bar_uses_interval_step() {
    let mut feed = ClosedBarFeed::new("Hour4");
    feed.push(update(14_400, 2.0)).unwrap();
    let bar = feed.push(update(28_800, 2.5)).unwrap().unwrap();
    assert_eq!(bar.time, 28_800);
    assert_eq!(bar.open, 1.0);
    assert_eq!(bar.volume, 10.0);
}

#[test]
fn test_feed_rejects_earlier_open_time() {
    let mut feed = ClosedBarFeed::new("Min1");
    feed.push(update(120, 1.1)).unwrap();
    match feed.push(update(60, 1.0)) {
        Err(FeedError::OutOfOrder { last, received }) => {
            assert_eq!(last, 120);
            assert_eq!(received, 60);
        }
        other => panic!("expected out-of-order error, got {:?}", other),
    }
    // The pending candle survives the rejection.
    assert_eq!(feed.pending().map(|u| u.candle.time), Some(120));
}

#[test]
fn test_feed_rejects_already_closed_candle() {
    let mut feed = ClosedBarFeed::new("Min1").with_last_closed(600);
    assert!(matches!(
        feed.push(update(600, 1.0)),
        Err(FeedError::OutOfOrder { .. })
    ));
    assert!(matches!(
        feed.push(update(540, 1.0)),
        Err(FeedError::OutOfOrder { .. })
    ));
    assert_eq!(feed.push(update(660, 1.0)).unwrap(), None);
}

#[test]
fn test_feed_emits_each_candle_once() {
    let mut feed = ClosedBarFeed::new("Min1");
    let mut closed = Vec::new();
    for minute in 0..5 {
        for tick in 0..3 {
            let close = 1.0 + minute as f64 + tick as f64 * 0.1;
            if let Some(bar) = feed.push(update(minute * 60, close)).unwrap() {
                closed.push(bar);
            }
        }
    }
    let times: Vec<i64> = closed.iter().map(|b| b.time).collect();
    assert_eq!(times, vec![60, 120, 180, 240]);
    assert!((closed[0].close - 1.2).abs() < 1e-12);
}
