//! Turns the exchange's repeated in-progress kline updates into closed bars.

use crate::error::FeedError;
use crate::models::Bar;
use crate::services::mexc::{interval_seconds, KlineUpdate};

/// Holds the newest update for the open candle and emits it as a closed bar
/// once an update for a later open time arrives.
#[derive(Debug, Clone)]
pub struct ClosedBarFeed {
    step_secs: i64,
    pending: Option<KlineUpdate>,
    last_closed_open: Option<i64>,
}

impl ClosedBarFeed {
    pub fn new(interval: &str) -> Self {
        Self {
            step_secs: interval_seconds(interval),
            pending: None,
            last_closed_open: None,
        }
    }

    /// Start after a candle already replayed from history.
    pub fn with_last_closed(mut self, open_time: i64) -> Self {
        self.last_closed_open = Some(open_time);
        self
    }

    pub fn step_secs(&self) -> i64 {
        self.step_secs
    }

    pub fn pending(&self) -> Option<&KlineUpdate> {
        self.pending.as_ref()
    }

    pub fn last_closed_open(&self) -> Option<i64> {
        self.last_closed_open
    }

    pub fn push(&mut self, update: KlineUpdate) -> Result<Option<Bar>, FeedError> {
        let open_time = update.candle.time;
        if let Some(last) = self.last_closed_open {
            if open_time <= last {
                return Err(FeedError::OutOfOrder {
                    last,
                    received: open_time,
                });
            }
        }

        let Some(pending) = self.pending.take() else {
            self.pending = Some(update);
            return Ok(None);
        };

        let pending_open = pending.candle.time;
        if open_time == pending_open {
            self.pending = Some(update);
            return Ok(None);
        }
        if open_time < pending_open {
            self.pending = Some(pending);
            return Err(FeedError::OutOfOrder {
                last: pending_open,
                received: open_time,
            });
        }

        self.last_closed_open = Some(pending_open);
        self.pending = Some(update);
        Ok(Some(pending.candle.into_closed_bar(self.step_secs)))
    }
}
