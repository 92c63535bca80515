//! External collaborators: exchange feed, REST market data and notifiers.

pub mod feed;
pub mod market_data;
pub mod mexc;
pub mod notifier;

pub use feed::ClosedBarFeed;
pub use market_data::MarketDataProvider;
pub use notifier::{LogNotifier, Notifier, TelegramNotifier};
