//! Shared data models spanning the engine and its collaborators.

pub mod alert;
pub mod candle;
pub mod contract;
pub mod indicators;

pub use alert::{AlertEvent, AlertKind, Severity};
pub use candle::{Bar, Candle};
pub use contract::Contract;
pub use indicators::{BalanceReading, IndicatorSnapshot};
