//! Incremental indicators fed one closed bar at a time.

pub mod structure;
pub mod trend;
pub mod volatility;
pub mod window;

pub use structure::*;
pub use trend::*;
pub use volatility::*;
pub use window::{RollingWindow, WINDOW_CAPACITY};
