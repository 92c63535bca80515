//! Volatility indicators: Wilder ATR, kernel regression envelope

pub mod atr;
pub mod envelope;

pub use atr::*;
pub use envelope::*;
