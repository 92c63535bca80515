//! Market structure indicators: breakout balance

pub mod balance;

pub use balance::*;
