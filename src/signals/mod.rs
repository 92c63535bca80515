//! Signal detectors and the per-symbol alert engine.

pub mod alerts;
pub mod direction;
pub mod efm;
pub mod engine;
pub mod zone;

pub use alerts::AlertFactory;
pub use direction::Direction;
pub use efm::EfmDetector;
pub use engine::AlertsEngine;
pub use zone::{CandleShape, ReboundParams, Zone};
