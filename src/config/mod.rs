//! Engine and service configuration.

pub mod engine;
pub mod settings;

pub use engine::EngineConfig;
pub use settings::Settings;

use std::env;

/// Deployment environment name, `sandbox` unless `ENVIRONMENT` says otherwise.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT")
        .map(|e| e.trim().to_lowercase())
        .ok()
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "sandbox".to_string())
}
