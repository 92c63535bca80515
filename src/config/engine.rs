use serde::{Deserialize, Serialize};

pub const DEFAULT_BALANCE_THRESHOLD: f64 = 20.0;

fn default_threshold() -> f64 {
    DEFAULT_BALANCE_THRESHOLD
}

fn enabled() -> bool {
    true
}

/// Immutable per-engine settings: the bound market and which detectors run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub symbol: String,
    pub interval: String,
    #[serde(default = "default_threshold")]
    pub balance_threshold: f64,
    #[serde(default = "enabled")]
    pub enable_balance: bool,
    #[serde(default = "enabled")]
    pub enable_efm: bool,
    #[serde(default = "enabled")]
    pub enable_rebounds: bool,
    #[serde(default = "enabled")]
    pub enable_rebounds_late: bool,
}

impl EngineConfig {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            balance_threshold: DEFAULT_BALANCE_THRESHOLD,
            enable_balance: true,
            enable_efm: true,
            enable_rebounds: true,
            enable_rebounds_late: true,
        }
    }

    pub fn with_balance_threshold(mut self, threshold: f64) -> Self {
        self.balance_threshold = threshold;
        self
    }

    pub fn with_balance(mut self, enabled: bool) -> Self {
        self.enable_balance = enabled;
        self
    }

    pub fn with_efm(mut self, enabled: bool) -> Self {
        self.enable_efm = enabled;
        self
    }

    pub fn with_rebounds(mut self, enabled: bool) -> Self {
        self.enable_rebounds = enabled;
        self
    }

    pub fn with_rebounds_late(mut self, enabled: bool) -> Self {
        self.enable_rebounds_late = enabled;
        self
    }

    /// Turn every detector off; useful as a base for enabling a single one.
    pub fn all_disabled(self) -> Self {
        self.with_balance(false)
            .with_efm(false)
            .with_rebounds(false)
            .with_rebounds_late(false)
    }
}
