use serde::{Deserialize, Serialize};

use crate::models::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn severity(&self) -> Severity {
        match self {
            Direction::Long => Severity::Bull,
            Direction::Short => Severity::Bear,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Long => "LONG",
            Direction::Short => "SHORT",
        }
    }
}
