//! Engine switches

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

/// Per-editor engine configuration.
///
/// The indentation unit is not configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde_support", serde(default))]
pub struct EngineConfig {
    /// Auto-close brackets and quotes, wrap selections, skip over closers
    pub auto_pair: bool,
    /// Run completion sessions while typing
    pub completion: bool,
    /// Cap on candidates per session; `None` keeps every match
    pub max_candidates: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_pair: true,
            completion: true,
            max_candidates: None,
        }
    }
}
