//! Animation speed presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How fast the wave pattern drifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl AnimationSpeed {
    /// Multiplier applied to elapsed seconds before wave phases are derived.
    pub const fn time_scale(self) -> f64 {
        match self {
            AnimationSpeed::Slow => 0.4,
            AnimationSpeed::Normal => 0.8,
            AnimationSpeed::Fast => 1.6,
        }
    }

    /// Identifier used in config files and on the command line.
    pub const fn id(self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Normal => "normal",
            AnimationSpeed::Fast => "fast",
        }
    }

    /// Cycle to the next speed.
    pub fn next(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Normal,
            AnimationSpeed::Normal => AnimationSpeed::Fast,
            AnimationSpeed::Fast => AnimationSpeed::Slow,
        }
    }
}

impl fmt::Display for AnimationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a speed identifier is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown animation speed `{0}` (expected one of: slow, normal, fast)")]
pub struct ParseSpeedError(pub String);

impl FromStr for AnimationSpeed {
    type Err = ParseSpeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "slow" => Ok(AnimationSpeed::Slow),
            "normal" => Ok(AnimationSpeed::Normal),
            "fast" => Ok(AnimationSpeed::Fast),
            _ => Err(ParseSpeedError(s.to_string())),
        }
    }
}
