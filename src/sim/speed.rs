//! Tick speed policies
//!
//! The interval between ticks is a pure function of score. Which function is
//! used is a setting, not a constant.

use serde::{Deserialize, Serialize};

/// Strategy mapping score to tick interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpeedPolicy {
    /// Interval never changes
    #[default]
    Fixed,
    /// Interval shrinks by `step_ms` for every `every` points up to
    /// `reduce_above`, then by `reduced_step_ms` per further threshold
    Stepped {
        every: u32,
        step_ms: u32,
        reduced_step_ms: u32,
        reduce_above: u32,
    },
}

impl SpeedPolicy {
    /// The old arcade curve: faster every 5 points, gentler above 10
    pub const CLASSIC: SpeedPolicy = SpeedPolicy::Stepped {
        every: 5,
        step_ms: 10,
        reduced_step_ms: 5,
        reduce_above: 10,
    };

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedPolicy::Fixed => "Fixed",
            SpeedPolicy::Stepped { .. } => "Stepped",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" | "constant" => Some(SpeedPolicy::Fixed),
            "stepped" | "classic" => Some(SpeedPolicy::CLASSIC),
            _ => None,
        }
    }

    /// Tick interval for `score`, never below `floor_ms`
    pub fn interval_ms(&self, score: u32, base_ms: u32, floor_ms: u32) -> u32 {
        let reduction = match *self {
            SpeedPolicy::Fixed => 0,
            SpeedPolicy::Stepped { every: 0, .. } => 0,
            SpeedPolicy::Stepped {
                every,
                step_ms,
                reduced_step_ms,
                reduce_above,
            } => {
                let early = score.min(reduce_above) / every;
                let late = score.saturating_sub(reduce_above) / every;
                early
                    .saturating_mul(step_ms)
                    .saturating_add(late.saturating_mul(reduced_step_ms))
            }
        };
        base_ms.saturating_sub(reduction).max(floor_ms)
    }
}
