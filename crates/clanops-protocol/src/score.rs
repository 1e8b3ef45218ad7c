use crate::ProtocolError;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// Operator value on a mission. Always finite and non-negative, which makes
/// the total order below agree with `==`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(f64);

impl Score {
    pub const ZERO: Score = Score(0.0);

    pub fn new(value: f64) -> Option<Self> {
        // abs folds -0.0 into 0.0
        (value.is_finite() && value >= 0.0).then(|| Self(value.abs()))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Eq for Score {}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<f64> for Score {
    type Error = ProtocolError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ProtocolError::InvalidScore(value))
    }
}

impl From<u32> for Score {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}

impl From<Score> for f64 {
    fn from(score: Score) -> Self {
        score.0
    }
}

/// Whole values print without a fractional part (`9`, not `9.0`).
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
