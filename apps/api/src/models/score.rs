use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Resume-to-job fit, bounded to 0–100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MatchScore(u8);

impl MatchScore {
    pub const MAX: u8 = 100;

    pub fn new(value: i64) -> Result<Self, AppError> {
        if (0..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(AppError::Validation(format!(
                "match score must be between 0 and 100, got {value}"
            )))
        }
    }

    /// Score used when the scoring pass is unavailable.
    pub fn zero() -> Self {
        Self(0)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for MatchScore {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MatchScore> for i64 {
    fn from(score: MatchScore) -> Self {
        score.0 as i64
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/100", self.0)
    }
}
