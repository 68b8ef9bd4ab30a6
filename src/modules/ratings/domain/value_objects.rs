use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::errors::AppError;

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 5;

/// A star score in 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
    pub fn new(value: i64) -> Result<Self, AppError> {
        Self::try_from(value)
    }

    /// Parse an untyped JSON value. Only integral numbers in range are accepted,
    /// so `2.5`, `"4"` and `4.0` are all rejected.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, AppError> {
        match value {
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => Self::new(v),
                None => Err(AppError::ValidationError(format!(
                    "Score must be an integer between {} and {}, got {}",
                    MIN_SCORE, MAX_SCORE, n
                ))),
            },
            serde_json::Value::Null => {
                Err(AppError::ValidationError("Score is required".to_string()))
            }
            other => Err(AppError::ValidationError(format!(
                "Score must be an integer between {} and {}, got {}",
                MIN_SCORE, MAX_SCORE, other
            ))),
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_i16(self) -> i16 {
        self.0 as i16
    }

    pub fn all() -> impl Iterator<Item = Score> {
        (MIN_SCORE..=MAX_SCORE).map(|v| Score(v as u8))
    }
}

impl TryFrom<i64> for Score {
    type Error = AppError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
            return Err(AppError::ValidationError(format!(
                "Score must be between {} and {}, got {}",
                MIN_SCORE, MAX_SCORE, value
            )));
        }
        Ok(Score(value as u8))
    }
}

impl TryFrom<i16> for Score {
    type Error = AppError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::try_from(value as i64)
    }
}

impl From<Score> for i64 {
    fn from(score: Score) -> Self {
        score.0 as i64
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Count and mean of a movie's ratings, computed from the rating records
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub count: i64,
    pub average: f64,
}

impl RatingSummary {
    pub fn empty() -> Self {
        Self {
            count: 0,
            average: 0.0,
        }
    }

    /// Build from the integer sum of scores. The mean is rounded to one decimal,
    /// half away from zero, using integer arithmetic so that e.g. 4.45 becomes 4.5.
    pub fn from_totals(count: i64, sum: i64) -> Self {
        if count <= 0 {
            return Self::empty();
        }

        // Scores are positive, so half-up on tenths equals half-away-from-zero.
        let tenths = (sum * 20 + count) / (count * 2);

        Self {
            count,
            average: tenths as f64 / 10.0,
        }
    }

    pub fn from_scores(scores: impl IntoIterator<Item = Score>) -> Self {
        let (count, sum) = scores
            .into_iter()
            .fold((0i64, 0i64), |(count, sum), score| {
                (count + 1, sum + i64::from(score))
            });
        Self::from_totals(count, sum)
    }
}

/// Number of ratings per score, always containing every key 1..=5
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDistribution(BTreeMap<u8, i64>);

impl Default for ScoreDistribution {
    fn default() -> Self {
        Self(Score::all().map(|s| (s.value(), 0)).collect())
    }
}

impl ScoreDistribution {
    pub fn from_counts(counts: impl IntoIterator<Item = (Score, i64)>) -> Self {
        let mut distribution = Self::default();
        for (score, count) in counts {
            *distribution.0.entry(score.value()).or_insert(0) += count;
        }
        distribution
    }

    pub fn count_for(&self, score: Score) -> i64 {
        self.0.get(&score.value()).copied().unwrap_or(0)
    }

    pub fn total(&self) -> i64 {
        self.0.values().sum()
    }
}
