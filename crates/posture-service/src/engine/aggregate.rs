//! Weighted aggregation of region scores.

use super::EngineError;
use common::posture::{DetailedAnalysis, PostureStatus, Region};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Aggregate at or above this is "good"
pub const GOOD_THRESHOLD: u8 = 85;
/// Aggregate at or above this is "fair"
pub const FAIR_THRESHOLD: u8 = 60;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Weights for `[head_neck, shoulders, spine, hips, overall]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights([f64; 5]);

impl Default for ScoreWeights {
    fn default() -> Self {
        Self([0.15, 0.2, 0.3, 0.2, 0.15])
    }
}

impl ScoreWeights {
    /// Build weights, rejecting negative or non-finite entries and vectors
    /// that do not sum to 1.0
    pub fn new(weights: [f64; 5]) -> Result<Self, EngineError> {
        let weights = Self(weights);
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if let Some(w) = self.0.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(EngineError::InvalidWeights(format!(
                "weight {} is not a finite non-negative number",
                w
            )));
        }

        let sum: f64 = self.0.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::InvalidWeights(format!(
                "weights sum to {}, expected 1.0",
                sum
            )));
        }

        Ok(())
    }

    pub fn weight(&self, region: Region) -> f64 {
        self.0[region.index()]
    }

    pub fn as_array(&self) -> [f64; 5] {
        self.0
    }

    /// `round(Σ scoreᵢ·weightᵢ)`
    pub fn aggregate(&self, scores: [u8; 5]) -> Result<u8, EngineError> {
        let weighted: f64 = Region::ALL
            .iter()
            .map(|region| f64::from(scores[region.index()]) * self.weight(*region))
            .sum();

        let rounded = weighted.round();
        if !(0.0..=100.0).contains(&rounded) {
            return Err(EngineError::ScoreOutOfRange(weighted));
        }

        Ok(rounded as u8)
    }

    pub fn aggregate_analysis(&self, analysis: &DetailedAnalysis) -> Result<u8, EngineError> {
        self.aggregate(analysis.scores())
    }
}

/// Parses a comma separated list such as `0.15,0.2,0.3,0.2,0.15`
impl FromStr for ScoreWeights {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .split(',')
            .map(|part| {
                part.trim().parse::<f64>().map_err(|e| {
                    EngineError::InvalidWeights(format!("'{}' is not a number: {}", part.trim(), e))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let weights: [f64; 5] = parsed.try_into().map_err(|v: Vec<f64>| {
            EngineError::InvalidWeights(format!("expected 5 weights, got {}", v.len()))
        })?;

        Self::new(weights)
    }
}

/// Map an aggregate score to a status
pub fn classify(score: u8) -> PostureStatus {
    if score >= GOOD_THRESHOLD {
        PostureStatus::Good
    } else if score >= FAIR_THRESHOLD {
        PostureStatus::Fair
    } else {
        PostureStatus::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = ScoreWeights::default();
        assert!(weights.validate().is_ok());
        assert_eq!(weights.weight(Region::Spine), 0.3);
        assert_eq!(weights.weight(Region::Overall), 0.15);
    }

    #[test]
    fn test_aggregate_perfect_and_zero() {
        let weights = ScoreWeights::default();
        assert_eq!(weights.aggregate([100; 5]).unwrap(), 100);
        assert_eq!(weights.aggregate([0; 5]).unwrap(), 0);
    }

    #[test]
    fn test_aggregate_unclear_spine_and_hips() {
        // 15 + 20 + 21 + 13 + 15
        let weights = ScoreWeights::default();
        assert_eq!(weights.aggregate([100, 100, 70, 65, 100]).unwrap(), 84);
    }

    #[test]
    fn test_aggregate_rounds_half_up() {
        let weights = ScoreWeights::new([0.25, 0.25, 0.25, 0.25, 0.0]).unwrap();
        assert_eq!(weights.aggregate([2, 0, 0, 0, 0]).unwrap(), 1);
        assert_eq!(weights.aggregate([6, 0, 0, 0, 0]).unwrap(), 2);
    }

    #[test]
    fn test_rejects_bad_weights() {
        assert!(ScoreWeights::new([0.2; 5]).is_ok());
        assert!(ScoreWeights::new([0.15, 0.10, 0.30, 0.20, 0.20]).is_err());
        assert!(ScoreWeights::new([-0.1, 0.3, 0.3, 0.3, 0.2]).is_err());
        assert!(ScoreWeights::new([f64::NAN, 0.3, 0.3, 0.2, 0.2]).is_err());
    }

    #[test]
    fn test_parse_weights() {
        let weights: ScoreWeights = "0.15, 0.2, 0.3, 0.2, 0.15".parse().unwrap();
        assert_eq!(weights, ScoreWeights::default());

        assert!("0.5,0.5".parse::<ScoreWeights>().is_err());
        assert!("0.5,0.5,x,0,0".parse::<ScoreWeights>().is_err());
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(100), PostureStatus::Good);
        assert_eq!(classify(85), PostureStatus::Good);
        assert_eq!(classify(84), PostureStatus::Fair);
        assert_eq!(classify(60), PostureStatus::Fair);
        assert_eq!(classify(59), PostureStatus::Poor);
        assert_eq!(classify(0), PostureStatus::Poor);
    }
}
