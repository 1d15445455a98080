//! Acceptance policy: turns a match score into a present/absent verdict

use super::types::{ComparisonMode, MatchMethod, MatchResult};
use crate::error::{ProbeError, ProbeResult};
use serde::{Deserialize, Serialize};

/// Threshold and comparison direction for one matching method
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    pub method: MatchMethod,
    pub threshold: f32,
    /// Must be set before deciding; see [`ComparisonMode::for_method`]
    pub comparison_mode: Option<ComparisonMode>,
}

impl DecisionPolicy {
    pub fn new(method: MatchMethod, threshold: f32, comparison_mode: ComparisonMode) -> Self {
        Self {
            method,
            threshold,
            comparison_mode: Some(comparison_mode),
        }
    }

    /// Policy using the natural comparison for `method`
    pub fn for_method(method: MatchMethod, threshold: f32) -> Self {
        Self::new(method, threshold, ComparisonMode::for_method(method))
    }

    /// Check threshold and mode without a score
    pub fn validate(&self) -> ProbeResult<ComparisonMode> {
        let mode = self.comparison_mode.ok_or_else(|| {
            ProbeError::invalid_config(format!(
                "comparison mode is not set for method {}",
                self.method
            ))
        })?;

        let (low, high) = self.method.threshold_range();
        if !self.threshold.is_finite() || self.threshold < low || self.threshold > high {
            return Err(ProbeError::invalid_config(format!(
                "threshold {} is outside [{low}, {high}] for method {}",
                self.threshold, self.method
            )));
        }
        Ok(mode)
    }

    /// Compare a raw score; equality counts as present
    pub fn decide_score(&self, score: f32) -> ProbeResult<bool> {
        let present = match self.validate()? {
            ComparisonMode::HigherIsBetter => score >= self.threshold,
            ComparisonMode::LowerIsBetter => score <= self.threshold,
        };
        Ok(present)
    }
}

/// Presence verdict for a match result
pub fn decide(result: &MatchResult, policy: &DecisionPolicy) -> ProbeResult<bool> {
    if result.method != policy.method {
        log::warn!(
            "Score from {} judged with a policy for {}",
            result.method,
            policy.method
        );
    }
    policy.decide_score(result.score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<f32> {
        (0..=20).map(|i| i as f32 * 0.05).collect()
    }

    #[test]
    fn test_higher_is_better_matches_ge() {
        for &threshold in &grid() {
            let policy = DecisionPolicy::new(
                MatchMethod::CrossCorrelationNormalized,
                threshold,
                ComparisonMode::HigherIsBetter,
            );
            for &score in &grid() {
                assert_eq!(
                    policy.decide_score(score).unwrap(),
                    score >= threshold,
                    "score={score} threshold={threshold}"
                );
            }
        }
    }

    #[test]
    fn test_lower_is_better_matches_le() {
        for &threshold in &grid() {
            let policy = DecisionPolicy::new(
                MatchMethod::SumOfSquaredErrorsNormalized,
                threshold,
                ComparisonMode::LowerIsBetter,
            );
            for &score in &grid() {
                assert_eq!(
                    policy.decide_score(score).unwrap(),
                    score <= threshold,
                    "score={score} threshold={threshold}"
                );
            }
        }
    }

    #[test]
    fn test_boundary_is_present_in_both_modes() {
        for mode in [ComparisonMode::HigherIsBetter, ComparisonMode::LowerIsBetter] {
            for &threshold in &grid() {
                let policy =
                    DecisionPolicy::new(MatchMethod::CrossCorrelationNormalized, threshold, mode);
                assert!(policy.decide_score(threshold).unwrap());
            }
        }
    }

    #[test]
    fn test_decide_is_idempotent() {
        let policy = DecisionPolicy::for_method(MatchMethod::CrossCorrelationNormalized, 0.95);
        let result = MatchResult {
            location: (3, 4),
            score: 0.951,
            method: MatchMethod::CrossCorrelationNormalized,
            template_size: (10, 10),
        };
        let first = decide(&result, &policy).unwrap();
        let second = decide(&result, &policy).unwrap();
        assert!(first);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unset_mode_is_invalid_configuration() {
        let policy = DecisionPolicy {
            method: MatchMethod::CrossCorrelationNormalized,
            threshold: 0.9,
            comparison_mode: None,
        };
        let err = policy.decide_score(0.99).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_out_of_range_threshold_is_invalid_configuration() {
        for threshold in [1.5, -0.1, f32::NAN, f32::INFINITY] {
            let policy =
                DecisionPolicy::for_method(MatchMethod::CrossCorrelationNormalized, threshold);
            assert!(matches!(
                policy.validate(),
                Err(ProbeError::InvalidConfiguration { .. })
            ));
        }

        let policy = DecisionPolicy::for_method(MatchMethod::SumOfSquaredErrors, 25_000.0);
        assert_eq!(policy.validate().unwrap(), ComparisonMode::LowerIsBetter);
        let policy = DecisionPolicy::for_method(MatchMethod::SumOfSquaredErrors, -1.0);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_correlation_coefficient_allows_negative_thresholds() {
        let method = MatchMethod::CorrelationCoefficientNormalized;
        assert!(DecisionPolicy::for_method(method, -0.5).validate().is_ok());
        assert!(DecisionPolicy::for_method(method, -1.0).validate().is_ok());
        assert!(DecisionPolicy::for_method(method, -1.01).validate().is_err());
        assert!(DecisionPolicy::for_method(method, 1.01).validate().is_err());
    }

    #[test]
    fn test_nan_score_is_absent() {
        let policy = DecisionPolicy::for_method(MatchMethod::CrossCorrelationNormalized, 0.5);
        assert!(!policy.decide_score(f32::NAN).unwrap());
        let policy = DecisionPolicy::for_method(MatchMethod::SumOfSquaredErrorsNormalized, 0.5);
        assert!(!policy.decide_score(f32::NAN).unwrap());
    }
}
