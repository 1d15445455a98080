//! Configuration for template matching and the acceptance decision

use super::decision::DecisionPolicy;
use super::types::{ComparisonMode, MatchMethod};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MatchConfig {
    /// Correlation method passed to the matcher
    pub method: MatchMethod,
    /// Acceptance threshold, tune per application
    pub threshold: f32,
    /// Comparison direction; `None` means "derive from `method`"
    pub comparison_mode: Option<ComparisonMode>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            method: MatchMethod::CorrelationCoefficientNormalized,
            threshold: 0.95,
            comparison_mode: None,
        }
    }
}

impl MatchConfig {
    /// Decision policy with the comparison mode filled in from the method if unset
    pub fn policy(&self) -> DecisionPolicy {
        DecisionPolicy {
            method: self.method,
            threshold: self.threshold,
            comparison_mode: Some(
                self.comparison_mode
                    .unwrap_or_else(|| ComparisonMode::for_method(self.method)),
            ),
        }
    }
}

/// Configuration preset for pixel-exact crops taken from a screenshot
pub fn create_strict_config() -> MatchConfig {
    MatchConfig {
        method: MatchMethod::CorrelationCoefficientNormalized,
        threshold: 0.99,
        comparison_mode: Some(ComparisonMode::HigherIsBetter),
    }
}

/// Configuration preset using normalized squared differences
pub fn create_sqdiff_config() -> MatchConfig {
    MatchConfig {
        method: MatchMethod::SumOfSquaredErrorsNormalized,
        threshold: 0.05,
        comparison_mode: Some(ComparisonMode::LowerIsBetter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_config_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.method, MatchMethod::CorrelationCoefficientNormalized);
        assert_eq!(config.threshold, 0.95);
        assert!(config.comparison_mode.is_none());
        assert_eq!(
            config.policy().comparison_mode,
            Some(ComparisonMode::HigherIsBetter)
        );
    }

    #[test]
    fn test_presets_validate() {
        for config in [
            MatchConfig::default(),
            create_strict_config(),
            create_sqdiff_config(),
        ] {
            assert!(config.policy().validate().is_ok(), "{config:?}");
        }
    }

    #[test]
    fn test_explicit_mode_is_kept() {
        let config = MatchConfig {
            method: MatchMethod::SumOfSquaredErrors,
            threshold: 10.0,
            comparison_mode: Some(ComparisonMode::HigherIsBetter),
        };
        assert_eq!(
            config.policy().comparison_mode,
            Some(ComparisonMode::HigherIsBetter)
        );
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MatchConfig = serde_json::from_str(r#"{ "threshold": 0.9 }"#).unwrap();
        assert_eq!(config.threshold, 0.9);
        assert_eq!(config.method, MatchMethod::CorrelationCoefficientNormalized);
    }
}
