/// Template matching data types
use crate::error::ProbeError;
use imageproc::template_matching::MatchTemplateMethod;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Correlation method used to build the score surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchMethod {
    /// Correlation coefficient, insensitive to brightness and contrast.
    /// 1.0 is a perfect match, 0.0 no correlation
    #[default]
    #[serde(rename = "ccoeff-normed")]
    CorrelationCoefficientNormalized,
    /// Normalized cross correlation without mean removal, 1.0 is a perfect match
    #[serde(rename = "ccorr-normed")]
    CrossCorrelationNormalized,
    /// Raw cross correlation, unbounded above
    #[serde(rename = "ccorr")]
    CrossCorrelation,
    /// Sum of squared differences, 0.0 is a perfect match
    #[serde(rename = "sqdiff")]
    SumOfSquaredErrors,
    /// Normalized sum of squared differences, 0.0 is a perfect match
    #[serde(rename = "sqdiff-normed")]
    SumOfSquaredErrorsNormalized,
}

/// How a score is compared against the acceptance threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonMode {
    HigherIsBetter,
    LowerIsBetter,
}

impl MatchMethod {
    pub const ALL: [MatchMethod; 5] = [
        MatchMethod::CorrelationCoefficientNormalized,
        MatchMethod::CrossCorrelationNormalized,
        MatchMethod::CrossCorrelation,
        MatchMethod::SumOfSquaredErrors,
        MatchMethod::SumOfSquaredErrorsNormalized,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MatchMethod::CorrelationCoefficientNormalized => "ccoeff-normed",
            MatchMethod::CrossCorrelationNormalized => "ccorr-normed",
            MatchMethod::CrossCorrelation => "ccorr",
            MatchMethod::SumOfSquaredErrors => "sqdiff",
            MatchMethod::SumOfSquaredErrorsNormalized => "sqdiff-normed",
        }
    }

    /// The imageproc equivalent, `None` for methods computed in this crate
    pub(crate) fn to_imageproc(self) -> Option<MatchTemplateMethod> {
        match self {
            MatchMethod::CorrelationCoefficientNormalized => None,
            MatchMethod::CrossCorrelationNormalized => {
                Some(MatchTemplateMethod::CrossCorrelationNormalized)
            }
            MatchMethod::CrossCorrelation => Some(MatchTemplateMethod::CrossCorrelation),
            MatchMethod::SumOfSquaredErrors => Some(MatchTemplateMethod::SumOfSquaredErrors),
            MatchMethod::SumOfSquaredErrorsNormalized => {
                Some(MatchTemplateMethod::SumOfSquaredErrorsNormalized)
            }
        }
    }

    /// Whether the best position is the maximum of the score surface
    pub fn higher_is_better(self) -> bool {
        matches!(
            self,
            MatchMethod::CorrelationCoefficientNormalized
                | MatchMethod::CrossCorrelationNormalized
                | MatchMethod::CrossCorrelation
        )
    }

    /// Inclusive range a threshold must fall in for this method
    pub fn threshold_range(self) -> (f32, f32) {
        match self {
            MatchMethod::CorrelationCoefficientNormalized => (-1.0, 1.0),
            MatchMethod::CrossCorrelationNormalized => (0.0, 1.0),
            _ => (0.0, f32::INFINITY),
        }
    }
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatchMethod {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        MatchMethod::ALL
            .into_iter()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| {
                ProbeError::invalid_input(format!(
                    "unknown match method '{s}', expected one of ccoeff-normed, ccorr-normed, ccorr, sqdiff, sqdiff-normed"
                ))
            })
    }
}

impl ComparisonMode {
    /// The natural comparison for scores produced by `method`
    pub fn for_method(method: MatchMethod) -> Self {
        if method.higher_is_better() {
            ComparisonMode::HigherIsBetter
        } else {
            ComparisonMode::LowerIsBetter
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonMode::HigherIsBetter => f.write_str("higher-is-better"),
            ComparisonMode::LowerIsBetter => f.write_str("lower-is-better"),
        }
    }
}

impl FromStr for ComparisonMode {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "higher-is-better" | "higher" | "max" => Ok(ComparisonMode::HigherIsBetter),
            "lower-is-better" | "lower" | "min" => Ok(ComparisonMode::LowerIsBetter),
            other => Err(ProbeError::invalid_config(format!(
                "unknown comparison mode '{other}', expected higher-is-better or lower-is-better"
            ))),
        }
    }
}

/// Best-aligned template position within the scene
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MatchResult {
    /// Top-left corner of the template in scene coordinates
    pub location: (u32, u32),
    /// Score at `location`, meaning depends on `method`
    pub score: f32,
    pub method: MatchMethod,
    /// Width and height of the template that was matched
    pub template_size: (u32, u32),
}

impl MatchResult {
    /// Center of the matched area, handy for tapping the element
    pub fn center(&self) -> (u32, u32) {
        (
            self.location.0 + self.template_size.0 / 2,
            self.location.1 + self.template_size.1 / 2,
        )
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{},{},{}] {}={:.4}",
            self.location.0,
            self.location.1,
            self.template_size.0,
            self.template_size.1,
            self.method,
            self.score
        )
    }
}
