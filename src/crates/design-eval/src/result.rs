//! Parsed evaluation results.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Lowest score on the prompt's scale.
pub const MIN_SCORE: f64 = 1.0;
/// Highest score on the prompt's scale.
pub const MAX_SCORE: f64 = 10.0;

/// Score and explanation for one design principle.
///
/// The score is kept exactly as the model returned it; it is not clamped to
/// the 1-10 scale the prompt asks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
    pub explanation: String,
}

impl EvaluationResult {
    pub fn new(score: f64, explanation: impl Into<String>) -> Self {
        Self {
            score,
            explanation: explanation.into(),
        }
    }

    /// Whether the score lies on the 1-10 scale. Informational only.
    pub fn is_within_scale(&self) -> bool {
        (MIN_SCORE..=MAX_SCORE).contains(&self.score)
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/10: {}", self.score, self.explanation)
    }
}

/// Integral scores serialize as JSON integers so `{"score": 7}` round-trips
/// as `7`, not `7.0`.
fn serialize_score<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if score.is_finite() && score.fract() == 0.0 && score.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*score as i64)
    } else {
        serializer.serialize_f64(*score)
    }
}

/// Which of two designs the model preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetterDesign {
    /// The first image.
    A,
    /// The second image.
    B,
    /// Same quality.
    Both,
}

/// Outcome of a pairwise comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelativeEvaluationResult {
    pub better_design: BetterDesign,
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_preserves_keys_and_values() {
        let input = json!({"score": 7, "explanation": "Good balance."});
        let result: EvaluationResult = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(result.score, 7.0);
        assert_eq!(serde_json::to_value(&result).unwrap(), input);

        let fractional = json!({"score": 6.5, "explanation": "Slightly crowded."});
        let result: EvaluationResult = serde_json::from_value(fractional.clone()).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), fractional);
    }

    #[test]
    fn test_scale_is_not_enforced() {
        let result = EvaluationResult::new(12.0, "generous model");
        assert!(!result.is_within_scale());
        assert!(EvaluationResult::new(1.0, "").is_within_scale());
        assert!(EvaluationResult::new(10.0, "").is_within_scale());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            EvaluationResult::new(4.0, "Misaligned title.").to_string(),
            "4/10: Misaligned title."
        );
    }

    #[test]
    fn test_better_design_serde() {
        let result: RelativeEvaluationResult =
            serde_json::from_value(json!({"better_design": "both", "explanation": "tie"})).unwrap();
        assert_eq!(result.better_design, BetterDesign::Both);
        assert_eq!(serde_json::to_value(BetterDesign::A).unwrap(), json!("a"));
    }
}
