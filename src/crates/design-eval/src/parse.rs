//! Validation of model replies.
//!
//! A reply must be exactly one JSON object, optionally wrapped in a single
//! Markdown code fence. Nothing else is repaired: prose around the object,
//! missing keys or wrong types are all [`EvalError::ResponseParse`].

use crate::error::{EvalError, Result};
use crate::result::{BetterDesign, EvaluationResult, RelativeEvaluationResult};
use serde_json::{Map, Value};

/// Parse a `{"score": <number>, "explanation": <string>}` reply.
pub fn parse_evaluation(raw: &str) -> Result<EvaluationResult> {
    let object = parse_object(raw)?;

    let score = match object.get("score") {
        None => return Err(EvalError::parse("missing key 'score'", raw)),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| EvalError::parse("'score' is not representable as f64", raw))?,
        Some(other) => {
            return Err(EvalError::parse(
                format!("'score' must be a number, got {}", type_name(other)),
                raw,
            ))
        }
    };

    let explanation = string_field(&object, "explanation", raw)?;

    Ok(EvaluationResult { score, explanation })
}

/// Parse a `{"better_design": "a"|"b"|"both", "explanation": <string>}` reply.
pub fn parse_relative_evaluation(raw: &str) -> Result<RelativeEvaluationResult> {
    let object = parse_object(raw)?;

    let choice = string_field(&object, "better_design", raw)?;
    let better_design = match choice.trim().to_ascii_lowercase().as_str() {
        "a" => BetterDesign::A,
        "b" => BetterDesign::B,
        "both" => BetterDesign::Both,
        _ => {
            return Err(EvalError::parse(
                format!("'better_design' must be \"a\", \"b\" or \"both\", got {:?}", choice),
                raw,
            ))
        }
    };

    let explanation = string_field(&object, "explanation", raw)?;

    Ok(RelativeEvaluationResult {
        better_design,
        explanation,
    })
}

fn parse_object(raw: &str) -> Result<Map<String, Value>> {
    let body = strip_code_fence(raw.trim());

    let value: Value = serde_json::from_str(body)
        .map_err(|e| EvalError::parse(format!("reply is not valid JSON: {}", e), raw))?;

    match value {
        Value::Object(object) => Ok(object),
        other => Err(EvalError::parse(
            format!("expected a JSON object, got {}", type_name(&other)),
            raw,
        )),
    }
}

fn string_field(object: &Map<String, Value>, key: &str, raw: &str) -> Result<String> {
    match object.get(key) {
        None => Err(EvalError::parse(format!("missing key '{}'", key), raw)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(EvalError::parse(
            format!("'{}' must be a string, got {}", key, type_name(other)),
            raw,
        )),
    }
}

/// Remove one surrounding ```` ``` ```` / ```` ```json ```` fence, if present.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string ("json") on the opening line.
    match inner.find('\n') {
        Some(idx) => inner[idx + 1..].trim(),
        None => inner.trim(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(err: EvalError) -> String {
        match err {
            EvalError::ResponseParse { reason, .. } => reason,
            other => panic!("expected ResponseParse, got {other:?}"),
        }
    }

    #[test]
    fn test_well_formed_reply() {
        let result = parse_evaluation(r#"{"score": 7, "explanation": "Good balance."}"#).unwrap();
        assert_eq!(result.score, 7.0);
        assert_eq!(result.explanation, "Good balance.");
    }

    #[test]
    fn test_fenced_reply() {
        let raw = "```json\n{\"score\": 3.5, \"explanation\": \"Text over image.\"}\n```";
        let result = parse_evaluation(raw).unwrap();
        assert_eq!(result.score, 3.5);
    }

    #[test]
    fn test_extra_keys_ignored() {
        let result =
            parse_evaluation(r#"{"score": 9, "explanation": "Clean.", "confidence": 0.8}"#).unwrap();
        assert_eq!(result.score, 9.0);
    }

    #[test]
    fn test_score_not_clamped() {
        let result = parse_evaluation(r#"{"score": 15, "explanation": "?"}"#).unwrap();
        assert_eq!(result.score, 15.0);
    }

    #[test]
    fn test_not_json() {
        let err = parse_evaluation("not json").unwrap_err();
        assert!(reason(err).contains("not valid JSON"));
    }

    #[test]
    fn test_prose_around_object_rejected() {
        let err = parse_evaluation(r#"Sure! {"score": 7, "explanation": "ok"}"#).unwrap_err();
        assert!(matches!(err, EvalError::ResponseParse { .. }));
    }

    #[test]
    fn test_missing_score() {
        let err = parse_evaluation(r#"{"explanation": "missing score"}"#).unwrap_err();
        assert_eq!(reason(err), "missing key 'score'");
    }

    #[test]
    fn test_non_numeric_score() {
        let err = parse_evaluation(r#"{"score": "7", "explanation": "quoted"}"#).unwrap_err();
        assert_eq!(reason(err), "'score' must be a number, got a string");
    }

    #[test]
    fn test_missing_explanation() {
        let err = parse_evaluation(r#"{"score": 7}"#).unwrap_err();
        assert_eq!(reason(err), "missing key 'explanation'");
    }

    #[test]
    fn test_array_rejected() {
        let err = parse_evaluation("[7, \"ok\"]").unwrap_err();
        assert_eq!(reason(err), "expected a JSON object, got an array");
    }

    #[test]
    fn test_raw_reply_kept() {
        match parse_evaluation("oops").unwrap_err() {
            EvalError::ResponseParse { raw, .. } => assert_eq!(raw, "oops"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_relative_reply() {
        let result =
            parse_relative_evaluation(r#"{"better_design": "B", "explanation": "Cleaner grid."}"#)
                .unwrap();
        assert_eq!(result.better_design, BetterDesign::B);

        let err =
            parse_relative_evaluation(r#"{"better_design": "c", "explanation": "?"}"#).unwrap_err();
        assert!(reason(err).contains("better_design"));
    }
}
