//! Evaluator behaviour against a recording stub model.

mod common;

use common::{test_image, StubModel};
use design_eval::prompts::{
    ALIGNMENT_PROMPT, DEFAULT_USER_PROMPT, OVERLAP_PROMPT, WHITESPACE_PROMPT,
};
use design_eval::{
    BetterDesign, DesignPrinciple, EvalError, EvaluateOptions, EvaluationResult, EvaluatorConfig,
    GraphicDesignEvaluator, PromptStore,
};
use llm::{ImageSource, LlmError, MessageRole};

const GOOD_REPLY: &str = r#"{"score": 7, "explanation": "Good balance."}"#;

fn evaluator(model: &std::sync::Arc<StubModel>) -> GraphicDesignEvaluator {
    GraphicDesignEvaluator::new(model.clone())
}

#[tokio::test]
async fn test_each_principle_reaches_system_prompt() {
    let cases = [
        (DesignPrinciple::Alignment, ALIGNMENT_PROMPT),
        (DesignPrinciple::Overlap, OVERLAP_PROMPT),
        (DesignPrinciple::Whitespace, WHITESPACE_PROMPT),
    ];

    for (principle, text) in cases {
        let model = StubModel::replying(GOOD_REPLY);
        evaluator(&model)
            .evaluate_principle(&test_image(), principle)
            .await
            .unwrap();

        let system = model.last_system_prompt();
        assert!(system.contains(text), "{principle} prompt missing");
        assert!(!system.contains("{design_principle}"));
    }
}

#[tokio::test]
async fn test_custom_prompt_overrides_principle() {
    let model = StubModel::replying(GOOD_REPLY);
    let options = EvaluateOptions::principle(DesignPrinciple::Alignment)
        .with_principle_prompt("Judge the colour harmony only.");

    evaluator(&model).evaluate(&test_image(), options).await.unwrap();

    let system = model.last_system_prompt();
    assert!(system.contains("Judge the colour harmony only."));
    assert!(!system.contains(ALIGNMENT_PROMPT));
}

#[tokio::test]
async fn test_missing_instruction_is_invalid_argument() {
    let model = StubModel::replying(GOOD_REPLY);
    let err = evaluator(&model)
        .evaluate(&test_image(), EvaluateOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, EvalError::InvalidArgument(_)));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_blank_custom_prompt_is_invalid_argument() {
    let model = StubModel::replying(GOOD_REPLY);
    let err = evaluator(&model)
        .evaluate(&test_image(), EvaluateOptions::custom_prompt("   "))
        .await
        .unwrap_err();

    assert!(matches!(err, EvalError::InvalidArgument(_)));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_well_formed_reply_is_returned() {
    let model = StubModel::replying(GOOD_REPLY);
    let result = evaluator(&model)
        .evaluate_principle(&test_image(), DesignPrinciple::Whitespace)
        .await
        .unwrap();

    assert_eq!(result, EvaluationResult::new(7.0, "Good balance."));
    assert_eq!(model.calls(), 1);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json, serde_json::json!({"score": 7, "explanation": "Good balance."}));
}

#[tokio::test]
async fn test_non_json_reply_is_parse_error() {
    let model = StubModel::replying("not json");
    let err = evaluator(&model)
        .evaluate_principle(&test_image(), DesignPrinciple::Overlap)
        .await
        .unwrap_err();

    match err {
        EvalError::ResponseParse { raw, .. } => assert_eq!(raw, "not json"),
        other => panic!("expected ResponseParse, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reply_without_score_is_parse_error() {
    let model = StubModel::replying(r#"{"explanation": "forgot the number"}"#);
    let err = evaluator(&model)
        .evaluate_principle(&test_image(), DesignPrinciple::Overlap)
        .await
        .unwrap_err();

    assert!(matches!(err, EvalError::ResponseParse { .. }));
}

#[tokio::test]
async fn test_fenced_reply_is_accepted() {
    let model = StubModel::replying("```json\n{\"score\": 4.5, \"explanation\": \"Crowded.\"}\n```");
    let result = evaluator(&model)
        .evaluate_principle(&test_image(), DesignPrinciple::Whitespace)
        .await
        .unwrap();

    assert_eq!(result.score, 4.5);
}

#[tokio::test]
async fn test_template_without_placeholder_fails_before_call() {
    let model = StubModel::replying(GOOD_REPLY);
    let options = EvaluateOptions::principle(DesignPrinciple::Alignment)
        .with_system_prompt_template("You are a critic. Reply in JSON.");

    let err = evaluator(&model)
        .evaluate(&test_image(), options)
        .await
        .unwrap_err();

    assert!(matches!(err, EvalError::Template(_)));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_custom_template_is_rendered() {
    let model = StubModel::replying(GOOD_REPLY);
    let options = EvaluateOptions::custom_prompt("Check the margins.")
        .with_system_prompt_template("Principle:\n{design_principle}\nReply as {{\"score\": n}}.");

    evaluator(&model).evaluate(&test_image(), options).await.unwrap();

    assert_eq!(
        model.last_system_prompt(),
        "Principle:\nCheck the margins.\nReply as {\"score\": n}."
    );
}

#[tokio::test]
async fn test_upstream_error_passes_through() {
    let model = StubModel::failing(|| LlmError::RateLimitExceeded("slow down".to_string()));
    let err = evaluator(&model)
        .evaluate_principle(&test_image(), DesignPrinciple::Alignment)
        .await
        .unwrap_err();

    assert!(err.is_upstream());
    match err {
        EvalError::Upstream(LlmError::RateLimitExceeded(msg)) => assert_eq!(msg, "slow down"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_user_message_carries_text_and_image() {
    let model = StubModel::replying(GOOD_REPLY);
    let image = test_image();
    evaluator(&model)
        .evaluate_principle(&image, DesignPrinciple::Alignment)
        .await
        .unwrap();

    let request = model.requests().pop().unwrap();
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, MessageRole::System);

    let user = &request.messages[1];
    assert_eq!(user.role, MessageRole::Human);
    assert_eq!(user.text(), DEFAULT_USER_PROMPT);

    let images: Vec<_> = user.images().collect();
    assert_eq!(images.len(), 1);
    match images[0] {
        ImageSource::Base64 { media_type, data } => {
            assert_eq!(media_type, "image/png");
            assert_eq!(data, &image.to_base64());
        }
        other => panic!("expected inline image, got {other:?}"),
    }
}

#[tokio::test]
async fn test_evaluator_config_is_applied() {
    let model = StubModel::replying(GOOD_REPLY);
    let config = EvaluatorConfig {
        temperature: Some(0.2),
        max_tokens: Some(256),
        json_response: true,
    };
    GraphicDesignEvaluator::new(model.clone())
        .with_config(config)
        .evaluate_principle(&test_image(), DesignPrinciple::Overlap)
        .await
        .unwrap();

    let request = model.requests().pop().unwrap();
    assert_eq!(request.config.temperature, Some(0.2));
    assert_eq!(request.config.max_tokens, Some(256));
    assert!(request.config.json_response);
}

#[tokio::test]
async fn test_prompt_store_overrides_are_used() {
    let model = StubModel::replying(GOOD_REPLY);
    let store = PromptStore::default()
        .with_principle_prompt(DesignPrinciple::Overlap, "Nothing may touch the logo.");

    GraphicDesignEvaluator::new(model.clone())
        .with_prompts(store)
        .evaluate_principle(&test_image(), DesignPrinciple::Overlap)
        .await
        .unwrap();

    assert!(model.last_system_prompt().contains("Nothing may touch the logo."));
}

#[tokio::test]
async fn test_sample_makes_one_call_per_sample() {
    let model = StubModel::replying(GOOD_REPLY);
    let results = evaluator(&model)
        .sample(&test_image(), EvaluateOptions::principle(DesignPrinciple::Alignment), 3)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(model.calls(), 3);
    assert!(results.iter().all(|r| r.score == 7.0));
}

#[tokio::test]
async fn test_sample_zero_is_invalid_argument() {
    let model = StubModel::replying(GOOD_REPLY);
    let err = evaluator(&model)
        .sample(&test_image(), EvaluateOptions::principle(DesignPrinciple::Alignment), 0)
        .await
        .unwrap_err();

    assert!(matches!(err, EvalError::InvalidArgument(_)));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_compare_sends_both_images() {
    let model =
        StubModel::replying(r#"{"better_design": "a", "explanation": "Tighter grid."}"#);
    let a = test_image();
    let b = design_eval::DesignImage::from_dynamic_image(&image::DynamicImage::new_rgb8(4, 4))
        .unwrap();

    let result = evaluator(&model)
        .compare(&a, &b, EvaluateOptions::principle(DesignPrinciple::Alignment))
        .await
        .unwrap();

    assert_eq!(result.better_design, BetterDesign::A);
    assert_eq!(result.explanation, "Tighter grid.");

    let request = model.requests().pop().unwrap();
    assert_eq!(request.messages[1].images().count(), 2);
    assert!(model.last_system_prompt().contains(ALIGNMENT_PROMPT));
}

#[tokio::test]
async fn test_compare_samples_counts_calls() {
    let model = StubModel::replying(r#"{"better_design": "both", "explanation": "Equal."}"#);
    let image = test_image();
    let options = EvaluateOptions::principle(DesignPrinciple::Overlap);

    let results = evaluator(&model)
        .compare_samples(&image, &image, options.clone(), 2)
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.better_design == BetterDesign::Both));
    assert_eq!(model.calls(), 2);

    let err = evaluator(&model)
        .compare_samples(&image, &image, options, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, EvalError::InvalidArgument(_)));
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn test_compare_samples_bad_template_makes_no_call() {
    let model = StubModel::replying(r#"{"better_design": "a", "explanation": "x"}"#);
    let image = test_image();
    let options = EvaluateOptions::principle(DesignPrinciple::Alignment)
        .with_system_prompt_template("Pick one. {unknown}");

    let err = evaluator(&model)
        .compare_samples(&image, &image, options, 3)
        .await
        .unwrap_err();
    assert!(matches!(err, EvalError::Template(_)));
    assert_eq!(model.calls(), 0);
}
