//! Shape conformance and union exclusivity of request/response payloads

use ai_lib_openrouter::request::plugin::Plugin;
use ai_lib_openrouter::request::reasoning::{Reasoning, ReasoningBudget, ReasoningEffort};
use ai_lib_openrouter::response::{Choice, FinishReason};
use ai_lib_openrouter::structured::{ResponseFormat, SchemaDescriptor};
use ai_lib_openrouter::types::{ContentPart, FieldCasing, FileAttachment, MessageContent};
use ai_lib_openrouter::{ChatConfig, ChatRequest, ChatResponse, Error, ModelRouting};
use serde_json::json;

#[test]
fn test_fallback_route_requires_models_and_forbids_model() {
    let cfg: ChatConfig =
        serde_json::from_value(json!({"route": "fallback", "models": ["a/x", "b/y"]})).unwrap();
    assert_eq!(
        cfg.routing,
        ModelRouting::Fallback {
            models: vec!["a/x".into(), "b/y".into()]
        }
    );

    for bad in [
        json!({"route": "fallback"}),
        json!({"route": "fallback", "models": []}),
        json!({"route": "fallback", "models": ["a/x"], "model": "a/x"}),
    ] {
        assert!(serde_json::from_value::<ChatConfig>(bad).is_err());
    }

    let cfg: ChatConfig = serde_json::from_value(json!({"model": "a/x"})).unwrap();
    assert_eq!(
        cfg.routing,
        ModelRouting::Single {
            model: Some("a/x".into())
        }
    );
    assert!(serde_json::from_value::<ChatConfig>(json!({"models": ["a/x"]})).is_err());
}

#[test]
fn test_reasoning_never_carries_both_budgets() {
    let by_effort: Reasoning = serde_json::from_value(json!({"effort": "high"})).unwrap();
    assert_eq!(
        by_effort.budget,
        Some(ReasoningBudget::Effort(ReasoningEffort::High))
    );

    let by_tokens: Reasoning =
        serde_json::from_value(json!({"max_tokens": 4096, "exclude": true})).unwrap();
    assert_eq!(by_tokens.budget, Some(ReasoningBudget::MaxTokens(4096)));
    assert_eq!(by_tokens.exclude, Some(true));

    assert!(
        serde_json::from_value::<Reasoning>(json!({"effort": "high", "max_tokens": 4096}))
            .is_err()
    );

    // Nothing the type can hold serializes to both keys.
    for r in [by_effort, by_tokens, Reasoning::default()] {
        let v = serde_json::to_value(&r).unwrap();
        assert!(!(v.get("effort").is_some() && v.get("max_tokens").is_some()));
    }
}

#[test]
fn test_json_schema_accepts_nested_arrays() {
    let format: ResponseFormat = serde_json::from_value(json!({
        "type": "json_schema",
        "json_schema": {
            "name": "matrix",
            "strict": true,
            "schema": {
                "type": "array",
                "items": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {"v": {"type": "number"}}
                    }
                }
            }
        }
    }))
    .unwrap();

    let schema = format.schema().unwrap();
    assert_eq!(schema.depth(), 2);
    assert!(matches!(schema, SchemaDescriptor::Array { .. }));
    assert!(format.validate().is_ok());
}

#[test]
fn test_null_content_with_stop_round_trips() {
    let raw = json!({
        "id": "gen-1",
        "choices": [{
            "finish_reason": "stop",
            "message": {"content": null, "role": "assistant", "reasoning": null}
        }],
        "created": 1700000000,
        "model": "x/y"
    });
    let resp: ChatResponse = serde_json::from_value(raw.clone()).unwrap();
    let back = serde_json::to_value(&resp).unwrap();
    assert_eq!(back, raw);
    assert!(back["choices"][0]["message"]["content"].is_null());
    assert!(back["choices"][0]["message"].get("tool_calls").is_none());

    let success = resp.into_result().unwrap();
    let choice: &Choice = success.first_choice().unwrap();
    assert_eq!(choice.finish(), Some(FinishReason::Stop));
    assert_eq!(success.content(), None);
}

#[test]
fn test_plugin_required_fields() {
    assert!(serde_json::from_value::<Plugin>(json!({"id": "web"})).is_err());
    assert!(serde_json::from_value::<Plugin>(
        json!({"id": "web", "max_results": 3, "search_prompt": "ctx"})
    )
    .is_ok());
    assert_eq!(
        serde_json::from_value::<Plugin>(json!({"id": "response-healing"})).unwrap(),
        Plugin::ResponseHealing
    );
}

#[test]
fn test_error_envelope_is_distinguished() {
    let err: ChatResponse =
        serde_json::from_str(r#"{"error":{"status":429,"message":"rate limited"}}"#).unwrap();
    assert!(matches!(err, ChatResponse::Error(_)));

    let ok: ChatResponse = serde_json::from_value(json!({
        "id": "gen-2",
        "choices": [{
            "finish_reason": null,
            "message": {"content": "partial", "role": "assistant", "reasoning": null}
        }],
        "created": 1700000000,
        "model": "x/y"
    }))
    .unwrap();
    assert!(matches!(ok, ChatResponse::Success(_)));

    match err.into_result() {
        Err(Error::Remote { status: 429, .. }) => {}
        other => panic!("expected remote 429, got {:?}", other),
    }
}

#[test]
fn test_full_request_body() {
    let raw = json!({
        "messages": [
            {"role": "system", "content": "You are terse."},
            {"role": "user", "content": [
                {"type": "text", "text": "Summarise this"},
                {"type": "file", "file": {"filename": "a.pdf", "fileData": "data:application/pdf;base64,AA=="}}
            ]}
        ],
        "model": "google/gemini-2.5-flash-image",
        "stop": ["\n\n"],
        "top_k": 40,
        "seed": 7,
        "tool_choice": "none",
        "plugins": [{"id": "file-parser", "pdf": {"engine": "pdf-text"}}],
        "web_search_options": {"search_context_size": "med"},
        "modalities": ["image", "text"],
        "image_config": {"aspect_ratio": "21:9", "image_size": "4K"},
        "prediction": {"type": "content", "content": "draft"}
    });
    let req: ChatRequest = serde_json::from_value(raw.clone()).unwrap();
    assert!(req.validate().is_ok());

    let MessageContent::Parts(parts) = &req.messages[1].content else {
        panic!("expected multimodal content");
    };
    let ContentPart::File { file } = &parts[1] else {
        panic!("expected file part");
    };
    assert_eq!(file.casing(), FieldCasing::Camel);
    assert!(matches!(file, FileAttachment::Camel { .. }));

    assert_eq!(req.to_body().unwrap(), raw);
}
