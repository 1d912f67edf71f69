//! Benchmarks for payload (de)serialization
//!
//! This benchmark measures:
//! - Request body serialization with flattened config and routing
//! - Response envelope parsing (success vs error discrimination)
//! - Request validation overhead

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ai_lib_openrouter::request::plugin::Plugin;
use ai_lib_openrouter::request::reasoning::{Reasoning, ReasoningEffort};
use ai_lib_openrouter::types::{FunctionDescription, Message, Tool, ToolChoice};
use ai_lib_openrouter::{ChatConfig, ChatRequest, ChatResponse};

fn create_simple_request() -> ChatRequest {
    ChatRequest::new(
        vec![Message::user("Hello, world!")],
        ChatConfig::model("openai/gpt-4o")
            .with_temperature(0.7)
            .with_max_tokens(1000),
    )
}

fn create_complex_request() -> ChatRequest {
    let tool = Tool::function(
        FunctionDescription::new(
            "get_weather",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "location": {"type": "string", "description": "The city and state"},
                    "unit": {"type": "string", "enum": ["celsius", "fahrenheit"]}
                },
                "required": ["location"]
            }),
        )
        .with_description("Get the current weather in a given location"),
    );

    ChatRequest::new(
        vec![
            Message::system("You are a helpful assistant that can check the weather."),
            Message::user("What is the weather like in Tokyo?"),
        ],
        ChatConfig::fallback(["anthropic/claude-3.5-sonnet", "openai/gpt-4o"])
            .with_reasoning(Reasoning::effort(ReasoningEffort::Medium))
            .with_tools(vec![tool], Some(ToolChoice::Auto))
            .with_plugin(Plugin::web(5, "Web results:")),
    )
}

fn create_long_conversation() -> ChatRequest {
    let mut messages = vec![Message::system("You are a helpful assistant.")];
    for i in 0..50 {
        messages.push(Message::user(format!("User message number {}", i)));
        messages.push(Message::assistant(format!("Assistant response number {}", i)));
    }
    ChatRequest::new(messages, ChatConfig::model("openai/gpt-4o"))
}

const SUCCESS_BODY: &str = r#"{
  "id": "gen-bench",
  "created": 1714564800,
  "model": "openai/gpt-4o",
  "choices": [{
    "finish_reason": "tool_calls",
    "message": {
      "role": "assistant",
      "content": null,
      "reasoning": "The user wants the weather.",
      "tool_calls": [{
        "id": "call_1",
        "type": "function",
        "function": {"name": "get_weather", "arguments": "{\"location\":\"Tokyo\"}"}
      }]
    }
  }],
  "usage": {"prompt_tokens": 80, "completion_tokens": 20, "total_tokens": 100}
}"#;

const ERROR_BODY: &str = r#"{"error":{"status":429,"message":"rate limited"}}"#;

fn bench_request_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_serialization");

    let cases = [
        ("simple", create_simple_request()),
        ("with_tools", create_complex_request()),
        ("long_conversation", create_long_conversation()),
    ];

    for (name, request) in &cases {
        group.bench_with_input(BenchmarkId::new("to_body", name), request, |b, req| {
            b.iter(|| black_box(req).to_body().unwrap())
        });
        group.bench_with_input(BenchmarkId::new("validate", name), request, |b, req| {
            b.iter(|| black_box(req).validate().unwrap())
        });
    }

    group.finish();
}

fn bench_response_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("response_parsing");

    group.throughput(Throughput::Bytes(SUCCESS_BODY.len() as u64));
    group.bench_function("success", |b| {
        b.iter(|| serde_json::from_str::<ChatResponse>(black_box(SUCCESS_BODY)).unwrap())
    });

    group.throughput(Throughput::Bytes(ERROR_BODY.len() as u64));
    group.bench_function("error", |b| {
        b.iter(|| serde_json::from_str::<ChatResponse>(black_box(ERROR_BODY)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_request_serialization, bench_response_parsing);
criterion_main!(benches);
