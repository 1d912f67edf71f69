//! Integration tests for structured output functionality

use ai_lib_openrouter::response::ChatResponse;
use ai_lib_openrouter::structured::{
    PropertySchema, PropertyType, ResponseFormat, SchemaDescriptor, SchemaGenerator,
    StructuredOutput,
};
use ai_lib_openrouter::{ChatConfig, ChatRequest, Message};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, PartialEq)]
struct City {
    name: String,
    population: f64,
    capital: bool,
}

fn cities_format() -> ResponseFormat {
    let city = SchemaGenerator::new()
        .add_required("name", PropertyType::String)
        .add_required("population", PropertyType::Number)
        .add_property(
            "capital",
            PropertySchema::new(PropertyType::Boolean).with_description("national capital"),
        )
        .set_required(&[
            "name".to_string(),
            "population".to_string(),
            "capital".to_string(),
        ])
        .set_additional_properties(false)
        .build();
    ResponseFormat::json_schema("cities", true, SchemaDescriptor::array_of(city))
}

#[test]
fn test_end_to_end_json_schema_request_and_response() {
    let format = cities_format();
    let request = ChatRequest::new(
        vec![Message::user("List two French cities")],
        ChatConfig::model("openai/gpt-4o").with_response_format(format.clone()),
    );
    request.validate().unwrap();

    let body = request.to_body().unwrap();
    assert_eq!(body["response_format"]["type"], "json_schema");
    assert_eq!(body["response_format"]["json_schema"]["name"], "cities");
    assert_eq!(body["response_format"]["json_schema"]["schema"]["type"], "array");
    assert_eq!(
        body["response_format"]["json_schema"]["schema"]["items"]["additionalProperties"],
        false
    );

    let response: ChatResponse = serde_json::from_value(json!({
        "id": "gen-9",
        "created": 1700000000,
        "model": "openai/gpt-4o",
        "choices": [{
            "finish_reason": "stop",
            "message": {
                "role": "assistant",
                "reasoning": null,
                "content": "[{\"name\":\"Paris\",\"population\":2100000,\"capital\":true},{\"name\":\"Lyon\",\"population\":520000,\"capital\":false}]"
            }
        }]
    }))
    .unwrap();
    let success = response.into_result().unwrap();

    let output = StructuredOutput::from_choice(success.first_choice().unwrap(), &format).unwrap();
    assert!(output.is_valid(), "violations: {:?}", output.violations());
    let cities: Vec<City> = output.into_typed().unwrap();
    assert_eq!(cities.len(), 2);
    assert_eq!(cities[0].name, "Paris");
    assert!(cities[0].capital);
}

#[test]
fn test_schema_violation_is_reported() {
    let output = StructuredOutput::check(
        r#"[{"name": "Paris", "population": "lots", "capital": true}]"#,
        &cities_format(),
    )
    .unwrap();
    assert!(!output.is_valid());
    assert!(output
        .violations()
        .iter()
        .any(|v| v.path.contains("population")));
}

#[test]
fn test_choice_without_content_cannot_be_parsed() {
    let response: ChatResponse = serde_json::from_value(json!({
        "id": "gen-10",
        "created": 1700000000,
        "model": "openai/gpt-4o",
        "choices": [{
            "finish_reason": "length",
            "message": {"role": "assistant", "content": null, "reasoning": null}
        }]
    }))
    .unwrap();
    let success = response.into_result().unwrap();
    assert!(StructuredOutput::from_choice(&success.choices[0], &cities_format()).is_err());
}
