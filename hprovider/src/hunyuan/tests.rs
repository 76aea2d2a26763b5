//! Focused unit tests for Hunyuan wire shapes.

#![cfg(test)]

use serde_json::json;

use crate::{Message, Role, TokenUsage, ToolCall, ToolDefinition};

use super::types::{
    ApiMessage, ApiRole, ApiTool, ApiToolCall, ChatCompletionChunk, ChatCompletionRequest,
    ChatCompletionResponse,
};

#[test]
fn request_serializes_with_pascal_case_and_skips_unset_fields() {
    let request = ChatCompletionRequest {
        model: "hunyuan-pro".to_string(),
        messages: vec![ApiMessage::from(&Message::user("hi"))],
        top_p: Some(0.8),
        enable_enhancement: Some(false),
        ..ChatCompletionRequest::default()
    };

    let value = serde_json::to_value(&request).expect("serialize");
    assert_eq!(
        value,
        json!({
            "Model": "hunyuan-pro",
            "Messages": [{ "Role": "user", "Content": "hi" }],
            "Stream": false,
            "TopP": 0.8_f32,
            "EnableEnhancement": false
        })
    );
}

#[test]
fn assistant_and_tool_messages_carry_call_linkage() {
    let call = ToolCall::new("call-1", "get_weather", r#"{"city":"Shenzhen"}"#);
    let assistant = ApiMessage::from(&Message::assistant_with_tool_calls("", vec![call]));
    let tool = ApiMessage::from(&Message::tool_result("call-1", "sunny"));

    let assistant = serde_json::to_value(&assistant).expect("serialize assistant");
    assert_eq!(
        assistant["ToolCalls"],
        json!([{
            "Id": "call-1",
            "Type": "function",
            "Function": { "Name": "get_weather", "Arguments": "{\"city\":\"Shenzhen\"}" }
        }])
    );

    let tool = serde_json::to_value(&tool).expect("serialize tool");
    assert_eq!(tool["Role"], "tool");
    assert_eq!(tool["ToolCallId"], "call-1");
}

#[test]
fn tool_definition_schema_is_sent_as_a_string() {
    let definition = ToolDefinition {
        name: "get_weather".to_string(),
        description: "Look up the weather".to_string(),
        input_schema: r#"{"type":"object"}"#.to_string(),
    };

    let value = serde_json::to_value(ApiTool::from(&definition)).expect("serialize");
    assert_eq!(value["Type"], "function");
    assert_eq!(value["Function"]["Parameters"], "{\"type\":\"object\"}");
}

#[test]
fn one_shot_envelope_deserializes_and_tolerates_nulls() {
    let body = json!({
        "Response": {
            "Id": "resp-1",
            "Created": 1_700_000_000,
            "Note": "generated",
            "Choices": [{
                "FinishReason": "tool_calls",
                "Message": {
                    "Role": "assistant",
                    "Content": null,
                    "ToolCalls": [{
                        "Id": "call-1",
                        "Type": "function",
                        "Function": { "Name": "clock", "Arguments": "{}" }
                    }]
                }
            }],
            "Usage": { "PromptTokens": 5, "CompletionTokens": 7, "TotalTokens": 12 },
            "RequestId": "req-1"
        }
    });

    let parsed: ChatCompletionResponse = serde_json::from_value(body).expect("deserialize");
    let completion = parsed.response.expect("response");
    let choices = completion.choices.expect("choices");
    let message = choices[0].message.clone().expect("message");

    assert_eq!(message.role, Some(ApiRole::Assistant));
    assert_eq!(message.content, "");
    assert_eq!(ToolCall::from(message.tool_calls[0].clone()).name, "clock");
    assert_eq!(
        TokenUsage::from(completion.usage.expect("usage")),
        TokenUsage {
            prompt_tokens: 5,
            completion_tokens: 7,
            total_tokens: 12,
        }
    );
}

#[test]
fn stream_chunk_without_role_or_tool_calls_deserializes() {
    let chunk: ChatCompletionChunk = serde_json::from_value(json!({
        "Id": "resp-2",
        "Choices": [{ "Delta": { "Content": " there", "ToolCalls": null }, "FinishReason": "" }]
    }))
    .expect("deserialize");

    let choice = &chunk.choices.expect("choices")[0];
    let delta = choice.delta.as_ref().expect("delta");
    assert_eq!(delta.role, None);
    assert!(delta.tool_calls.is_empty());
    assert_eq!(choice.finish_reason.as_deref(), Some(""));
}

#[test]
fn empty_or_unknown_delta_role_reads_as_unset() {
    let chunk: ChatCompletionChunk = serde_json::from_str(
        r#"{"Id":"resp-3","Choices":[{"Index":0,"Delta":{"Role":"","Content":" there"},"FinishReason":""}]}"#,
    )
    .expect("empty role is tolerated");

    let choices = chunk.choices.expect("choices");
    let delta = choices[0].delta.as_ref().expect("delta");
    assert_eq!(delta.role, None);
    assert_eq!(delta.content, " there");

    let message: ApiMessage =
        serde_json::from_value(json!({ "Role": "narrator", "Content": "x" })).expect("deserialize");
    assert_eq!(message.role, None);

    let message: ApiMessage =
        serde_json::from_value(json!({ "Role": "Assistant", "Content": "x" })).expect("deserialize");
    assert_eq!(message.role, Some(ApiRole::Assistant));
}

#[test]
fn role_conversions_round_trip_through_wire_names() {
    for role in [Role::System, Role::User, Role::Assistant, Role::Tool] {
        let api: ApiRole = role.into();
        assert_eq!(serde_json::to_value(api).expect("serialize"), role.as_str());
        assert_eq!(Role::from(api), role);
    }

    let call = ApiToolCall::from(&ToolCall::new("id", "name", "{}"));
    assert_eq!(call.kind, "function");
}
