//! Conversion of provider payloads into [`ChatResult`] values.
//!
//! One-shot completions and stream chunks share one conversion: a chunk is
//! first reshaped into a [`ChatCompletion`] whose choices carry the deltas as
//! messages.

use dashmap::DashMap;
use hprovider::hunyuan::{ApiMessage, ApiRole, ChatCompletion, ChatCompletionChunk, Choice};
use hprovider::{ProviderError, Role, TokenUsage, ToolCall};

use crate::{
    ChatResult, ChatResultMetadata, Generation, METADATA_FINISH_REASON, METADATA_ID,
    METADATA_ROLE, StreamAggregator,
};

/// Normalizes a one-shot completion.
///
/// A missing completion or an empty choice list is logged and yields a
/// result without generations.
pub fn to_chat_result(completion: Option<ChatCompletion>, model: &str) -> ChatResult {
    let Some(completion) = completion else {
        tracing::warn!(model, "provider returned no completion");
        return ChatResult::empty();
    };

    if completion.choices.as_ref().is_none_or(Vec::is_empty) {
        tracing::warn!(
            model,
            response_id = completion.id.as_deref().unwrap_or_default(),
            "provider returned no choices"
        );
    }

    convert(completion, model)
}

fn convert(completion: ChatCompletion, model: &str) -> ChatResult {
    let id = completion.id.unwrap_or_default();
    let generations = completion
        .choices
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(position, choice)| to_generation(&id, position, choice))
        .collect();

    ChatResult {
        generations,
        metadata: ChatResultMetadata {
            id,
            model: model.to_string(),
            usage: completion.usage.map(TokenUsage::from).unwrap_or_default(),
            created: completion.created,
        },
    }
}

fn to_generation(response_id: &str, position: usize, choice: Choice) -> Generation {
    let message = choice.message.unwrap_or_default();
    let role = message.role.map(Role::from);
    let finish_reason = choice.finish_reason.unwrap_or_default();

    let mut generation = Generation {
        index: choice.index.unwrap_or(position as u32),
        text: message.content,
        tool_calls: message.tool_calls.into_iter().map(ToolCall::from).collect(),
        finish_reason: finish_reason.clone(),
        ..Generation::default()
    };
    generation
        .metadata
        .insert(METADATA_ID.to_string(), response_id.to_string());
    generation.metadata.insert(
        METADATA_ROLE.to_string(),
        role.map(|role| role.as_str().to_string()).unwrap_or_default(),
    );
    generation
        .metadata
        .insert(METADATA_FINISH_REASON.to_string(), finish_reason);
    generation
}

/// Reshapes a stream chunk into the one-shot completion shape.
///
/// A choice without a delta becomes an empty assistant message. Fails when
/// the chunk has no response id, since fragments are correlated by it.
pub fn chunk_to_completion(chunk: ChatCompletionChunk) -> Result<ChatCompletion, ProviderError> {
    let id = chunk
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ProviderError::malformed_response("stream chunk has no response id"))?;

    let choices = chunk.choices.map(|choices| {
        choices
            .into_iter()
            .map(|choice| Choice {
                index: choice.index,
                message: Some(choice.delta.unwrap_or_else(|| ApiMessage {
                    role: Some(ApiRole::Assistant),
                    ..ApiMessage::default()
                })),
                finish_reason: choice.finish_reason,
            })
            .collect()
    });

    Ok(ChatCompletion {
        id: Some(id),
        created: chunk.created,
        note: chunk.note,
        choices,
        usage: chunk.usage,
        request_id: None,
        error: None,
    })
}

/// Per-round streaming state.
///
/// Providers send the role only on the first fragment of a response; the role
/// cache carries it onto the fragments that follow. The embedded aggregator
/// tracks tool calls that arrive before the finish reason that completes them.
#[derive(Debug)]
pub struct ExchangeState {
    model: String,
    roles: DashMap<String, Role>,
    aggregate: StreamAggregator,
}

impl ExchangeState {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            roles: DashMap::new(),
            aggregate: StreamAggregator::new(),
        }
    }

    /// Returns the cached role for `response_id`, seeding the cache with
    /// `incoming` when nothing is cached yet.
    pub fn role_for(&self, response_id: &str, incoming: Option<Role>) -> Option<Role> {
        if let Some(cached) = self.roles.get(response_id) {
            return Some(*cached);
        }

        incoming.map(|role| *self.roles.entry(response_id.to_string()).or_insert(role))
    }

    /// Normalizes one chunk. Usage is left empty on the returned fragment;
    /// the exchange aggregate keeps the last usage the provider reported.
    pub fn normalize(&mut self, chunk: ChatCompletionChunk) -> Result<ChatResult, ProviderError> {
        let mut completion = chunk_to_completion(chunk)?;
        let response_id = completion.id.clone().unwrap_or_default();

        for choice in completion.choices.iter_mut().flatten() {
            if let Some(message) = choice.message.as_mut() {
                let role = self.role_for(&response_id, message.role.map(Role::from));
                message.role = role.map(ApiRole::from);
            }
        }

        let mut result = convert(completion, &self.model);
        self.aggregate.absorb(&result);
        result.metadata.usage = TokenUsage::default();

        Ok(result)
    }

    /// Whether the fragments seen so far complete a tool request.
    pub fn requests_tools(&self) -> bool {
        self.aggregate.requests_tools()
    }

    /// Everything received in this round, reduced to one result.
    pub fn aggregated(&self) -> ChatResult {
        self.aggregate.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use hprovider::hunyuan::{ApiFunctionCall, ApiToolCall, ApiUsage, ChunkChoice};

    use super::*;

    fn completion(choices: Option<Vec<Choice>>) -> ChatCompletion {
        ChatCompletion {
            id: Some("resp-1".to_string()),
            created: Some(1_700_000_000),
            choices,
            usage: Some(ApiUsage {
                prompt_tokens: 5,
                completion_tokens: 7,
                total_tokens: 12,
            }),
            ..ChatCompletion::default()
        }
    }

    fn chunk(
        id: &str,
        role: Option<ApiRole>,
        content: &str,
        finish_reason: &str,
    ) -> ChatCompletionChunk {
        ChatCompletionChunk {
            id: Some(id.to_string()),
            choices: Some(vec![ChunkChoice {
                index: Some(0),
                delta: Some(ApiMessage {
                    role,
                    content: content.to_string(),
                    ..ApiMessage::default()
                }),
                finish_reason: Some(finish_reason.to_string()),
            }]),
            ..ChatCompletionChunk::default()
        }
    }

    #[test]
    fn one_shot_completion_maps_to_generations_with_metadata() {
        let result = to_chat_result(
            Some(completion(Some(vec![Choice {
                index: Some(0),
                message: Some(ApiMessage {
                    role: Some(ApiRole::Assistant),
                    content: "Sunny".to_string(),
                    ..ApiMessage::default()
                }),
                finish_reason: Some("stop".to_string()),
            }]))),
            "hunyuan-pro",
        );

        let generation = &result.generations[0];
        assert_eq!(generation.text, "Sunny");
        assert_eq!(generation.metadata_value(METADATA_ID), "resp-1");
        assert_eq!(generation.metadata_value(METADATA_ROLE), "assistant");
        assert_eq!(generation.metadata_value(METADATA_FINISH_REASON), "stop");
        assert_eq!(result.metadata.model, "hunyuan-pro");
        assert_eq!(result.metadata.usage.total_tokens, 12);
        assert_eq!(result.metadata.created, Some(1_700_000_000));
    }

    #[test]
    fn absent_fields_become_empty_sentinels() {
        let result = to_chat_result(
            Some(ChatCompletion {
                choices: Some(vec![Choice::default()]),
                ..ChatCompletion::default()
            }),
            "hunyuan-lite",
        );

        let generation = &result.generations[0];
        assert_eq!(generation.text, "");
        for key in [METADATA_ID, METADATA_ROLE, METADATA_FINISH_REASON] {
            assert_eq!(generation.metadata.get(key).map(String::as_str), Some(""));
        }
    }

    #[test]
    fn missing_completion_or_choices_yield_empty_results() {
        assert!(to_chat_result(None, "hunyuan-pro").is_empty());
        assert!(to_chat_result(Some(completion(None)), "hunyuan-pro").is_empty());

        let empty_choices = to_chat_result(Some(completion(Some(Vec::new()))), "hunyuan-pro");
        assert!(empty_choices.is_empty());
        assert_eq!(empty_choices.metadata.id, "resp-1");
    }

    #[test]
    fn tool_calls_are_carried_onto_the_generation() {
        let result = to_chat_result(
            Some(completion(Some(vec![Choice {
                index: None,
                message: Some(ApiMessage {
                    role: Some(ApiRole::Assistant),
                    tool_calls: vec![ApiToolCall {
                        id: "call-1".to_string(),
                        kind: "function".to_string(),
                        function: ApiFunctionCall {
                            name: "weather".to_string(),
                            arguments: "{}".to_string(),
                        },
                        index: None,
                    }],
                    ..ApiMessage::default()
                }),
                finish_reason: Some("tool_calls".to_string()),
            }]))),
            "hunyuan-pro",
        );

        assert_eq!(result.generations[0].index, 0);
        assert_eq!(
            result.generations[0].tool_calls,
            vec![ToolCall::new("call-1", "weather", "{}")]
        );
    }

    #[test]
    fn chunk_without_delta_is_an_empty_assistant_message() {
        let completion = chunk_to_completion(ChatCompletionChunk {
            id: Some("resp-2".to_string()),
            choices: Some(vec![ChunkChoice {
                index: Some(0),
                delta: None,
                finish_reason: Some("stop".to_string()),
            }]),
            ..ChatCompletionChunk::default()
        })
        .expect("chunk converts");

        let choice = &completion.choices.expect("choices")[0];
        let message = choice.message.as_ref().expect("message");
        assert_eq!(message.role, Some(ApiRole::Assistant));
        assert_eq!(message.content, "");
    }

    #[test]
    fn chunk_without_id_fails() {
        let error = chunk_to_completion(ChatCompletionChunk::default()).expect_err("id required");
        assert_eq!(error.kind, hprovider::ProviderErrorKind::MalformedResponse);
    }

    #[test]
    fn role_cache_is_seeded_by_the_first_fragment_with_a_role() {
        let mut state = ExchangeState::new("hunyuan-pro");

        let first = state.normalize(chunk("resp-1", None, "", "")).expect("first");
        assert_eq!(first.generations[0].metadata_value(METADATA_ROLE), "");

        let second = state
            .normalize(chunk("resp-1", Some(ApiRole::Assistant), "Hi", ""))
            .expect("second");
        assert_eq!(second.generations[0].metadata_value(METADATA_ROLE), "assistant");

        let third = state
            .normalize(chunk("resp-1", Some(ApiRole::User), " there", "stop"))
            .expect("third");
        assert_eq!(third.generations[0].metadata_value(METADATA_ROLE), "assistant");
    }

    #[test]
    fn role_cache_is_keyed_by_response_id() {
        let state = ExchangeState::new("hunyuan-pro");
        assert_eq!(state.role_for("a", Some(Role::Assistant)), Some(Role::Assistant));
        assert_eq!(state.role_for("b", None), None);
        assert_eq!(state.role_for("a", None), Some(Role::Assistant));
    }

    #[test]
    fn fragments_have_empty_usage_and_feed_the_aggregate() {
        let mut state = ExchangeState::new("hunyuan-pro");
        let mut with_usage = chunk("resp-1", Some(ApiRole::Assistant), "Hel", "");
        with_usage.usage = Some(ApiUsage {
            prompt_tokens: 1,
            completion_tokens: 1,
            total_tokens: 2,
        });

        let fragment = state.normalize(with_usage).expect("fragment");
        state
            .normalize(chunk("resp-1", None, "lo", "stop"))
            .expect("fragment");

        assert!(fragment.metadata.usage.is_empty());
        assert_eq!(state.aggregated().text(), "Hello");
        assert_eq!(state.aggregated().metadata.usage.total_tokens, 2);
        assert!(!state.requests_tools());
    }
}
