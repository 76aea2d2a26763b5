//! Tool-call detection and continuation building.

use std::sync::Arc;

use hcommon::ChatOptions;
use hprovider::{Message, ToolCall};
use htooling::{ToolExecutionContext, ToolRuntime};

use crate::{ChatError, ChatResult, Conversation, Generation};

/// Whether a choice that carries `tool_calls` and finished with
/// `finish_reason` asks the client to run tools.
pub fn requests_tools(tool_calls: &[ToolCall], finish_reason: &str) -> bool {
    !tool_calls.is_empty()
        && (finish_reason.eq_ignore_ascii_case("tool_calls")
            || finish_reason.eq_ignore_ascii_case("stop"))
}

/// True when `result` should be answered by executing tools rather than
/// returned to the caller. Proxy mode always hands tool calls back.
pub fn is_tool_call(result: &ChatResult, options: &ChatOptions) -> bool {
    !options.is_proxy_tool_calls() && tool_call_generation(result).is_some()
}

fn tool_call_generation(result: &ChatResult) -> Option<&Generation> {
    result
        .generations
        .iter()
        .find(|generation| requests_tools(&generation.tool_calls, &generation.finish_reason))
}

/// Executes the tool calls of a completed choice and extends the conversation
/// with the assistant turn and one tool turn per call.
#[derive(Clone)]
pub struct ToolCallResolver {
    runtime: Arc<dyn ToolRuntime>,
}

impl ToolCallResolver {
    pub fn new(runtime: Arc<dyn ToolRuntime>) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> Arc<dyn ToolRuntime> {
        Arc::clone(&self.runtime)
    }

    pub async fn resolve(
        &self,
        conversation: &Conversation,
        result: &ChatResult,
        round: u32,
    ) -> Result<Conversation, ChatError> {
        let generation = tool_call_generation(result)
            .ok_or_else(|| ChatError::tooling("result does not request any tool calls"))?;

        if let Some(call) = generation
            .tool_calls
            .iter()
            .find(|call| call.id.trim().is_empty())
        {
            return Err(ChatError::tooling(format!(
                "tool call for '{}' is missing an id",
                call.name
            )));
        }

        let response_id = if result.metadata.id.is_empty() {
            generation.response_id().to_string()
        } else {
            result.metadata.id.clone()
        };

        let mut turns = Vec::with_capacity(generation.tool_calls.len() + 1);
        turns.push(Message::assistant_with_tool_calls(
            generation.text.clone(),
            generation.tool_calls.clone(),
        ));

        for call in &generation.tool_calls {
            tracing::debug!(
                tool = %call.name,
                call_id = %call.id,
                round,
                "executing tool call"
            );
            let context = ToolExecutionContext::new(response_id.clone(), round);
            let executed = self.runtime.execute(call.clone(), context).await?;
            turns.push(executed.into_message());
        }

        Ok(conversation.extend_with(turns))
    }
}

impl std::fmt::Debug for ToolCallResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCallResolver").finish_non_exhaustive()
    }
}
