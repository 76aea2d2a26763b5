//! Chat orchestration for one-shot and streaming calls with tool loops.

use std::sync::Arc;

use futures_timer::Delay;
use futures_util::StreamExt;
use hcommon::ChatOptions;
use hprovider::hunyuan::{ChatCompletionRequest, ChatCompletionResponse, DEFAULT_MODEL};
use hprovider::{
    ChatCompletionApi, ChunkStream, NoopOperationHooks, ProviderErrorKind, ProviderOperationHooks,
    RetryPolicy, execute_with_retry,
};
use htooling::{NoopToolRuntime, ToolRuntime};
use tracing::Instrument;

use crate::aggregate::{MessageAggregator, collect_final};
use crate::normalize::{ExchangeState, to_chat_result};
use crate::tool_calls::is_tool_call;
use crate::{
    ChatError, ChatRequestBuilder, ChatResult, ChatResultStream, Conversation, ToolCallResolver,
};

pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 10;

const CHAT_COMPLETION: &str = "chat_completion";
const CHAT_COMPLETION_STREAM: &str = "chat_completion_stream";

/// Chat client over a [`ChatCompletionApi`].
///
/// Both entry points run the same loop: build a request, send it through the
/// retry policy, normalize the reply, and when the model asks for tools,
/// execute them and send the extended conversation again.
#[derive(Clone)]
pub struct ChatModel {
    api: Arc<dyn ChatCompletionApi>,
    requests: ChatRequestBuilder,
    resolver: ToolCallResolver,
    retry_policy: RetryPolicy,
    hooks: Arc<dyn ProviderOperationHooks>,
    max_tool_rounds: u32,
}

impl ChatModel {
    pub fn builder(api: Arc<dyn ChatCompletionApi>) -> ChatModelBuilder {
        ChatModelBuilder::new(api)
    }

    pub fn default_options(&self) -> &ChatOptions {
        self.requests.default_options()
    }

    pub fn max_tool_rounds(&self) -> u32 {
        self.max_tool_rounds
    }

    /// Runs a blocking exchange, resolving tool calls until the model answers.
    pub async fn call(&self, conversation: Conversation) -> Result<ChatResult, ChatError> {
        let mut conversation = conversation;
        let mut round = 0_u32;

        loop {
            let options = self.requests.merge_options(&conversation.options);
            let request = self.requests.build(&conversation, false)?;
            let span = tracing::info_span!("chat_completion", model = %request.model, round);

            let response = self.send(&request).instrument(span).await?;
            let result = to_chat_result(response.response, &request.model);

            if !is_tool_call(&result, &options) {
                return Ok(result);
            }

            conversation = self.next_round(&conversation, &result, round).await?;
            round += 1;
        }
    }

    /// Lazily streams incremental results.
    ///
    /// Nothing is sent until the stream is polled, and dropping it cancels the
    /// exchange. A fragment that completes a tool request is not yielded; the
    /// fragments of the follow-up request continue the same stream. Fragments
    /// that fail to decode or normalize are yielded as empty results.
    pub fn stream(&self, conversation: Conversation) -> ChatResultStream<'_> {
        let stream = async_stream::try_stream! {
            let mut conversation = conversation;
            let mut round = 0_u32;

            loop {
                let options = self.requests.merge_options(&conversation.options);
                let request = self.requests.build(&conversation, true)?;
                let span =
                    tracing::info_span!("chat_completion_stream", model = %request.model, round);

                let mut chunks = self.open_stream(&request).instrument(span).await?;
                let mut exchange = ExchangeState::new(request.model.clone());
                let mut pending = None;

                while let Some(item) = chunks.next().await {
                    let result = match item {
                        Ok(chunk) => exchange.normalize(chunk).unwrap_or_else(|error| {
                            tracing::error!(error = %error, "failed to normalize stream fragment");
                            ChatResult::empty()
                        }),
                        Err(error) if error.kind == ProviderErrorKind::MalformedResponse => {
                            tracing::error!(error = %error, "failed to decode stream fragment");
                            ChatResult::empty()
                        }
                        Err(error) => Err(ChatError::from(error))?,
                    };

                    if !options.is_proxy_tool_calls() && exchange.requests_tools() {
                        pending = Some(exchange.aggregated());
                        break;
                    }

                    yield result;
                }

                drop(chunks);

                let Some(pending) = pending else {
                    break;
                };

                conversation = self.next_round(&conversation, &pending, round).await?;
                round += 1;
            }
        };

        Box::pin(stream) as ChatResultStream<'_>
    }

    /// Like [`ChatModel::stream`], handing the reduced result to `on_complete`
    /// once the stream ends.
    pub fn stream_aggregated<'a, F>(
        &'a self,
        conversation: Conversation,
        on_complete: F,
    ) -> ChatResultStream<'a>
    where
        F: FnOnce(ChatResult) + Send + 'a,
    {
        Box::pin(MessageAggregator::new(self.stream(conversation), on_complete))
    }

    /// Streams `conversation` and reduces every fragment into one result.
    pub async fn collect_final(&self, conversation: Conversation) -> Result<ChatResult, ChatError> {
        collect_final(self.stream(conversation)).await
    }

    async fn send(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ChatError> {
        let api = self.api.as_ref();
        execute_with_retry(
            CHAT_COMPLETION,
            &self.retry_policy,
            self.hooks.as_ref(),
            move |_attempt| api.chat_completion(request),
            Delay::new,
        )
        .await
        .map_err(ChatError::from)
    }

    async fn open_stream<'a>(
        &'a self,
        request: &'a ChatCompletionRequest,
    ) -> Result<ChunkStream<'a>, ChatError> {
        let api = self.api.as_ref();
        execute_with_retry(
            CHAT_COMPLETION_STREAM,
            &self.retry_policy,
            self.hooks.as_ref(),
            move |_attempt| api.chat_completion_stream(request),
            Delay::new,
        )
        .await
        .map_err(ChatError::from)
    }

    async fn next_round(
        &self,
        conversation: &Conversation,
        result: &ChatResult,
        round: u32,
    ) -> Result<Conversation, ChatError> {
        if round >= self.max_tool_rounds {
            tracing::warn!(
                max_tool_rounds = self.max_tool_rounds,
                "tool round limit reached"
            );
            return Err(ChatError::tool_round_limit(self.max_tool_rounds));
        }

        tracing::debug!(round, response_id = %result.metadata.id, "resolving tool calls");
        self.resolver.resolve(conversation, result, round).await
    }
}

impl std::fmt::Debug for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatModel")
            .field("requests", &self.requests)
            .field("retry_policy", &self.retry_policy)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .finish_non_exhaustive()
    }
}

pub struct ChatModelBuilder {
    api: Arc<dyn ChatCompletionApi>,
    default_options: ChatOptions,
    tool_runtime: Arc<dyn ToolRuntime>,
    retry_policy: RetryPolicy,
    hooks: Arc<dyn ProviderOperationHooks>,
    max_tool_rounds: u32,
}

impl ChatModelBuilder {
    pub fn new(api: Arc<dyn ChatCompletionApi>) -> Self {
        Self {
            api,
            default_options: ChatOptions::default().with_model(DEFAULT_MODEL),
            tool_runtime: Arc::new(NoopToolRuntime),
            retry_policy: RetryPolicy::default(),
            hooks: Arc::new(NoopOperationHooks),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    /// Replaces the client defaults. A model left unset here must be given per call.
    pub fn default_options(mut self, options: ChatOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn tool_runtime(mut self, tool_runtime: Arc<dyn ToolRuntime>) -> Self {
        self.tool_runtime = tool_runtime;
        self
    }

    pub fn retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn operation_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn max_tool_rounds(mut self, max_tool_rounds: u32) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    pub fn build(self) -> ChatModel {
        ChatModel {
            api: self.api,
            requests: ChatRequestBuilder::new(
                self.default_options,
                Arc::clone(&self.tool_runtime),
            ),
            resolver: ToolCallResolver::new(self.tool_runtime),
            retry_policy: self.retry_policy,
            hooks: self.hooks,
            max_tool_rounds: self.max_tool_rounds,
        }
    }
}
