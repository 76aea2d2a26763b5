//! Reduction of incremental chat results into one final result.
//!
//! [`MessageAggregator`] forwards every item of a result stream as soon as it
//! arrives and hands the reduced result to a callback once the stream ends.
//!
//! ```rust
//! use hchat::{ChatResult, Generation, StreamAggregator};
//!
//! let mut aggregator = StreamAggregator::new();
//! for text in ["Hel", "lo"] {
//!     aggregator.absorb(&ChatResult {
//!         generations: vec![Generation { text: text.to_string(), ..Generation::default() }],
//!         ..ChatResult::default()
//!     });
//! }
//!
//! assert_eq!(aggregator.finish().text(), "Hello");
//! ```

use std::collections::BTreeMap;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_util::StreamExt;
use hcommon::MetadataMap;
use hprovider::{TokenUsage, ToolCall};

use crate::tool_calls::requests_tools;
use crate::{
    ChatError, ChatResult, ChatResultMetadata, ChatResultStream, Generation, METADATA_FINISH_REASON,
    METADATA_ID, METADATA_ROLE,
};

#[derive(Debug, Clone, Default)]
struct GenerationState {
    text: String,
    tool_calls: Vec<ToolCall>,
    finish_reason: String,
    metadata: MetadataMap,
}

impl GenerationState {
    fn absorb(&mut self, generation: &Generation) {
        self.text.push_str(&generation.text);

        for call in &generation.tool_calls {
            merge_tool_call(&mut self.tool_calls, call);
        }

        if !generation.finish_reason.is_empty() {
            self.finish_reason = generation.finish_reason.clone();
        }

        for (key, value) in &generation.metadata {
            let keep_first = key == METADATA_ID || key == METADATA_ROLE;
            let current = self.metadata.entry(key.clone()).or_default();
            if current.is_empty() || (!keep_first && !value.is_empty()) {
                *current = value.clone();
            }
        }
    }

    fn to_generation(&self, index: u32) -> Generation {
        let mut metadata = self.metadata.clone();
        for key in [METADATA_ID, METADATA_ROLE] {
            metadata.entry(key.to_string()).or_default();
        }
        metadata.insert(
            METADATA_FINISH_REASON.to_string(),
            self.finish_reason.clone(),
        );

        Generation {
            index,
            text: self.text.clone(),
            tool_calls: self.tool_calls.clone(),
            finish_reason: self.finish_reason.clone(),
            metadata,
        }
    }
}

/// Fragments of one call share an id; an id-less fragment continues the
/// latest call. Names are replaced when non-empty and arguments are appended.
fn merge_tool_call(calls: &mut Vec<ToolCall>, fragment: &ToolCall) {
    let existing = if fragment.id.is_empty() {
        calls.last_mut()
    } else {
        calls.iter_mut().find(|call| call.id == fragment.id)
    };

    match existing {
        Some(call) => {
            if !fragment.name.is_empty() {
                call.name = fragment.name.clone();
            }
            call.arguments.push_str(&fragment.arguments);
        }
        None => calls.push(fragment.clone()),
    }
}

/// Folds chat results in arrival order.
///
/// Text and tool calls are concatenated per generation index. The first
/// non-empty id, role, model and creation time win; finish reason and usage
/// take the last non-empty value.
///
/// A result carrying a different non-empty response id starts over: it
/// belongs to the follow-up request of a resolved tool round, and the final
/// answer is the reduction of that last response alone.
#[derive(Debug, Clone, Default)]
pub struct StreamAggregator {
    id: String,
    model: String,
    created: Option<i64>,
    usage: TokenUsage,
    generations: BTreeMap<u32, GenerationState>,
    absorbed: usize,
}

impl StreamAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn absorb(&mut self, result: &ChatResult) {
        self.absorbed += 1;

        if !self.id.is_empty() && !result.metadata.id.is_empty() && result.metadata.id != self.id {
            *self = Self {
                absorbed: self.absorbed,
                ..Self::default()
            };
        }

        if self.id.is_empty() {
            self.id = result.metadata.id.clone();
        }
        if self.model.is_empty() {
            self.model = result.metadata.model.clone();
        }
        if self.created.is_none() {
            self.created = result.metadata.created;
        }
        if !result.metadata.usage.is_empty() {
            self.usage = result.metadata.usage;
        }

        for generation in &result.generations {
            self.generations
                .entry(generation.index)
                .or_default()
                .absorb(generation);
        }
    }

    /// Number of results absorbed so far, including empty ones.
    pub fn absorbed(&self) -> usize {
        self.absorbed
    }

    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Whether any accumulated generation has finished with a tool request.
    pub fn requests_tools(&self) -> bool {
        self.generations
            .values()
            .any(|state| requests_tools(&state.tool_calls, &state.finish_reason))
    }

    /// The reduced result so far, leaving the aggregator usable.
    pub fn snapshot(&self) -> ChatResult {
        ChatResult {
            generations: self
                .generations
                .iter()
                .map(|(index, state)| state.to_generation(*index))
                .collect(),
            metadata: ChatResultMetadata {
                id: self.id.clone(),
                model: self.model.clone(),
                usage: self.usage,
                created: self.created,
            },
        }
    }

    pub fn finish(self) -> ChatResult {
        self.snapshot()
    }
}

type CompletionCallback<'a> = Box<dyn FnOnce(ChatResult) + Send + 'a>;

/// Pass-through stream adapter that reduces what it forwards.
///
/// Items are yielded unchanged and without delay. When the inner stream ends
/// without an error, `on_complete` receives the reduced result exactly once.
pub struct MessageAggregator<'a> {
    inner: ChatResultStream<'a>,
    aggregator: StreamAggregator,
    on_complete: Option<CompletionCallback<'a>>,
    failed: bool,
}

impl<'a> MessageAggregator<'a> {
    pub fn new<F>(inner: ChatResultStream<'a>, on_complete: F) -> Self
    where
        F: FnOnce(ChatResult) + Send + 'a,
    {
        Self {
            inner,
            aggregator: StreamAggregator::new(),
            on_complete: Some(Box::new(on_complete)),
            failed: false,
        }
    }
}

impl Stream for MessageAggregator<'_> {
    type Item = Result<ChatResult, ChatError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        match this.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(item)) => {
                match &item {
                    Ok(result) => this.aggregator.absorb(result),
                    Err(_) => this.failed = true,
                }
                Poll::Ready(Some(item))
            }
            Poll::Ready(None) => {
                if let Some(on_complete) = this.on_complete.take()
                    && !this.failed
                {
                    on_complete(std::mem::take(&mut this.aggregator).finish());
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Drains `stream` and returns the reduced result, or the first error.
pub async fn collect_final(mut stream: ChatResultStream<'_>) -> Result<ChatResult, ChatError> {
    let mut aggregator = StreamAggregator::new();

    while let Some(item) = stream.next().await {
        aggregator.absorb(&item?);
    }

    Ok(aggregator.finish())
}
