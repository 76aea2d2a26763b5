//! reqwest-based implementation of [`ChatCompletionApi`].

use async_stream::stream;
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};

use crate::{ChatCompletionApi, ChunkStream, ProviderError, ProviderFuture};

use super::signer::Tc3Signer;
use super::sse::{SseDecoder, SseFrame};
use super::types::{ApiError, ChatCompletionRequest, ChatCompletionResponse};
use super::DEFAULT_BASE_URL;

#[derive(Debug, Clone)]
pub struct HunyuanHttpApi {
    client: Client,
    base_url: String,
    signer: Tc3Signer,
}

impl HunyuanHttpApi {
    pub fn new(client: Client, signer: Tc3Signer) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            signer,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, request: &ChatCompletionRequest) -> Result<Response, ProviderError> {
        let body = serde_json::to_vec(request).map_err(|err| {
            ProviderError::invalid_request(format!("failed to serialize request: {err}"))
        })?;
        let signed = self.signer.sign(&body)?;

        // Host is sent as signed; the URL authority may differ behind a proxy.
        let mut builder = self.client.post(&self.base_url).body(body);
        for (name, value) in signed.iter() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                ProviderError::timeout(err.to_string())
            } else {
                ProviderError::transport(err.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(Self::parse_error(response).await);
        }

        Ok(response)
    }

    async fn parse_error(response: Response) -> ProviderError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let service_error = envelope_error(&body);
        let message = service_error
            .as_ref()
            .map(|error| error.message.clone())
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| format!("Hunyuan request failed with status {status}"));

        let error = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ProviderError::authentication(message)
            }
            StatusCode::TOO_MANY_REQUESTS => ProviderError::rate_limited(message),
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                ProviderError::timeout(message)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ProviderError::invalid_request(message)
            }
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::BAD_GATEWAY => {
                ProviderError::unavailable(message)
            }
            _ => ProviderError::transport(message),
        };

        match service_error.filter(|error| !error.code.is_empty()) {
            Some(service_error) => error.with_code(service_error.code),
            None => error,
        }
    }
}

fn envelope_error(body: &str) -> Option<ApiError> {
    serde_json::from_str::<ChatCompletionResponse>(body)
        .ok()?
        .response?
        .error
}

fn is_event_stream(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/event-stream"))
}

impl ChatCompletionApi for HunyuanHttpApi {
    fn chat_completion<'a>(
        &'a self,
        request: &'a ChatCompletionRequest,
    ) -> ProviderFuture<'a, Result<ChatCompletionResponse, ProviderError>> {
        Box::pin(async move {
            let response = self.post(request).await?;
            let body = response
                .text()
                .await
                .map_err(|err| ProviderError::transport(err.to_string()))?;

            let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|err| {
                ProviderError::malformed_response(format!("failed to decode response: {err}"))
            })?;

            if let Some(error) = parsed
                .response
                .as_ref()
                .and_then(|completion| completion.error.as_ref())
            {
                return Err(ProviderError::from_service_code(
                    &error.code,
                    error.message.clone(),
                ));
            }

            Ok(parsed)
        })
    }

    fn chat_completion_stream<'a>(
        &'a self,
        request: &'a ChatCompletionRequest,
    ) -> ProviderFuture<'a, Result<ChunkStream<'a>, ProviderError>> {
        Box::pin(async move {
            let streaming;
            let request = if request.stream {
                request
            } else {
                streaming = ChatCompletionRequest {
                    stream: true,
                    ..request.clone()
                };
                &streaming
            };

            let response = self.post(request).await?;

            // Tencent Cloud answers a rejected stream request with a plain JSON envelope.
            if !is_event_stream(&response) {
                let body = response.text().await.unwrap_or_default();
                return Err(match envelope_error(&body) {
                    Some(error) => ProviderError::from_service_code(&error.code, error.message),
                    None => ProviderError::malformed_response(
                        "expected an event stream for a streaming request",
                    ),
                });
            }

            let stream = stream! {
                let mut body = response.bytes_stream();
                let mut decoder = SseDecoder::new();
                let mut finished = false;

                while let Some(item) = body.next().await {
                    let bytes = match item {
                        Ok(bytes) => bytes,
                        Err(err) => {
                            yield Err(ProviderError::transport(err.to_string()));
                            finished = true;
                            break;
                        }
                    };

                    for frame in decoder.push(&bytes) {
                        match frame {
                            SseFrame::Chunk(chunk) => yield chunk,
                            SseFrame::Done => {
                                finished = true;
                                break;
                            }
                        }
                    }

                    if finished {
                        break;
                    }
                }

                if !finished && let Some(SseFrame::Chunk(chunk)) = decoder.finish() {
                    yield chunk;
                }

                tracing::debug!("hunyuan event stream closed");
            };

            Ok(Box::pin(stream) as ChunkStream<'a>)
        })
    }
}
