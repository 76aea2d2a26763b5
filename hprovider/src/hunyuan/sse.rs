//! Line-oriented server-sent-events decoding for streamed completions.

use crate::ProviderError;

use super::types::ChatCompletionChunk;

#[derive(Debug, Clone, PartialEq)]
pub enum SseFrame {
    Chunk(Result<ChatCompletionChunk, ProviderError>),
    Done,
}

/// Buffers raw body bytes and emits one frame per complete `data:` line.
///
/// Bytes are split on `\n` before UTF-8 decoding, so a multi-byte character
/// split across network reads is reassembled intact.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(bytes);

        let mut frames = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line = self.buffer.drain(..=newline).collect::<Vec<_>>();
            if let Some(frame) = decode_line(&line) {
                frames.push(frame);
            }
        }

        frames
    }

    /// Decodes a trailing line the server closed without a newline.
    pub fn finish(&mut self) -> Option<SseFrame> {
        let line = std::mem::take(&mut self.buffer);
        decode_line(&line)
    }
}

fn decode_line(line: &[u8]) -> Option<SseFrame> {
    let line = match std::str::from_utf8(line) {
        Ok(line) => line.trim(),
        Err(err) => {
            return Some(SseFrame::Chunk(Err(ProviderError::malformed_response(
                format!("stream line is not valid UTF-8: {err}"),
            ))));
        }
    };

    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() {
        return None;
    }

    if payload == "[DONE]" {
        return Some(SseFrame::Done);
    }

    let frame = match serde_json::from_str::<ChatCompletionChunk>(payload) {
        Ok(ChatCompletionChunk {
            error: Some(error), ..
        }) if !error.code.is_empty() => {
            Err(ProviderError::from_service_code(&error.code, error.message))
        }
        Ok(chunk) => Ok(chunk),
        Err(err) => Err(ProviderError::malformed_response(format!(
            "failed to decode stream chunk: {err}"
        ))),
    };

    Some(SseFrame::Chunk(frame))
}
