use std::collections::VecDeque;
use std::pin::Pin;

use codeshift_core::StreamRecord;
use encoding_rs::{CoderResult, Decoder, Encoding, UTF_8};
use futures_util::stream::{self, Stream, StreamExt};
use shift_logging::{shift_debug, shift_warn};

use crate::{ByteStream, ResponseBody, TransportError};

/// Records in arrival order; a transport error is the last item.
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<StreamRecord, TransportError>> + Send>>;

/// Incremental newline-delimited JSON decoder for one response body.
///
/// Bytes are decoded as streaming text, so a multi-byte character split across
/// chunks is completed by the following chunk. Lines that fail to parse are
/// logged and dropped; they never end the stream.
pub struct NdjsonDecoder {
    text: Decoder,
    buffer: String,
    dropped: usize,
}

impl Default for NdjsonDecoder {
    fn default() -> Self {
        Self::with_encoding(UTF_8)
    }
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(encoding: &'static Encoding) -> Self {
        Self {
            text: encoding.new_decoder_with_bom_removal(),
            buffer: String::new(),
            dropped: 0,
        }
    }

    /// Content-Type charset, falling back to UTF-8.
    pub fn for_content_type(content_type: Option<&str>) -> Self {
        let encoding = content_type
            .and_then(extract_charset)
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        Self::with_encoding(encoding)
    }

    /// Number of complete lines that were not valid records.
    pub fn dropped_lines(&self) -> usize {
        self.dropped
    }

    /// Feeds one chunk and returns every record completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamRecord> {
        // Between pushes the buffer holds no newline; only new text is scanned.
        let scanned = self.buffer.len();
        self.decode_text(chunk, false);
        let Some(found) = self.buffer[scanned..].rfind('\n') else {
            return Vec::new();
        };
        let end = scanned + found;
        let tail = self.buffer.split_off(end + 1);
        let complete = std::mem::replace(&mut self.buffer, tail);
        complete
            .split('\n')
            .filter_map(|line| self.parse_line(line, false))
            .collect()
    }

    /// Flushes the decoder and gives the unterminated remainder one parse attempt.
    pub fn finish(mut self) -> Option<StreamRecord> {
        self.decode_text(&[], true);
        let rest = std::mem::take(&mut self.buffer);
        self.parse_line(&rest, true)
    }

    fn decode_text(&mut self, bytes: &[u8], last: bool) {
        let mut src = bytes;
        loop {
            let needed = self
                .text
                .max_utf8_buffer_length(src.len())
                .unwrap_or(src.len().saturating_mul(3).saturating_add(16));
            self.buffer.reserve(needed);
            let (result, read, had_errors) = self.text.decode_to_string(src, &mut self.buffer, last);
            if had_errors {
                shift_warn!(
                    "stream contained malformed {} byte sequences",
                    self.text.encoding().name()
                );
            }
            src = &src[read..];
            match result {
                CoderResult::InputEmpty => break,
                CoderResult::OutputFull => continue,
            }
        }
    }

    fn parse_line(&mut self, line: &str, final_attempt: bool) -> Option<StreamRecord> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match serde_json::from_str::<StreamRecord>(line) {
            Ok(record) => Some(record),
            Err(err) => {
                self.dropped += 1;
                if final_attempt {
                    shift_debug!("ignoring unterminated stream tail ({} bytes): {}", line.len(), err);
                } else {
                    shift_warn!("dropping malformed stream line ({} bytes): {}", line.len(), err);
                }
                None
            }
        }
    }
}

struct DecodeState {
    chunks: ByteStream,
    decoder: Option<NdjsonDecoder>,
    ready: VecDeque<StreamRecord>,
}

/// Lazily decodes a response body into records. The stream ends when the body
/// ends; it cannot be restarted.
pub fn decode_records(body: ResponseBody) -> RecordStream {
    let state = DecodeState {
        decoder: Some(NdjsonDecoder::for_content_type(body.content_type.as_deref())),
        chunks: body.chunks,
        ready: VecDeque::new(),
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        loop {
            if let Some(record) = state.ready.pop_front() {
                return Some((Ok(record), state));
            }
            if state.decoder.is_none() {
                return None;
            }
            match state.chunks.next().await {
                Some(Ok(chunk)) => {
                    if let Some(decoder) = state.decoder.as_mut() {
                        state.ready.extend(decoder.push(&chunk));
                    }
                }
                Some(Err(err)) => {
                    state.decoder = None;
                    return Some((Err(err), state));
                }
                None => {
                    if let Some(decoder) = state.decoder.take() {
                        let dropped = decoder.dropped_lines();
                        state.ready.extend(decoder.finish());
                        if dropped > 0 {
                            shift_warn!("stream ended with {} malformed line(s) dropped", dropped);
                        }
                    }
                }
            }
        }
    }))
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let (key, value) = part.trim().split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim_matches([' ', '"', '\''].as_ref()).to_string())
        })
        .next()
}
