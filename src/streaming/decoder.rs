// ABOUTME: Stateful UTF-8 decoder for progressively delivered response bodies
// Holds back incomplete multi-byte sequences until the next chunk completes them

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid UTF-8 sequence at byte offset {offset}")]
    InvalidSequence {
        offset: usize,
        /// Text decoded from the failing chunk before the bad sequence
        valid_prefix: String,
    },

    #[error("stream ended inside a multi-byte character ({pending} dangling bytes at offset {offset})")]
    Truncated { offset: usize, pending: usize },
}

/// Incremental UTF-8 decoder.
///
/// Bytes that form the start of a character split across two chunks are
/// carried over to the next call, so decoding a byte sequence in any number
/// of pieces yields the same text as decoding it at once.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
    /// Bytes already emitted as text, used for error offsets
    emitted: usize,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk, returning the text it completes.
    ///
    /// The returned string may be empty when the chunk only contains the
    /// leading bytes of a character.
    pub fn decode(&mut self, chunk: &[u8]) -> Result<String, DecodeError> {
        self.pending.extend_from_slice(chunk);

        match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let text = text.to_owned();
                self.emitted += self.pending.len();
                self.pending.clear();
                Ok(text)
            }
            Err(e) => {
                let valid = e.valid_up_to();
                let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();

                if e.error_len().is_some() {
                    let offset = self.emitted + valid;
                    self.emitted += valid;
                    self.pending.clear();
                    return Err(DecodeError::InvalidSequence {
                        offset,
                        valid_prefix: text,
                    });
                }

                // Incomplete tail: keep it for the next chunk
                self.pending.drain(..valid);
                self.emitted += valid;
                Ok(text)
            }
        }
    }

    /// Number of bytes held back waiting for the rest of a character
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Signal end-of-stream. Fails if a character was left unfinished.
    pub fn finish(&mut self) -> Result<(), DecodeError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let err = DecodeError::Truncated {
            offset: self.emitted,
            pending: self.pending.len(),
        };
        self.pending.clear();
        Err(err)
    }
}
