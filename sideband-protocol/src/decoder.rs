//! Trap-word decoder for incoming commands.
//!
//! The bus capture layer hands the decoder one 16-bit word per trapped
//! access. The decoder validates the trailing checksum and assembles a
//! [`CommandRecord`]; it runs in interrupt context, so it never allocates
//! and never blocks.

use crate::record::{CommandRecord, MAX_PAYLOAD_SIZE};
use heapless::Vec;

/// Word that opens every command sequence
pub const PROTOCOL_HEADER: u16 = 0xABCD;

/// Summary of a command that failed checksum validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecordSummary {
    /// Command discriminator as received
    pub command_id: u16,
    /// Declared payload length in bytes
    pub payload_size: u16,
    /// Checksum word the host sent
    pub received: u16,
    /// Checksum this side computed
    pub computed: u16,
}

/// Errors that can occur while decoding a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Trailing checksum did not match the running sum
    Checksum(RecordSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Waiting for the header word
    AwaitingHeader,
    /// Got the header, waiting for the command id
    AwaitingCommandId,
    /// Got the id, waiting for the payload size
    AwaitingSize,
    /// Reading payload words
    ReadingPayload,
    /// Waiting for the checksum word
    AwaitingChecksum,
}

/// State machine assembling commands from trapped bus words.
///
/// A declared payload size larger than [`MAX_PAYLOAD_SIZE`] is not an
/// error: the stream is consumed in full, the extra bytes are discarded,
/// and the oversized declared size rides along in the record for the
/// channel to clamp. The host is never trusted on sizing.
#[derive(Debug, Clone)]
pub struct TrapDecoder {
    state: DecodeState,
    command_id: u16,
    declared_size: u16,
    words_remaining: u16,
    bytes_read: u16,
    checksum: u16,
    payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Default for TrapDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrapDecoder {
    /// Create a new decoder
    pub const fn new() -> Self {
        Self {
            state: DecodeState::AwaitingHeader,
            command_id: 0,
            declared_size: 0,
            words_remaining: 0,
            bytes_read: 0,
            checksum: 0,
            payload: Vec::new(),
        }
    }

    /// Reset the decoder state
    pub fn reset(&mut self) {
        self.state = DecodeState::AwaitingHeader;
        self.command_id = 0;
        self.declared_size = 0;
        self.words_remaining = 0;
        self.bytes_read = 0;
        self.checksum = 0;
        self.payload.clear();
    }

    /// Feed a single trap word to the decoder.
    ///
    /// Returns `Ok(Some(record))` when a complete valid command is
    /// assembled, `Ok(None)` when more words are needed, or `Err` with a
    /// summary on checksum mismatch. Either terminal outcome resets the
    /// machine for the next command.
    pub fn feed(&mut self, word: u16) -> Result<Option<CommandRecord>, DecodeError> {
        match self.state {
            DecodeState::AwaitingHeader => {
                if word == PROTOCOL_HEADER {
                    self.state = DecodeState::AwaitingCommandId;
                }
                // Non-header traffic between commands is ignored
                Ok(None)
            }
            DecodeState::AwaitingCommandId => {
                self.command_id = word;
                self.checksum = word;
                self.state = DecodeState::AwaitingSize;
                Ok(None)
            }
            DecodeState::AwaitingSize => {
                self.declared_size = word;
                self.checksum = self.checksum.wrapping_add(word);
                self.words_remaining = word.div_ceil(2);
                self.payload.clear();
                if self.words_remaining == 0 {
                    self.state = DecodeState::AwaitingChecksum;
                } else {
                    self.state = DecodeState::ReadingPayload;
                }
                Ok(None)
            }
            DecodeState::ReadingPayload => {
                self.checksum = self.checksum.wrapping_add(word);
                self.bytes_read = self.bytes_read.saturating_add(2);
                // Low byte first within each word; storage stops at the
                // declared size or the buffer capacity, whichever is hit
                // first, while the wire stream keeps getting consumed.
                self.store_payload_byte(word as u8);
                self.store_payload_byte((word >> 8) as u8);
                self.words_remaining -= 1;
                if self.words_remaining == 0 {
                    self.state = DecodeState::AwaitingChecksum;
                }
                Ok(None)
            }
            DecodeState::AwaitingChecksum => {
                if word != self.checksum {
                    let summary = RecordSummary {
                        command_id: self.command_id,
                        payload_size: self.declared_size,
                        received: word,
                        computed: self.checksum,
                    };
                    self.reset();
                    return Err(DecodeError::Checksum(summary));
                }

                let record = CommandRecord {
                    command_id: self.command_id,
                    payload_size: self.declared_size,
                    bytes_read: self.bytes_read,
                    final_checksum: word,
                    payload: self.payload.clone(),
                };

                self.reset();
                Ok(Some(record))
            }
        }
    }

    /// Feed multiple trap words to the decoder.
    ///
    /// Returns the first complete record found, if any. Remaining words
    /// after a complete record are not consumed.
    pub fn feed_words(&mut self, words: &[u16]) -> Result<Option<CommandRecord>, DecodeError> {
        for &word in words {
            if let Some(record) = self.feed(word)? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    fn store_payload_byte(&mut self, byte: u8) {
        if self.payload.len() < self.declared_size as usize {
            let _ = self.payload.push(byte);
        }
    }
}
