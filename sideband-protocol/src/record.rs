//! The Command Record - the unit of data the decoder produces and the
//! command channel carries.

use heapless::Vec;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = 64;

/// Maximum wire length of one command in trap words
/// (HEADER + COMMAND ID + PAYLOAD SIZE + payload words + CHECKSUM)
pub const MAX_RECORD_WORDS: usize = 4 + MAX_PAYLOAD_SIZE / 2;

/// Errors from record construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
}

/// A decoded command as delivered through the command channel.
///
/// `payload_size` is the size the host declared; it is not trusted and the
/// channel clamps it to [`MAX_PAYLOAD_SIZE`] when the record is copied into
/// a slot. `bytes_read` and `final_checksum` are bookkeeping filled in by
/// the decoder and carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandRecord {
    /// Command discriminator
    pub command_id: u16,
    /// Declared payload length in bytes
    pub payload_size: u16,
    /// Payload bytes consumed from the wire (2 per payload word)
    pub bytes_read: u16,
    /// Checksum word received at the end of the command
    pub final_checksum: u16,
    /// Payload bytes; only the clamped `payload_size` bytes are meaningful
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl CommandRecord {
    /// Create an all-zero record. `const` so channel slots can live in statics.
    pub const fn empty() -> Self {
        Self {
            command_id: 0,
            payload_size: 0,
            bytes_read: 0,
            final_checksum: 0,
            payload: Vec::new(),
        }
    }

    /// Create a record with the given command id and payload bytes.
    ///
    /// Bookkeeping fields start at zero; the decoder fills them when a
    /// record arrives over the wire.
    pub fn new(command_id: u16, payload: &[u8]) -> Result<Self, RecordError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(RecordError::PayloadTooLarge);
        }

        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| RecordError::PayloadTooLarge)?;

        Ok(Self {
            command_id,
            payload_size: payload.len() as u16,
            bytes_read: 0,
            final_checksum: 0,
            payload: payload_vec,
        })
    }

    /// Encode this record as the trap-word sequence a host would send.
    ///
    /// Odd-length payloads get a zero pad byte in the last word. The
    /// checksum is computed here, not taken from `final_checksum`.
    pub fn to_words(&self) -> Vec<u16, MAX_RECORD_WORDS> {
        let mut words = Vec::new();
        // Capacity covers the worst case, these cannot fail.
        let _ = words.push(crate::decoder::PROTOCOL_HEADER);
        let _ = words.push(self.command_id);
        let _ = words.push(self.payload.len() as u16);

        let mut checksum = self
            .command_id
            .wrapping_add(self.payload.len() as u16);
        for pair in self.payload.chunks(2) {
            let low = pair[0] as u16;
            let high = if pair.len() == 2 { pair[1] as u16 } else { 0 };
            let word = (high << 8) | low;
            checksum = checksum.wrapping_add(word);
            let _ = words.push(word);
        }
        let _ = words.push(checksum);
        words
    }
}

impl Default for CommandRecord {
    fn default() -> Self {
        Self::empty()
    }
}
