//! Flash settings storage abstraction
//!
//! The console keeps its settings in a small key-value partition at the
//! end of flash. This module defines the key space, the error type, and
//! the async trait the settings store drives. Chip crates implement the
//! trait over their flash peripheral.

/// Largest value an implementation hands back from one read
///
/// Sized for the settings table blob with headroom. Implementations
/// dimension their working buffers from this; callers must not store
/// anything bigger.
pub const MAX_VALUE_SIZE: usize = 2048;

/// Key space of the settings partition
///
/// One discriminant byte per entry class. The settings table is the
/// only persisted value today; the byte leaves room for more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Complete console settings table, one postcard blob
    Settings = 0,
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Low-level flash erase or program failure
    Flash,
    /// Key-value layer failure
    Storage,
    /// Key not present in the partition
    NotFound,
    /// Caller buffer too small for the stored value
    BufferTooSmall,
    /// Partition contents failed validation
    Corrupted,
    /// No free space left in the partition
    Full,
}

/// Async key-value storage over a flash partition
///
/// Implementations wear-level across the partition's sectors and
/// validate what they read back, so a torn write surfaces as
/// [`FlashError::Corrupted`] rather than as garbage data.
pub trait FlashStorage {
    /// Read the value under `key` into `buffer`, returning its length
    fn read(
        &mut self,
        key: StorageKey,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, FlashError>>;

    /// Store `data` under `key`, replacing any previous value
    fn write(
        &mut self,
        key: StorageKey,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;

    /// Erase the whole partition, dropping every key
    fn erase_all(&mut self) -> impl core::future::Future<Output = Result<(), FlashError>>;
}

// sequential-storage identifies items by serialized keys; ours is the
// discriminant byte.
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = *self as u8;
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        match buffer.first() {
            Some(0) => Ok((StorageKey::Settings, 1)),
            Some(_) => Err(sequential_storage::map::SerializationError::InvalidFormat),
            None => Err(sequential_storage::map::SerializationError::BufferTooSmall),
        }
    }
}
