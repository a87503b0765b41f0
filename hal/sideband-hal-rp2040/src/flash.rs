//! Flash settings partition driver
//!
//! Implements `sideband_hal::FlashStorage` over the RP2040's QSPI flash
//! through sequential-storage, which wear-levels the key-value data
//! across the partition's sixteen 4KB sectors.
//!
//! The partition occupies the last 64KB of the 2MB part, far above the
//! firmware image.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map;
use sequential_storage::Error as KvError;

pub use sideband_hal::flash::{FlashError, StorageKey, MAX_VALUE_SIZE};

/// Total flash fitted on the cartridge board
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Size of the settings partition at the end of flash
pub const SETTINGS_PARTITION_SIZE: usize = 64 * 1024;

/// Flash range backing the settings partition
pub const SETTINGS_RANGE: core::ops::Range<u32> =
    (FLASH_SIZE - SETTINGS_PARTITION_SIZE) as u32..FLASH_SIZE as u32;

/// Settings storage over the RP2040 flash peripheral
///
/// Owns the flash driver plus the scratch buffer sequential-storage
/// deserializes into, so nothing lands on the caller's stack.
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
    scratch: [u8; MAX_VALUE_SIZE],
}

impl<'d> Rp2040FlashStorage<'d> {
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
            scratch: [0; MAX_VALUE_SIZE],
        }
    }

    /// Raw flash peripheral, for accesses outside the settings partition
    pub fn flash(&mut self) -> &mut Flash<'d, FLASH, Async, FLASH_SIZE> {
        &mut self.flash
    }
}

fn kv_error(e: KvError<embassy_rp::flash::Error>) -> FlashError {
    match e {
        KvError::Corrupted { .. } => FlashError::Corrupted,
        KvError::FullStorage => FlashError::Full,
        KvError::Storage { .. } => FlashError::Flash,
        _ => FlashError::Storage,
    }
}

impl<'d> sideband_hal::FlashStorage for Rp2040FlashStorage<'d> {
    async fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let found = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut self.scratch,
            &key,
        )
        .await
        .map_err(kv_error)?;

        match found {
            Some(data) => {
                if buffer.len() < data.len() {
                    return Err(FlashError::BufferTooSmall);
                }
                buffer[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
            None => Err(FlashError::NotFound),
        }
    }

    async fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        map::store_item(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut self.scratch,
            &key,
            &data,
        )
        .await
        .map_err(kv_error)
    }

    async fn erase_all(&mut self) -> Result<(), FlashError> {
        self.flash
            .erase(SETTINGS_RANGE.start, SETTINGS_RANGE.end)
            .await
            .map_err(|_| FlashError::Flash)
    }
}

/// Name the firmware uses for the concrete store
pub type FlashStorage<'d> = Rp2040FlashStorage<'d>;
