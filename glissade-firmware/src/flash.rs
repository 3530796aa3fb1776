//! Settings persistence in RP2040 flash
//!
//! Uses sequential-storage for wear-leveled key-value storage in the
//! last 64KB of flash. Each parameter is stored under its own key as a
//! raw u32, so fields can be added without invalidating old stores.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use glissade_core::config::Settings;
use glissade_core::traits::{SettingsKey, SettingsStore, StoreError};

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const SETTINGS_PARTITION_SIZE: usize = 64 * 1024;
pub const SETTINGS_PARTITION_START: usize = FLASH_SIZE - SETTINGS_PARTITION_SIZE;

/// Flash range for the settings partition
pub const SETTINGS_RANGE: core::ops::Range<u32> =
    (SETTINGS_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch buffer size for sequential-storage (one key/value item)
const ITEM_BUF_SIZE: usize = 64;

/// Settings store over the RP2040 flash peripheral
pub struct FlashSettings<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> FlashSettings<'d> {
    /// Create a new flash settings store
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    async fn fetch(&mut self, key: SettingsKey) -> Result<u32, StoreError> {
        let mut item_buf = [0u8; ITEM_BUF_SIZE];

        let result = map::fetch_item::<SettingsKey, u32, _>(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut item_buf,
            &key,
        )
        .await;

        match result {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(StoreError::NotFound),
            Err(_) => Err(StoreError::Storage),
        }
    }

    async fn store(&mut self, key: SettingsKey, value: u32) -> Result<(), StoreError> {
        let mut item_buf = [0u8; ITEM_BUF_SIZE];

        map::store_item(
            &mut self.flash,
            SETTINGS_RANGE,
            &mut NoCache::new(),
            &mut item_buf,
            &key,
            &value,
        )
        .await
        .map_err(|_| StoreError::Storage)
    }
}

impl<'d> SettingsStore for FlashSettings<'d> {
    /// Load settings, field by field. Anything missing or unreadable
    /// keeps its default; a fresh board boots with factory settings.
    async fn load(&mut self) -> Settings {
        let mut settings = Settings::default();

        for key in SettingsKey::ALL {
            match self.fetch(key).await {
                Ok(value) => key.field().set(&mut settings, value),
                Err(StoreError::NotFound) => {}
                Err(_) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("settings: failed to read {:?}, using default", key);
                }
            }
        }

        settings
    }

    async fn save(&mut self, settings: &Settings) -> Result<(), StoreError> {
        for key in SettingsKey::ALL {
            self.store(key, key.field().get(settings)).await?;
        }
        Ok(())
    }
}
