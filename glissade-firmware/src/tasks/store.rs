//! Settings persistence task
//!
//! Writes committed settings to flash in the background. Save failures
//! are logged and swallowed; the appliance never blocks on storage.

use defmt::*;

use glissade_core::traits::SettingsStore;

use crate::channels::SETTINGS_SAVE;
use crate::flash::FlashSettings;

/// Store task - persists settings on every commit
#[embassy_executor::task]
pub async fn store_task(mut store: FlashSettings<'static>) {
    info!("Store task started");

    loop {
        let settings = SETTINGS_SAVE.wait().await;
        match store.save(&settings).await {
            Ok(()) => debug!("Settings saved"),
            Err(e) => warn!("Settings save failed: {:?}", e),
        }
    }
}
