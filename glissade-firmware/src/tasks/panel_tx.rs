//! Panel UART transmit task
//!
//! Ships the shared screen buffer to the touch panel whenever the UI
//! flags an update.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Ticker};
use embedded_io_async::Write;

use crate::channels::SCREEN_UPDATE;
use crate::display::{link, Screen};

/// Shared screen buffer protected by mutex
pub static SCREEN_BUFFER: Mutex<CriticalSectionRawMutex, Screen> = Mutex::new(Screen::new());

/// Panel TX task - sends framed screen updates to the panel
#[embassy_executor::task]
pub async fn panel_tx_task(mut tx: BufferedUartTx) {
    info!("Panel TX task started");

    let mut ticker = Ticker::every(Duration::from_millis(50));

    loop {
        if SCREEN_UPDATE.signaled() {
            SCREEN_UPDATE.reset();
            send_screen_update(&mut tx).await;
        }

        ticker.next().await;
    }
}

/// Send current screen content to the panel
async fn send_screen_update(tx: &mut BufferedUartTx) {
    let screen = SCREEN_BUFFER.lock().await;

    for frame in link::encode_screen(&screen) {
        if let Err(e) = tx.write_all(frame.as_bytes()).await {
            warn!("Failed to send screen frame: {:?}", e);
            break;
        }
    }

    trace!("Screen update sent");
}
