//! Panel UART receive task
//!
//! Receives one-byte input events from the touch panel and queues them
//! for the UI task.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use crate::channels::INPUT_CHANNEL;
use crate::input::PanelEvent;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 16;

/// Panel RX task - decodes input events from the panel
#[embassy_executor::task]
pub async fn panel_rx_task(mut rx: BufferedUartRx) {
    info!("Panel RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match PanelEvent::from_byte(byte) {
                        Some(event) => {
                            debug!("Input event: {:?}", event);
                            if INPUT_CHANNEL.try_send(event).is_err() {
                                warn!("Input channel full, dropping event");
                            }
                        }
                        None => {
                            warn!("Unknown input byte: {:#04x}", byte);
                        }
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
