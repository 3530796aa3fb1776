//! Glissade - Camera Slider Timelapse Firmware
//!
//! Main firmware binary for the RP2040-based slider controller. The
//! board pulses a geared DC motor along the rail, fires the camera
//! through its remote-release port, and talks to a touch panel over
//! UART.
//!
//! Named after the ballet glide: one smooth traverse, executed in
//! measured steps.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level as PinLevel, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use glissade_core::traits::SettingsStore;

use crate::flash::FlashSettings;
use crate::tasks::GpioActuator;

mod channels;
mod display;
mod flash;
mod input;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Glissade firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Output lines, all parked low at power-on except the panel
    // backlight. Order matches Line::ALL: motor A, motor B, focus,
    // shutter, backlight, status LED.
    let actuator = GpioActuator::new([
        Output::new(p.PIN_18, PinLevel::Low),
        Output::new(p.PIN_27, PinLevel::Low),
        Output::new(p.PIN_16, PinLevel::Low),
        Output::new(p.PIN_17, PinLevel::Low),
        Output::new(p.PIN_22, PinLevel::High),
        Output::new(p.PIN_25, PinLevel::Low),
    ]);
    info!("Output lines initialized");

    // Settings from flash; missing fields come back as defaults
    let mut store = FlashSettings::new(p.FLASH, p.DMA_CH0);
    let settings = store.load().await;
    info!("Settings loaded");

    // UART link to the touch panel
    let uart_config = UartConfig::default(); // 115200 baud default

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for panel communication");

    // Spawn tasks
    spawner.spawn(tasks::sequencer_task(actuator)).unwrap();
    spawner.spawn(tasks::ui_task(settings)).unwrap();
    spawner.spawn(tasks::panel_rx_task(rx)).unwrap();
    spawner.spawn(tasks::panel_tx_task(tx)).unwrap();
    spawner.spawn(tasks::store_task(store)).unwrap();

    info!("All tasks spawned, firmware running");

    // Main task has nothing else to do - all work happens in spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
