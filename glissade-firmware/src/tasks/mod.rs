//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod panel_rx;
pub mod panel_tx;
pub mod sequencer;
pub mod store;
pub mod ui;

pub use panel_rx::panel_rx_task;
pub use panel_tx::panel_tx_task;
pub use sequencer::{sequencer_task, GpioActuator};
pub use store::store_task;
pub use ui::ui_task;
