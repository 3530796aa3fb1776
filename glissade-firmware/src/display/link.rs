//! Frame encoding for the panel link
//!
//! Frame format, controller -> panel:
//! - START (1 byte): 0xA5 synchronization byte
//! - LENGTH (1 byte): payload length
//! - TYPE (1 byte): command identifier
//! - PAYLOAD (LENGTH bytes)
//! - CHECKSUM (1 byte): XOR of LENGTH, TYPE, and all PAYLOAD bytes
//!
//! Text payloads are a row byte followed by the line's characters.

use heapless::Vec;

use super::screen::{Screen, SCREEN_COLS, SCREEN_ROWS};

/// Frame synchronization byte
pub const FRAME_START: u8 = 0xA5;

/// Clear the panel's text area
pub const CMD_CLEAR: u8 = 0x01;

/// Write one text row
pub const CMD_TEXT: u8 = 0x02;

/// Maximum payload: row byte plus a full line
pub const MAX_PAYLOAD: usize = 1 + SCREEN_COLS;

/// Maximum complete frame size (START + LENGTH + TYPE + payload + CHECKSUM)
pub const MAX_FRAME: usize = 4 + MAX_PAYLOAD;

/// An encoded frame ready for the UART
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8, MAX_FRAME>,
}

impl Frame {
    fn new(cmd: u8, payload: &[u8]) -> Self {
        debug_assert!(payload.len() <= MAX_PAYLOAD);

        let mut checksum = payload.len() as u8 ^ cmd;
        for &byte in payload {
            checksum ^= byte;
        }

        let mut bytes = Vec::new();
        let _ = bytes.push(FRAME_START);
        let _ = bytes.push(payload.len() as u8);
        let _ = bytes.push(cmd);
        let _ = bytes.extend_from_slice(payload);
        let _ = bytes.push(checksum);
        Self { bytes }
    }

    /// The raw bytes to write to the UART
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Encode a screen as a clear frame followed by one text frame per
/// non-empty row.
pub fn encode_screen(screen: &Screen) -> impl Iterator<Item = Frame> + '_ {
    ScreenEncoder { screen, next_row: None }
}

struct ScreenEncoder<'a> {
    screen: &'a Screen,
    /// None until the clear frame has been emitted
    next_row: Option<u8>,
}

impl<'a> Iterator for ScreenEncoder<'a> {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let mut row = match self.next_row {
            None => {
                self.next_row = Some(0);
                return Some(Frame::new(CMD_CLEAR, &[]));
            }
            Some(row) => row,
        };

        while (row as usize) < SCREEN_ROWS {
            let line = self.screen.get_line(row);
            row += 1;
            if !line.is_empty() {
                self.next_row = Some(row);
                let mut payload: Vec<u8, MAX_PAYLOAD> = Vec::new();
                let _ = payload.push(row - 1);
                let _ = payload.extend_from_slice(line.as_bytes());
                return Some(Frame::new(CMD_TEXT, &payload));
            }
        }

        self.next_row = Some(row);
        None
    }
}
