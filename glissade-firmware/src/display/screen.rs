//! Screen buffer
//!
//! A plain text model of the panel's status area: 4 rows of 20
//! characters. The panel draws its own buttons; we only own the text.

use heapless::String;

/// Visible text columns per row
pub const SCREEN_COLS: usize = 20;

/// Text rows
pub const SCREEN_ROWS: usize = 4;

/// A screen buffer that can be sent to the panel
pub struct Screen {
    lines: [String<SCREEN_COLS>; SCREEN_ROWS],
}

impl Screen {
    /// Create a new empty screen
    pub const fn new() -> Self {
        Self {
            lines: [String::new(), String::new(), String::new(), String::new()],
        }
    }

    /// Clear the screen
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
    }

    /// Set text at a specific row, truncating to the visible width.
    /// Truncation is per character, never inside a UTF-8 sequence.
    pub fn set_line(&mut self, row: u8, text: &str) {
        if (row as usize) < SCREEN_ROWS {
            let line = &mut self.lines[row as usize];
            line.clear();
            for c in text.chars().take(SCREEN_COLS) {
                if line.push(c).is_err() {
                    break;
                }
            }
        }
    }

    /// Get a line of text
    pub fn get_line(&self, row: u8) -> &str {
        if (row as usize) < SCREEN_ROWS {
            self.lines[row as usize].as_str()
        } else {
            ""
        }
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

// Tests require std feature (not available on embedded target)
#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_line() {
        let mut screen = Screen::new();
        screen.set_line(1, "Shutter 1/60");
        assert_eq!(screen.get_line(1), "Shutter 1/60");
        assert_eq!(screen.get_line(0), "");
    }

    #[test]
    fn test_long_line_truncated() {
        let mut screen = Screen::new();
        screen.set_line(0, "a line much longer than twenty characters");
        assert_eq!(screen.get_line(0).len(), SCREEN_COLS);
    }

    #[test]
    fn test_multibyte_truncation_is_char_safe() {
        let mut screen = Screen::new();
        let text = "μμμμμμμμμμμμμμμμμμμμμμ"; // 22 two-byte chars
        screen.set_line(0, text);

        let line = screen.get_line(0);
        assert!(line.chars().count() <= SCREEN_COLS);
        assert!(text.starts_with(line));
    }

    #[test]
    fn test_out_of_range_row_ignored() {
        let mut screen = Screen::new();
        screen.set_line(9, "nope");
        assert_eq!(screen.get_line(9), "");
    }
}
