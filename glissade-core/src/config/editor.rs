//! Keypad value editor
//!
//! The panel keypad sends one digit at a time; the editor accumulates a
//! digit string and converts it to a field value on commit. Time fields
//! can be committed either as whole seconds or as a 1/n-second fraction
//! (the "second" / "fraction" keys on the panel).

use heapless::String;

/// Maximum entered digits; enough for any in-range value.
pub const MAX_DIGITS: usize = 7;

/// How the entered number is interpreted on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Commit {
    /// Plain integer (images, distance, speed, timespan)
    Count,
    /// Whole seconds, stored as microseconds
    Seconds,
    /// 1/n of a second, stored as microseconds
    Fraction,
}

/// Digit-string editor backing the numeric keypad screens.
#[derive(Debug, Clone, Default)]
pub struct ValueEditor {
    digits: String<MAX_DIGITS>,
}

impl ValueEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin editing with an existing value shown.
    pub fn with_value(value: u32) -> Self {
        let mut editor = Self::new();
        editor.set_value(value);
        editor
    }

    /// Replace the buffer with the decimal rendering of `value`.
    pub fn set_value(&mut self, value: u32) {
        self.digits.clear();
        let mut buf = [0u8; 10];
        let mut n = value;
        let mut len = 0;
        loop {
            buf[len] = b'0' + (n % 10) as u8;
            len += 1;
            n /= 10;
            if n == 0 {
                break;
            }
        }
        for &b in buf[..len].iter().rev().take(MAX_DIGITS) {
            let _ = self.digits.push(b as char);
        }
    }

    /// Append a digit (0-9); extra digits beyond the buffer are dropped,
    /// as is a leading zero.
    pub fn push_digit(&mut self, digit: u8) {
        if digit > 9 {
            return;
        }
        if self.digits.as_str() == "0" {
            self.digits.clear();
        }
        let _ = self.digits.push((b'0' + digit) as char);
    }

    /// Delete the last digit.
    pub fn backspace(&mut self) {
        self.digits.pop();
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    /// The digit string as shown on the panel ("0" when empty).
    pub fn display(&self) -> &str {
        if self.digits.is_empty() {
            "0"
        } else {
            self.digits.as_str()
        }
    }

    /// Entered number as an integer (0 when empty).
    fn number(&self) -> u32 {
        let mut n: u32 = 0;
        for b in self.digits.as_bytes() {
            n = n.saturating_mul(10).saturating_add((b - b'0') as u32);
        }
        n
    }

    /// Convert the entered digits to a stored field value.
    ///
    /// A fraction commit of 0 would divide by zero; it yields 0 and is
    /// left for `sanitize` to replace with the field fallback.
    pub fn commit(&self, mode: Commit) -> u32 {
        let n = self.number();
        match mode {
            Commit::Count => n,
            Commit::Seconds => n.saturating_mul(1_000_000),
            Commit::Fraction => {
                if n == 0 {
                    0
                } else {
                    1_000_000 / n
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_entry() {
        let mut ed = ValueEditor::new();
        ed.push_digit(1);
        ed.push_digit(2);
        ed.push_digit(0);
        assert_eq!(ed.display(), "120");
        assert_eq!(ed.commit(Commit::Count), 120);
    }

    #[test]
    fn test_backspace_and_empty() {
        let mut ed = ValueEditor::new();
        ed.push_digit(7);
        ed.backspace();
        assert_eq!(ed.display(), "0");
        assert_eq!(ed.commit(Commit::Count), 0);
        ed.backspace(); // no-op on empty
        assert_eq!(ed.display(), "0");
    }

    #[test]
    fn test_seconds_commit() {
        let mut ed = ValueEditor::new();
        ed.push_digit(2);
        assert_eq!(ed.commit(Commit::Seconds), 2_000_000);
    }

    #[test]
    fn test_fraction_commit() {
        let mut ed = ValueEditor::new();
        ed.push_digit(6);
        ed.push_digit(0);
        assert_eq!(ed.commit(Commit::Fraction), 16_666);

        ed.clear();
        assert_eq!(ed.commit(Commit::Fraction), 0);
    }

    #[test]
    fn test_prefill_from_value() {
        let ed = ValueEditor::with_value(2000);
        assert_eq!(ed.display(), "2000");
    }

    #[test]
    fn test_leading_zero_replaced() {
        let mut ed = ValueEditor::with_value(0);
        assert_eq!(ed.display(), "0");
        ed.push_digit(5);
        assert_eq!(ed.display(), "5");
    }

    #[test]
    fn test_overflow_saturates() {
        let mut ed = ValueEditor::new();
        for _ in 0..MAX_DIGITS {
            ed.push_digit(9);
        }
        // Further digits are dropped, not wrapped
        ed.push_digit(9);
        assert_eq!(ed.display().len(), MAX_DIGITS);
        assert_eq!(ed.commit(Commit::Count), 9_999_999);
    }
}
