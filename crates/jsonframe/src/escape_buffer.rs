//! Accumulates the four hex digits of a `\uXXXX` escape.
//!
//! The digits may arrive across several chunks, so the buffer keeps its state
//! between [`UnicodeEscapeBuffer::feed`] calls. It yields UTF-16 code units;
//! pairing surrogates is left to the caller.

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    code_unit: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Clears any accumulated digits.
    pub(crate) fn reset(&mut self) {
        self.code_unit = 0;
        self.len = 0;
    }

    /// Feeds one byte of the escape.
    ///
    /// - `Ok(None)` while fewer than four digits have been seen.
    /// - `Ok(Some(unit))` on the fourth digit; the buffer resets itself.
    /// - `Err(byte)` if `byte` is not an ASCII hex digit.
    pub(crate) fn feed(&mut self, byte: u8) -> Result<Option<u16>, u8> {
        let digit = match byte {
            b'0'..=b'9' => byte - b'0',
            b'a'..=b'f' => byte - b'a' + 10,
            b'A'..=b'F' => byte - b'A' + 10,
            _ => return Err(byte),
        };

        self.code_unit = (self.code_unit << 4) | u16::from(digit);
        self.len += 1;

        if self.len == 4 {
            let unit = self.code_unit;
            self.reset();
            Ok(Some(unit))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UnicodeEscapeBuffer;

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'0'), Ok(None));
        assert_eq!(buf.feed(b'0'), Ok(None));
        assert_eq!(buf.feed(b'4'), Ok(None));
        assert_eq!(buf.feed(b'1'), Ok(Some(0x41)));
    }

    #[test]
    fn mixed_case_hex() {
        let mut buf = UnicodeEscapeBuffer::new();
        for &b in b"AbC" {
            assert_eq!(buf.feed(b), Ok(None));
        }
        assert_eq!(buf.feed(b'd'), Ok(Some(0xABCD)));
    }

    #[test]
    fn surrogates_are_returned_as_code_units() {
        let mut buf = UnicodeEscapeBuffer::new();
        let mut out = None;
        for &b in b"D83D" {
            out = buf.feed(b).unwrap();
        }
        assert_eq!(out, Some(0xD83D));
    }

    #[test]
    fn resets_after_each_escape() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'F'), Ok(None));
        buf.reset();
        for &b in b"002" {
            assert_eq!(buf.feed(b), Ok(None));
        }
        assert_eq!(buf.feed(b'0'), Ok(Some(0x20)));
    }

    #[test]
    fn invalid_hex_error() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed(b'G'), Err(b'G'));
    }
}
