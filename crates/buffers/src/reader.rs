//! Binary reader with cursor tracking.

use std::str;

use crate::BufferError;

/// A binary reader over a byte slice.
///
/// The plain methods index directly and panic past the end of the data; the
/// `try_*` variants return [`BufferError::EndOfBuffer`] instead and are what
/// decoders of untrusted input should use.
///
/// # Example
///
/// ```
/// use descriptor_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8(), 0x01);
/// assert_eq!(reader.u32(), 0x02030405);
/// assert!(reader.try_u8().is_err());
/// ```
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.uint8.len().saturating_sub(self.x)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> u8 {
        let val = self.uint8[self.x];
        self.x += 1;
        val
    }

    /// Reads an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn u32(&mut self) -> u32 {
        u32::from_be_bytes(self.take::<4>())
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        bytes
    }

    // Bounds-checked variants.

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        match self.x.checked_add(n) {
            Some(end) if end <= self.uint8.len() => Ok(()),
            _ => Err(BufferError::EndOfBuffer),
        }
    }

    #[inline]
    pub fn try_u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.u8())
    }

    #[inline]
    pub fn try_u32(&mut self) -> Result<u32, BufferError> {
        self.check(4)?;
        Ok(self.u32())
    }

    /// Reads `size` raw bytes and advances the cursor.
    pub fn try_buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let bin = &self.uint8[self.x..self.x + size];
        self.x += size;
        Ok(bin)
    }

    /// Reads a UTF-8 string of `size` bytes.
    pub fn try_utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        let bytes = self.try_buf(size)?;
        str::from_utf8(bytes).map_err(|_| BufferError::InvalidUtf8)
    }

    /// Reads a string written by [`Writer::str`](crate::Writer::str): a `u32`
    /// byte length followed by that many UTF-8 bytes.
    pub fn try_str(&mut self) -> Result<&'a str, BufferError> {
        let len = self.try_u32()? as usize;
        self.try_utf8(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Writer;

    #[test]
    fn test_u8_and_u32() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u8(), 0x01);
        assert_eq!(reader.u32(), 0x02030405);
        assert_eq!(reader.size(), 0);
    }

    #[test]
    fn test_try_u32_past_end() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_u32(), Err(BufferError::EndOfBuffer));
        // A failed read does not move the cursor.
        assert_eq!(reader.x, 0);
        assert_eq!(reader.try_u8(), Ok(0x01));
        assert_eq!(reader.size(), 2);
    }

    #[test]
    fn test_try_str_roundtrip() {
        let mut writer = Writer::new();
        writer.str("descriptor");
        writer.str("");
        let data = writer.flush();
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_str(), Ok("descriptor"));
        assert_eq!(reader.try_str(), Ok(""));
        assert_eq!(reader.try_str(), Err(BufferError::EndOfBuffer));
    }

    #[test]
    fn test_try_str_truncated_payload() {
        let data = [0, 0, 0, 5, b'a', b'b'];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_str(), Err(BufferError::EndOfBuffer));
    }

    #[test]
    fn test_try_str_invalid_utf8() {
        let data = [0, 0, 0, 2, 0xc3, 0x28];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_str(), Err(BufferError::InvalidUtf8));
    }

    #[test]
    fn test_huge_length_does_not_overflow() {
        let data = [0xff, 0xff, 0xff, 0xff];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.try_str(), Err(BufferError::EndOfBuffer));
    }
}
