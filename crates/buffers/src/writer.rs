//! Growing binary writer.

/// A binary buffer writer that grows automatically as needed.
///
/// Integers are written big-endian. Strings are written either raw
/// ([`Writer::utf8`]) or with a `u32` byte-length prefix ([`Writer::str`]).
///
/// # Example
///
/// ```
/// use descriptor_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.str("ab");
/// let data = writer.flush();
/// assert_eq!(data, [0x01, 0, 0, 0, 2, b'a', b'b']);
/// ```
pub struct Writer {
    /// The underlying byte buffer.
    pub uint8: Vec<u8>,
    /// Position where last flush happened.
    pub x0: usize,
    /// Current cursor position.
    pub x: usize,
    /// Allocation size when buffer needs to grow.
    alloc_size: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with the default allocation size (4KB).
    pub fn new() -> Self {
        Self::with_alloc_size(4 * 1024)
    }

    /// Creates a new writer with a custom allocation size.
    pub fn with_alloc_size(alloc_size: usize) -> Self {
        Self {
            uint8: vec![0u8; alloc_size],
            x0: 0,
            x: 0,
            alloc_size,
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.x - self.x0
    }

    pub fn is_empty(&self) -> bool {
        self.x == self.x0
    }

    /// Ensures the buffer has at least `capacity` bytes available.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        let remaining = self.uint8.len() - self.x;
        if remaining < capacity {
            let total = self.uint8.len() - self.x0;
            let total_required = total + (capacity - remaining);
            let new_size = if total_required <= self.alloc_size {
                self.alloc_size
            } else {
                total_required * 2
            };
            self.grow(new_size);
        }
    }

    fn grow(&mut self, new_size: usize) {
        let written = self.x - self.x0;
        let mut new_buf = vec![0u8; new_size];
        new_buf[..written].copy_from_slice(&self.uint8[self.x0..self.x]);
        self.uint8 = new_buf;
        self.x = written;
        self.x0 = 0;
    }

    /// Returns the written data and advances the flush position.
    pub fn flush(&mut self) -> Vec<u8> {
        let result = self.uint8[self.x0..self.x].to_vec();
        self.x0 = self.x;
        result
    }

    #[inline]
    fn put<const N: usize>(&mut self, bytes: [u8; N]) {
        self.ensure_capacity(N);
        self.uint8[self.x..self.x + N].copy_from_slice(&bytes);
        self.x += N;
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.put([val]);
    }

    /// Writes an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.put(val.to_be_bytes());
    }

    /// Writes a byte slice.
    pub fn buf(&mut self, buf: &[u8]) {
        let length = buf.len();
        self.ensure_capacity(length);
        self.uint8[self.x..self.x + length].copy_from_slice(buf);
        self.x += length;
    }

    /// Writes a UTF-8 string without a length prefix. Returns the number of
    /// bytes written.
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf(s.as_bytes());
        s.len()
    }

    /// Writes a `u32` byte length followed by the UTF-8 bytes of `s`.
    ///
    /// Panics if `s` is longer than `u32::MAX` bytes.
    pub fn str(&mut self, s: &str) {
        let len = u32::try_from(s.len()).unwrap_or_else(|_| {
            panic!("string of {} bytes exceeds the u32 length prefix", s.len())
        });
        self.u32(len);
        self.utf8(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        writer.u8(0x02);
        assert_eq!(writer.flush(), [0x01, 0x02]);
    }

    #[test]
    fn test_u32() {
        let mut writer = Writer::new();
        writer.u32(0x01020304);
        assert_eq!(writer.flush(), [0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn test_str_is_length_prefixed() {
        let mut writer = Writer::new();
        writer.str("héllo");
        let data = writer.flush();
        assert_eq!(&data[..4], &[0, 0, 0, 6]);
        assert_eq!(&data[4..], "héllo".as_bytes());
    }

    #[test]
    fn test_empty_str() {
        let mut writer = Writer::new();
        writer.str("");
        assert_eq!(writer.flush(), [0, 0, 0, 0]);
    }

    #[test]
    fn test_flush_multiple() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        assert_eq!(writer.flush(), [0x01]);
        assert!(writer.is_empty());
        writer.u8(0x02);
        assert_eq!(writer.flush(), [0x02]);
    }

    #[test]
    fn test_grows_past_alloc_size() {
        let mut writer = Writer::with_alloc_size(4);
        for i in 0..100u32 {
            writer.u32(i);
        }
        assert_eq!(writer.len(), 400);
        let data = writer.flush();
        assert_eq!(&data[396..], &99u32.to_be_bytes());
    }

    #[test]
    fn test_grow_keeps_unflushed_tail() {
        let mut writer = Writer::with_alloc_size(2);
        writer.u8(0xaa);
        writer.flush();
        writer.u8(0x01);
        writer.str("tail");
        let data = writer.flush();
        assert_eq!(data, [0x01, 0, 0, 0, 4, b't', b'a', b'i', b'l']);
    }
}
