//! Fixed-capacity storage for secrets typed at the terminal.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Capacity of a [`SensitiveBuffer`] in bytes, terminator slot included.
pub const MAX_LEN: usize = 129;

/// A stack-allocated byte buffer holding one line of secret input.
///
/// The logical contents never exceed `MAX_LEN - 1` bytes. Every byte of the
/// backing array is overwritten with zero by [`SensitiveBuffer::clear`] and
/// again when the buffer is dropped.
///
/// Neither `Clone` nor `Copy`: a secret has exactly
/// one owner, and other stages only borrow it.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SensitiveBuffer {
    bytes: [u8; MAX_LEN],
    len: usize,
}

impl SensitiveBuffer {
    /// Create an empty, zero-filled buffer.
    pub fn new() -> Self {
        Self {
            bytes: [0u8; MAX_LEN],
            len: 0,
        }
    }

    /// Maximum number of content bytes the buffer accepts.
    pub const fn max_content_len() -> usize {
        MAX_LEN - 1
    }

    /// The logical contents.
    ///
    /// # Security
    ///
    /// Borrow only for the duration of a comparison or hash call. Never copy
    /// the slice into an owned, non-zeroizing container.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Overwrite the whole backing array with zeros and reset the length.
    pub fn clear(&mut self) {
        self.zeroize();
    }

    /// True when every byte of the backing array is zero.
    pub fn is_cleared(&self) -> bool {
        self.len == 0 && self.bytes.iter().all(|&b| b == 0)
    }

    /// Append one byte. Returns `false` when the buffer is full.
    pub(crate) fn push(&mut self, byte: u8) -> bool {
        if self.len >= Self::max_content_len() {
            return false;
        }
        self.bytes[self.len] = byte;
        self.len += 1;
        true
    }

    /// Drop the last byte, zeroing its slot.
    pub(crate) fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let byte = self.bytes[self.len];
        self.bytes[self.len] = 0;
        Some(byte)
    }

    pub(crate) fn last(&self) -> Option<u8> {
        self.as_bytes().last().copied()
    }

    /// Trim C-locale whitespace from both ends in place.
    ///
    /// Content is shifted to the start of the array and every vacated byte is
    /// zeroed, so no trimmed-off fragment of the secret stays behind.
    pub fn trim(&mut self) {
        let content = &self.bytes[..self.len];
        let start = content
            .iter()
            .position(|&b| !is_c_space(b))
            .unwrap_or(self.len);
        let end = content
            .iter()
            .rposition(|&b| !is_c_space(b))
            .map_or(start, |i| i + 1);

        let new_len = end - start;
        if start > 0 {
            self.bytes.copy_within(start..end, 0);
        }
        self.bytes[new_len..self.len].zeroize();
        self.len = new_len;
    }
}

impl Default for SensitiveBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SensitiveBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensitiveBuffer")
            .field("bytes", &"[REDACTED]")
            .field("len", &self.len)
            .finish()
    }
}

/// `isspace` in the C locale.
fn is_c_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

#[cfg(test)]
pub(crate) fn buffer_from(bytes: &[u8]) -> SensitiveBuffer {
    let mut buffer = SensitiveBuffer::new();
    for &b in bytes {
        assert!(buffer.push(b), "test input exceeds buffer capacity");
    }
    buffer
}
