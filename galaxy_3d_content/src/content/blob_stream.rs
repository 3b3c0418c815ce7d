//! Sequential little-endian writer/reader for the binary blob formats.
//!
//! Every multi-byte scalar is encoded little-endian. No implicit padding is
//! ever inserted: alignment padding is explicit (`write_padded_bytes`) and
//! read back with the matching call.

use crate::error::{Error, Result};

/// Round `size` up to the next multiple of 4
pub const fn align_size_up_4(size: usize) -> usize {
    (size + 3) & !3
}

// ============================================================================
// WRITER
// ============================================================================

/// Append-only blob writer
pub struct BlobWriter {
    buffer: Vec<u8>,
}

impl BlobWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Create a writer whose buffer is pre-sized for `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: Vec::with_capacity(capacity) }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    /// Raw bytes, no length prefix
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Raw bytes followed by zeros up to the next multiple of 4 bytes
    pub fn write_padded_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
        let padding = align_size_up_4(bytes.len()) - bytes.len();
        self.buffer.extend(std::iter::repeat(0u8).take(padding));
    }

    /// `u32` byte length followed by UTF-8 bytes
    pub fn write_str(&mut self, value: &str) {
        self.write_u32(value.len() as u32);
        self.write_bytes(value.as_bytes());
    }

    /// Bytes written so far
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    /// Take the finished blob
    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }
}

impl Default for BlobWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// READER
// ============================================================================

/// Bounds-checked blob reader borrowing its input
///
/// Reading past the end is reported as `Error::InvalidData`: blobs come from
/// files on disk and may be truncated or stale.
pub struct BlobReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BlobReader<'a> {
    /// Create a reader positioned at the start of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    fn take(&mut self, size: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if size > remaining {
            return Err(Error::InvalidData(format!(
                "blob truncated: need {} bytes at offset {}, {} left",
                size, self.position, remaining
            )));
        }
        let bytes = &self.data[self.position..self.position + size];
        self.position += size;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Borrow the next `size` bytes
    pub fn read_bytes(&mut self, size: usize) -> Result<&'a [u8]> {
        self.take(size)
    }

    /// Borrow `size` meaningful bytes and skip their padding to a multiple of 4
    pub fn read_padded_bytes(&mut self, size: usize) -> Result<&'a [u8]> {
        let padded = self.take(align_size_up_4(size))?;
        Ok(&padded[..size])
    }

    /// Read a `u32` length-prefixed UTF-8 string
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::InvalidData(format!("blob string is not UTF-8: {}", e)))
    }

    /// Skip `size` bytes
    pub fn skip(&mut self, size: usize) -> Result<()> {
        self.take(size).map(|_| ())
    }

    /// Current offset from the start of the blob
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Fail unless every byte has been consumed
    ///
    /// Writer and reader must agree on the size byte-for-byte; trailing bytes
    /// mean the blob was produced by a different layout.
    pub fn expect_end(&self) -> Result<()> {
        if self.remaining() != 0 {
            return Err(Error::InvalidData(format!(
                "blob has {} trailing bytes at offset {}",
                self.remaining(),
                self.position
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "blob_stream_tests.rs"]
mod tests;
