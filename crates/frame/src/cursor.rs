//! Position-tracking cursor over a byte slice
//!
//! The frame format interleaves fixed-width headers with variable payloads, so
//! every decoder works through [ByteCursor] for typed reads with explicit
//! truncation errors instead of ad-hoc offset bookkeeping.

// crate modules
use crate::error::{Error, Result};
use crate::frame::RealType;

// external crates
use byteorder::{ByteOrder, LittleEndian};

/// Typed little-endian reads over a borrowed byte slice
///
/// All reads advance an internal position and fail with [Error::Truncated]
/// when fewer bytes remain than requested, carrying both counts for context.
///
/// ```rust
/// # use gktools_frame::cursor::ByteCursor;
/// let bytes = 42u64.to_le_bytes();
/// let mut cursor = ByteCursor::new(&bytes);
/// assert_eq!(cursor.read_u64().unwrap(), 42);
/// assert!(cursor.is_empty());
/// ```
#[derive(Debug)]
pub struct ByteCursor<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    /// Wrap a byte slice, starting at offset 0
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Current offset from the start of the slice
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// True once every byte has been consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `n` bytes without copying, advancing the position
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::Truncated {
                expected: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.buffer[self.position..self.position + n];
        self.position += n;
        Ok(bytes)
    }

    /// Check the next `n` bytes against an expected tag, consuming them only
    /// on a match
    pub fn read_tag(&mut self, tag: &[u8]) -> bool {
        if self.remaining() < tag.len() {
            return false;
        }
        if &self.buffer[self.position..self.position + tag.len()] == tag {
            self.position += tag.len();
            true
        } else {
            false
        }
    }

    /// Read a little-endian unsigned 64-bit integer
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.read_bytes(8)?))
    }

    /// Read `n` consecutive unsigned 64-bit integers
    pub fn read_u64_array(&mut self, n: usize) -> Result<Vec<u64>> {
        // saturate on overflow so absurd counts fail the truncation check
        let bytes = self.read_bytes(n.saturating_mul(8))?;
        let mut values = vec![0u64; n];
        LittleEndian::read_u64_into(bytes, &mut values);
        Ok(values)
    }

    /// Read a little-endian 64-bit float
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(LittleEndian::read_f64(self.read_bytes(8)?))
    }

    /// Read `n` consecutive 64-bit floats
    pub fn read_f64_array(&mut self, n: usize) -> Result<Vec<f64>> {
        let bytes = self.read_bytes(n.saturating_mul(8))?;
        let mut values = vec![0f64; n];
        LittleEndian::read_f64_into(bytes, &mut values);
        Ok(values)
    }

    /// Read a single real of the given width, widened to f64
    pub fn read_real(&mut self, real_type: RealType) -> Result<f64> {
        match real_type {
            RealType::F64 => self.read_f64(),
            RealType::F32 => Ok(LittleEndian::read_f32(self.read_bytes(4)?) as f64),
        }
    }

    /// Read `n` consecutive reals of the given width, widened to f64
    pub fn read_real_array(&mut self, real_type: RealType, n: usize) -> Result<Vec<f64>> {
        match real_type {
            RealType::F64 => self.read_f64_array(n),
            RealType::F32 => {
                let bytes = self.read_bytes(n.saturating_mul(4))?;
                let mut values = vec![0f32; n];
                LittleEndian::read_f32_into(bytes, &mut values);
                Ok(values.into_iter().map(f64::from).collect())
            }
        }
    }
}
