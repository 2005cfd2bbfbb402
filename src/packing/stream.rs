//! Bit-granularity stream codec.
//!
//! A [`Stream`] serialises heterogeneous bit fields of arbitrary widths
//! into a byte buffer: `write` appends the `bits` least-significant bits of
//! a value MSB-first, `read` consumes them the same way, and `flush` pads
//! with zero bits up to a requested alignment. Words move between the
//! scratch accumulator and the buffer in big-endian 64-bit bursts, so the
//! produced byte sequence is host-independent.
//!
//! Reads past the produced bit length and writes past the preallocated
//! capacity fail with [`Error::InsufficientBuffer`].

use crate::error::{Error, Result};

const WORD_BYTES: usize = 8;
const WORD_BITS: usize = 64;

/// Bit-packed stream with separate write (head) and read (tail) cursors.
#[derive(Debug, Clone)]
pub struct Stream {
    buffer: Vec<u8>,
    /// Next write position, in bytes.
    head: usize,
    /// Next read position, in bytes.
    tail: usize,
    /// In-progress scratch word.
    scratch: u64,
    /// Write mode: free bits in the scratch. Read mode: bits available.
    bits_left: usize,
    /// Total bits produced.
    total_bits: usize,
    /// Total bits consumed by reads.
    consumed_bits: usize,
    writable: bool,
}

impl Stream {
    /// Creates an empty stream with capacity for `max_bytes` of output
    /// (rounded up to a whole number of words).
    pub fn with_capacity(max_bytes: usize) -> Self {
        let cap = max_bytes.div_ceil(WORD_BYTES) * WORD_BYTES;
        Self {
            buffer: vec![0u8; cap],
            head: 0,
            tail: 0,
            scratch: 0,
            bits_left: WORD_BITS,
            total_bits: 0,
            consumed_bits: 0,
            writable: true,
        }
    }

    /// Wraps produced bytes for reading.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let total_bits = bytes.len() * 8;
        let cap = bytes.len().div_ceil(WORD_BYTES) * WORD_BYTES;
        let mut buffer = vec![0u8; cap];
        buffer[..bytes.len()].copy_from_slice(bytes);

        Self {
            buffer,
            head: bytes.len(),
            tail: 0,
            scratch: 0,
            bits_left: 0,
            total_bits,
            consumed_bits: 0,
            writable: false,
        }
    }

    /// Total bits produced so far.
    pub fn bit_length(&self) -> usize {
        self.total_bits
    }

    /// Appends the `bits` least-significant bits of `value`, MSB first.
    ///
    /// `bits` must be in `1..=32`.
    pub fn write(&mut self, value: u32, bits: usize) -> Result<()> {
        if bits == 0 || bits > 32 || !self.writable {
            return Err(Error::InsufficientBuffer);
        }

        let data = (value as u64) & (u64::MAX >> (64 - bits));

        if bits <= self.bits_left {
            self.scratch |= data << (self.bits_left - bits);
            self.bits_left -= bits;
            self.total_bits += bits;
            return Ok(());
        }

        // Fill the scratch, burst it out, start a fresh word with the
        // remaining low bits.
        if self.head + WORD_BYTES > self.buffer.len() {
            return Err(Error::InsufficientBuffer);
        }
        self.total_bits += bits;

        let spill = bits - self.bits_left;
        self.scratch |= data >> spill;
        self.buffer[self.head..self.head + WORD_BYTES].copy_from_slice(&self.scratch.to_be_bytes());
        self.head += WORD_BYTES;

        self.bits_left = WORD_BITS - spill;
        self.scratch = if spill == 0 { 0 } else { data << self.bits_left };
        Ok(())
    }

    /// Pads with zero bits to a byte boundary and then to `alignment` bits
    /// (a multiple of 8), committing the scratch word to the buffer.
    pub fn flush(&mut self, alignment: usize) -> Result<()> {
        if !self.writable {
            return Ok(());
        }
        let alignment = alignment.max(8);
        if alignment % 8 != 0 {
            return Err(Error::InsufficientBuffer);
        }

        let mut pad = (alignment - self.total_bits % alignment) % alignment;
        while pad > 0 {
            let chunk = pad.min(32);
            self.write(0, chunk)?;
            pad -= chunk;
        }

        // Commit the partial scratch word.
        if self.bits_left < WORD_BITS {
            let bytes = (WORD_BITS - self.bits_left).div_ceil(8);
            if self.head + bytes > self.buffer.len() {
                return Err(Error::InsufficientBuffer);
            }
            self.buffer[self.head..self.head + bytes]
                .copy_from_slice(&self.scratch.to_be_bytes()[..bytes]);
            self.head += bytes;
            self.scratch = 0;
            self.bits_left = WORD_BITS;
        }

        Ok(())
    }

    /// Reads `bits` (1..=32) as an unsigned value, MSB first.
    pub fn read(&mut self, bits: usize) -> Result<u32> {
        if bits == 0 || bits > 32 {
            return Err(Error::InsufficientBuffer);
        }
        if self.consumed_bits + bits > self.total_bits {
            return Err(Error::InsufficientBuffer);
        }

        let mut remaining = bits;
        let mut value = 0u64;

        loop {
            if self.bits_left == 0 {
                if self.tail + WORD_BYTES > self.buffer.len() {
                    return Err(Error::InsufficientBuffer);
                }
                self.scratch =
                    u64::from_be_bytes(self.buffer[self.tail..self.tail + WORD_BYTES].try_into().unwrap());
                self.tail += WORD_BYTES;
                self.bits_left = WORD_BITS;
            }

            if remaining <= self.bits_left {
                value |= self.scratch >> (self.bits_left - remaining);
                self.bits_left -= remaining;
                self.scratch &= if self.bits_left == 0 {
                    0
                } else {
                    (1u64 << self.bits_left) - 1
                };
                self.consumed_bits += bits;
                return Ok(value as u32);
            }

            value |= self.scratch << (remaining - self.bits_left);
            remaining -= self.bits_left;
            self.bits_left = 0;
        }
    }

    /// Reads `bits` and sign-extends from the field's top bit.
    pub fn read_signed(&mut self, bits: usize) -> Result<i32> {
        let raw = self.read(bits)?;
        if bits == 32 {
            return Ok(raw as i32);
        }

        let sign = 1u32 << (bits - 1);
        Ok(((raw ^ sign).wrapping_sub(sign)) as i32)
    }

    /// The produced bytes (valid after `flush`).
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..self.head]
    }

    /// Consumes the stream, returning the produced bytes.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buffer.truncate(self.head);
        self.buffer
    }
}
