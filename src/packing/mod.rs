//! Bit-packed serialisation.
//!
//! [`Stream`] is the codec itself; [`Packer`] and [`Unpacker`] are the
//! directional conveniences the scheme cores use to produce and parse the
//! fixed wire formats (packed polynomial vectors, compressed ciphertexts,
//! key blobs).

pub mod stream;

pub use stream::Stream;

use crate::error::Result;

/// Write-only view over a [`Stream`].
pub struct Packer {
    stream: Stream,
}

impl Packer {
    /// Creates a packer with capacity for `max_bytes`.
    pub fn new(max_bytes: usize) -> Self {
        Self { stream: Stream::with_capacity(max_bytes) }
    }

    /// Appends the `bits` least-significant bits of `value`.
    pub fn write(&mut self, value: u32, bits: usize) -> Result<()> {
        self.stream.write(value, bits)
    }

    /// Appends a signed value in two's complement.
    pub fn write_signed(&mut self, value: i32, bits: usize) -> Result<()> {
        self.stream.write(value as u32, bits)
    }

    /// Appends whole bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        for &b in bytes {
            self.stream.write(b as u32, 8)?;
        }
        Ok(())
    }

    /// Flushes to byte alignment and returns the produced bytes.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.stream.flush(8)?;
        Ok(self.stream.into_bytes())
    }
}

/// Read-only view over a [`Stream`].
pub struct Unpacker {
    stream: Stream,
}

impl Unpacker {
    /// Wraps produced bytes for reading.
    pub fn new(bytes: &[u8]) -> Self {
        Self { stream: Stream::from_bytes(bytes) }
    }

    /// Reads an unsigned bit field.
    pub fn read(&mut self, bits: usize) -> Result<u32> {
        self.stream.read(bits)
    }

    /// Reads a sign-extended bit field.
    pub fn read_signed(&mut self, bits: usize) -> Result<i32> {
        self.stream.read_signed(bits)
    }

    /// Reads whole bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        (0..len).map(|_| self.stream.read(8).map(|v| v as u8)).collect()
    }
}
