//! Deterministic CSPRNG seeded from a caller-supplied entropy source.
//!
//! [`Csprng::make`] takes a reseed period in bytes and an entropy
//! callback. The generator expands randomness with the ChaCha20 block
//! function, rekeys itself after every request for forward secrecy, and
//! pulls fresh entropy from the callback once the request counter passes
//! the reseed period. A failing callback surfaces as
//! [`Error::EntropyFailure`]; the generator never touches the OS behind
//! the caller's back.

pub mod drbg;
pub mod entropy;

use crate::core::ct;
use crate::error::{Error, Result};
use drbg::chacha20_block;
pub use entropy::{EntropyCallback, os_entropy};

/// ChaCha20-based deterministic random bit generator.
pub struct Csprng {
    /// Internal key (256-bit), rotated on every request.
    key: [u8; 32],
    /// Nonce, fixed to zero for DRBG usage.
    nonce: [u8; 12],
    /// Block counter.
    counter: u32,
    /// Bytes generated since the last reseed.
    since_reseed: u64,
    /// Reseed period in bytes.
    reseed_period: u64,
    /// Caller-provided entropy source.
    entropy: EntropyCallback,
}

impl Csprng {
    /// Creates a generator with the given reseed period and entropy
    /// callback, seeding it immediately.
    pub fn make(reseed_period_bytes: u64, entropy: EntropyCallback) -> Result<Self> {
        let mut rng = Self {
            key: [0u8; 32],
            nonce: [0u8; 12],
            counter: 0,
            since_reseed: 0,
            reseed_period: reseed_period_bytes.max(1),
            entropy,
        };
        rng.reseed()?;
        Ok(rng)
    }

    /// Creates a generator over the default OS entropy source.
    pub fn from_os() -> Result<Self> {
        Self::make(1 << 20, os_entropy)
    }

    /// Creates a deterministic generator from a fixed seed (test vectors,
    /// derived randomness). The seed buffer is wiped after use.
    pub fn from_seed(mut seed: [u8; 32]) -> Self {
        let key = seed;
        ct::scrub(&mut seed);

        Self {
            key,
            nonce: [0u8; 12],
            counter: 0,
            since_reseed: 0,
            reseed_period: u64::MAX,
            entropy: |_| false,
        }
    }

    fn reseed(&mut self) -> Result<()> {
        let mut fresh = [0u8; 32];
        if !(self.entropy)(&mut fresh) {
            return Err(Error::EntropyFailure);
        }

        // Mix fresh entropy into the current key rather than replacing it.
        for (k, f) in self.key.iter_mut().zip(fresh.iter()) {
            *k ^= f;
        }
        ct::scrub(&mut fresh);

        self.counter = 0;
        self.since_reseed = 0;
        Ok(())
    }

    /// Fills the buffer with random bytes, reseeding on demand.
    pub fn get_mem(&mut self, out: &mut [u8]) -> Result<()> {
        if self.since_reseed.saturating_add(out.len() as u64) > self.reseed_period {
            self.reseed()?;
        }

        let mut offset = 0;
        while offset < out.len() {
            let block = chacha20_block(&self.key, self.counter, &self.nonce);
            self.counter = self.counter.wrapping_add(1);

            let take = 64.min(out.len() - offset);
            out[offset..offset + take].copy_from_slice(&block[..take]);
            offset += take;
        }

        self.since_reseed += out.len() as u64;
        self.rekey();
        Ok(())
    }

    /// Returns a uniform 32-bit value.
    pub fn get_u32(&mut self) -> Result<u32> {
        let mut b = [0u8; 4];
        self.get_mem(&mut b)?;
        Ok(u32::from_le_bytes(b))
    }

    /// Rotates the key from the generator's own output so past output
    /// cannot be recovered from a captured state.
    fn rekey(&mut self) {
        let block = chacha20_block(&self.key, self.counter, &self.nonce);
        self.counter = self.counter.wrapping_add(1);
        self.key.copy_from_slice(&block[..32]);
    }
}

impl Drop for Csprng {
    fn drop(&mut self) {
        ct::scrub(&mut self.key);
    }
}
