//! SHA-3 digests and SHAKE extendable-output functions.
//!
//! Thin sponge layers over [`super::keccak`]. The variants differ only in
//! rate (`200 − 2·hlen` bytes) and domain separator: `0x06` for the SHA-3
//! digests, `0x1f` for SHAKE.

use super::keccak::{keccak_f1600, squeeze_block};
use super::{Hash, Xof};

/// Sponge phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Absorbing,
    Squeezing,
}

/// Generic Keccak sponge with byte-granular absorb/squeeze.
#[derive(Clone)]
struct Sponge {
    state: [u64; 25],
    rate: usize,
    pos: usize,
    domain: u8,
    phase: Phase,
}

impl Sponge {
    fn new(rate: usize, domain: u8) -> Self {
        Self { state: [0; 25], rate, pos: 0, domain, phase: Phase::Absorbing }
    }

    fn absorb(&mut self, mut data: &[u8]) {
        debug_assert_eq!(self.phase, Phase::Absorbing);

        // Coalesce into rate-sized blocks through a byte offset into the
        // little-endian lane view.
        while !data.is_empty() {
            let take = (self.rate - self.pos).min(data.len());
            for (i, &b) in data[..take].iter().enumerate() {
                let at = self.pos + i;
                self.state[at / 8] ^= (b as u64) << (8 * (at % 8));
            }
            self.pos += take;
            data = &data[take..];

            if self.pos == self.rate {
                keccak_f1600(&mut self.state);
                self.pos = 0;
            }
        }
    }

    fn pad(&mut self) {
        // Domain separator at the current position, final bit at the end
        // of the rate.
        self.state[self.pos / 8] ^= (self.domain as u64) << (8 * (self.pos % 8));
        let last = self.rate - 1;
        self.state[last / 8] ^= 0x80u64 << (8 * (last % 8));
        keccak_f1600(&mut self.state);
        self.pos = 0;
        self.phase = Phase::Squeezing;
    }

    fn squeeze(&mut self, out: &mut [u8]) {
        if self.phase == Phase::Absorbing {
            self.pad();
        }

        let mut written = 0;
        while written < out.len() {
            if self.pos == self.rate {
                keccak_f1600(&mut self.state);
                self.pos = 0;
            }

            let take = (self.rate - self.pos).min(out.len() - written);
            let mut block = vec![0u8; self.rate];
            squeeze_block(&self.state, &mut block);
            out[written..written + take].copy_from_slice(&block[self.pos..self.pos + take]);
            self.pos += take;
            written += take;
        }
    }

    fn reset(&mut self) {
        self.state = [0; 25];
        self.pos = 0;
        self.phase = Phase::Absorbing;
    }
}

/// SHA-3 digest with `hlen`-byte output and rate `200 − 2·hlen`.
#[derive(Clone)]
pub struct Sha3 {
    sponge: Sponge,
    out_len: usize,
}

impl Sha3 {
    /// Builds the SHA-3 variant with the given digest length in bytes.
    pub fn new(out_len: usize) -> Self {
        Self { sponge: Sponge::new(200 - 2 * out_len, 0x06), out_len }
    }
}

impl Hash for Sha3 {
    fn output_len(&self) -> usize {
        self.out_len
    }

    fn block_len(&self) -> usize {
        self.sponge.rate
    }

    fn update(&mut self, data: &[u8]) {
        self.sponge.absorb(data);
    }

    fn finalize(&mut self) -> Vec<u8> {
        let mut out = vec![0u8; self.out_len];
        self.sponge.squeeze(&mut out);
        self.sponge.reset();
        out
    }

    fn get_copy(&self) -> Box<dyn Hash> {
        Box::new(self.clone())
    }

    fn reset(&mut self) {
        self.sponge.reset();
    }
}

/// SHAKE extendable-output function (rate 168 for SHAKE-128, 136 for
/// SHAKE-256).
#[derive(Clone)]
pub struct Shake {
    sponge: Sponge,
}

impl Shake {
    /// Builds a SHAKE instance from its rate in bytes.
    pub fn new(rate: usize) -> Self {
        Self { sponge: Sponge::new(rate, 0x1f) }
    }

    /// One-shot absorb-then-squeeze convenience.
    pub fn digest(rate: usize, data: &[u8], out: &mut [u8]) {
        let mut x = Self::new(rate);
        x.absorb(data);
        x.squeeze(out);
    }
}

impl Xof for Shake {
    fn absorb(&mut self, data: &[u8]) {
        self.sponge.absorb(data);
    }

    fn squeeze(&mut self, out: &mut [u8]) {
        self.sponge.squeeze(out);
    }

    fn get_copy(&self) -> Box<dyn Xof> {
        Box::new(self.clone())
    }

    fn reset(&mut self) {
        self.sponge.reset();
    }
}

/// SHAKE-128 one-shot.
pub fn shake128(data: &[u8], out: &mut [u8]) {
    Shake::digest(168, data, out);
}

/// SHAKE-256 one-shot.
pub fn shake256(data: &[u8], out: &mut [u8]) {
    Shake::digest(136, data, out);
}
