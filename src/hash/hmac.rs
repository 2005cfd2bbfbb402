//! HMAC over any crate hash.
//!
//! Used by the deterministic ECDSA nonce derivation (RFC 6979) and
//! available to protocol layers. Keys longer than the block size are
//! hashed first, per RFC 2104.

use super::{Hash, HashAlg, hash_new};

/// Streaming HMAC state.
pub struct Hmac {
    inner: Box<dyn Hash>,
    outer: Box<dyn Hash>,
}

impl Hmac {
    /// Creates an HMAC instance keyed with `key`.
    pub fn new(alg: HashAlg, key: &[u8]) -> Self {
        let mut inner = hash_new(alg);
        let mut outer = hash_new(alg);
        let block = inner.block_len();

        let mut k = vec![0u8; block];
        if key.len() > block {
            let mut h = hash_new(alg);
            h.update(key);
            let d = h.finalize();
            k[..d.len()].copy_from_slice(&d);
        } else {
            k[..key.len()].copy_from_slice(key);
        }

        let ipad: Vec<u8> = k.iter().map(|&b| b ^ 0x36).collect();
        let opad: Vec<u8> = k.iter().map(|&b| b ^ 0x5c).collect();

        inner.update(&ipad);
        outer.update(&opad);

        Self { inner, outer }
    }

    /// Absorbs message bytes.
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Produces the authentication tag.
    pub fn finalize(mut self) -> Vec<u8> {
        let d = self.inner.finalize();
        self.outer.update(&d);
        self.outer.finalize()
    }

    /// One-shot convenience.
    pub fn mac(alg: HashAlg, key: &[u8], data: &[u8]) -> Vec<u8> {
        let mut h = Self::new(alg, key);
        h.update(data);
        h.finalize()
    }
}
