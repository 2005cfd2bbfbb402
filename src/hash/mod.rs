//! Cryptographic hash functions and extendable-output functions.
//!
//! One interface serves every scheme core: a [`Hash`] computes a
//! fixed-length digest through `update`/`finalize`, an [`Xof`] absorbs then
//! squeezes an arbitrary-length stream. Both progress through the states
//! *absorbing → squeezing/done*; `get_copy` clones the full internal state,
//! which is what the tree-hashing and rewind call sites rely on.
//!
//! The SHA-2 cores load message words big-endian, Keccak little-endian;
//! both byte-swap on hosts of the opposite endianness so digests are
//! identical everywhere.

pub mod hmac;
pub mod keccak;
pub mod sha2;
pub mod sha3;

use crate::error::{Error, Result};

/// Hash algorithm identifiers (§6 catalogue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlg {
    Sha2_224,
    Sha2_256,
    Sha2_384,
    Sha2_512,
    Sha2_512_224,
    Sha2_512_256,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
}

/// XOF algorithm identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XofAlg {
    Shake128,
    Shake256,
}

/// Fixed-output-length hash state.
pub trait Hash {
    /// Digest length in bytes.
    fn output_len(&self) -> usize;

    /// Internal block length in bytes (HMAC needs it).
    fn block_len(&self) -> usize;

    /// Absorbs message bytes.
    fn update(&mut self, data: &[u8]);

    /// Completes the computation and returns the digest, resetting the
    /// state for reuse.
    fn finalize(&mut self) -> Vec<u8>;

    /// Deep copy of the current state.
    fn get_copy(&self) -> Box<dyn Hash>;

    /// Restores the initial state.
    fn reset(&mut self);
}

/// Extendable-output function state.
pub trait Xof {
    /// Absorbs input bytes; only legal before the first squeeze.
    fn absorb(&mut self, data: &[u8]);

    /// Squeezes `out.len()` bytes, switching to the squeezing state on the
    /// first call.
    fn squeeze(&mut self, out: &mut [u8]);

    /// Deep copy of the current state.
    fn get_copy(&self) -> Box<dyn Xof>;

    /// Restores the initial state.
    fn reset(&mut self);
}

/// Instantiates a hash by identifier.
pub fn hash_new(alg: HashAlg) -> Box<dyn Hash> {
    match alg {
        HashAlg::Sha2_224 => Box::new(sha2::Sha224::new()),
        HashAlg::Sha2_256 => Box::new(sha2::Sha256::new()),
        HashAlg::Sha2_384 => Box::new(sha2::Sha384::new()),
        HashAlg::Sha2_512 => Box::new(sha2::Sha512::new()),
        HashAlg::Sha2_512_224 => Box::new(sha2::Sha512_224::new()),
        HashAlg::Sha2_512_256 => Box::new(sha2::Sha512_256::new()),
        HashAlg::Sha3_224 => Box::new(sha3::Sha3::new(28)),
        HashAlg::Sha3_256 => Box::new(sha3::Sha3::new(32)),
        HashAlg::Sha3_384 => Box::new(sha3::Sha3::new(48)),
        HashAlg::Sha3_512 => Box::new(sha3::Sha3::new(64)),
    }
}

/// Instantiates a hash from its digest length in bits.
pub fn hash_from_bits(out_bits: usize, keccak: bool) -> Result<Box<dyn Hash>> {
    let alg = match (out_bits, keccak) {
        (224, false) => HashAlg::Sha2_224,
        (256, false) => HashAlg::Sha2_256,
        (384, false) => HashAlg::Sha2_384,
        (512, false) => HashAlg::Sha2_512,
        (224, true) => HashAlg::Sha3_224,
        (256, true) => HashAlg::Sha3_256,
        (384, true) => HashAlg::Sha3_384,
        (512, true) => HashAlg::Sha3_512,
        _ => return Err(Error::InvalidParameterSet),
    };
    Ok(hash_new(alg))
}

/// Instantiates an XOF by identifier.
pub fn xof_new(alg: XofAlg) -> Box<dyn Xof> {
    match alg {
        XofAlg::Shake128 => Box::new(sha3::Shake::new(168)),
        XofAlg::Shake256 => Box::new(sha3::Shake::new(136)),
    }
}

/// One-shot digest convenience.
pub fn digest(alg: HashAlg, data: &[u8]) -> Vec<u8> {
    let mut h = hash_new(alg);
    h.update(data);
    h.finalize()
}
