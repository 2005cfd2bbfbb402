//! MGF1 mask generation (PKCS#1 §B.2.1).

use crate::hash::{HashAlg, hash_new};

/// Expands `seed` into `len` mask bytes with the configured hash, counter
/// mode over a 4-byte big-endian counter.
pub fn mgf1(alg: HashAlg, seed: &[u8], len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    let mut counter = 0u32;

    while out.len() < len {
        let mut h = hash_new(alg);
        h.update(seed);
        h.update(&counter.to_be_bytes());
        let block = h.finalize();

        let take = (len - out.len()).min(block.len());
        out.extend_from_slice(&block[..take]);
        counter += 1;
    }

    out
}
