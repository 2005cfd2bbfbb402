//! RSAES-OAEP encryption (PKCS#1 v2.2 §7.1).
//!
//! Decoding folds every padding check — the leading zero octet, the label
//! hash comparison and the 0x01 separator scan — into a single
//! constant-time failure accumulator; the function's result depends only
//! on that accumulator's final value, never on which check tripped first.

use super::mgf1::mgf1;
use super::{RsaPrivateKey, RsaPublicKey};
use crate::core::ct;
use crate::core::limb::Limb;
use crate::core::mpz::{ByteOrder, Mpz};
use crate::error::{Error, Result};
use crate::hash::{HashAlg, digest};
use crate::rng::Csprng;

/// Maximum plaintext length for a `k`-byte modulus.
pub fn max_msg_len(k: usize, alg: HashAlg) -> usize {
    let hlen = digest(alg, &[]).len();
    k.saturating_sub(2 * hlen + 2)
}

/// OAEP encryption of `pt` under `pk` with label `label`.
pub fn encrypt<L: Limb>(
    prng: &mut Csprng,
    pk: &RsaPublicKey<L>,
    alg: HashAlg,
    label: &[u8],
    pt: &[u8],
) -> Result<Vec<u8>> {
    let k = pk.byte_len();
    let lhash = digest(alg, label);
    let hlen = lhash.len();

    if pt.len() > k.saturating_sub(2 * hlen + 2) {
        return Err(Error::InsufficientBuffer);
    }

    // DB = lHash ‖ 0^pslen ‖ 0x01 ‖ pt
    let pslen = k - pt.len() - 2 * hlen - 2;
    let mut db = Vec::with_capacity(k - hlen - 1);
    db.extend_from_slice(&lhash);
    db.extend(core::iter::repeat_n(0u8, pslen));
    db.push(0x01);
    db.extend_from_slice(pt);

    let mut seed = vec![0u8; hlen];
    prng.get_mem(&mut seed)?;

    let db_mask = mgf1(alg, &seed, k - hlen - 1);
    for (d, m) in db.iter_mut().zip(db_mask.iter()) {
        *d ^= m;
    }

    let seed_mask = mgf1(alg, &db, hlen);
    for (s, m) in seed.iter_mut().zip(seed_mask.iter()) {
        *s ^= m;
    }

    // EM = 0x00 ‖ maskedSeed ‖ maskedDB
    let mut em = Vec::with_capacity(k);
    em.push(0x00);
    em.extend_from_slice(&seed);
    em.extend_from_slice(&db);

    let m = Mpz::from_bytes(&em, ByteOrder::BigEndian);
    let c = pk.public_op(&m)?;
    c.to_bytes(ByteOrder::BigEndian, k)
}

/// OAEP decryption.
pub fn decrypt<L: Limb>(
    sk: &RsaPrivateKey<L>,
    alg: HashAlg,
    label: &[u8],
    ct_bytes: &[u8],
) -> Result<Vec<u8>> {
    let k = sk.public.byte_len();
    let lhash = digest(alg, label);
    let hlen = lhash.len();

    if ct_bytes.len() != k || k < 2 * hlen + 2 {
        return Err(Error::DecryptionFailure);
    }

    let c = Mpz::from_bytes(ct_bytes, ByteOrder::BigEndian);
    if c.cmp_abs(&sk.public.n) != core::cmp::Ordering::Less {
        return Err(Error::DecryptionFailure);
    }

    let m = sk.private_op(&c)?;
    let em = m
        .to_bytes(ByteOrder::BigEndian, k)
        .map_err(|_| Error::DecryptionFailure)?;

    let (y, rest) = em.split_first().ok_or(Error::DecryptionFailure)?;
    let (masked_seed, masked_db) = rest.split_at(hlen);

    let seed_mask = mgf1(alg, masked_db, hlen);
    let seed: Vec<u8> = masked_seed.iter().zip(seed_mask.iter()).map(|(a, b)| a ^ b).collect();

    let db_mask = mgf1(alg, &seed, k - hlen - 1);
    let db: Vec<u8> = masked_db.iter().zip(db_mask.iter()).map(|(a, b)| a ^ b).collect();

    // Single failure accumulator over every structural check.
    let mut failure = ct::eq::<u8>(*y, 0) ^ 1;
    failure |= ct::bytes_eq(&db[..hlen], &lhash) ^ 1;

    // Scan the padding for the 0x01 separator without data-dependent
    // branches: the first non-zero byte must be 0x01.
    let mut found: u8 = 0;
    let mut index: usize = 0;
    for (i, &b) in db.iter().enumerate().skip(hlen) {
        let is_one = ct::eq::<u8>(b, 0x01);
        let is_zero = ct::eq::<u8>(b, 0x00);

        // A byte that is neither zero nor the marker, before the marker,
        // is a failure.
        failure |= (is_zero ^ 1) & (is_one ^ 1) & (found ^ 1);

        // Remember the first marker position.
        let first_hit = is_one & (found ^ 1);
        index += (i + 1) * first_hit as usize;
        found |= is_one;
    }
    failure |= found ^ 1;

    if failure != 0 || index == 0 {
        return Err(Error::DecryptionFailure);
    }

    Ok(db[index..].to_vec())
}
