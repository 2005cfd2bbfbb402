//! RSASSA-PSS signatures (PKCS#1 v2.2 §8.1).
//!
//! Encoding and verification over `emBits = modBits − 1`; the recovered
//! hash comparison and the padding checks in verification are
//! constant-time.

use super::mgf1::mgf1;
use super::{RsaPrivateKey, RsaPublicKey};
use crate::core::ct;
use crate::core::limb::Limb;
use crate::core::mpz::{ByteOrder, Mpz};
use crate::error::{Error, Result};
use crate::hash::{HashAlg, digest, hash_new};
use crate::rng::Csprng;

fn em_geometry<L: Limb>(pk: &RsaPublicKey<L>) -> (usize, usize) {
    let em_bits = pk.ctx.mod_bits() - 1;
    (em_bits, em_bits.div_ceil(8))
}

fn hash_m_prime(alg: HashAlg, m_hash: &[u8], salt: &[u8]) -> Vec<u8> {
    let mut h = hash_new(alg);
    h.update(&[0u8; 8]);
    h.update(m_hash);
    h.update(salt);
    h.finalize()
}

/// PSS signature of `msg` with an `s_len`-byte random salt.
pub fn sign<L: Limb>(
    prng: &mut Csprng,
    sk: &RsaPrivateKey<L>,
    alg: HashAlg,
    s_len: usize,
    msg: &[u8],
) -> Result<Vec<u8>> {
    let (em_bits, em_len) = em_geometry(&sk.public);
    let m_hash = digest(alg, msg);
    let hlen = m_hash.len();

    if em_len < hlen + s_len + 2 {
        return Err(Error::InsufficientBuffer);
    }

    let mut salt = vec![0u8; s_len];
    prng.get_mem(&mut salt)?;

    let h = hash_m_prime(alg, &m_hash, &salt);

    // DB = 0^(emLen − sLen − hLen − 2) ‖ 0x01 ‖ salt
    let mut db = vec![0u8; em_len - s_len - hlen - 2];
    db.push(0x01);
    db.extend_from_slice(&salt);

    let db_mask = mgf1(alg, &h, em_len - hlen - 1);
    for (d, m) in db.iter_mut().zip(db_mask.iter()) {
        *d ^= m;
    }

    // Clear the bits above emBits.
    db[0] &= 0xff >> (8 * em_len - em_bits);

    let mut em = db;
    em.extend_from_slice(&h);
    em.push(0xbc);

    let m = Mpz::from_bytes(&em, ByteOrder::BigEndian);
    let s = sk.private_op(&m)?;
    s.to_bytes(ByteOrder::BigEndian, sk.public.byte_len())
}

/// PSS verification; returns `Ok(())` only for a valid signature.
pub fn verify<L: Limb>(
    pk: &RsaPublicKey<L>,
    alg: HashAlg,
    s_len: usize,
    msg: &[u8],
    sig: &[u8],
) -> Result<()> {
    let (em_bits, em_len) = em_geometry(pk);
    let m_hash = digest(alg, msg);
    let hlen = m_hash.len();

    if sig.len() != pk.byte_len() || em_len < hlen + s_len + 2 {
        return Err(Error::InvalidSignature);
    }

    let s = Mpz::from_bytes(sig, ByteOrder::BigEndian);
    if s.cmp_abs(&pk.n) != core::cmp::Ordering::Less {
        return Err(Error::InvalidSignature);
    }

    let m = pk.public_op(&s).map_err(|_| Error::InvalidSignature)?;
    let em = m
        .to_bytes(ByteOrder::BigEndian, em_len)
        .map_err(|_| Error::InvalidSignature)?;

    let mut failure = ct::eq::<u8>(em[em_len - 1], 0xbc) ^ 1;

    let (masked_db, tail) = em.split_at(em_len - hlen - 1);
    let h = &tail[..hlen];

    // The cleared top bits must be zero.
    failure |= ct::eq::<u8>(masked_db[0] & !(0xff >> (8 * em_len - em_bits)), 0) ^ 1;

    let db_mask = mgf1(alg, h, em_len - hlen - 1);
    let mut db: Vec<u8> = masked_db.iter().zip(db_mask.iter()).map(|(a, b)| a ^ b).collect();
    db[0] &= 0xff >> (8 * em_len - em_bits);

    // DB must be 0^pslen ‖ 0x01 ‖ salt.
    let ps_len = em_len - hlen - s_len - 2;
    for &b in &db[..ps_len] {
        failure |= ct::eq::<u8>(b, 0) ^ 1;
    }
    failure |= ct::eq::<u8>(db[ps_len], 0x01) ^ 1;

    let salt = &db[ps_len + 1..];
    let h_prime = hash_m_prime(alg, &m_hash, salt);
    failure |= ct::bytes_eq(&h_prime, h) ^ 1;

    if failure != 0 {
        return Err(Error::InvalidSignature);
    }
    Ok(())
}
