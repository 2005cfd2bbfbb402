//! Saber KEM: the same Fujisaki–Okamoto shape as Kyber's, over the LWR
//! core — hash the public key and message into pre-key, coins and tag,
//! re-encrypt on decapsulation, and substitute the rejection secret in
//! constant time on mismatch.

use super::{SEED_BYTES, SaberParams, indcpa};
use crate::core::ct;
use crate::error::{Error, Result};
use crate::hash::sha3::shake256;
use crate::hash::{HashAlg, digest};
use crate::rng::Csprng;

/// KEM key pair.
pub struct KemKeys {
    pub public: Vec<u8>,
    pub secret: Vec<u8>,
}

/// Ciphertext length: IND-CPA ciphertext plus the confirmation tag.
pub fn ciphertext_bytes(params: &SaberParams) -> usize {
    params.ciphertext_bytes() + 32
}

/// Secret-key layout: `s ‖ pk ‖ z`.
pub fn secret_key_bytes(params: &SaberParams) -> usize {
    params.indcpa_secret_key_bytes() + params.public_key_bytes() + 32
}

fn g(public: &[u8], m: &[u8; 32]) -> ([u8; 32], [u8; 32], [u8; 32]) {
    let mut input = public.to_vec();
    input.extend_from_slice(m);

    let mut out = [0u8; 96];
    shake256(&input, &mut out);

    let mut khat = [0u8; 32];
    let mut r = [0u8; 32];
    let mut d = [0u8; 32];
    khat.copy_from_slice(&out[..32]);
    r.copy_from_slice(&out[32..64]);
    d.copy_from_slice(&out[64..]);
    (khat, r, d)
}

fn derive_key(khat: &[u8; 32], ct_bytes: &[u8]) -> [u8; 32] {
    let mut input = khat.to_vec();
    input.extend_from_slice(ct_bytes);
    let h = digest(HashAlg::Sha3_256, &input);
    let mut k = [0u8; 32];
    k.copy_from_slice(&h);
    k
}

/// KEM key generation.
pub fn keygen(params: &SaberParams, prng: &mut Csprng) -> Result<KemKeys> {
    let mut seed_a = [0u8; SEED_BYTES];
    let mut seed_s = [0u8; SEED_BYTES];
    let mut z = [0u8; 32];
    prng.get_mem(&mut seed_a)?;
    prng.get_mem(&mut seed_s)?;
    prng.get_mem(&mut z)?;

    keygen_from_seeds(params, &seed_a, &seed_s, &z)
}

/// Deterministic KEM key generation from explicit seeds.
pub fn keygen_from_seeds(
    params: &SaberParams,
    seed_a: &[u8; SEED_BYTES],
    seed_s: &[u8; SEED_BYTES],
    z: &[u8; 32],
) -> Result<KemKeys> {
    let keys = indcpa::keygen(params, seed_a, seed_s)?;

    let mut secret = keys.secret;
    secret.extend_from_slice(&keys.public);
    secret.extend_from_slice(z);

    Ok(KemKeys { public: keys.public, secret })
}

/// Encapsulation.
pub fn encapsulate(
    params: &SaberParams,
    public: &[u8],
    prng: &mut Csprng,
) -> Result<(Vec<u8>, [u8; 32])> {
    let mut m = [0u8; 32];
    prng.get_mem(&mut m)?;
    encapsulate_with_m(params, public, &m)
}

/// Deterministic encapsulation from explicit message coins.
pub fn encapsulate_with_m(
    params: &SaberParams,
    public: &[u8],
    m: &[u8; 32],
) -> Result<(Vec<u8>, [u8; 32])> {
    if public.len() != params.public_key_bytes() {
        return Err(Error::InvalidKey);
    }

    let (khat, r, d) = g(public, m);

    let mut ct_bytes = indcpa::encrypt(params, public, m, &r)?;
    ct_bytes.extend_from_slice(&d);

    let key = derive_key(&khat, &ct_bytes);
    Ok((ct_bytes, key))
}

/// Decapsulation with the constant-time FO check.
pub fn decapsulate(params: &SaberParams, secret: &[u8], ct_bytes: &[u8]) -> Result<[u8; 32]> {
    if secret.len() != secret_key_bytes(params) || ct_bytes.len() != ciphertext_bytes(params) {
        return Err(Error::DecryptionFailure);
    }

    let sk_len = params.indcpa_secret_key_bytes();
    let pk_len = params.public_key_bytes();
    let (sk, rest) = secret.split_at(sk_len);
    let (public, z) = rest.split_at(pk_len);

    let m = indcpa::decrypt(params, sk, &ct_bytes[..params.ciphertext_bytes()])?;

    let (khat, r, d) = g(public, &m);
    let mut ct_check = indcpa::encrypt(params, public, &m, &r)?;
    ct_check.extend_from_slice(&d);

    let ok = ct::bytes_eq(&ct_check, ct_bytes);

    let mut pre = khat;
    ct::bytes_cmov(ok ^ 1, &mut pre, z);

    Ok(derive_key(&pre, ct_bytes))
}
