//! Kyber KEM: Fujisaki–Okamoto transform over the IND-CPA core.
//!
//! Encapsulation splits `G(pk ‖ m)` into the pre-key, the encryption
//! coins and a confirmation tag appended to the ciphertext; the session
//! key is `H(K̂ ‖ c)`. Decapsulation re-encrypts and compares the full
//! ciphertext in constant time, substituting the rejection secret `z`
//! into the key derivation on mismatch without branching.

use super::{KyberParams, SYM_BYTES, indcpa};
use crate::core::ct;
use crate::error::{Error, Result};
use crate::hash::sha3::shake256;
use crate::hash::{HashAlg, digest};
use crate::rng::Csprng;

/// KEM key pair: the secret side carries the IND-CPA secret, a copy of
/// the public key, and the rejection secret `z`.
pub struct KemKeys {
    pub public: Vec<u8>,
    pub secret: Vec<u8>,
}

/// KEM ciphertext length: IND-CPA ciphertext plus the confirmation tag.
pub fn ciphertext_bytes(params: &KyberParams) -> usize {
    params.ciphertext_bytes() + SYM_BYTES
}

/// Secret-key layout: `s ‖ pk ‖ z`.
pub fn secret_key_bytes(params: &KyberParams) -> usize {
    params.indcpa_secret_key_bytes() + params.public_key_bytes() + SYM_BYTES
}

/// `(K̂, r, d) = G(pk ‖ m)`: 96 bytes of SHAKE-256.
fn g(public: &[u8], m: &[u8; SYM_BYTES]) -> ([u8; 32], [u8; 32], [u8; 32]) {
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

/// `K = H(K̂ ‖ c)`.
fn derive_key(khat: &[u8; 32], ct_bytes: &[u8]) -> [u8; 32] {
    let mut input = khat.to_vec();
    input.extend_from_slice(ct_bytes);
    let h = digest(HashAlg::Sha3_256, &input);
    let mut k = [0u8; 32];
    k.copy_from_slice(&h);
    k
}

/// KEM key generation.
pub fn keygen(params: &KyberParams, prng: &mut Csprng) -> Result<KemKeys> {
    let mut seed = [0u8; SYM_BYTES];
    prng.get_mem(&mut seed)?;
    let mut z = [0u8; SYM_BYTES];
    prng.get_mem(&mut z)?;

    keygen_from_seeds(params, &seed, &z)
}

/// Deterministic KEM key generation from explicit seeds.
pub fn keygen_from_seeds(
    params: &KyberParams,
    seed: &[u8; SYM_BYTES],
    z: &[u8; SYM_BYTES],
) -> Result<KemKeys> {
    let keys = indcpa::keygen(params, seed)?;

    let mut secret = keys.secret;
    secret.extend_from_slice(&keys.public);
    secret.extend_from_slice(z);

    Ok(KemKeys { public: keys.public, secret })
}

/// Encapsulation: returns `(ciphertext, shared key)`.
pub fn encapsulate(
    params: &KyberParams,
    public: &[u8],
    prng: &mut Csprng,
) -> Result<(Vec<u8>, [u8; 32])> {
    let mut m = [0u8; SYM_BYTES];
    prng.get_mem(&mut m)?;
    encapsulate_with_m(params, public, &m)
}

/// Deterministic encapsulation from explicit message coins.
pub fn encapsulate_with_m(
    params: &KyberParams,
    public: &[u8],
    m: &[u8; SYM_BYTES],
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

/// Decapsulation: the FO re-encryption check runs over the whole
/// ciphertext (including the tag) in constant time, and a mismatch swaps
/// in the `z`-derived key without a secret-dependent branch.
pub fn decapsulate(params: &KyberParams, secret: &[u8], ct_bytes: &[u8]) -> Result<[u8; 32]> {
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

    // K̂' replaced by z on failure, constant time.
    let mut pre = khat;
    ct::bytes_cmov(ok ^ 1, &mut pre, z);

    Ok(derive_key(&pre, ct_bytes))
}
