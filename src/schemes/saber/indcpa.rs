//! Saber IND-CPA core: LWR rounding shifts, Toom-Cook products, bit
//! packing.

use super::{EP, EQ, N, SEED_BYTES, SaberParams};
use crate::core::poly;
use crate::error::Result;
use crate::hash::Xof;
use crate::hash::sha3::{Shake, shake128};
use crate::packing::{Packer, Unpacker};
use crate::sampling;

const MASK_Q: u16 = (1 << EQ) - 1;
const MASK_P: u16 = (1 << EP) - 1;

/// Expanded IND-CPA key pair.
pub struct IndcpaKeys {
    /// Packed public key (`b` ‖ seedA).
    pub public: Vec<u8>,
    /// Packed secret vector `s`.
    pub secret: Vec<u8>,
}

/// Derives the `l×l` matrix A mod q from seedA.
fn gen_matrix(params: &SaberParams, seed_a: &[u8]) -> Result<Vec<u16>> {
    let l = params.l;
    let total = l * l * N;

    let mut bytes = vec![0u8; total * EQ / 8];
    let mut xof = Shake::new(168);
    xof.absorb(seed_a);
    xof.squeeze(&mut bytes);

    let mut up = Unpacker::new(&bytes);
    (0..total).map(|_| up.read(EQ).map(|v| v as u16)).collect()
}

/// Samples the secret vector from the binomial distribution β_μ.
fn gen_secret(params: &SaberParams, seed_s: &[u8]) -> Vec<u16> {
    let mut prf = Shake::new(168);
    prf.absorb(seed_s);

    let mut tmp = vec![0i32; params.l * N];
    sampling::cbd(&mut prf, params.mu / 2, &mut tmp);

    tmp.iter().map(|&c| (c as u16) & MASK_Q).collect()
}

/// Accumulating negacyclic product: `acc += a · b` mod `x^N + 1`, mod
/// 2^16 (masked later).
fn mul_acc(acc: &mut [u16], a: &[u16], b: &[u16]) {
    let prod = poly::mul_negacyclic(a, b);
    for (x, &p) in acc.iter_mut().zip(prod.iter()) {
        *x = x.wrapping_add(p);
    }
}

/// Matrix-vector product `A·s` (or `Aᵀ·s`), all polynomials mod q.
fn matrix_vector(params: &SaberParams, a: &[u16], s: &[u16], transposed: bool) -> Vec<u16> {
    let l = params.l;
    let mut out = vec![0u16; l * N];

    for i in 0..l {
        for j in 0..l {
            let idx = if transposed { j * l + i } else { i * l + j };
            let row = &a[idx * N..(idx + 1) * N];
            let sv = &s[j * N..(j + 1) * N];
            let acc = &mut out[i * N..(i + 1) * N];
            mul_acc(acc, row, sv);
        }
    }

    for x in out.iter_mut() {
        *x &= MASK_Q;
    }
    out
}

/// Inner product of two `l`-vectors mod p.
fn inner_product(params: &SaberParams, a: &[u16], b: &[u16]) -> Vec<u16> {
    let mut out = vec![0u16; N];
    for j in 0..params.l {
        mul_acc(&mut out, &a[j * N..(j + 1) * N], &b[j * N..(j + 1) * N]);
    }
    for x in out.iter_mut() {
        *x &= MASK_P;
    }
    out
}

fn pack(v: &[u16], bits: usize) -> Result<Vec<u8>> {
    let mut p = Packer::new(v.len() * bits / 8 + 8);
    for &c in v {
        p.write((c & ((1 << bits) - 1)) as u32, bits)?;
    }
    p.finish()
}

fn unpack(bytes: &[u8], count: usize, bits: usize) -> Result<Vec<u16>> {
    let mut u = Unpacker::new(bytes);
    (0..count).map(|_| u.read(bits).map(|v| v as u16)).collect()
}

/// Key generation: `b = (A·s + h1) >> (eq − ep)`.
pub fn keygen(
    params: &SaberParams,
    seed_a_raw: &[u8; SEED_BYTES],
    seed_s: &[u8; SEED_BYTES],
) -> Result<IndcpaKeys> {
    // The public seed is laundered through the XOF before use.
    let mut seed_a = [0u8; SEED_BYTES];
    shake128(seed_a_raw, &mut seed_a);

    let a = gen_matrix(params, &seed_a)?;
    let s = gen_secret(params, seed_s);

    let mut b = matrix_vector(params, &a, &s, false);
    let h1 = params.h1();
    for x in b.iter_mut() {
        *x = (x.wrapping_add(h1) & MASK_Q) >> (EQ - EP);
    }

    let mut public = pack(&b, EP)?;
    public.extend_from_slice(&seed_a);

    Ok(IndcpaKeys { public, secret: pack(&s, EQ)? })
}

/// Encryption of a 32-byte message under deterministic coins.
pub fn encrypt(
    params: &SaberParams,
    public: &[u8],
    msg: &[u8; 32],
    coins: &[u8; SEED_BYTES],
) -> Result<Vec<u8>> {
    let l = params.l;
    let b_len = l * N * EP / 8;

    let b = unpack(&public[..b_len], l * N, EP)?;
    let seed_a = &public[b_len..b_len + SEED_BYTES];

    let a = gen_matrix(params, seed_a)?;
    let sp = gen_secret(params, coins);

    // b' = (Aᵀ·s' + h1) >> (eq − ep)
    let mut bp = matrix_vector(params, &a, &sp, true);
    let h1 = params.h1();
    for x in bp.iter_mut() {
        *x = (x.wrapping_add(h1) & MASK_Q) >> (EQ - EP);
    }

    // v' = bᵀ·(s' mod p)
    let sp_p: Vec<u16> = sp.iter().map(|&c| c & MASK_P).collect();
    let vp = inner_product(params, &b, &sp_p);

    // cm = (v' + h1 − m·2^(ep−1)) >> (ep − et)
    let et = params.et;
    let mut cm = vec![0u16; N];
    for (i, c) in cm.iter_mut().enumerate() {
        let bit = ((msg[i / 8] >> (i % 8)) & 1) as u16;
        let v = vp[i]
            .wrapping_sub(bit << (EP - 1))
            .wrapping_add(h1)
            & MASK_P;
        *c = v >> (EP - et);
    }

    let mut ct_bytes = pack(&bp, EP)?;
    ct_bytes.extend_from_slice(&pack(&cm, et)?);
    Ok(ct_bytes)
}

/// Decryption: `m = ((v + h2 − cm·2^(ep−et)) >> (ep − 1)) & 1`.
pub fn decrypt(params: &SaberParams, secret: &[u8], ct_bytes: &[u8]) -> Result<[u8; 32]> {
    let l = params.l;
    let et = params.et;
    let b_len = l * N * EP / 8;

    let s = unpack(secret, l * N, EQ)?;
    let bp = unpack(&ct_bytes[..b_len], l * N, EP)?;
    let cm = unpack(&ct_bytes[b_len..], N, et)?;

    // Secrets are small and signed; reduce mod p for the inner product.
    let s_p: Vec<u16> = s.iter().map(|&c| c & MASK_P).collect();
    let v = inner_product(params, &bp, &s_p);

    let h2 = params.h2();
    let mut msg = [0u8; 32];
    for i in 0..N {
        let t = v[i]
            .wrapping_add(h2)
            .wrapping_sub(cm[i] << (EP - et))
            & MASK_P;
        let bit = (t >> (EP - 1)) & 1;
        msg[i / 8] |= (bit as u8) << (i % 8);
    }

    Ok(msg)
}
