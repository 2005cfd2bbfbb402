//! Kyber IND-CPA public-key encryption core.
//!
//! Matrix/vector arithmetic happens in the NTT domain: Â is rejection
//! sampled directly there from SHAKE-128(ρ), secrets and noise come from
//! CBD over a SHAKE-256 PRF, and every ring product is `basemul` through
//! the shared [`NttContext`]. Vectors are flat `k·256` coefficient
//! buffers.

use super::{KyberParams, N, Q, SYM_BYTES, compress_coeff, decompress_coeff, ntt_context};
use crate::core::poly;
use crate::error::Result;
use crate::hash::sha3::Shake;
use crate::hash::{HashAlg, Xof, digest};
use crate::packing::{Packer, Unpacker};
use crate::sampling;

/// Expanded IND-CPA key pair.
pub struct IndcpaKeys {
    /// Packed public key (`t` ‖ ρ).
    pub public: Vec<u8>,
    /// Packed secret vector `s` (NTT domain).
    pub secret: Vec<u8>,
}

/// Derives the matrix Â (optionally transposed) from ρ in the NTT domain.
fn gen_matrix(params: &KyberParams, rho: &[u8], transposed: bool) -> Vec<i32> {
    let k = params.k;
    let mut a = vec![0i32; k * k * N];

    for i in 0..k {
        for j in 0..k {
            let mut xof = Shake::new(168);
            xof.absorb(rho);
            if transposed {
                xof.absorb(&[i as u8, j as u8]);
            } else {
                xof.absorb(&[j as u8, i as u8]);
            }
            sampling::uniform_mod_q(&mut xof, Q as u32, &mut a[(i * k + j) * N..(i * k + j + 1) * N]);
        }
    }

    a
}

/// CBD sample of one polynomial from PRF(seed, nonce).
fn sample_noise(seed: &[u8], nonce: u8, eta: usize, out: &mut [i32]) {
    let mut prf = Shake::new(136);
    prf.absorb(seed);
    prf.absorb(&[nonce]);
    sampling::cbd(&mut prf, eta, out);
}

fn pack_vec(v: &[i32], bits: usize) -> Result<Vec<u8>> {
    let mut p = Packer::new(v.len() * bits / 8 + 8);
    for &c in v {
        p.write(poly::coeff_mod(c, Q) as u32, bits)?;
    }
    p.finish()
}

fn unpack_vec(bytes: &[u8], count: usize, bits: usize) -> Result<Vec<i32>> {
    let mut u = Unpacker::new(bytes);
    (0..count).map(|_| u.read(bits).map(|v| v as i32)).collect()
}

/// Key generation from a 32-byte seed: `(ρ, σ) = G(seed)`,
/// `t = Â·ŝ + ê` in the NTT domain.
pub fn keygen(params: &KyberParams, seed: &[u8; SYM_BYTES]) -> Result<IndcpaKeys> {
    let ntt = ntt_context();
    let k = params.k;

    let g = digest(HashAlg::Sha3_512, seed);
    let (rho, sigma) = g.split_at(SYM_BYTES);

    let a = gen_matrix(params, rho, false);

    let mut s = vec![0i32; k * N];
    let mut e = vec![0i32; k * N];
    let mut nonce = 0u8;
    for i in 0..k {
        sample_noise(sigma, nonce, params.eta1, &mut s[i * N..(i + 1) * N]);
        nonce += 1;
    }
    for i in 0..k {
        sample_noise(sigma, nonce, params.eta1, &mut e[i * N..(i + 1) * N]);
        nonce += 1;
    }

    for i in 0..k {
        ntt.forward(&mut s[i * N..(i + 1) * N]);
        ntt.forward(&mut e[i * N..(i + 1) * N]);
    }

    // t = Â·ŝ + ê (the basemul's R⁻¹ cancelled by a Montgomery lift).
    let mut t = vec![0i32; k * N];
    ntt.mul_acc_mont(&mut t, k, k, &a, &s);
    for i in 0..k {
        ntt.to_mont(&mut t[i * N..(i + 1) * N]);
    }
    poly::add(&mut t, &e);
    poly::reduce_mod(&mut t, Q);

    let mut public = pack_vec(&t, 12)?;
    public.extend_from_slice(rho);

    poly::reduce_mod(&mut s, Q);
    let secret = pack_vec(&s, 12)?;

    Ok(IndcpaKeys { public, secret })
}

/// IND-CPA encryption of a 32-byte message under `coins`.
pub fn encrypt(
    params: &KyberParams,
    public: &[u8],
    msg: &[u8; SYM_BYTES],
    coins: &[u8; SYM_BYTES],
) -> Result<Vec<u8>> {
    let ntt = ntt_context();
    let k = params.k;

    let t_len = k * N * 12 / 8;
    let t = unpack_vec(&public[..t_len], k * N, 12)?;
    let rho = &public[t_len..t_len + SYM_BYTES];

    let at = gen_matrix(params, rho, true);

    let mut r = vec![0i32; k * N];
    let mut e1 = vec![0i32; k * N];
    let mut e2 = vec![0i32; N];
    let mut nonce = 0u8;
    for i in 0..k {
        sample_noise(coins, nonce, params.eta1, &mut r[i * N..(i + 1) * N]);
        nonce += 1;
    }
    for i in 0..k {
        sample_noise(coins, nonce, params.eta2, &mut e1[i * N..(i + 1) * N]);
        nonce += 1;
    }
    sample_noise(coins, nonce, params.eta2, &mut e2);

    for i in 0..k {
        ntt.forward(&mut r[i * N..(i + 1) * N]);
    }

    // u = NTT⁻¹(Âᵀ·r̂) + e1
    let mut u = vec![0i32; k * N];
    ntt.mul_acc_mont(&mut u, k, k, &at, &r);
    for i in 0..k {
        ntt.inverse(&mut u[i * N..(i + 1) * N]);
    }
    poly::add(&mut u, &e1);
    poly::reduce_mod(&mut u, Q);

    // v = NTT⁻¹(t̂ᵀ·r̂) + e2 + ⌈q/2⌋·m
    let mut v = vec![0i32; N];
    ntt.mul_acc_mont(&mut v, 1, k, &t, &r);
    ntt.inverse(&mut v);
    poly::add(&mut v, &e2);
    for (i, c) in v.iter_mut().enumerate() {
        let bit = (msg[i / 8] >> (i % 8)) & 1;
        *c += bit as i32 * ((Q + 1) / 2);
    }
    poly::reduce_mod(&mut v, Q);

    // Compress u to du bits, v to dv bits.
    let mut p = Packer::new(params.ciphertext_bytes() + 8);
    for &c in &u {
        p.write(compress_coeff(c as u32, params.du, Q as u32), params.du)?;
    }
    for &c in &v {
        p.write(compress_coeff(c as u32, params.dv, Q as u32), params.dv)?;
    }
    p.finish()
}

/// IND-CPA decryption.
pub fn decrypt(params: &KyberParams, secret: &[u8], ct: &[u8]) -> Result<[u8; SYM_BYTES]> {
    let ntt = ntt_context();
    let k = params.k;

    let s = unpack_vec(secret, k * N, 12)?;

    let mut up = Unpacker::new(ct);
    let mut u = vec![0i32; k * N];
    for c in u.iter_mut() {
        *c = decompress_coeff(up.read(params.du)?, params.du, Q as u32) as i32;
    }
    let mut v = vec![0i32; N];
    for c in v.iter_mut() {
        *c = decompress_coeff(up.read(params.dv)?, params.dv, Q as u32) as i32;
    }

    for i in 0..k {
        ntt.forward(&mut u[i * N..(i + 1) * N]);
    }

    // m = v − NTT⁻¹(ŝᵀ·û)
    let mut sp = vec![0i32; N];
    ntt.mul_acc_mont(&mut sp, 1, k, &s, &u);
    ntt.inverse(&mut sp);

    poly::sub_mod(&mut v, &sp, Q);

    // Each coefficient decodes to 1 iff closer to q/2 than to 0.
    let mut msg = [0u8; SYM_BYTES];
    for (i, &c) in v.iter().enumerate() {
        let bit = compress_coeff(poly::coeff_mod(c, Q) as u32, 1, Q as u32);
        msg[i / 8] |= (bit as u8) << (i % 8);
    }

    Ok(msg)
}
