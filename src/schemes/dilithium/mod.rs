//! Dilithium lattice signatures.
//!
//! Module-lattice Fiat–Shamir-with-aborts over `Z_q[x]/(x^256 + 1)` with
//! `q = 8380417`. The complete NTT engine carries every ring product; the
//! rejection loop in [`sign`] restarts on any of the four norm/weight
//! checks and is capped so a pathological input surfaces as
//! [`Error::EntropyFailure`] rather than spinning.
//!
//! `Decompose` splits a canonical residue into `r1·α + r0` with
//! `|r0| <= α/2`; `MakeHint` records whether adding the correction moves
//! the high bits, and `UseHint` reconstructs them from the hint alone.

use crate::core::ntt::NttContext;
use crate::core::poly;
use crate::error::{Error, Result};
use crate::hash::Xof;
use crate::hash::sha3::{Shake, shake256};
use crate::packing::{Packer, Unpacker};
use crate::rng::Csprng;
use crate::sampling;

/// Ring degree.
pub const N: usize = 256;
/// Coefficient modulus.
pub const Q: i32 = 8380417;
/// Primitive 512th root of unity mod `Q`.
pub const ROOT: u32 = 1753;
/// Dropped bits in `Power2Round`.
pub const D: usize = 13;
/// Challenge-seed length in bytes.
pub const C_TILDE_BYTES: usize = 32;

/// Per-level parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DilithiumParams {
    pub k: usize,
    pub l: usize,
    pub eta: u32,
    /// `γ1`, a power of two.
    pub gamma1: i32,
    /// `γ2 = (q − 1)/88` or `(q − 1)/32`.
    pub gamma2: i32,
    /// Challenge weight τ.
    pub tau: usize,
    /// `β = τ·η`.
    pub beta: i32,
    /// Hint weight cap ω.
    pub omega: usize,
}

impl DilithiumParams {
    /// Dilithium-II.
    pub const D2: Self = Self {
        k: 4,
        l: 4,
        eta: 2,
        gamma1: 1 << 17,
        gamma2: (Q - 1) / 88,
        tau: 39,
        beta: 78,
        omega: 80,
    };

    /// Dilithium-III.
    pub const D3: Self = Self {
        k: 6,
        l: 5,
        eta: 4,
        gamma1: 1 << 19,
        gamma2: (Q - 1) / 32,
        tau: 49,
        beta: 196,
        omega: 55,
    };

    /// Dilithium-V.
    pub const D5: Self = Self {
        k: 8,
        l: 7,
        eta: 2,
        gamma1: 1 << 19,
        gamma2: (Q - 1) / 32,
        tau: 60,
        beta: 120,
        omega: 75,
    };

    /// Looks up a parameter set by security level index (0, 1, 2).
    pub fn by_set(set: usize) -> Result<Self> {
        match set {
            0 => Ok(Self::D2),
            1 => Ok(Self::D3),
            2 => Ok(Self::D5),
            _ => Err(Error::InvalidParameterSet),
        }
    }

    /// Bits per `z` coefficient (`log2(γ1) + 1`).
    pub fn z_bits(&self) -> usize {
        self.gamma1.trailing_zeros() as usize + 1
    }

    /// Bits per `t1` coefficient.
    pub fn t1_bits(&self) -> usize {
        23 - D
    }

    /// Public key: ρ plus packed `t1`.
    pub fn public_key_bytes(&self) -> usize {
        32 + self.k * N * self.t1_bits() / 8
    }

    /// Signature: challenge seed, packed `z`, hint bitmap.
    pub fn signature_bytes(&self) -> usize {
        C_TILDE_BYTES + self.l * N * self.z_bits() / 8 + self.k * N / 8
    }
}

fn ntt_context() -> NttContext {
    NttContext::new(N, Q, ROOT)
}

/// `Power2Round`: `r = r1·2^d + r0` with `|r0| <= 2^(d−1)`.
fn power2round(r: i32) -> (i32, i32) {
    let r1 = (r + (1 << (D - 1)) - 1) >> D;
    (r1, r - (r1 << D))
}

/// `Decompose`: `r = r1·α + r0` with `|r0| <= α/2` and the `q − 1` wrap
/// folded into `r1 = 0`.
fn decompose(params: &DilithiumParams, r: i32) -> (i32, i32) {
    let r = poly::coeff_mod(r, Q);
    let mut r1 = (r + 127) >> 7;

    if params.gamma2 == (Q - 1) / 32 {
        r1 = (r1 * 1025 + (1 << 21)) >> 22;
        r1 &= 15;
    } else {
        r1 = (r1 * 11275 + (1 << 23)) >> 24;
        r1 ^= ((43 - r1) >> 31) & r1;
    }

    let mut r0 = r - r1 * 2 * params.gamma2;
    r0 -= (((Q - 1) / 2 - r0) >> 31) & Q;
    (r1, r0)
}

/// High-bits projection.
fn high_bits(params: &DilithiumParams, r: i32) -> i32 {
    decompose(params, r).0
}

/// `MakeHint`: 1 iff the high bits of `r` and `r + z` differ.
fn make_hint(params: &DilithiumParams, z: i32, r: i32) -> i32 {
    (high_bits(params, r) != high_bits(params, poly::coeff_mod(r + z, Q))) as i32
}

/// `UseHint`: reconstructs the high bits of `r + z` from `r` and the
/// hint bit.
fn use_hint(params: &DilithiumParams, r: i32, hint: i32) -> i32 {
    let (r1, r0) = decompose(params, r);
    if hint == 0 {
        return r1;
    }

    if params.gamma2 == (Q - 1) / 32 {
        if r0 > 0 { (r1 + 1) & 15 } else { (r1 - 1) & 15 }
    } else if r0 > 0 {
        if r1 == 43 { 0 } else { r1 + 1 }
    } else if r1 == 0 {
        43
    } else {
        r1 - 1
    }
}

/// Expands Â from ρ, NTT domain, row-major `k × l`.
fn expand_a(params: &DilithiumParams, rho: &[u8]) -> Vec<i32> {
    let (k, l) = (params.k, params.l);
    let mut a = vec![0i32; k * l * N];

    for i in 0..k {
        for j in 0..l {
            let mut xof = Shake::new(168);
            xof.absorb(rho);
            xof.absorb(&[j as u8, i as u8]);
            sampling::uniform_mod_q(&mut xof, Q as u32, &mut a[(i * l + j) * N..(i * l + j + 1) * N]);
        }
    }

    a
}

/// Samples a short secret vector from SHAKE-256(seed ‖ nonce).
fn expand_s(params: &DilithiumParams, seed: &[u8], offset: u16, count: usize) -> Vec<i32> {
    let mut out = vec![0i32; count * N];

    for i in 0..count {
        let mut xof = Shake::new(136);
        xof.absorb(seed);
        xof.absorb(&(offset + i as u16).to_le_bytes());
        sampling::uniform_small(&mut xof, params.eta, &mut out[i * N..(i + 1) * N]);
    }

    out
}

/// `ExpandMask`: samples `y` with coefficients in `(−γ1, γ1]`.
fn expand_mask(params: &DilithiumParams, seed: &[u8], kappa: u16) -> Result<Vec<i32>> {
    let bits = params.z_bits();
    let mut y = vec![0i32; params.l * N];

    for i in 0..params.l {
        let mut xof = Shake::new(136);
        xof.absorb(seed);
        xof.absorb(&(kappa + i as u16).to_le_bytes());

        let mut bytes = vec![0u8; N * bits / 8];
        xof.squeeze(&mut bytes);

        let mut up = Unpacker::new(&bytes);
        for c in y[i * N..(i + 1) * N].iter_mut() {
            *c = params.gamma1 - up.read(bits)? as i32;
        }
    }

    Ok(y)
}

/// Challenge expansion: a ternary polynomial with exactly τ ±1 entries,
/// placed by Fisher–Yates from a SHAKE-256 stream whose prefix supplies
/// the sign bits.
fn challenge(params: &DilithiumParams, seed: &[u8]) -> Vec<i32> {
    let mut xof = Shake::new(136);
    xof.absorb(seed);

    let mut signs_bytes = [0u8; 8];
    xof.squeeze(&mut signs_bytes);
    let mut signs = u64::from_le_bytes(signs_bytes);

    let mut c = vec![0i32; N];
    for i in (N - params.tau)..N {
        let j = loop {
            let mut b = [0u8; 1];
            xof.squeeze(&mut b);
            if b[0] as usize <= i {
                break b[0] as usize;
            }
        };

        c[i] = c[j];
        c[j] = 1 - 2 * (signs & 1) as i32;
        signs >>= 1;
    }

    c
}

/// Key pair in packed form.
pub struct DilithiumKeys {
    /// `ρ ‖ pack(t1)`.
    pub public: Vec<u8>,
    /// `ρ ‖ K ‖ tr ‖ pack(s1) ‖ pack(s2) ‖ pack(t0)`.
    pub secret: Vec<u8>,
}

fn eta_bits(params: &DilithiumParams) -> usize {
    match params.eta {
        2 => 3,
        _ => 4,
    }
}

fn pack_signed(p: &mut Packer, v: &[i32], bits: usize, bias: i32) -> Result<()> {
    for &c in v {
        p.write((bias - c) as u32, bits)?;
    }
    Ok(())
}

fn unpack_signed(u: &mut Unpacker, count: usize, bits: usize, bias: i32) -> Result<Vec<i32>> {
    (0..count).map(|_| u.read(bits).map(|raw| bias - raw as i32)).collect()
}

/// Key generation from a 32-byte seed.
pub fn keygen_from_seed(params: &DilithiumParams, seed: &[u8; 32]) -> Result<DilithiumKeys> {
    let ntt = ntt_context();
    let (k, l) = (params.k, params.l);

    let mut expanded = [0u8; 128];
    shake256(seed, &mut expanded);
    let rho = &expanded[..32];
    let rhoprime = &expanded[32..96];
    let key = &expanded[96..128];

    let a = expand_a(params, rho);
    let s1 = expand_s(params, rhoprime, 0, l);
    let s2 = expand_s(params, rhoprime, l as u16, k);

    // t = A·s1 + s2
    let mut s1_hat = s1.clone();
    for i in 0..l {
        ntt.forward(&mut s1_hat[i * N..(i + 1) * N]);
    }
    let mut t = vec![0i32; k * N];
    ntt.mul_acc_mont(&mut t, k, l, &a, &s1_hat);
    for i in 0..k {
        ntt.inverse(&mut t[i * N..(i + 1) * N]);
    }
    poly::add(&mut t, &s2);
    poly::reduce_mod(&mut t, Q);

    // (t1, t0) = Power2Round(t)
    let mut t1 = vec![0i32; k * N];
    let mut t0 = vec![0i32; k * N];
    for i in 0..k * N {
        let (hi, lo) = power2round(t[i]);
        t1[i] = hi;
        t0[i] = lo;
    }

    let mut public = rho.to_vec();
    let mut p = Packer::new(params.public_key_bytes() + 8);
    for &c in &t1 {
        p.write(c as u32, params.t1_bits())?;
    }
    public.extend_from_slice(&p.finish()?);

    let mut tr = [0u8; 32];
    shake256(&public, &mut tr);

    let mut secret = rho.to_vec();
    secret.extend_from_slice(key);
    secret.extend_from_slice(&tr);

    let eb = eta_bits(params);
    let mut p = Packer::new((l + k) * N * eb / 8 + k * N * D / 8 + 16);
    pack_signed(&mut p, &s1, eb, params.eta as i32)?;
    pack_signed(&mut p, &s2, eb, params.eta as i32)?;
    pack_signed(&mut p, &t0, D, 1 << (D - 1))?;
    secret.extend_from_slice(&p.finish()?);

    Ok(DilithiumKeys { public, secret })
}

/// Randomized key generation.
pub fn keygen(params: &DilithiumParams, prng: &mut Csprng) -> Result<DilithiumKeys> {
    let mut seed = [0u8; 32];
    prng.get_mem(&mut seed)?;
    keygen_from_seed(params, &seed)
}

struct UnpackedSecret {
    rho: [u8; 32],
    key: [u8; 32],
    tr: [u8; 32],
    s1: Vec<i32>,
    s2: Vec<i32>,
    t0: Vec<i32>,
}

fn unpack_secret(params: &DilithiumParams, secret: &[u8]) -> Result<UnpackedSecret> {
    let (k, l) = (params.k, params.l);
    if secret.len() < 96 {
        return Err(Error::InvalidKey);
    }

    let mut rho = [0u8; 32];
    let mut key = [0u8; 32];
    let mut tr = [0u8; 32];
    rho.copy_from_slice(&secret[..32]);
    key.copy_from_slice(&secret[32..64]);
    tr.copy_from_slice(&secret[64..96]);

    let eb = eta_bits(params);
    let mut u = Unpacker::new(&secret[96..]);
    let s1 = unpack_signed(&mut u, l * N, eb, params.eta as i32)?;
    let s2 = unpack_signed(&mut u, k * N, eb, params.eta as i32)?;
    let t0 = unpack_signed(&mut u, k * N, D, 1 << (D - 1))?;

    Ok(UnpackedSecret { rho, key, tr, s1, s2, t0 })
}

/// Norm check over centered representatives: true when any coefficient
/// reaches the bound.
fn exceeds(v: &[i32], bound: i32) -> bool {
    v.iter().any(|&c| poly::center_coeff(c, Q).unsigned_abs() as i32 >= bound)
}

/// Signs `msg`, restarting on any norm failure.
///
/// Randomized when a CSPRNG is supplied; deterministic (per-key,
/// per-message) otherwise.
pub fn sign(
    params: &DilithiumParams,
    secret: &[u8],
    msg: &[u8],
    mut prng: Option<&mut Csprng>,
) -> Result<Vec<u8>> {
    let ntt = ntt_context();
    let (k, l) = (params.k, params.l);
    let sk = unpack_secret(params, secret)?;

    let a = expand_a(params, &sk.rho);

    // μ = H(tr ‖ m)
    let mut mu_input = sk.tr.to_vec();
    mu_input.extend_from_slice(msg);
    let mut mu = [0u8; 64];
    shake256(&mu_input, &mut mu);

    // ρ' = H(K ‖ rnd ‖ μ): rnd fresh per call when randomized.
    let mut rnd = [0u8; 32];
    if let Some(rng) = prng.as_deref_mut() {
        rng.get_mem(&mut rnd)?;
    }
    let mut rp_input = sk.key.to_vec();
    rp_input.extend_from_slice(&rnd);
    rp_input.extend_from_slice(&mu);
    let mut rhoprime = [0u8; 64];
    shake256(&rp_input, &mut rhoprime);

    // NTT images of the secrets, reused across restarts.
    let mut s1_hat = sk.s1.clone();
    for i in 0..l {
        poly::reduce_mod(&mut s1_hat[i * N..(i + 1) * N], Q);
        ntt.forward(&mut s1_hat[i * N..(i + 1) * N]);
    }
    let mut s2_hat = sk.s2.clone();
    for i in 0..k {
        poly::reduce_mod(&mut s2_hat[i * N..(i + 1) * N], Q);
        ntt.forward(&mut s2_hat[i * N..(i + 1) * N]);
    }
    let mut t0_hat = sk.t0.clone();
    for i in 0..k {
        poly::reduce_mod(&mut t0_hat[i * N..(i + 1) * N], Q);
        ntt.forward(&mut t0_hat[i * N..(i + 1) * N]);
    }

    let mul_vec = |c_hat: &[i32], v_hat: &[i32], count: usize| {
        let mut out = vec![0i32; count * N];
        for i in 0..count {
            let row = &mut out[i * N..(i + 1) * N];
            ntt.mul_montgomery(row, c_hat, &v_hat[i * N..(i + 1) * N]);
            ntt.inverse(row);
        }
        out
    };

    for kappa in (0..1000u16).map(|r| r * l as u16) {
        let mut y = expand_mask(params, &rhoprime, kappa)?;

        // w = A·y
        let mut y_hat = y.clone();
        for i in 0..l {
            poly::reduce_mod(&mut y_hat[i * N..(i + 1) * N], Q);
            ntt.forward(&mut y_hat[i * N..(i + 1) * N]);
        }
        let mut w = vec![0i32; k * N];
        ntt.mul_acc_mont(&mut w, k, l, &a, &y_hat);
        for i in 0..k {
            ntt.inverse(&mut w[i * N..(i + 1) * N]);
        }
        poly::reduce_mod(&mut w, Q);

        // (w1, w0) = Decompose(w)
        let mut w1 = vec![0i32; k * N];
        let mut w0 = vec![0i32; k * N];
        for i in 0..k * N {
            let (hi, lo) = decompose(params, w[i]);
            w1[i] = hi;
            w0[i] = lo;
        }

        // c = H(μ ‖ w1)
        let w1_bits = if params.gamma2 == (Q - 1) / 32 { 4 } else { 6 };
        let mut p = Packer::new(k * N * w1_bits / 8 + 8);
        for &c in &w1 {
            p.write(c as u32, w1_bits)?;
        }
        let mut c_input = mu.to_vec();
        c_input.extend_from_slice(&p.finish()?);
        let mut c_tilde = [0u8; C_TILDE_BYTES];
        shake256(&c_input, &mut c_tilde);

        let c = challenge(params, &c_tilde);
        let mut c_hat = c.clone();
        ntt.forward(&mut c_hat);

        // z = y + c·s1
        let cs1 = mul_vec(&c_hat, &s1_hat, l);
        poly::add(&mut y, &cs1);
        let z = y;
        if exceeds(&z, params.gamma1 - params.beta) {
            continue;
        }

        // r0 = LowBits(w − c·s2)
        let cs2 = mul_vec(&c_hat, &s2_hat, k);
        let mut w_cs2 = w.clone();
        poly::sub_mod(&mut w_cs2, &cs2, Q);
        let r0: Vec<i32> = w_cs2.iter().map(|&c| decompose(params, c).1).collect();
        if exceeds(&r0, params.gamma2 - params.beta) {
            continue;
        }

        // ct0 bound, then hints
        let ct0 = mul_vec(&c_hat, &t0_hat, k);
        if exceeds(&ct0, params.gamma2) {
            continue;
        }

        let mut with_ct0 = w_cs2.clone();
        poly::add_mod(&mut with_ct0, &ct0, Q);

        let mut hints = vec![0i32; k * N];
        let mut popcount = 0usize;
        for i in 0..k * N {
            let neg_ct0 = poly::coeff_mod(-ct0[i], Q);
            hints[i] = make_hint(params, neg_ct0, with_ct0[i]);
            popcount += hints[i] as usize;
        }
        if popcount > params.omega {
            continue;
        }

        // Signature: c~ ‖ pack(z) ‖ hint bitmap.
        let mut sig = c_tilde.to_vec();
        let mut p = Packer::new(params.signature_bytes() + 8);
        let zb = params.z_bits();
        for &c in &z {
            p.write((params.gamma1 - poly::center_coeff(c, Q)) as u32, zb)?;
        }
        for &h in &hints {
            p.write(h as u32, 1)?;
        }
        sig.extend_from_slice(&p.finish()?);
        return Ok(sig);
    }

    Err(Error::EntropyFailure)
}

/// Verifies a signature.
pub fn verify(params: &DilithiumParams, public: &[u8], msg: &[u8], sig: &[u8]) -> Result<()> {
    let ntt = ntt_context();
    let (k, l) = (params.k, params.l);

    if public.len() != params.public_key_bytes() || sig.len() != params.signature_bytes() {
        return Err(Error::InvalidSignature);
    }

    let rho = &public[..32];
    let mut u = Unpacker::new(&public[32..]);
    let mut t1 = vec![0i32; k * N];
    for c in t1.iter_mut() {
        *c = u.read(params.t1_bits())? as i32;
    }

    let c_tilde = &sig[..C_TILDE_BYTES];
    let mut u = Unpacker::new(&sig[C_TILDE_BYTES..]);
    let zb = params.z_bits();
    let z = unpack_signed(&mut u, l * N, zb, params.gamma1)?;
    let mut hints = vec![0i32; k * N];
    let mut popcount = 0usize;
    for h in hints.iter_mut() {
        *h = u.read(1)? as i32;
        popcount += *h as usize;
    }

    if exceeds(&z, params.gamma1 - params.beta) || popcount > params.omega {
        return Err(Error::InvalidSignature);
    }

    // μ = H(H(pk) ‖ m)
    let mut tr = [0u8; 32];
    shake256(public, &mut tr);
    let mut mu_input = tr.to_vec();
    mu_input.extend_from_slice(msg);
    let mut mu = [0u8; 64];
    shake256(&mu_input, &mut mu);

    let c = challenge(params, c_tilde);
    let mut c_hat = c.clone();
    ntt.forward(&mut c_hat);

    let a = expand_a(params, rho);

    // w1' = UseHint(h, A·z − c·t1·2^d)
    let mut z_hat = z.clone();
    for i in 0..l {
        poly::reduce_mod(&mut z_hat[i * N..(i + 1) * N], Q);
        ntt.forward(&mut z_hat[i * N..(i + 1) * N]);
    }
    let mut az = vec![0i32; k * N];
    ntt.mul_acc_mont(&mut az, k, l, &a, &z_hat);

    let mut t1_shifted = t1;
    for c in t1_shifted.iter_mut() {
        *c <<= D;
    }
    for i in 0..k {
        ntt.forward(&mut t1_shifted[i * N..(i + 1) * N]);
    }
    let mut ct1 = vec![0i32; k * N];
    for i in 0..k {
        // Both products carry the same Montgomery factor, so the
        // difference inverts cleanly below.
        ntt.mul_montgomery(
            &mut ct1[i * N..(i + 1) * N],
            &c_hat,
            &t1_shifted[i * N..(i + 1) * N],
        );
    }

    poly::sub(&mut az, &ct1);
    for i in 0..k {
        ntt.inverse(&mut az[i * N..(i + 1) * N]);
    }
    poly::reduce_mod(&mut az, Q);

    let w1: Vec<i32> = az
        .iter()
        .zip(hints.iter())
        .map(|(&r, &h)| use_hint(params, r, h))
        .collect();

    // Recompute the challenge seed from w1'.
    let w1_bits = if params.gamma2 == (Q - 1) / 32 { 4 } else { 6 };
    let mut p = Packer::new(k * N * w1_bits / 8 + 8);
    for &c in &w1 {
        p.write(c as u32, w1_bits)?;
    }
    let mut c_input = mu.to_vec();
    c_input.extend_from_slice(&p.finish()?);
    let mut check = [0u8; C_TILDE_BYTES];
    shake256(&c_input, &mut check);

    if crate::core::ct::bytes_eq(&check, c_tilde) == 1 {
        Ok(())
    } else {
        Err(Error::InvalidSignature)
    }
}
