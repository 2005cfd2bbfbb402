//! RSA key generation and the raw public/private operations.
//!
//! Key generation follows SP 800-56B §6.3: each prime is derived from two
//! auxiliary probable primes through the CRT-based construction, with the
//! 256-bit constant ⌊2^256/√2⌋ anchoring the random part's lower bound so
//! the product reaches the full modulus length. Probable-prime testing is
//! trial division by small primes followed by at least five Miller–Rabin
//! rounds with random bases.
//!
//! The private operation runs CRT-accelerated by default; both CRT
//! exponentiations drive the Montgomery ladder, as does the unreduced
//! `c^d mod n` path kept for completeness.

pub mod mgf1;
pub mod oaep;
pub mod pss;

use crate::core::limb::Limb;
use crate::core::mpz::{ByteOrder, Mpz};
use crate::core::reduction::{ModContext, Reduction, Visibility};
use crate::error::{Error, Result};
use crate::rng::Csprng;

/// ⌊2^256/√2⌋, the lower bound for the random part of each prime.
const INV_SQRT2_HEX: &str = "b504f333f9df16e717f7ce02303e69cd2d040bb5b7bd8e638f26d2ef9cadb727";

/// Trial-division primes used before Miller–Rabin.
const SMALL_PRIMES: [u32; 54] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257,
];

/// RSA public key with its reduction context.
#[derive(Debug, Clone)]
pub struct RsaPublicKey<L: Limb> {
    pub n: Mpz<L>,
    pub e: Mpz<L>,
    pub ctx: ModContext<L>,
}

/// RSA private key with CRT precomputation.
#[derive(Debug, Clone)]
pub struct RsaPrivateKey<L: Limb> {
    pub public: RsaPublicKey<L>,
    pub d: Mpz<L>,
    pub p: Mpz<L>,
    pub q: Mpz<L>,
    pub dp: Mpz<L>,
    pub dq: Mpz<L>,
    pub qinv: Mpz<L>,
    pub p_ctx: ModContext<L>,
    pub q_ctx: ModContext<L>,
}

impl<L: Limb> RsaPublicKey<L> {
    /// Builds a public key, validating the exponent range.
    pub fn new(n: Mpz<L>, e: Mpz<L>) -> Result<Self> {
        check_public_exponent(&e)?;
        let ctx = ModContext::new(n.clone(), Reduction::Barrett)?;
        Ok(Self { n, e, ctx })
    }

    /// Modulus length in bytes.
    pub fn byte_len(&self) -> usize {
        self.ctx.mod_bits().div_ceil(8)
    }

    /// `c = m^e mod n`.
    pub fn public_op(&self, m: &Mpz<L>) -> Result<Mpz<L>> {
        if m.is_negative() || m.cmp_abs(&self.n) != core::cmp::Ordering::Less {
            return Err(Error::InvalidKey);
        }
        self.ctx.pow_mod(m, &self.e, Visibility::Public)
    }
}

impl<L: Limb> RsaPrivateKey<L> {
    /// Assembles a private key from its structured fields.
    #[allow(clippy::too_many_arguments)]
    pub fn from_fields(
        n: Mpz<L>,
        e: Mpz<L>,
        d: Mpz<L>,
        p: Mpz<L>,
        q: Mpz<L>,
        dp: Mpz<L>,
        dq: Mpz<L>,
        qinv: Mpz<L>,
    ) -> Result<Self> {
        if p.mul_ref(&q) != n {
            return Err(Error::InvalidKey);
        }
        Ok(Self {
            public: RsaPublicKey::new(n, e)?,
            d,
            dp,
            dq,
            qinv,
            p_ctx: ModContext::new(p.clone(), Reduction::Montgomery)?,
            q_ctx: ModContext::new(q.clone(), Reduction::Montgomery)?,
            p,
            q,
        })
    }

    /// CRT-accelerated private operation `m = c^d mod n`.
    pub fn private_op(&self, c: &Mpz<L>) -> Result<Mpz<L>> {
        let m1 = self.p_ctx.pow_mod(c, &self.dp, Visibility::Secret)?;
        let m2 = self.q_ctx.pow_mod(c, &self.dq, Visibility::Secret)?;

        // h = qInv·(m1 − m2) mod p
        let diff = self.p_ctx.sub_mod(&m1, &m2.mod_positive(&self.p)?)?;
        let h = self.p_ctx.mul_mod(&self.qinv, &diff)?;

        Ok(m2.add_ref(&h.mul_ref(&self.q)))
    }

    /// Unreduced private operation, kept for completeness.
    pub fn private_op_plain(&self, c: &Mpz<L>) -> Result<Mpz<L>> {
        self.public.ctx.pow_mod(c, &self.d, Visibility::Secret)
    }
}

fn check_public_exponent<L: Limb>(e: &Mpz<L>) -> Result<()> {
    let min = Mpz::from_u64(1 << 16);
    let mut max = Mpz::new();
    max.set_bit(256);

    if !e.is_odd() || e.cmp_abs(&min) != core::cmp::Ordering::Greater || e.cmp_abs(&max) != core::cmp::Ordering::Less
    {
        return Err(Error::InvalidKey);
    }
    Ok(())
}

/// Auxiliary-prime bit length and the ceiling on the combined length, by
/// modulus size (SP 800-56B tables; intermediate sizes interpolate down).
fn aux_prime_profile(nbits: usize) -> (usize, usize) {
    match nbits {
        4096.. => (201, 1518),
        3072.. => (171, 1007),
        2048.. => (144, 494),
        _ => (101, nbits / 2 - 120),
    }
}

/// Miller–Rabin probable-prime test with leading trial division.
pub fn check_prime<L: Limb>(prng: &mut Csprng, n: &Mpz<L>, rounds: usize) -> Result<bool> {
    if !n.is_odd() {
        return Ok(n.cmp_abs(&Mpz::from_u64(2)) == core::cmp::Ordering::Equal);
    }
    if n.cmp_abs(&Mpz::from_u64(3)) != core::cmp::Ordering::Greater {
        return Ok(!n.is_zero() && !n.is_one());
    }

    for &sp in SMALL_PRIMES.iter() {
        let d = Mpz::from_u64(sp as u64);
        let (_, r) = n.divrem(&d)?;
        if r.is_zero() {
            return Ok(n.cmp_abs(&d) == core::cmp::Ordering::Equal);
        }
    }

    let one = Mpz::from_u64(1);
    let n_minus_1 = n.sub_ref(&one);

    // n − 1 = 2^s · d with d odd.
    let mut s = 0usize;
    let mut d = n_minus_1.clone();
    while !d.is_odd() {
        d = d.shr_bits(1);
        s += 1;
    }

    let ctx = ModContext::new(n.clone(), Reduction::Montgomery)?;
    let byte_len = n.bit_length().div_ceil(8);
    let mut base_bytes = vec![0u8; byte_len];

    'witness: for _ in 0..rounds.max(5) {
        // Random base in [2, n − 2].
        let a = loop {
            prng.get_mem(&mut base_bytes)?;
            let a = Mpz::from_bytes(&base_bytes, ByteOrder::BigEndian).mod_positive(n)?;
            if !a.is_zero() && !a.is_one() && a != n_minus_1 {
                break a;
            }
        };

        let mut x = ctx.pow_mod(&a, &d, Visibility::Public)?;
        if x.is_one() || x == n_minus_1 {
            continue;
        }

        for _ in 0..s - 1 {
            x = ctx.sqr_mod(&x)?;
            if x == n_minus_1 {
                continue 'witness;
            }
        }

        return Ok(false);
    }

    Ok(true)
}

/// Advances an odd candidate to the next probable prime.
fn find_aux_prime<L: Limb>(prng: &mut Csprng, start: &Mpz<L>) -> Result<Mpz<L>> {
    let two = Mpz::from_u64(2);
    let mut p = start.clone();

    loop {
        if check_prime(prng, &p, 5)? {
            return Ok(p);
        }
        p = p.add_ref(&two);
    }
}

/// Samples an odd auxiliary seed of `bits` length with the top and bottom
/// bits set.
fn sample_aux_seed<L: Limb>(prng: &mut Csprng, bits: usize) -> Result<Mpz<L>> {
    let mut bytes = vec![0u8; bits.div_ceil(8)];
    prng.get_mem(&mut bytes)?;

    let mut x = Mpz::from_bytes(&bytes, ByteOrder::BigEndian);
    x = x.shr_bits(x.bit_length().saturating_sub(bits));
    x.set_bit(bits - 1);
    x.set_bit(0);
    Ok(x)
}

/// Derives one prime factor from two auxiliary primes (SP 800-56B §6.3.1
/// construction).
fn derive_prime<L: Limb>(
    prng: &mut Csprng,
    e: &Mpz<L>,
    nbits: usize,
    aux1: &Mpz<L>,
    aux2: &Mpz<L>,
) -> Result<Mpz<L>> {
    let bits = nbits >> 1;
    let one = Mpz::from_u64(1);

    let inv_sqrt2: Mpz<L> = Mpz::from_str_radix(INV_SQRT2_HEX, 16)?;
    let inv_sqrt2_bits = inv_sqrt2.bit_length();
    if bits < inv_sqrt2_bits {
        return Err(Error::InvalidParameterSet);
    }

    // 1/√2 · 2^bits <= X < 2^bits
    let base = inv_sqrt2.shl_bits(bits - inv_sqrt2_bits);
    let mut top = Mpz::new();
    top.set_bit(bits);
    let range = top.sub_ref(&base);

    let r1x2 = aux1.add_ref(aux1);
    if !r1x2.gcd(aux2).is_one() {
        return Err(Error::NonInvertible);
    }
    let r1r2x2 = r1x2.mul_ref(aux2);

    // R ≡ 1 (mod 2·aux1), R ≡ −1 (mod aux2).
    let mut r = aux2.invert(&r1x2)?.mul_ref(aux2);
    let r2 = r1x2.invert(aux2)?.mul_ref(&r1x2);
    r = r.sub_ref(&r2);
    if r.is_negative() {
        r = r.add_ref(&r1r2x2);
    }

    let num_rand_bytes = bits.div_ceil(8);
    let mut x_bytes = vec![0u8; num_rand_bytes];

    for _ in 0..64 {
        prng.get_mem(&mut x_bytes)?;
        let mut x = Mpz::from_bytes(&x_bytes, ByteOrder::BigEndian);
        while x.cmp_abs(&range) != core::cmp::Ordering::Less {
            x = x.shr_bits(1);
        }
        x = x.add_ref(&base);

        // y = X + ((R − X) mod 2·aux1·aux2)
        let mut y = x.add_ref(&r.sub_ref(&x).mod_positive(&r1r2x2)?);

        for _ in 0..5 * bits {
            if y.bit_length() > bits {
                break;
            }

            let ym1 = y.sub_ref(&one);
            if ym1.gcd(e).is_one() && check_prime(prng, &y, 5)? {
                return Ok(y);
            }

            y = y.add_ref(&r1r2x2);
        }
    }

    Err(Error::EntropyFailure)
}

fn generate_prime<L: Limb>(prng: &mut Csprng, e: &Mpz<L>, nbits: usize) -> Result<Mpz<L>> {
    let (aux_bits, combined_cap) = aux_prime_profile(nbits);

    for _ in 0..64 {
        let x1 = sample_aux_seed(prng, aux_bits)?;
        let x2 = sample_aux_seed(prng, aux_bits)?;
        let p1 = find_aux_prime(prng, &x1)?;
        let p2 = find_aux_prime(prng, &x2)?;

        if p1.bit_length() + p2.bit_length() > combined_cap {
            continue;
        }

        match derive_prime(prng, e, nbits, &p1, &p2) {
            Ok(p) => return Ok(p),
            Err(Error::NonInvertible) => continue,
            Err(err) => return Err(err),
        }
    }

    Err(Error::EntropyFailure)
}

/// Generates an RSA key pair of `nbits` with public exponent `e`.
pub fn keygen<L: Limb>(prng: &mut Csprng, nbits: usize, e: Mpz<L>) -> Result<RsaPrivateKey<L>> {
    check_public_exponent(&e)?;
    if nbits < 1024 || nbits % 2 != 0 {
        return Err(Error::InvalidParameterSet);
    }

    let one = Mpz::from_u64(1);

    // |p − q| must exceed 2^(n/2 − 100).
    let mut min_gap = Mpz::new();
    min_gap.set_bit(nbits / 2 - 100);

    let p = generate_prime(prng, &e, nbits)?;
    let q = loop {
        let q = generate_prime(prng, &e, nbits)?;
        let gap = if p.cmp_abs(&q) == core::cmp::Ordering::Greater {
            p.sub_ref(&q)
        } else {
            q.sub_ref(&p)
        };
        if gap.cmp_abs(&min_gap) == core::cmp::Ordering::Greater {
            break q;
        }
    };

    let n = p.mul_ref(&q);
    let pm1 = p.sub_ref(&one);
    let qm1 = q.sub_ref(&one);
    let phi = pm1.mul_ref(&qm1);

    let d = e.invert(&phi)?;
    let (_, dp) = d.divrem(&pm1)?;
    let (_, dq) = d.divrem(&qm1)?;
    let qinv = q.invert(&p)?;

    RsaPrivateKey::from_fields(n, e, d, p, q, dp, dq, qinv)
}
