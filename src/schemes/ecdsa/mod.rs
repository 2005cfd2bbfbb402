//! ECDSA signatures over the generic curve layer.
//!
//! Signing drives the secret scalar multiplication through the ladder and
//! supports both randomized nonces (from the context's CSPRNG) and the
//! deterministic RFC 6979 derivation over the crate's HMAC. Signatures are
//! `(r, s)` as two order-sized big-endian octet strings.

use crate::core::limb::Limb;
use crate::core::mpz::{ByteOrder, Mpz};
use crate::core::reduction::ModContext;
use crate::ecc::config::CurveConfig;
use crate::ecc::scalar_mul::{double_scalar_mul, scalar_mul};
use crate::error::{Error, Result};
use crate::hash::hmac::Hmac;
use crate::hash::{HashAlg, digest};
use crate::rng::Csprng;

/// Truncates/masks a hash to the order's bit length (`bits2int`).
pub fn hash_to_scalar<L: Limb>(order: &ModContext<L>, h: &[u8]) -> Result<Mpz<L>> {
    let e = Mpz::from_bytes(h, ByteOrder::BigEndian);
    let excess = (8 * h.len()).saturating_sub(order.mod_bits());
    e.shr_bits(excess).mod_positive(order.modulus())
}

fn int2octets<L: Limb>(x: &Mpz<L>, rlen: usize) -> Result<Vec<u8>> {
    x.to_bytes(ByteOrder::BigEndian, rlen)
}

/// RFC 6979 deterministic nonce derivation.
pub fn rfc6979_nonce<L: Limb>(
    cfg: &CurveConfig<L>,
    alg: HashAlg,
    d: &Mpz<L>,
    msg_hash: &[u8],
) -> Result<Mpz<L>> {
    let q = cfg.order.modulus();
    let rlen = cfg.order_bytes();
    let hlen = digest(alg, &[]).len();

    let h1 = hash_to_scalar(&cfg.order, msg_hash)?;
    let x_oct = int2octets(d, rlen)?;
    let h_oct = int2octets(&h1, rlen)?;

    let mut k = vec![0u8; hlen];
    let mut v = vec![0x01u8; hlen];

    // K = HMAC_K(V ‖ 0x00 ‖ x ‖ h1); V = HMAC_K(V)
    let mut mac = Hmac::new(alg, &k);
    mac.update(&v);
    mac.update(&[0x00]);
    mac.update(&x_oct);
    mac.update(&h_oct);
    k = mac.finalize();
    v = Hmac::mac(alg, &k, &v);

    // K = HMAC_K(V ‖ 0x01 ‖ x ‖ h1); V = HMAC_K(V)
    let mut mac = Hmac::new(alg, &k);
    mac.update(&v);
    mac.update(&[0x01]);
    mac.update(&x_oct);
    mac.update(&h_oct);
    k = mac.finalize();
    v = Hmac::mac(alg, &k, &v);

    loop {
        let mut t = Vec::with_capacity(rlen);
        while t.len() < rlen {
            v = Hmac::mac(alg, &k, &v);
            t.extend_from_slice(&v);
        }
        t.truncate(rlen);

        let candidate = Mpz::from_bytes(&t, ByteOrder::BigEndian)
            .shr_bits((8 * rlen).saturating_sub(cfg.order.mod_bits()));
        if !candidate.is_zero() && candidate.cmp_abs(q) == core::cmp::Ordering::Less {
            return Ok(candidate);
        }

        let mut mac = Hmac::new(alg, &k);
        mac.update(&v);
        mac.update(&[0x00]);
        k = mac.finalize();
        v = Hmac::mac(alg, &k, &v);
    }
}

/// Nonce source for signing.
pub enum NonceSource<'a> {
    /// Fresh random `k` per signature.
    Random(&'a mut Csprng),
    /// RFC 6979 derivation with the given hash.
    Deterministic(HashAlg),
}

/// ECDSA signature over a prehashed message.
///
/// Restarts on `r = 0` or `s = 0`, capped so a broken nonce source
/// surfaces as [`Error::EntropyFailure`] instead of an unbounded loop.
pub fn sign<L: Limb>(
    cfg: &CurveConfig<L>,
    d: &Mpz<L>,
    msg_hash: &[u8],
    mut nonce: NonceSource<'_>,
) -> Result<(Mpz<L>, Mpz<L>)> {
    let q = cfg.order.modulus().clone();
    let e = hash_to_scalar(&cfg.order, msg_hash)?;

    if d.is_zero() || d.cmp_abs(&q) != core::cmp::Ordering::Less {
        return Err(Error::InvalidKey);
    }

    for _ in 0..64 {
        let k = match &mut nonce {
            NonceSource::Random(prng) => {
                let mut bytes = vec![0u8; cfg.order_bytes()];
                prng.get_mem(&mut bytes)?;
                let k = Mpz::from_bytes(&bytes, ByteOrder::BigEndian).mod_positive(&q)?;
                if k.is_zero() {
                    continue;
                }
                k
            }
            NonceSource::Deterministic(alg) => rfc6979_nonce(cfg, *alg, d, msg_hash)?,
        };

        let k_bytes = k.to_bytes(ByteOrder::BigEndian, cfg.order_bytes())?;
        let point = scalar_mul(cfg, &k_bytes, &cfg.gx, &cfg.gy, true)?;
        let (x1, _) = point.convert_from(cfg)?;

        let r = x1.mod_positive(&q)?;
        if r.is_zero() {
            continue;
        }

        // s = k⁻¹(e + r·d) mod n
        let kinv = k.invert(&q)?;
        let rd = cfg.order.mul_mod(&r, d)?;
        let s = cfg.order.mul_mod(&kinv, &cfg.order.add_mod(&e, &rd)?)?;
        if s.is_zero() {
            continue;
        }

        return Ok((r, s));
    }

    Err(Error::EntropyFailure)
}

/// ECDSA verification of `(r, s)` on a prehashed message.
pub fn verify<L: Limb>(
    cfg: &CurveConfig<L>,
    qx: &Mpz<L>,
    qy: &Mpz<L>,
    msg_hash: &[u8],
    r: &Mpz<L>,
    s: &Mpz<L>,
) -> Result<()> {
    let q = cfg.order.modulus();

    let in_range = |v: &Mpz<L>| {
        !v.is_zero() && !v.is_negative() && v.cmp_abs(q) == core::cmp::Ordering::Less
    };
    if !in_range(r) || !in_range(s) {
        return Err(Error::InvalidSignature);
    }

    let e = hash_to_scalar(&cfg.order, msg_hash)?;
    let w = s.invert(q).map_err(|_| Error::InvalidSignature)?;
    let u1 = cfg.order.mul_mod(&e, &w)?;
    let u2 = cfg.order.mul_mod(r, &w)?;

    let u1b = u1.to_bytes(ByteOrder::BigEndian, cfg.order_bytes())?;
    let u2b = u2.to_bytes(ByteOrder::BigEndian, cfg.order_bytes())?;

    // u1 = 0 degenerates the joint multiplication; handle each side.
    let point = if u1.is_zero() {
        scalar_mul(cfg, &u2b, qx, qy, false)?
    } else if u2.is_zero() {
        scalar_mul(cfg, &u1b, &cfg.gx, &cfg.gy, false)?
    } else {
        double_scalar_mul(cfg, &u1b, (&cfg.gx, &cfg.gy), &u2b, (qx, qy))?
    };

    let (x1, _) = point.convert_from(cfg).map_err(|_| Error::InvalidSignature)?;
    if x1.mod_positive(q)? == *r {
        Ok(())
    } else {
        Err(Error::InvalidSignature)
    }
}
