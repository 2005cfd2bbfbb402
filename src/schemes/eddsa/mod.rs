//! EdDSA signatures (RFC 8032): Ed25519, Ed25519ctx, Ed25519ph, Ed448 and
//! Ed448ph.
//!
//! The private key expands through the scheme hash (SHA-512 for Ed25519,
//! SHAKE-256 for Ed448); the first half is bit-clamped into the scalar,
//! the second half is the signing prefix. Points ride the generic Edwards
//! layer in extended coordinates; encodings are little-endian with the x
//! sign bit folded into the top of the y encoding.

use crate::core::limb::Limb;
use crate::core::mpz::{ByteOrder, Mpz};
use crate::ecc::config::{CurveConfig, ed448, ed25519};
use crate::ecc::scalar_mul::scalar_mul;
use crate::error::{Error, Result};
use crate::hash::sha2::Sha512;
use crate::hash::sha3::shake256;
use crate::hash::Hash;

/// Curve selector for the RFC 8032 instantiations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EddsaCurve {
    Ed25519,
    Ed448,
}

/// Variant flags: prehash and context string usage.
#[derive(Debug, Clone)]
pub struct EddsaVariant {
    pub curve: EddsaCurve,
    /// PH is the scheme hash instead of the identity.
    pub prehash: bool,
    /// Context string (`dom2`/`dom4`), at most 255 bytes.
    pub context: Vec<u8>,
}

impl EddsaVariant {
    /// Plain Ed25519 (empty dom prefix).
    pub fn ed25519() -> Self {
        Self { curve: EddsaCurve::Ed25519, prehash: false, context: Vec::new() }
    }

    /// Plain Ed448.
    pub fn ed448() -> Self {
        Self { curve: EddsaCurve::Ed448, prehash: false, context: Vec::new() }
    }

    /// Private-key / field-element encoding length.
    pub fn enc_len(&self) -> usize {
        match self.curve {
            EddsaCurve::Ed25519 => 32,
            EddsaCurve::Ed448 => 57,
        }
    }

    /// Signature length (`R ‖ S`).
    pub fn sig_len(&self) -> usize {
        2 * self.enc_len()
    }

    fn expand_len(&self) -> usize {
        2 * self.enc_len()
    }

    fn curve_config<L: Limb>(&self) -> Result<CurveConfig<L>> {
        match self.curve {
            EddsaCurve::Ed25519 => ed25519(),
            EddsaCurve::Ed448 => ed448(),
        }
    }

    /// The scheme hash over a list of byte strings.
    fn scheme_hash(&self, parts: &[&[u8]]) -> Vec<u8> {
        match self.curve {
            EddsaCurve::Ed25519 => {
                let mut h = Sha512::new();
                for p in parts {
                    h.update(p);
                }
                h.finalize()
            }
            EddsaCurve::Ed448 => {
                let mut input = Vec::new();
                for p in parts {
                    input.extend_from_slice(p);
                }
                let mut out = vec![0u8; 114];
                shake256(&input, &mut out);
                out
            }
        }
    }

    /// The RFC 8032 `dom2`/`dom4` prefix.
    fn dom(&self) -> Vec<u8> {
        let plain_ed25519 =
            self.curve == EddsaCurve::Ed25519 && !self.prehash && self.context.is_empty();
        if plain_ed25519 {
            return Vec::new();
        }

        let mut out = match self.curve {
            EddsaCurve::Ed25519 => b"SigEd25519 no Ed25519 collisions".to_vec(),
            EddsaCurve::Ed448 => b"SigEd448".to_vec(),
        };
        out.push(self.prehash as u8);
        out.push(self.context.len() as u8);
        out.extend_from_slice(&self.context);
        out
    }

    /// PH: identity for pure variants, the scheme hash for prehash.
    fn ph(&self, msg: &[u8]) -> Vec<u8> {
        if !self.prehash {
            return msg.to_vec();
        }
        match self.curve {
            EddsaCurve::Ed25519 => {
                let mut h = Sha512::new();
                h.update(msg);
                h.finalize()
            }
            EddsaCurve::Ed448 => {
                let mut out = vec![0u8; 64];
                shake256(msg, &mut out);
                out
            }
        }
    }

    /// Bit-clamps the expanded scalar half.
    fn clamp(&self, buf: &mut [u8]) {
        match self.curve {
            EddsaCurve::Ed25519 => {
                buf[0] &= 248;
                buf[31] &= 127;
                buf[31] |= 64;
            }
            EddsaCurve::Ed448 => {
                buf[0] &= 252;
                buf[56] = 0;
                buf[55] |= 0x80;
            }
        }
    }
}

/// Compresses an affine point to its little-endian encoding.
fn compress<L: Limb>(variant: &EddsaVariant, x: &Mpz<L>, y: &Mpz<L>) -> Result<Vec<u8>> {
    let len = variant.enc_len();
    let mut enc = y.to_bytes(ByteOrder::LittleEndian, len)?;
    enc[len - 1] |= (x.get_bit(0)) << 7;
    Ok(enc)
}

/// Decompresses a point encoding; fails with [`Error::InvalidKey`] on a
/// non-residue or an inconsistent sign bit.
fn decompress<L: Limb>(
    variant: &EddsaVariant,
    cfg: &CurveConfig<L>,
    enc: &[u8],
) -> Result<(Mpz<L>, Mpz<L>)> {
    let len = variant.enc_len();
    if enc.len() != len {
        return Err(Error::InvalidKey);
    }

    let mut bytes = enc.to_vec();
    let sign = (bytes[len - 1] >> 7) & 1;
    bytes[len - 1] &= 0x7f;

    let y = Mpz::from_bytes(&bytes, ByteOrder::LittleEndian);
    let p = cfg.fp.modulus();
    if y.cmp_abs(p) != core::cmp::Ordering::Less {
        return Err(Error::InvalidKey);
    }

    // x² = (y² − 1) / (a⁻¹·(1 + d·y²) − …): for a = −1 the denominator is
    // 1 + d·y², for a = 1 it is d·y² − 1 with the numerator negated to
    // match.
    let one = Mpz::from_u64(1);
    let yy = cfg.fp.sqr_mod(&y)?;
    let num = cfg.fp.sub_mod(&yy, &one)?;
    let dyy = cfg.fp.mul_mod(&cfg.b, &yy)?;
    let den = match variant.curve {
        EddsaCurve::Ed25519 => cfg.fp.add_mod(&dyy, &one)?,
        EddsaCurve::Ed448 => cfg.fp.sub_mod(&dyy, &one)?,
    };

    let xx = cfg.fp.mul_mod(&num, &cfg.fp.invert(&den).map_err(|_| Error::InvalidKey)?)?;
    let mut x = cfg.fp.sqrt_mod(&xx).map_err(|_| Error::InvalidKey)?;

    // Verify the root (sqrt_mod already rejects non-residues, this guards
    // the p ≡ 5 (mod 8) adjustment).
    if cfg.fp.sqr_mod(&x)? != xx {
        return Err(Error::InvalidKey);
    }

    if x.is_zero() && sign == 1 {
        return Err(Error::InvalidKey);
    }
    if x.get_bit(0) != sign {
        x = cfg.fp.sub_mod(&Mpz::new(), &x)?;
    }

    Ok((x, y))
}

/// Derived key material.
pub struct EddsaKeypair {
    /// Secret seed (the wire private key).
    pub seed: Vec<u8>,
    /// Encoded public key.
    pub public: Vec<u8>,
}

/// Expands a seed into (scalar, prefix).
fn expand<L: Limb>(variant: &EddsaVariant, seed: &[u8]) -> Result<(Mpz<L>, Vec<u8>)> {
    if seed.len() != variant.enc_len() {
        return Err(Error::InvalidKey);
    }

    let h = variant.scheme_hash(&[seed]);
    debug_assert_eq!(h.len(), variant.expand_len());

    let mut scalar_bytes = h[..variant.enc_len()].to_vec();
    variant.clamp(&mut scalar_bytes);
    let s = Mpz::from_bytes(&scalar_bytes, ByteOrder::LittleEndian);
    let prefix = h[variant.enc_len()..].to_vec();
    Ok((s, prefix))
}

fn scalar_to_fixed_be<L: Limb>(s: &Mpz<L>, len: usize) -> Result<Vec<u8>> {
    s.to_bytes(ByteOrder::BigEndian, len)
}

/// Derives the public key for a seed.
pub fn derive_public<L: Limb>(variant: &EddsaVariant, seed: &[u8]) -> Result<Vec<u8>> {
    let cfg: CurveConfig<L> = variant.curve_config()?;
    let (s, _) = expand::<L>(variant, seed)?;

    let s_be = scalar_to_fixed_be(&s, variant.enc_len() + 1)?;
    let a = scalar_mul(&cfg, &s_be, &cfg.gx, &cfg.gy, true)?;
    let (ax, ay) = a.convert_from(&cfg)?;
    compress(variant, &ax, &ay)
}

/// EdDSA signature.
pub fn sign<L: Limb>(variant: &EddsaVariant, seed: &[u8], msg: &[u8]) -> Result<Vec<u8>> {
    let cfg: CurveConfig<L> = variant.curve_config()?;
    let (s, prefix) = expand::<L>(variant, seed)?;
    let a_enc = derive_public::<L>(variant, seed)?;

    let dom = variant.dom();
    let ph_m = variant.ph(msg);

    // r = H(dom ‖ prefix ‖ PH(M)) mod L
    let r_hash = variant.scheme_hash(&[&dom, &prefix, &ph_m]);
    let r = Mpz::from_bytes(&r_hash, ByteOrder::LittleEndian).mod_positive(cfg.order.modulus())?;

    let r_be = scalar_to_fixed_be(&r, variant.enc_len() + 1)?;
    let rp = scalar_mul(&cfg, &r_be, &cfg.gx, &cfg.gy, true)?;
    let (rx, ry) = rp.convert_from(&cfg)?;
    let r_enc = compress(variant, &rx, &ry)?;

    // k = H(dom ‖ R ‖ A ‖ PH(M)) mod L
    let k_hash = variant.scheme_hash(&[&dom, &r_enc, &a_enc, &ph_m]);
    let k = Mpz::from_bytes(&k_hash, ByteOrder::LittleEndian).mod_positive(cfg.order.modulus())?;

    // S = (r + k·s) mod L
    let s_val = cfg.order.add_mod(&r, &cfg.order.mul_mod(&k, &s)?)?;
    let s_enc = s_val.to_bytes(ByteOrder::LittleEndian, variant.enc_len())?;

    let mut sig = r_enc;
    sig.extend_from_slice(&s_enc);
    Ok(sig)
}

/// EdDSA verification: checks `S·B = R + k·A` in the group.
pub fn verify<L: Limb>(
    variant: &EddsaVariant,
    public: &[u8],
    msg: &[u8],
    sig: &[u8],
) -> Result<()> {
    let cfg: CurveConfig<L> = variant.curve_config()?;
    let len = variant.enc_len();

    if sig.len() != variant.sig_len() || public.len() != len {
        return Err(Error::InvalidSignature);
    }

    let (r_enc, s_enc) = sig.split_at(len);
    let s_val = Mpz::from_bytes(s_enc, ByteOrder::LittleEndian);
    if s_val.cmp_abs(cfg.order.modulus()) != core::cmp::Ordering::Less {
        return Err(Error::InvalidSignature);
    }

    let (rx, ry) = decompress(variant, &cfg, r_enc).map_err(|_| Error::InvalidSignature)?;
    let (ax, ay) = decompress(variant, &cfg, public).map_err(|_| Error::InvalidSignature)?;

    let dom = variant.dom();
    let ph_m = variant.ph(msg);
    let k_hash = variant.scheme_hash(&[&dom, r_enc, public, &ph_m]);
    let k = Mpz::from_bytes(&k_hash, ByteOrder::LittleEndian).mod_positive(cfg.order.modulus())?;

    // S·B
    let s_be = scalar_to_fixed_be(&s_val, len + 1)?;
    let lhs = if s_val.is_zero() {
        crate::ecc::point::EcPoint::infinity(&cfg)
    } else {
        scalar_mul(&cfg, &s_be, &cfg.gx, &cfg.gy, false)?
    };

    // R + k·A
    let k_be = scalar_to_fixed_be(&k, len + 1)?;
    let mut rhs = crate::ecc::point::EcPoint::convert_to(&cfg, &rx, &ry)?;
    if !k.is_zero() {
        let ka = scalar_mul(&cfg, &k_be, &ax, &ay, false)?;
        rhs.addition(&cfg, &ka)?;
    }

    let same = match (lhs.convert_from(&cfg), rhs.convert_from(&cfg)) {
        (Ok((lx, ly)), Ok((rx2, ry2))) => lx == rx2 && ly == ry2,
        (Err(Error::PointAtInfinity), Err(Error::PointAtInfinity)) => true,
        _ => false,
    };

    if same { Ok(()) } else { Err(Error::InvalidSignature) }
}
