//! ECDH key exchange.
//!
//! A two-pass exchange over the curve layer: `init` produces the
//! initiator's ephemeral public value, `setup` lets the responder answer
//! with its own public value while computing the shared secret, and
//! `final` completes the initiator's side. Weierstrass curves exchange
//! `X ‖ Y` octet strings and ladder over the full point; curve25519 runs
//! the x-only ladder with RFC 7748 clamping.

use crate::core::limb::Limb;
use crate::core::mpz::{ByteOrder, Mpz};
use crate::ecc::config::{CurveConfig, FieldKind};
use crate::ecc::montgomery;
use crate::ecc::scalar_mul::scalar_mul;
use crate::error::{Error, Result};
use crate::rng::Csprng;

/// One party's ephemeral state.
pub struct EcdhState<L: Limb> {
    /// Ephemeral secret scalar.
    pub(crate) d: Mpz<L>,
}

fn sample_scalar<L: Limb>(cfg: &CurveConfig<L>, prng: &mut Csprng) -> Result<Mpz<L>> {
    if cfg.field == FieldKind::MontgomeryPrime {
        // RFC 7748 clamped scalar.
        let mut bytes = [0u8; 32];
        prng.get_mem(&mut bytes)?;
        bytes[0] &= 248;
        bytes[31] &= 127;
        bytes[31] |= 64;
        return Ok(Mpz::from_bytes(&bytes, ByteOrder::LittleEndian));
    }

    loop {
        let mut bytes = vec![0u8; cfg.order_bytes()];
        prng.get_mem(&mut bytes)?;
        let d = Mpz::from_bytes(&bytes, ByteOrder::BigEndian)
            .mod_positive(cfg.order.modulus())?;
        if !d.is_zero() {
            return Ok(d);
        }
    }
}

fn public_from_scalar<L: Limb>(cfg: &CurveConfig<L>, d: &Mpz<L>) -> Result<Vec<u8>> {
    match cfg.field {
        FieldKind::MontgomeryPrime => {
            let k = d.to_bytes(ByteOrder::BigEndian, 32)?;
            let x = montgomery::ladder(cfg, &k, &cfg.gx)?;
            x.to_bytes(ByteOrder::LittleEndian, 32)
        }
        _ => {
            let k = d.to_bytes(ByteOrder::BigEndian, cfg.order_bytes())?;
            let p = scalar_mul(cfg, &k, &cfg.gx, &cfg.gy, true)?;
            let (x, y) = p.convert_from(cfg)?;
            let fb = cfg.field_bytes();
            let mut out = x.to_bytes(ByteOrder::BigEndian, fb)?;
            out.extend(y.to_bytes(ByteOrder::BigEndian, fb)?);
            Ok(out)
        }
    }
}

fn shared_from_peer<L: Limb>(
    cfg: &CurveConfig<L>,
    d: &Mpz<L>,
    peer: &[u8],
) -> Result<Vec<u8>> {
    match cfg.field {
        FieldKind::MontgomeryPrime => {
            if peer.len() != 32 {
                return Err(Error::InvalidKey);
            }
            let x1 = Mpz::from_bytes(peer, ByteOrder::LittleEndian);
            let k = d.to_bytes(ByteOrder::BigEndian, 32)?;
            let x = montgomery::ladder(cfg, &k, &x1)?;
            if x.is_zero() {
                // All-zero output means a low-order input point.
                return Err(Error::InvalidKey);
            }
            x.to_bytes(ByteOrder::LittleEndian, 32)
        }
        _ => {
            let fb = cfg.field_bytes();
            if peer.len() != 2 * fb {
                return Err(Error::InvalidKey);
            }
            let x = Mpz::from_bytes(&peer[..fb], ByteOrder::BigEndian);
            let y = Mpz::from_bytes(&peer[fb..], ByteOrder::BigEndian);

            let k = d.to_bytes(ByteOrder::BigEndian, cfg.order_bytes())?;
            let p = scalar_mul(cfg, &k, &x, &y, true)?;
            let (sx, _) = p.convert_from(cfg).map_err(|_| Error::InvalidKey)?;
            sx.to_bytes(ByteOrder::BigEndian, fb)
        }
    }
}

/// Initiator: generates the ephemeral key, returns the public value.
pub fn ke_init<L: Limb>(
    cfg: &CurveConfig<L>,
    prng: &mut Csprng,
) -> Result<(EcdhState<L>, Vec<u8>)> {
    let d = sample_scalar(cfg, prng)?;
    let public = public_from_scalar(cfg, &d)?;
    Ok((EcdhState { d }, public))
}

/// Responder: answers the initiator's public value with its own and the
/// shared secret.
pub fn ke_setup<L: Limb>(
    cfg: &CurveConfig<L>,
    prng: &mut Csprng,
    peer_public: &[u8],
) -> Result<(Vec<u8>, Vec<u8>)> {
    let d = sample_scalar(cfg, prng)?;
    let public = public_from_scalar(cfg, &d)?;
    let shared = shared_from_peer(cfg, &d, peer_public)?;
    Ok((public, shared))
}

/// Initiator: completes the exchange with the responder's public value.
pub fn ke_final<L: Limb>(
    cfg: &CurveConfig<L>,
    state: &EcdhState<L>,
    peer_public: &[u8],
) -> Result<Vec<u8>> {
    shared_from_peer(cfg, &state.d, peer_public)
}
