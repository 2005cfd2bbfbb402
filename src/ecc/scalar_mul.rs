//! Scalar multiplication drivers.
//!
//! Assembles the recoder and the point abstraction: exactly one doubling
//! per recoded step, with the current precomputed multiple accumulated on
//! each non-zero digit. Secret scalars run a ladder — joint
//! double-and-add with constant-time swaps — and never take the windowed
//! path; public scalars use width-5 NAF over a small odd-multiples table.

use crate::core::limb::Limb;
use crate::core::mpz::Mpz;
use crate::ecc::config::{CurveConfig, FieldKind};
use crate::ecc::point::EcPoint;
use crate::ecc::recoding::{Recoder, Recoding, Symbol};
use crate::error::{Error, Result};

/// Multiplies the affine point `(x, y)` by the big-endian scalar `k`.
///
/// `secret` selects the ladder; public scalars take NAF-5.
pub fn scalar_mul<L: Limb>(
    cfg: &CurveConfig<L>,
    k_be: &[u8],
    x: &Mpz<L>,
    y: &Mpz<L>,
    secret: bool,
) -> Result<EcPoint<L>> {
    if cfg.field == FieldKind::MontgomeryPrime {
        return Err(Error::PointError);
    }

    let base = EcPoint::convert_to(cfg, x, y)?;
    if secret {
        ladder_mul(cfg, k_be, &base)
    } else {
        naf_mul(cfg, k_be, &base)
    }
}

/// Ladder multiplication for secret scalars.
///
/// Edwards curves walk every bit of the stated scalar length from the
/// identity (the unified formulas are complete); Weierstrass curves
/// require the leading-one bit stream so neither working point passes
/// through infinity.
fn ladder_mul<L: Limb>(
    cfg: &CurveConfig<L>,
    k_be: &[u8],
    base: &EcPoint<L>,
) -> Result<EcPoint<L>> {
    if cfg.field == FieldKind::EdwardsPrime {
        let mut r0 = EcPoint::infinity(cfg);
        let mut r1 = base.clone();

        let mut recoder = Recoder::new(Recoding::Ladder, k_be)?;
        while let Some(Symbol { digit, .. }) = recoder.pull() {
            let bit = digit as u8;
            EcPoint::cswap(cfg, &mut r0, &mut r1, bit);
            let snapshot = r0.clone();
            r1.addition(cfg, &snapshot)?;
            r0.doubling(cfg, 1)?;
            EcPoint::cswap(cfg, &mut r0, &mut r1, bit);
        }
        return Ok(r0);
    }

    let mut recoder = Recoder::new(Recoding::Binary, k_be)?;
    let first = recoder.pull().ok_or(Error::RecodingError)?;
    if first.is_zero {
        return Err(Error::RecodingError);
    }

    let mut r0 = base.clone();
    let mut r1 = base.clone();
    r1.doubling(cfg, 1)?;

    while let Some(Symbol { digit, .. }) = recoder.pull() {
        let bit = digit as u8;
        EcPoint::cswap(cfg, &mut r0, &mut r1, bit);
        let snapshot = r0.clone();
        r1.addition(cfg, &snapshot)?;
        r0.doubling(cfg, 1)?;
        EcPoint::cswap(cfg, &mut r0, &mut r1, bit);
    }

    Ok(r0)
}

/// NAF-5 multiplication for public scalars.
fn naf_mul<L: Limb>(cfg: &CurveConfig<L>, k_be: &[u8], base: &EcPoint<L>) -> Result<EcPoint<L>> {
    const W: u32 = 5;

    let table = odd_multiples(cfg, base, 1 << (W - 2))?;
    let mut recoder = Recoder::new(Recoding::NafW(W), k_be)?;

    let mut acc = EcPoint::infinity(cfg);
    while let Some(sym) = recoder.pull() {
        acc.doubling(cfg, 1)?;
        if !sym.is_zero {
            let mut term = table[(sym.digit as usize - 1) / 2].clone();
            if sym.is_subtract {
                term.negate(cfg)?;
            }
            acc.addition(cfg, &term)?;
        }
    }

    Ok(acc)
}

/// Precomputes `P, 3P, 5P, …` as affine points for mixed addition.
fn odd_multiples<L: Limb>(
    cfg: &CurveConfig<L>,
    base: &EcPoint<L>,
    count: usize,
) -> Result<Vec<EcPoint<L>>> {
    let mut table = Vec::with_capacity(count);

    let mut twice = base.clone();
    twice.doubling(cfg, 1)?;

    let mut current = base.clone();
    for _ in 0..count {
        table.push(to_table_entry(cfg, &current)?);
        current.addition(cfg, &twice)?;
    }

    Ok(table)
}

/// Normalises a working point into the cheapest representation for
/// repeated mixed additions (affine for Weierstrass, extended for
/// Edwards).
fn to_table_entry<L: Limb>(cfg: &CurveConfig<L>, p: &EcPoint<L>) -> Result<EcPoint<L>> {
    if cfg.field == FieldKind::EdwardsPrime {
        let (x, y) = p.convert_from(cfg)?;
        return EcPoint::convert_to(cfg, &x, &y);
    }

    let (x, y) = p.convert_from(cfg)?;
    Ok(EcPoint {
        coords: crate::ecc::point::Coords::Affine { x, y },
        z_one: true,
    })
}

/// Computes `k1·P1 + k2·P2` for public scalars (signature verification).
pub fn double_scalar_mul<L: Limb>(
    cfg: &CurveConfig<L>,
    k1_be: &[u8],
    p1: (&Mpz<L>, &Mpz<L>),
    k2_be: &[u8],
    p2: (&Mpz<L>, &Mpz<L>),
) -> Result<EcPoint<L>> {
    let mut a = scalar_mul(cfg, k1_be, p1.0, p1.1, false)?;
    let b = scalar_mul(cfg, k2_be, p2.0, p2.1, false)?;
    a.addition(cfg, &b)?;
    Ok(a)
}
