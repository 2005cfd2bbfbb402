//! Short-Weierstrass arithmetic over prime fields.
//!
//! Formulas for the affine, homogeneous-projective and Jacobian coordinate
//! systems on `y² = x³ + ax + b`. The Jacobian doubling takes the `a = −3`
//! fast path when the configuration flags it; the addition formulas carry
//! the explicit equal-point and inverse-point checks, dispatching to
//! doubling or the point at infinity instead of relying on a caller
//! contract.

use crate::core::limb::Limb;
use crate::core::mpz::Mpz;
use crate::core::reduction::ModContext;
use crate::ecc::config::{CurveConfig, ParamAKind};
use crate::ecc::point::Coords;
use crate::error::{Error, Result};

fn dbl<L: Limb>(f: &ModContext<L>, a: &Mpz<L>) -> Result<Mpz<L>> {
    f.add_mod(a, a)
}

/// Affine doubling: `λ = (3x² + a) / 2y`.
pub fn affine_double<L: Limb>(cfg: &CurveConfig<L>, x: &Mpz<L>, y: &Mpz<L>) -> Result<Coords<L>> {
    let f = &cfg.fp;

    if y.is_zero() {
        // 2-torsion: the tangent is vertical.
        return Ok(Coords::Infinity);
    }

    let xx = f.sqr_mod(x)?;
    let three_xx = f.add_mod(&f.add_mod(&xx, &xx)?, &xx)?;
    let num = f.add_mod(&three_xx, &cfg.a)?;
    let den = f.invert(&dbl(f, y)?)?;
    let lambda = f.mul_mod(&num, &den)?;

    let x3 = f.sub_mod(&f.sqr_mod(&lambda)?, &dbl(f, x)?)?;
    let y3 = f.sub_mod(&f.mul_mod(&lambda, &f.sub_mod(x, &x3)?)?, y)?;
    Ok(Coords::Affine { x: x3, y: y3 })
}

/// Affine addition with the equal/inverse checks folded in.
pub fn affine_add<L: Limb>(
    cfg: &CurveConfig<L>,
    x1: &Mpz<L>,
    y1: &Mpz<L>,
    x2: &Mpz<L>,
    y2: &Mpz<L>,
) -> Result<Coords<L>> {
    let f = &cfg.fp;

    if x1 == x2 {
        return if y1 == y2 {
            affine_double(cfg, x1, y1)
        } else {
            Ok(Coords::Infinity)
        };
    }

    let num = f.sub_mod(y2, y1)?;
    let den = f.invert(&f.sub_mod(x2, x1)?)?;
    let lambda = f.mul_mod(&num, &den)?;

    let x3 = f.sub_mod(&f.sub_mod(&f.sqr_mod(&lambda)?, x1)?, x2)?;
    let y3 = f.sub_mod(&f.mul_mod(&lambda, &f.sub_mod(x1, &x3)?)?, y1)?;
    Ok(Coords::Affine { x: x3, y: y3 })
}

/// Jacobian doubling.
///
/// General-`a` form `M = 3X² + a·Z⁴`, replaced by
/// `M = 3(X − Z²)(X + Z²)` when `a = −3`.
pub fn jacobian_double<L: Limb>(
    cfg: &CurveConfig<L>,
    x: &Mpz<L>,
    y: &Mpz<L>,
    z: &Mpz<L>,
) -> Result<Coords<L>> {
    let f = &cfg.fp;

    if y.is_zero() || z.is_zero() {
        return Ok(Coords::Infinity);
    }

    let xx = f.sqr_mod(x)?;
    let yy = f.sqr_mod(y)?;
    let yyyy = f.sqr_mod(&yy)?;
    let zz = f.sqr_mod(z)?;

    // S = 2((X + YY)² − XX − YYYY)
    let s = f.sub_mod(&f.sub_mod(&f.sqr_mod(&f.add_mod(x, &yy)?)?, &xx)?, &yyyy)?;
    let s = dbl(f, &s)?;

    let m = match cfg.a_kind {
        ParamAKind::MinusThree => {
            let t1 = f.sub_mod(x, &zz)?;
            let t2 = f.add_mod(x, &zz)?;
            let t = f.mul_mod(&t1, &t2)?;
            f.add_mod(&f.add_mod(&t, &t)?, &t)?
        }
        _ => {
            let three_xx = f.add_mod(&f.add_mod(&xx, &xx)?, &xx)?;
            let azzzz = f.mul_mod(&cfg.a, &f.sqr_mod(&zz)?)?;
            f.add_mod(&three_xx, &azzzz)?
        }
    };

    let x3 = f.sub_mod(&f.sqr_mod(&m)?, &dbl(f, &s)?)?;
    let eight_yyyy = dbl(f, &dbl(f, &dbl(f, &yyyy)?)?)?;
    let y3 = f.sub_mod(&f.mul_mod(&m, &f.sub_mod(&s, &x3)?)?, &eight_yyyy)?;
    // Z3 = (Y + Z)² − YY − ZZ = 2YZ
    let z3 = f.sub_mod(&f.sub_mod(&f.sqr_mod(&f.add_mod(y, z)?)?, &yy)?, &zz)?;

    Ok(Coords::Jacobian { x: x3, y: y3, z: z3 })
}

/// Jacobian addition with equal/inverse detection via `H` and `r`.
pub fn jacobian_add<L: Limb>(
    cfg: &CurveConfig<L>,
    x1: &Mpz<L>,
    y1: &Mpz<L>,
    z1: &Mpz<L>,
    x2: &Mpz<L>,
    y2: &Mpz<L>,
    z2: &Mpz<L>,
) -> Result<Coords<L>> {
    let f = &cfg.fp;

    let z1z1 = f.sqr_mod(z1)?;
    let z2z2 = f.sqr_mod(z2)?;
    let u1 = f.mul_mod(x1, &z2z2)?;
    let u2 = f.mul_mod(x2, &z1z1)?;
    let s1 = f.mul_mod(y1, &f.mul_mod(z2, &z2z2)?)?;
    let s2 = f.mul_mod(y2, &f.mul_mod(z1, &z1z1)?)?;

    let h = f.sub_mod(&u2, &u1)?;
    let r = dbl(f, &f.sub_mod(&s2, &s1)?)?;

    if h.is_zero() {
        return if r.is_zero() {
            jacobian_double(cfg, x1, y1, z1)
        } else {
            Ok(Coords::Infinity)
        };
    }

    let i = f.sqr_mod(&dbl(f, &h)?)?;
    let j = f.mul_mod(&h, &i)?;
    let v = f.mul_mod(&u1, &i)?;

    let x3 = f.sub_mod(&f.sub_mod(&f.sqr_mod(&r)?, &j)?, &dbl(f, &v)?)?;
    let y3 = f.sub_mod(
        &f.mul_mod(&r, &f.sub_mod(&v, &x3)?)?,
        &dbl(f, &f.mul_mod(&s1, &j)?)?,
    )?;
    // Z3 = ((Z1 + Z2)² − Z1Z1 − Z2Z2)·H = 2·Z1·Z2·H
    let z3 = f.mul_mod(
        &f.sub_mod(&f.sub_mod(&f.sqr_mod(&f.add_mod(z1, z2)?)?, &z1z1)?, &z2z2)?,
        &h,
    )?;

    Ok(Coords::Jacobian { x: x3, y: y3, z: z3 })
}

/// Homogeneous-projective doubling: `W = aZ² + 3X²`.
pub fn projective_double<L: Limb>(
    cfg: &CurveConfig<L>,
    x: &Mpz<L>,
    y: &Mpz<L>,
    z: &Mpz<L>,
) -> Result<Coords<L>> {
    let f = &cfg.fp;

    if y.is_zero() || z.is_zero() {
        return Ok(Coords::Infinity);
    }

    let xx = f.sqr_mod(x)?;
    let three_xx = f.add_mod(&f.add_mod(&xx, &xx)?, &xx)?;
    let w = f.add_mod(&f.mul_mod(&cfg.a, &f.sqr_mod(z)?)?, &three_xx)?;
    let s = f.mul_mod(y, z)?;
    let b = f.mul_mod(&f.mul_mod(x, y)?, &s)?;
    let h = f.sub_mod(&f.sqr_mod(&w)?, &dbl(f, &dbl(f, &dbl(f, &b)?)?)?)?;

    let x3 = dbl(f, &f.mul_mod(&h, &s)?)?;
    let yyss = f.mul_mod(&f.sqr_mod(y)?, &f.sqr_mod(&s)?)?;
    let y3 = f.sub_mod(
        &f.mul_mod(&w, &f.sub_mod(&dbl(f, &dbl(f, &b)?)?, &h)?)?,
        &dbl(f, &dbl(f, &dbl(f, &yyss)?)?)?,
    )?;
    let z3 = dbl(f, &dbl(f, &dbl(f, &f.mul_mod(&s, &f.sqr_mod(&s)?)?)?)?)?;

    Ok(Coords::Projective { x: x3, y: y3, z: z3 })
}

/// Homogeneous-projective addition with equal/inverse detection via `u`
/// and `v`.
pub fn projective_add<L: Limb>(
    cfg: &CurveConfig<L>,
    x1: &Mpz<L>,
    y1: &Mpz<L>,
    z1: &Mpz<L>,
    x2: &Mpz<L>,
    y2: &Mpz<L>,
    z2: &Mpz<L>,
) -> Result<Coords<L>> {
    let f = &cfg.fp;

    let y1z2 = f.mul_mod(y1, z2)?;
    let x1z2 = f.mul_mod(x1, z2)?;
    let z1z2 = f.mul_mod(z1, z2)?;

    let u = f.sub_mod(&f.mul_mod(y2, z1)?, &y1z2)?;
    let v = f.sub_mod(&f.mul_mod(x2, z1)?, &x1z2)?;

    if v.is_zero() {
        return if u.is_zero() {
            projective_double(cfg, x1, y1, z1)
        } else {
            Ok(Coords::Infinity)
        };
    }

    let uu = f.sqr_mod(&u)?;
    let vv = f.sqr_mod(&v)?;
    let vvv = f.mul_mod(&v, &vv)?;
    let r = f.mul_mod(&vv, &x1z2)?;

    let a = f.sub_mod(&f.sub_mod(&f.mul_mod(&uu, &z1z2)?, &vvv)?, &dbl(f, &r)?)?;
    let x3 = f.mul_mod(&v, &a)?;
    let y3 = f.sub_mod(
        &f.mul_mod(&u, &f.sub_mod(&r, &a)?)?,
        &f.mul_mod(&vvv, &y1z2)?,
    )?;
    let z3 = f.mul_mod(&vvv, &z1z2)?;

    Ok(Coords::Projective { x: x3, y: y3, z: z3 })
}

/// Reads affine coordinates out of any prime-Weierstrass representation.
pub fn to_affine<L: Limb>(cfg: &CurveConfig<L>, coords: &Coords<L>) -> Result<(Mpz<L>, Mpz<L>)> {
    let f = &cfg.fp;

    match coords {
        Coords::Infinity => Err(Error::PointAtInfinity),
        Coords::Affine { x, y } => Ok((x.clone(), y.clone())),
        Coords::Projective { x, y, z } => {
            if z.is_zero() {
                return Err(Error::PointAtInfinity);
            }
            let zi = f.invert(z).map_err(|_| Error::PointError)?;
            Ok((f.mul_mod(x, &zi)?, f.mul_mod(y, &zi)?))
        }
        Coords::Jacobian { x, y, z } => {
            if z.is_zero() {
                return Err(Error::PointAtInfinity);
            }
            let zi = f.invert(z).map_err(|_| Error::PointError)?;
            let zi2 = f.sqr_mod(&zi)?;
            let zi3 = f.mul_mod(&zi2, &zi)?;
            Ok((f.mul_mod(x, &zi2)?, f.mul_mod(y, &zi3)?))
        }
        _ => Err(Error::PointError),
    }
}
