//! Weierstrass arithmetic over binary fields.
//!
//! Formulas on `y² + xy = x³ + ax² + b` over GF(2^n) for affine and
//! López–Dahab coordinates (`x = X/Z`, `y = Y/Z²`). Doubling and mixed
//! addition (affine second operand) run inversion-free in López–Dahab
//! form; full additions route the second operand through its affine image
//! first. Negation is `y ↦ x + y`.

use crate::core::gf2n::Gf2nContext;
use crate::core::limb::Limb;
use crate::core::mpz::Mpz;
use crate::ecc::config::CurveConfig;
use crate::ecc::point::Coords;
use crate::error::{Error, Result};

fn gf<'a, L: Limb>(cfg: &'a CurveConfig<L>) -> Result<&'a Gf2nContext> {
    cfg.gf.as_ref().ok_or(Error::PointError)
}

/// Affine doubling: `λ = x + y/x`, `x3 = λ² + λ + a`.
pub fn affine_double<L: Limb>(cfg: &CurveConfig<L>, x: &Mpz<L>, y: &Mpz<L>) -> Result<Coords<L>> {
    let f = gf(cfg)?;

    if x.is_zero() {
        // x = 0 is the 2-torsion point; the tangent is vertical.
        return Ok(Coords::Infinity);
    }

    let lambda = f.add(x, &f.mul(y, &f.invert(x)?));
    let x3 = f.add(&f.add(&f.sqr(&lambda), &lambda), &cfg.a);
    // y3 = x² + (λ + 1)·x3
    let lp1 = f.add(&lambda, &Mpz::from_u64(1));
    let y3 = f.add(&f.sqr(x), &f.mul(&lp1, &x3));
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
    let f = gf(cfg)?;

    if x1 == x2 {
        return if y1 == y2 {
            affine_double(cfg, x1, y1)
        } else {
            Ok(Coords::Infinity)
        };
    }

    let lambda = f.mul(&f.add(y1, y2), &f.invert(&f.add(x1, x2))?);
    let x3 = f.add(
        &f.add(&f.add(&f.add(&f.sqr(&lambda), &lambda), x1), x2),
        &cfg.a,
    );
    let y3 = f.add(&f.add(&f.mul(&lambda, &f.add(x1, &x3)), &x3), y1);
    Ok(Coords::Affine { x: x3, y: y3 })
}

/// López–Dahab doubling.
///
/// `Z3 = X1²·Z1²`, `X3 = X1⁴ + b·Z1⁴`,
/// `Y3 = b·Z1⁴·Z3 + X3·(a·Z3 + Y1² + b·Z1⁴)`.
pub fn ld_double<L: Limb>(
    cfg: &CurveConfig<L>,
    x: &Mpz<L>,
    y: &Mpz<L>,
    z: &Mpz<L>,
) -> Result<Coords<L>> {
    let f = gf(cfg)?;

    if z.is_zero() || x.is_zero() {
        return Ok(Coords::Infinity);
    }

    let x2 = f.sqr(x);
    let z2 = f.sqr(z);
    let z4 = f.sqr(&z2);
    let bz4 = f.mul(&cfg.b, &z4);

    let z3 = f.mul(&x2, &z2);
    let x3 = f.add(&f.sqr(&x2), &bz4);

    let az3 = f.mul(&cfg.a, &z3);
    let inner = f.add(&f.add(&az3, &f.sqr(y)), &bz4);
    let y3 = f.add(&f.mul(&bz4, &z3), &f.mul(&x3, &inner));

    Ok(Coords::LopezDahab { x: x3, y: y3, z: z3 })
}

/// López–Dahab mixed addition (second operand affine).
///
/// `A = Y1 + y2·Z1²`, `B = X1 + x2·Z1`, `C = Z1·B`, `Z3 = C²`,
/// `D = x2·Z3`, `X3 = A² + C·(A + B² + a·C)`,
/// `Y3 = (D + X3)·(A·C + Z3) + (x2 + y2)·Z3²`.
pub fn ld_madd<L: Limb>(
    cfg: &CurveConfig<L>,
    x1: &Mpz<L>,
    y1: &Mpz<L>,
    z1: &Mpz<L>,
    x2: &Mpz<L>,
    y2: &Mpz<L>,
) -> Result<Coords<L>> {
    let f = gf(cfg)?;

    if z1.is_zero() {
        return Ok(Coords::LopezDahab {
            x: x2.clone(),
            y: y2.clone(),
            z: Mpz::from_u64(1),
        });
    }

    let z1z1 = f.sqr(z1);
    let a = f.add(y1, &f.mul(y2, &z1z1));
    let b = f.add(x1, &f.mul(x2, z1));

    if b.is_zero() {
        // Same x: equal points double, inverses cancel.
        return if a.is_zero() {
            ld_double(cfg, x1, y1, z1)
        } else {
            Ok(Coords::Infinity)
        };
    }

    let c = f.mul(z1, &b);
    let z3 = f.sqr(&c);
    let d = f.mul(x2, &z3);

    let ac = f.mul(&cfg.a, &c);
    let x3 = f.add(
        &f.sqr(&a),
        &f.mul(&c, &f.add(&f.add(&a, &f.sqr(&b)), &ac)),
    );

    let y3 = f.add(
        &f.mul(&f.add(&d, &x3), &f.add(&f.mul(&a, &c), &z3)),
        &f.mul(&f.add(x2, y2), &f.sqr(&z3)),
    );

    Ok(Coords::LopezDahab { x: x3, y: y3, z: z3 })
}

/// Reads affine coordinates out of any binary-Weierstrass representation.
pub fn to_affine<L: Limb>(cfg: &CurveConfig<L>, coords: &Coords<L>) -> Result<(Mpz<L>, Mpz<L>)> {
    let f = gf(cfg)?;

    match coords {
        Coords::Infinity => Err(Error::PointAtInfinity),
        Coords::Affine { x, y } => Ok((x.clone(), y.clone())),
        Coords::LopezDahab { x, y, z } => {
            if z.is_zero() {
                return Err(Error::PointAtInfinity);
            }
            let zi = f.invert(z).map_err(|_| Error::PointError)?;
            let ax = f.mul(x, &zi);
            let ay = f.mul(y, &f.sqr(&zi));
            Ok((ax, ay))
        }
        _ => Err(Error::PointError),
    }
}
