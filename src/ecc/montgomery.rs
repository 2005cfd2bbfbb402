//! Montgomery-curve x-only ladder.
//!
//! Scalar multiplication on `y² = x³ + Ax² + x` using XZ coordinates and
//! the joint double-and-add ladder step. The two working points always
//! differ by the base point, so only x-coordinates are carried; the swap
//! driven by the scalar bits is a constant-time conditional swap of the
//! padded coordinate limbs.

use crate::core::ct;
use crate::core::limb::Limb;
use crate::core::mpz::Mpz;
use crate::ecc::config::CurveConfig;
use crate::error::Result;

/// One ladder step: given `(X2, Z2)`, `(X3, Z3)` with difference `x1`,
/// produces the doubled and summed pair.
pub fn ladder_step<L: Limb>(
    cfg: &CurveConfig<L>,
    x2: &Mpz<L>,
    z2: &Mpz<L>,
    x3: &Mpz<L>,
    z3: &Mpz<L>,
    x1: &Mpz<L>,
) -> Result<((Mpz<L>, Mpz<L>), (Mpz<L>, Mpz<L>))> {
    let f = &cfg.fp;

    // a24 = (A + 2)/4.
    let a24 = f.mul_mod(
        &f.add_mod(&cfg.a, &Mpz::from_u64(2))?,
        &Mpz::from_u64(4).invert(f.modulus())?,
    )?;

    let a = f.add_mod(x2, z2)?;
    let aa = f.sqr_mod(&a)?;
    let b = f.sub_mod(x2, z2)?;
    let bb = f.sqr_mod(&b)?;
    let e = f.sub_mod(&aa, &bb)?;
    let c = f.add_mod(x3, z3)?;
    let d = f.sub_mod(x3, z3)?;
    let da = f.mul_mod(&d, &a)?;
    let cb = f.mul_mod(&c, &b)?;

    let x5 = f.sqr_mod(&f.add_mod(&da, &cb)?)?;
    let z5 = f.mul_mod(x1, &f.sqr_mod(&f.sub_mod(&da, &cb)?)?)?;
    let x4 = f.mul_mod(&aa, &bb)?;
    let z4 = f.mul_mod(&e, &f.add_mod(&bb, &f.mul_mod(&a24, &e)?)?)?;

    Ok(((x4, z4), (x5, z5)))
}

/// x-only scalar multiplication `k·(x1, ·)` by the Montgomery ladder.
///
/// The full stated bit length of `k` is walked with one ladder step per
/// bit; the working pair is swapped under a constant-time mask before and
/// after each step.
pub fn ladder<L: Limb>(cfg: &CurveConfig<L>, k: &[u8], x1: &Mpz<L>) -> Result<Mpz<L>> {
    let f = &cfg.fp;

    let mut x2 = Mpz::from_u64(1);
    let mut z2 = Mpz::new();
    let mut x3 = x1.mod_positive(f.modulus())?;
    let mut z3 = Mpz::from_u64(1);

    let pad = f.limb_count();
    let padded = |v: &Mpz<L>| {
        let mut limbs = v.limbs().to_vec();
        limbs.resize(pad, L::ZERO);
        limbs
    };

    let mut swap = 0u8;
    for i in (0..k.len() * 8).rev() {
        let bit = (k[k.len() - 1 - i / 8] >> (i % 8)) & 1;
        let do_swap = swap ^ bit;
        swap = bit;

        // Conditional swap over fixed-width limb images.
        let (mut ax, mut bx) = (padded(&x2), padded(&x3));
        let (mut az, mut bz) = (padded(&z2), padded(&z3));
        ct::cswap(L::from_u8(do_swap), &mut ax, &mut bx);
        ct::cswap(L::from_u8(do_swap), &mut az, &mut bz);
        x2 = Mpz::from_limbs(ax, false);
        x3 = Mpz::from_limbs(bx, false);
        z2 = Mpz::from_limbs(az, false);
        z3 = Mpz::from_limbs(bz, false);

        let ((nx2, nz2), (nx3, nz3)) = ladder_step(cfg, &x2, &z2, &x3, &z3, x1)?;
        x2 = nx2;
        z2 = nz2;
        x3 = nx3;
        z3 = nz3;
    }

    // Final swap to undo the last bit's selection.
    let (mut ax, mut bx) = {
        let mut a = x2.limbs().to_vec();
        a.resize(pad, L::ZERO);
        let mut b = x3.limbs().to_vec();
        b.resize(pad, L::ZERO);
        (a, b)
    };
    let (mut az, mut bz) = {
        let mut a = z2.limbs().to_vec();
        a.resize(pad, L::ZERO);
        let mut b = z3.limbs().to_vec();
        b.resize(pad, L::ZERO);
        (a, b)
    };
    ct::cswap(L::from_u8(swap), &mut ax, &mut bx);
    ct::cswap(L::from_u8(swap), &mut az, &mut bz);
    let x2 = Mpz::from_limbs(ax, false);
    let z2 = Mpz::from_limbs(az, false);

    // x = X2/Z2; Z2 = 0 maps to 0, matching the RFC 7748 convention.
    if z2.is_zero() {
        return Ok(Mpz::new());
    }
    let zi = f.invert(&z2)?;
    f.mul_mod(&x2, &zi)
}
