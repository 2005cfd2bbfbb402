//! Coordinate-system-parametric elliptic-curve points.
//!
//! [`EcPoint`] is a tagged variant over the five coordinate systems; the
//! curve configuration decides which field's formulas apply. Operations
//! are exposed uniformly: affine load/store, in-place doubling (`w`
//! times), addition with explicit equal/inverse handling, and
//! curve-dependent negation. Points are value types; two points on the
//! same curve share the configuration by reference.

use crate::core::ct;
use crate::core::limb::Limb;
use crate::core::mpz::Mpz;
use crate::ecc::config::{CoordSystem, CurveConfig, FieldKind};
use crate::ecc::{edwards, weierstrass_binary as wb, weierstrass_prime as wp};
use crate::error::{Error, Result};

/// Point coordinates, one variant per system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coords<L: Limb> {
    /// The group identity for Weierstrass curves.
    Infinity,
    Affine { x: Mpz<L>, y: Mpz<L> },
    Projective { x: Mpz<L>, y: Mpz<L>, z: Mpz<L> },
    Jacobian { x: Mpz<L>, y: Mpz<L>, z: Mpz<L> },
    LopezDahab { x: Mpz<L>, y: Mpz<L>, z: Mpz<L> },
    Extended { x: Mpz<L>, y: Mpz<L>, t: Mpz<L>, z: Mpz<L> },
}

/// An elliptic-curve point in the configuration's coordinate system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPoint<L: Limb> {
    pub(crate) coords: Coords<L>,
    /// Set when `Z` is known to be one (affine loads, fresh conversions).
    pub(crate) z_one: bool,
}

impl<L: Limb> EcPoint<L> {
    /// The group identity.
    pub fn infinity(cfg: &CurveConfig<L>) -> Self {
        let coords = match cfg.field {
            FieldKind::EdwardsPrime => edwards::identity(),
            _ => Coords::Infinity,
        };
        Self { coords, z_one: false }
    }

    /// Loads affine coordinates into the configuration's working system.
    pub fn convert_to(cfg: &CurveConfig<L>, x: &Mpz<L>, y: &Mpz<L>) -> Result<Self> {
        let one = Mpz::from_u64(1);
        let coords = match (cfg.field, cfg.coords) {
            (FieldKind::EdwardsPrime, _) => edwards::from_affine(cfg, x, y)?,
            (_, CoordSystem::Affine) => Coords::Affine { x: x.clone(), y: y.clone() },
            (FieldKind::WeierstrassBinary, _) => Coords::LopezDahab {
                x: x.clone(),
                y: y.clone(),
                z: one,
            },
            (_, CoordSystem::Jacobian) => Coords::Jacobian {
                x: x.clone(),
                y: y.clone(),
                z: one,
            },
            _ => Coords::Projective {
                x: x.clone(),
                y: y.clone(),
                z: one,
            },
        };
        Ok(Self { coords, z_one: true })
    }

    /// Reads affine coordinates, inverting `Z` where required.
    ///
    /// Fails with [`Error::PointAtInfinity`] for the identity and
    /// [`Error::PointError`] when the inversion does not exist.
    pub fn convert_from(&self, cfg: &CurveConfig<L>) -> Result<(Mpz<L>, Mpz<L>)> {
        match cfg.field {
            FieldKind::WeierstrassPrime | FieldKind::MontgomeryPrime => {
                wp::to_affine(cfg, &self.coords)
            }
            FieldKind::WeierstrassBinary => wb::to_affine(cfg, &self.coords),
            FieldKind::EdwardsPrime => {
                if edwards::is_identity(&self.coords) {
                    return Err(Error::PointAtInfinity);
                }
                edwards::to_affine(cfg, &self.coords)
            }
        }
    }

    /// True when this is the group identity.
    pub fn is_infinity(&self) -> bool {
        match &self.coords {
            Coords::Infinity => true,
            Coords::Projective { z, .. }
            | Coords::Jacobian { z, .. }
            | Coords::LopezDahab { z, .. } => z.is_zero(),
            c @ Coords::Extended { .. } => edwards::is_identity(c),
            Coords::Affine { .. } => false,
        }
    }

    /// Doubles the point `w` times in place. The identity stays put; a
    /// 2-torsion point collapses to the identity.
    pub fn doubling(&mut self, cfg: &CurveConfig<L>, w: usize) -> Result<()> {
        for _ in 0..w {
            if self.is_infinity() && cfg.field != FieldKind::EdwardsPrime {
                return Ok(());
            }
            self.coords = match (&self.coords, cfg.field) {
                (Coords::Affine { x, y }, FieldKind::WeierstrassPrime) => {
                    wp::affine_double(cfg, x, y)?
                }
                (Coords::Affine { x, y }, FieldKind::WeierstrassBinary) => {
                    wb::affine_double(cfg, x, y)?
                }
                (Coords::Jacobian { x, y, z }, _) => wp::jacobian_double(cfg, x, y, z)?,
                (Coords::Projective { x, y, z }, FieldKind::WeierstrassPrime) => {
                    wp::projective_double(cfg, x, y, z)?
                }
                (Coords::LopezDahab { x, y, z }, _) => wb::ld_double(cfg, x, y, z)?,
                (Coords::Extended { x, y, t, z }, _) => edwards::double(cfg, (x, y, t, z))?,
                _ => return Err(Error::PointError),
            };
            self.z_one = false;
        }
        Ok(())
    }

    /// Adds `rhs` in place. Equal summands dispatch to doubling; inverse
    /// summands produce the identity.
    pub fn addition(&mut self, cfg: &CurveConfig<L>, rhs: &EcPoint<L>) -> Result<()> {
        if rhs.is_infinity() && cfg.field != FieldKind::EdwardsPrime {
            return Ok(());
        }
        if self.is_infinity() && cfg.field != FieldKind::EdwardsPrime {
            *self = rhs.clone();
            return Ok(());
        }

        self.coords = match (&self.coords, &rhs.coords) {
            (Coords::Affine { x: x1, y: y1 }, Coords::Affine { x: x2, y: y2 }) => {
                match cfg.field {
                    FieldKind::WeierstrassPrime => wp::affine_add(cfg, x1, y1, x2, y2)?,
                    FieldKind::WeierstrassBinary => wb::affine_add(cfg, x1, y1, x2, y2)?,
                    _ => return Err(Error::PointError),
                }
            }
            (
                Coords::Jacobian { x: x1, y: y1, z: z1 },
                Coords::Jacobian { x: x2, y: y2, z: z2 },
            ) => wp::jacobian_add(cfg, x1, y1, z1, x2, y2, z2)?,
            (Coords::Jacobian { x: x1, y: y1, z: z1 }, Coords::Affine { x: x2, y: y2 }) => {
                let one = Mpz::from_u64(1);
                wp::jacobian_add(cfg, x1, y1, z1, x2, y2, &one)?
            }
            (
                Coords::Projective { x: x1, y: y1, z: z1 },
                Coords::Projective { x: x2, y: y2, z: z2 },
            ) => wp::projective_add(cfg, x1, y1, z1, x2, y2, z2)?,
            (Coords::Projective { x: x1, y: y1, z: z1 }, Coords::Affine { x: x2, y: y2 }) => {
                let one = Mpz::from_u64(1);
                wp::projective_add(cfg, x1, y1, z1, x2, y2, &one)?
            }
            (Coords::LopezDahab { x: x1, y: y1, z: z1 }, Coords::Affine { x: x2, y: y2 }) => {
                wb::ld_madd(cfg, x1, y1, z1, x2, y2)?
            }
            (
                Coords::LopezDahab { x: x1, y: y1, z: z1 },
                Coords::LopezDahab { .. },
            ) => {
                // Full LD-LD addition routes the second operand through
                // its affine image.
                let (ax, ay) = wb::to_affine(cfg, &rhs.coords)?;
                wb::ld_madd(cfg, x1, y1, z1, &ax, &ay)?
            }
            (
                Coords::Extended { x: x1, y: y1, t: t1, z: z1 },
                Coords::Extended { x: x2, y: y2, t: t2, z: z2 },
            ) => edwards::add(cfg, (x1, y1, t1, z1), (x2, y2, t2, z2))?,
            _ => return Err(Error::PointError),
        };
        self.z_one = false;
        Ok(())
    }

    /// Curve-dependent negation: `y ↦ −y` (prime Weierstrass),
    /// `y ↦ x + y` (binary Weierstrass), `x ↦ −x` (Edwards).
    pub fn negate(&mut self, cfg: &CurveConfig<L>) -> Result<()> {
        match (&mut self.coords, cfg.field) {
            (Coords::Infinity, _) => {}
            (Coords::Affine { y, .. }, FieldKind::WeierstrassPrime)
            | (Coords::Affine { y, .. }, FieldKind::MontgomeryPrime) => {
                *y = cfg.fp.sub_mod(&Mpz::new(), y)?;
            }
            (Coords::Jacobian { y, .. }, _) | (Coords::Projective { y, .. }, _) => {
                *y = cfg.fp.sub_mod(&Mpz::new(), y)?;
            }
            (Coords::Affine { x, y }, FieldKind::WeierstrassBinary) => {
                let gf = cfg.gf.as_ref().ok_or(Error::PointError)?;
                *y = gf.add(x, y);
            }
            (Coords::LopezDahab { x, y, z }, _) => {
                // y = Y/Z² ↦ y + x means Y ↦ Y + X·Z.
                let gf = cfg.gf.as_ref().ok_or(Error::PointError)?;
                *y = gf.add(y, &gf.mul(x, z));
            }
            (Coords::Extended { x, t, .. }, _) => {
                *x = cfg.fp.sub_mod(&Mpz::new(), x)?;
                *t = cfg.fp.sub_mod(&Mpz::new(), t)?;
            }
            _ => return Err(Error::PointError),
        }
        Ok(())
    }

    /// Constant-time conditional swap of two points over their padded
    /// coordinate limbs.
    pub fn cswap(cfg: &CurveConfig<L>, a: &mut EcPoint<L>, b: &mut EcPoint<L>, bit: u8) {
        let pad = match &cfg.gf {
            Some(gf) => gf.degree().div_ceil(L::BITS as usize),
            None => cfg.fp.limb_count(),
        };

        let mut av = a.coord_image(pad);
        let mut bv = b.coord_image(pad);
        if av.len() == bv.len() {
            ct::cswap(L::from_u8(bit), &mut av, &mut bv);
            a.load_image(&av, pad);
            b.load_image(&bv, pad);
        } else if bit == 1 {
            core::mem::swap(a, b);
        }
    }

    fn coord_image(&self, pad: usize) -> Vec<L> {
        let mut out = Vec::new();
        let mut push = |v: &Mpz<L>| {
            let mut limbs = v.limbs().to_vec();
            limbs.resize(pad, L::ZERO);
            out.extend_from_slice(&limbs);
        };
        match &self.coords {
            Coords::Infinity => {}
            Coords::Affine { x, y } => {
                push(x);
                push(y);
            }
            Coords::Projective { x, y, z }
            | Coords::Jacobian { x, y, z }
            | Coords::LopezDahab { x, y, z } => {
                push(x);
                push(y);
                push(z);
            }
            Coords::Extended { x, y, t, z } => {
                push(x);
                push(y);
                push(t);
                push(z);
            }
        }
        out
    }

    fn load_image(&mut self, image: &[L], pad: usize) {
        let mut chunks = image.chunks(pad);
        let mut next = || Mpz::from_limbs(chunks.next().unwrap_or(&[]).to_vec(), false);
        self.coords = match &self.coords {
            Coords::Infinity => Coords::Infinity,
            Coords::Affine { .. } => Coords::Affine { x: next(), y: next() },
            Coords::Projective { .. } => Coords::Projective { x: next(), y: next(), z: next() },
            Coords::Jacobian { .. } => Coords::Jacobian { x: next(), y: next(), z: next() },
            Coords::LopezDahab { .. } => Coords::LopezDahab { x: next(), y: next(), z: next() },
            Coords::Extended { .. } => Coords::Extended {
                x: next(),
                y: next(),
                t: next(),
                z: next(),
            },
        };
    }
}
