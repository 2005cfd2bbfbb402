//! Curve configurations.
//!
//! A [`CurveConfig`] carries everything the point arithmetic needs: the
//! field modulus context (prime or binary), the group order context, the
//! curve parameters with fast-path flags for the well-known special values
//! of `a` and `b`, the generator, and the coordinate system the scheme
//! wants to work in. Configurations are immutable after construction and
//! shared by reference with every operation they parametrise.

use crate::core::gf2n::Gf2nContext;
use crate::core::limb::Limb;
use crate::core::mpz::Mpz;
use crate::core::reduction::{ModContext, Reduction};
use crate::error::Result;

/// Field family of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Short Weierstrass over a prime field.
    WeierstrassPrime,
    /// Weierstrass over GF(2^n).
    WeierstrassBinary,
    /// Montgomery form over a prime field (x-only ladder).
    MontgomeryPrime,
    /// (Twisted) Edwards over a prime field.
    EdwardsPrime,
}

/// Coordinate systems for [`super::point::EcPoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordSystem {
    /// `{x, y}`.
    Affine,
    /// `{X, Y, Z}` with `x = X/Z`, `y = Y/Z`.
    Projective,
    /// `{X, Y, Z}` with `x = X/Z²`, `y = Y/Z³`.
    Jacobian,
    /// Binary-field `{X, Y, Z}` with `x = X/Z`, `y = Y/Z²`.
    LopezDahab,
    /// Edwards `{X, Y, T, Z}` with `T = XY/Z`.
    Extended,
}

/// Fast-path classification of the curve parameter `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamAKind {
    MinusThree,
    MinusOne,
    Zero,
    One,
    General,
}

/// A fully-described curve.
#[derive(Debug, Clone)]
pub struct CurveConfig<L: Limb> {
    /// Human-readable curve name.
    pub name: &'static str,
    /// Field family.
    pub field: FieldKind,
    /// Working coordinate system for scalar multiplication.
    pub coords: CoordSystem,
    /// Prime-field modulus context (unused limbs for binary curves).
    pub fp: ModContext<L>,
    /// Binary-field context for GF(2^n) curves.
    pub gf: Option<Gf2nContext>,
    /// Group order context.
    pub order: ModContext<L>,
    /// Cofactor `h`.
    pub cofactor: u32,
    /// Curve parameter `a` (the Montgomery `A`, or the Edwards `a`).
    pub a: Mpz<L>,
    /// Curve parameter `b` (the Edwards `d` for Edwards curves).
    pub b: Mpz<L>,
    /// Classification of `a` for formula fast paths.
    pub a_kind: ParamAKind,
    /// True when `b == 1`.
    pub b_is_one: bool,
    /// Generator x.
    pub gx: Mpz<L>,
    /// Generator y.
    pub gy: Mpz<L>,
}

impl<L: Limb> CurveConfig<L> {
    /// Byte length of a field element.
    pub fn field_bytes(&self) -> usize {
        match &self.gf {
            Some(gf) => gf.degree().div_ceil(8),
            None => self.fp.mod_bits().div_ceil(8),
        }
    }

    /// Byte length of a group-order scalar.
    pub fn order_bytes(&self) -> usize {
        self.order.mod_bits().div_ceil(8)
    }
}

fn hex<L: Limb>(s: &str) -> Mpz<L> {
    Mpz::from_str_radix(s, 16).expect("curve constant")
}

fn classify_a<L: Limb>(a: &Mpz<L>, p: &Mpz<L>) -> ParamAKind {
    let one = Mpz::from_u64(1);
    if a.is_zero() {
        ParamAKind::Zero
    } else if a.is_one() {
        ParamAKind::One
    } else if *a == p.sub_ref(&one) {
        ParamAKind::MinusOne
    } else if *a == p.sub_ref(&Mpz::from_u64(3)) {
        ParamAKind::MinusThree
    } else {
        ParamAKind::General
    }
}

fn prime_curve<L: Limb>(
    name: &'static str,
    field: FieldKind,
    coords: CoordSystem,
    p: Mpz<L>,
    a: Mpz<L>,
    b: Mpz<L>,
    n: Mpz<L>,
    cofactor: u32,
    gx: Mpz<L>,
    gy: Mpz<L>,
) -> Result<CurveConfig<L>> {
    let a_kind = classify_a(&a, &p);
    let b_is_one = b.is_one();
    Ok(CurveConfig {
        name,
        field,
        coords,
        fp: ModContext::new(p, Reduction::Barrett)?,
        gf: None,
        order: ModContext::new(n, Reduction::Barrett)?,
        cofactor,
        a,
        b,
        a_kind,
        b_is_one,
        gx,
        gy,
    })
}

/// NIST P-256 (secp256r1), Jacobian working coordinates.
pub fn p256<L: Limb>() -> Result<CurveConfig<L>> {
    let p = hex("ffffffff00000001000000000000000000000000ffffffffffffffffffffffff");
    let a = hex("ffffffff00000001000000000000000000000000fffffffffffffffffffffffc");
    prime_curve(
        "secp256r1",
        FieldKind::WeierstrassPrime,
        CoordSystem::Jacobian,
        p,
        a,
        hex("5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b"),
        hex("ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551"),
        1,
        hex("6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296"),
        hex("4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5"),
    )
}

/// NIST P-384 (secp384r1), Jacobian working coordinates.
pub fn p384<L: Limb>() -> Result<CurveConfig<L>> {
    let p = hex(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffff0000000000000000ffffffff",
    );
    let a = hex(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffff0000000000000000fffffffc",
    );
    prime_curve(
        "secp384r1",
        FieldKind::WeierstrassPrime,
        CoordSystem::Jacobian,
        p,
        a,
        hex("b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875ac656398d8a2ed19d2a85c8edd3ec2aef"),
        hex("ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf581a0db248b0a77aecec196accc52973"),
        1,
        hex("aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a385502f25dbf55296c3a545e3872760ab7"),
        hex("3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c00a60b1ce1d7e819d7a431d7c90ea0e5f"),
    )
}

/// NIST B-233 (sect233r1) over GF(2^233), López–Dahab working
/// coordinates. The field polynomial is the trinomial `x^233 + x^74 + 1`.
pub fn b233<L: Limb>() -> Result<CurveConfig<L>> {
    let gf = Gf2nContext::new(&[233, 74, 0])?;
    let one = Mpz::from_u64(1);

    Ok(CurveConfig {
        name: "sect233r1",
        field: FieldKind::WeierstrassBinary,
        coords: CoordSystem::LopezDahab,
        // Binary curves never touch the prime context; a placeholder
        // two keeps the record total.
        fp: ModContext::new(Mpz::from_u64(2), Reduction::Naive)?,
        gf: Some(gf),
        order: ModContext::new(
            hex("01000000000000000000000000000013e974e72f8a6922031d2603cfe0d7"),
            Reduction::Barrett,
        )?,
        cofactor: 2,
        a: one.clone(),
        b: hex("0066647ede6c332c7f8c0923bb58213b333b20e9ce4281fe115f7d8f90ad"),
        a_kind: ParamAKind::One,
        b_is_one: false,
        gx: hex("00fac9dfcbac8313bb2139f1bb755fef65bc391f8b36f8f8eb7371fd558b"),
        gy: hex("01006a08a41903350678e58528bebf8a0beff867a7ca36716f7e01f81052"),
    })
}

/// edwards25519 (`−x² + y² = 1 + d·x²·y²` over 2^255 − 19), extended
/// homogeneous coordinates.
pub fn ed25519<L: Limb>() -> Result<CurveConfig<L>> {
    let p = hex("7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed");
    let a = p.sub_ref(&Mpz::from_u64(1));
    prime_curve(
        "edwards25519",
        FieldKind::EdwardsPrime,
        CoordSystem::Extended,
        p,
        a,
        hex("52036cee2b6ffe738cc740797779e89800700a4d4141d8ab75eb4dca135978a3"),
        hex("1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed"),
        8,
        hex("216936d3cd6e53fec0a4e231fdd6dc5c692cc7609525a7b2c9562d608f25d51a"),
        hex("6666666666666666666666666666666666666666666666666666666666666658"),
    )
}

/// edwards448 (`x² + y² = 1 + d·x²·y²` over 2^448 − 2^224 − 1), extended
/// homogeneous coordinates.
pub fn ed448<L: Limb>() -> Result<CurveConfig<L>> {
    let p = hex(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
    );
    let d = p.sub_ref(&Mpz::from_u64(39081));
    prime_curve(
        "edwards448",
        FieldKind::EdwardsPrime,
        CoordSystem::Extended,
        p,
        Mpz::from_u64(1),
        d,
        hex("3fffffffffffffffffffffffffffffffffffffffffffffffffffffff7cca23e9c44edb49aed63690216cc2728dc58f552378c292ab5844f3"),
        4,
        hex("4f1970c66bed0ded221d15a622bf36da9e146570470f1767ea6de324a3d3a46412ae1af72ab66511433b80e18b00938e2626a82bc70cc05e"),
        hex("693f46716eb6bc248876203756c9c7624bea73736ca3984087789c1e05a0c2d73ad3ff1ce67c39c4fdbd132c4ed7c8ad9808795bf230fa14"),
    )
}

/// curve25519 in Montgomery form (`y² = x³ + 486662x² + x`), x-only
/// ladder coordinates.
pub fn curve25519<L: Limb>() -> Result<CurveConfig<L>> {
    let p = hex("7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed");
    prime_curve(
        "curve25519",
        FieldKind::MontgomeryPrime,
        CoordSystem::Projective,
        p,
        Mpz::from_u64(486662),
        Mpz::from_u64(1),
        hex("1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed"),
        8,
        Mpz::from_u64(9),
        hex("20ae19a1b8a086b4e01edd2c7748d14c923d4d7e6d7c61b229e9c5a27eced3d9"),
    )
}

/// Looks up a named curve.
pub fn by_name<L: Limb>(name: &str) -> Result<CurveConfig<L>> {
    match name {
        "secp256r1" | "P-256" => p256(),
        "secp384r1" | "P-384" => p384(),
        "sect233r1" | "B-233" => b233(),
        "edwards25519" | "Ed25519" => ed25519(),
        "edwards448" | "Ed448" => ed448(),
        "curve25519" | "X25519" => curve25519(),
        _ => Err(crate::error::Error::InvalidParameterSet),
    }
}
