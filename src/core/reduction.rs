//! Modular reduction contexts.
//!
//! A [`ModContext`] captures a modulus together with the precomputation its
//! reduction strategy needs:
//!
//! - **Barrett**: μ = ⌊2^(2·B·k) / m⌋, reduction by reciprocal estimate and
//!   at most two trailing subtractions.
//! - **Montgomery**: m' = −m⁻¹ mod 2^B and R² mod m, word-by-word REDC with
//!   a constant-time final subtraction. Requires an odd modulus.
//! - **Naive**: plain division, kept for odd-sized temporaries.
//! - **Custom**: a caller-provided reduction function for special moduli.
//!
//! `pow_mod` drives the exponent through either a left-to-right
//! square-and-multiply or a Montgomery ladder. The ladder is not optional
//! for secret exponents: callers state the exponent's visibility and a
//! [`Visibility::Secret`] exponent always takes the ladder, whose per-bit
//! work is two fixed multiplications and two conditional swaps.

use core::cmp::Ordering;

use crate::core::ct;
use crate::core::limb::Limb;
use crate::core::mpbase;
use crate::core::mpz::Mpz;
use crate::error::{Error, Result};

/// Reduction strategy selector.
#[derive(Clone)]
pub enum Reduction<L: Limb> {
    /// Barrett reduction by precomputed reciprocal.
    Barrett,
    /// Montgomery REDC; the modulus must be odd.
    Montgomery,
    /// Division-based reduction.
    Naive,
    /// Caller-supplied reduction for special-form moduli.
    Custom(fn(&Mpz<L>, &Mpz<L>) -> Mpz<L>),
}

impl<L: Limb> core::fmt::Debug for Reduction<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Reduction::Barrett => "Barrett",
            Reduction::Montgomery => "Montgomery",
            Reduction::Naive => "Naive",
            Reduction::Custom(_) => "Custom",
        };
        f.write_str(name)
    }
}

/// Whether an exponent may influence observable timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Public exponent; square-and-multiply is permitted.
    Public,
    /// Secret exponent; the Montgomery ladder is mandatory.
    Secret,
}

/// A modulus with its reduction precomputation.
#[derive(Debug, Clone)]
pub struct ModContext<L: Limb> {
    /// The modulus `m > 0`.
    m: Mpz<L>,
    /// Bit length of `m`.
    mod_bits: usize,
    /// Limb count `k` of `m`.
    k: usize,
    /// Selected strategy.
    reduction: Reduction<L>,
    /// Barrett reciprocal ⌊2^(2·B·k)/m⌋.
    mu: Mpz<L>,
    /// −m⁻¹ mod 2^B (Montgomery).
    mont_inv: L,
    /// R² mod m where R = 2^(B·k) (Montgomery).
    r2: Mpz<L>,
    /// R mod m, the Montgomery representation of one.
    r1: Mpz<L>,
}

impl<L: Limb> ModContext<L> {
    /// Builds a context for `m` under the requested strategy.
    pub fn new(m: Mpz<L>, reduction: Reduction<L>) -> Result<Self> {
        if m.is_zero() || m.is_negative() {
            return Err(Error::DivideByZero);
        }

        let mod_bits = m.bit_length();
        let k = m.limbs().len();
        let b = L::BITS as usize;

        let mut ctx = Self {
            m,
            mod_bits,
            k,
            reduction,
            mu: Mpz::new(),
            mont_inv: L::ZERO,
            r2: Mpz::new(),
            r1: Mpz::new(),
        };

        match ctx.reduction {
            Reduction::Barrett | Reduction::Naive => {
                let mut t = Mpz::new();
                t.set_bit(2 * b * k);
                let (mu, _) = t.divrem(&ctx.m)?;
                ctx.mu = mu;
            }
            Reduction::Montgomery => {
                if !ctx.m.is_odd() {
                    return Err(Error::InvalidParameterSet);
                }

                // Word inverse of m mod 2^B by Newton iteration, negated.
                let m0 = ctx.m.limbs()[0];
                let mut inv = m0;
                for _ in 0..6 {
                    let two = L::ONE.wrapping_add(L::ONE);
                    inv = inv.wrapping_mul(two.wrapping_sub(m0.wrapping_mul(inv)));
                }
                ctx.mont_inv = inv.wrapping_neg();

                let mut r = Mpz::new();
                r.set_bit(b * k);
                ctx.r1 = r.mod_positive(&ctx.m)?;
                ctx.r2 = ctx.r1.square().mod_positive(&ctx.m)?;
            }
            Reduction::Custom(_) => {}
        }

        Ok(ctx)
    }

    /// The modulus.
    pub fn modulus(&self) -> &Mpz<L> {
        &self.m
    }

    /// Bit length of the modulus.
    pub fn mod_bits(&self) -> usize {
        self.mod_bits
    }

    /// Limb count of the modulus.
    pub fn limb_count(&self) -> usize {
        self.k
    }

    /// Strategy-dispatched reduction.
    ///
    /// Under Barrett/Naive this is `a mod m`; under Montgomery it is the
    /// REDC map `a·R⁻¹ mod m` (so `reduce(to_mont(a)) = a mod m`).
    pub fn reduce(&self, a: &Mpz<L>) -> Result<Mpz<L>> {
        match self.reduction {
            Reduction::Barrett => self.reduce_barrett(a),
            Reduction::Naive => a.mod_positive(&self.m),
            Reduction::Montgomery => Ok(self.redc(a)),
            Reduction::Custom(f) => Ok(f(a, &self.m)),
        }
    }

    /// Barrett reduction of `0 <= a < 2^(2·B·k)`.
    pub fn reduce_barrett(&self, a: &Mpz<L>) -> Result<Mpz<L>> {
        if a.is_negative() {
            return a.mod_positive(&self.m);
        }
        let b = L::BITS as usize;
        if a.bit_length() > 2 * b * self.k {
            // Outside the reciprocal's range; fall back to division.
            return a.mod_positive(&self.m);
        }

        // q̂ = ⌊(⌊a / 2^(B(k-1))⌋ · μ) / 2^(B(k+1))⌋
        let q1 = a.shr_bits(b * (self.k - 1));
        let q2 = q1.mul_ref(&self.mu);
        let q3 = q2.shr_bits(b * (self.k + 1));

        let mut r = a.sub_ref(&q3.mul_ref(&self.m));

        // At most two conditional subtractions.
        for _ in 0..2 {
            if r.cmp_abs(&self.m) != Ordering::Less || r.is_negative() {
                r = r.sub_ref(&self.m);
            }
        }
        if r.is_negative() {
            r = r.add_ref(&self.m);
        }
        Ok(r)
    }

    /// Fixed-width Montgomery multiplication of two residues `< m`,
    /// both padded to `k` limbs. Returns `a·b·R⁻¹ mod m` in `k` limbs.
    ///
    /// Coarsely-integrated operand scanning; the final subtraction of the
    /// modulus is performed unconditionally into a scratch buffer and
    /// committed with a constant-time conditional move.
    fn mont_mul_fixed(&self, a: &[L], b: &[L]) -> Vec<L> {
        let k = self.k;
        let m = self.m.limbs();
        debug_assert_eq!(a.len(), k);
        debug_assert_eq!(b.len(), k);

        let mut t = vec![L::ZERO; k + 2];

        for i in 0..k {
            // t += a * b[i]
            let mut carry = L::ZERO;
            for j in 0..k {
                let (hi, lo) = a[j].mac(b[i], t[j], carry);
                t[j] = lo;
                carry = hi;
            }
            let (s, c) = t[k].adc(carry, L::ZERO);
            t[k] = s;
            t[k + 1] = t[k + 1].wrapping_add(c);

            // t += (t[0]·m' mod B) · m, then shift one limb right.
            let u = t[0].wrapping_mul(self.mont_inv);
            let (hi, _lo) = u.mac(m[0], t[0], L::ZERO);
            let mut carry = hi;
            for j in 1..k {
                let (hi, lo) = u.mac(m[j], t[j], carry);
                t[j - 1] = lo;
                carry = hi;
            }
            let (s, c) = t[k].adc(carry, L::ZERO);
            t[k - 1] = s;
            t[k] = t[k + 1].wrapping_add(c);
            t[k + 1] = L::ZERO;
        }

        // Constant-time conditional subtraction of m. The subtracted copy
        // is kept when the overflow limb is set or the subtraction did not
        // borrow; otherwise the original limbs are restored.
        let mut reduced = t[..k].to_vec();
        let borrow = mpbase::sub_into(&mut reduced, m);
        let use_sub = ct::eq(borrow, L::ZERO) | t[k];
        ct::cmov(ct::eq(use_sub, L::ZERO), &mut reduced, &t[..k]);
        reduced
    }

    fn pad(&self, a: &Mpz<L>) -> Vec<L> {
        let mut v = a.limbs().to_vec();
        v.resize(self.k, L::ZERO);
        v
    }

    /// REDC: maps `a` (up to 2k limbs) to `a·R⁻¹ mod m`.
    fn redc(&self, a: &Mpz<L>) -> Mpz<L> {
        // mont_mul(a_lo, 1) handles k limbs; wider inputs take the
        // two-step path via R².
        if a.limbs().len() <= self.k && !a.is_negative() {
            let mut one = vec![L::ZERO; self.k];
            one[0] = L::ONE;
            let r = self.mont_mul_fixed(&self.pad(a), &one);
            return Mpz::from_limbs(r, false);
        }

        let a = a.mod_positive(&self.m).unwrap_or_default();
        let mut one = vec![L::ZERO; self.k];
        one[0] = L::ONE;
        let r = self.mont_mul_fixed(&self.pad(&a), &one);
        Mpz::from_limbs(r, false)
    }

    /// Maps `a` into the Montgomery domain: `a·R mod m`.
    pub fn to_mont(&self, a: &Mpz<L>) -> Result<Mpz<L>> {
        let a = a.mod_positive(&self.m)?;
        let r = self.mont_mul_fixed(&self.pad(&a), &self.pad(&self.r2));
        Ok(Mpz::from_limbs(r, false))
    }

    /// Maps a Montgomery-domain value back to the plain domain.
    pub fn from_mont(&self, a: &Mpz<L>) -> Mpz<L> {
        self.redc(a)
    }

    /// Montgomery-domain product `a·b·R⁻¹ mod m`.
    pub fn mul_mont(&self, a: &Mpz<L>, b: &Mpz<L>) -> Mpz<L> {
        let r = self.mont_mul_fixed(&self.pad(a), &self.pad(b));
        Mpz::from_limbs(r, false)
    }

    /// Plain-domain modular multiplication.
    pub fn mul_mod(&self, a: &Mpz<L>, b: &Mpz<L>) -> Result<Mpz<L>> {
        match self.reduction {
            Reduction::Montgomery => {
                let am = self.to_mont(a)?;
                let bm = self.to_mont(b)?;
                Ok(self.from_mont(&self.mul_mont(&am, &bm)))
            }
            Reduction::Barrett => {
                let a = self.normalize_operand(a)?;
                let b = self.normalize_operand(b)?;
                self.reduce_barrett(&a.mul_ref(&b))
            }
            _ => a.mul_ref(b).mod_positive(&self.m),
        }
    }

    /// Plain-domain modular squaring.
    pub fn sqr_mod(&self, a: &Mpz<L>) -> Result<Mpz<L>> {
        self.mul_mod(a, a)
    }

    /// Modular addition of canonical residues.
    pub fn add_mod(&self, a: &Mpz<L>, b: &Mpz<L>) -> Result<Mpz<L>> {
        let s = a.add_ref(b);
        if s.cmp_abs(&self.m) == Ordering::Less && !s.is_negative() {
            Ok(s)
        } else {
            s.mod_positive(&self.m)
        }
    }

    /// Modular subtraction of canonical residues.
    pub fn sub_mod(&self, a: &Mpz<L>, b: &Mpz<L>) -> Result<Mpz<L>> {
        let d = a.sub_ref(b);
        if d.is_negative() {
            Ok(d.add_ref(&self.m))
        } else if d.cmp_abs(&self.m) == Ordering::Less {
            Ok(d)
        } else {
            d.mod_positive(&self.m)
        }
    }

    fn normalize_operand(&self, a: &Mpz<L>) -> Result<Mpz<L>> {
        if a.is_negative() || a.cmp_abs(&self.m) != Ordering::Less {
            a.mod_positive(&self.m)
        } else {
            Ok(a.clone())
        }
    }

    /// Modular exponentiation.
    ///
    /// [`Visibility::Secret`] exponents always run the Montgomery ladder
    /// over the full stated exponent length with constant-time swaps;
    /// [`Visibility::Public`] exponents use left-to-right
    /// square-and-multiply.
    pub fn pow_mod(&self, base: &Mpz<L>, exp: &Mpz<L>, vis: Visibility) -> Result<Mpz<L>> {
        if exp.is_negative() {
            let inv = base.invert(&self.m)?;
            return self.pow_mod(&inv, &exp.neg_ref(), vis);
        }
        if exp.is_zero() {
            return Mpz::from_u64(1).mod_positive(&self.m);
        }

        match vis {
            Visibility::Public => self.pow_public(base, exp),
            Visibility::Secret => self.pow_ladder(base, exp),
        }
    }

    fn pow_public(&self, base: &Mpz<L>, exp: &Mpz<L>) -> Result<Mpz<L>> {
        // Square-and-multiply, MSB first, in the Montgomery domain when
        // the modulus permits.
        if self.m.is_odd() {
            let mont = self.montgomery_view()?;
            let b = mont.to_mont(base)?;
            let mut acc = mont.r1.clone();
            for i in (0..exp.bit_length()).rev() {
                acc = mont.mul_mont(&acc, &acc);
                if exp.get_bit(i) == 1 {
                    acc = mont.mul_mont(&acc, &b);
                }
            }
            return Ok(mont.from_mont(&acc));
        }

        let b = self.normalize_operand(base)?;
        let mut acc = Mpz::from_u64(1);
        for i in (0..exp.bit_length()).rev() {
            acc = self.mul_mod(&acc, &acc)?;
            if exp.get_bit(i) == 1 {
                acc = self.mul_mod(&acc, &b)?;
            }
        }
        Ok(acc)
    }

    fn pow_ladder(&self, base: &Mpz<L>, exp: &Mpz<L>) -> Result<Mpz<L>> {
        let mont = self.montgomery_view()?;
        let b = mont.to_mont(base)?;

        let mut r0 = mont.pad(&mont.r1);
        let mut r1 = mont.pad(&b);

        // One double and one multiply per bit, independent of the bit's
        // value; the branch is replaced by a pair of conditional swaps.
        for i in (0..exp.bit_length()).rev() {
            let bit = L::from_u8(exp.get_bit(i));
            ct::cswap(bit, &mut r0, &mut r1);
            let prod = mont.mont_mul_fixed(&r0, &r1);
            let sq = mont.mont_mul_fixed(&r0, &r0);
            r1.copy_from_slice(&prod);
            r0.copy_from_slice(&sq);
            ct::cswap(bit, &mut r0, &mut r1);
        }

        Ok(mont.from_mont(&Mpz::from_limbs(r0, false)))
    }

    /// A Montgomery-strategy view of this modulus (self if already
    /// Montgomery). The modulus must be odd.
    fn montgomery_view(&self) -> Result<ModContext<L>> {
        match self.reduction {
            Reduction::Montgomery => Ok(self.clone()),
            _ => ModContext::new(self.m.clone(), Reduction::Montgomery),
        }
    }

    /// Modular inverse via extended GCD.
    pub fn invert(&self, a: &Mpz<L>) -> Result<Mpz<L>> {
        a.invert(&self.m)
    }

    /// Modular square root by Tonelli–Shanks.
    ///
    /// Fails with [`Error::NonInvertible`] when `a` is a quadratic
    /// non-residue modulo the (prime) modulus.
    pub fn sqrt_mod(&self, a: &Mpz<L>) -> Result<Mpz<L>> {
        let a = a.mod_positive(&self.m)?;
        if a.is_zero() {
            return Ok(Mpz::new());
        }

        let one = Mpz::from_u64(1);
        let m_minus_1 = self.m.sub_ref(&one);

        // Legendre symbol check: a^((m-1)/2) must be 1.
        let legendre = self.pow_mod(&a, &m_minus_1.shr_bits(1), Visibility::Public)?;
        if !legendre.is_one() {
            return Err(Error::NonInvertible);
        }

        // m - 1 = q · 2^s with q odd.
        let mut s = 0usize;
        let mut q = m_minus_1.clone();
        while !q.is_odd() {
            q = q.shr_bits(1);
            s += 1;
        }

        if s == 1 {
            // m ≡ 3 (mod 4): a^((m+1)/4)
            let e = self.m.add_ref(&one).shr_bits(2);
            return self.pow_mod(&a, &e, Visibility::Public);
        }

        // Find a non-residue z.
        let mut z = Mpz::from_u64(2);
        loop {
            let l = self.pow_mod(&z, &m_minus_1.shr_bits(1), Visibility::Public)?;
            if !l.is_one() {
                break;
            }
            z = z.add_ref(&one);
        }

        let mut c = self.pow_mod(&z, &q, Visibility::Public)?;
        let mut t = self.pow_mod(&a, &q, Visibility::Public)?;
        let mut r = self.pow_mod(&a, &q.add_ref(&one).shr_bits(1), Visibility::Public)?;
        let mut m_exp = s;

        while !t.is_one() {
            // Least i with t^(2^i) = 1.
            let mut i = 0usize;
            let mut t2 = t.clone();
            while !t2.is_one() {
                t2 = self.sqr_mod(&t2)?;
                i += 1;
                if i == m_exp {
                    return Err(Error::NonInvertible);
                }
            }

            let mut b = c.clone();
            for _ in 0..(m_exp - i - 1) {
                b = self.sqr_mod(&b)?;
            }

            m_exp = i;
            c = self.sqr_mod(&b)?;
            t = self.mul_mod(&t, &c)?;
            r = self.mul_mod(&r, &b)?;
        }

        Ok(r)
    }
}
